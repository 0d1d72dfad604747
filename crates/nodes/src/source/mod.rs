// SPDX-FileCopyrightText: © 2025 FrameKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

use framekit_core::FilterRegistry;

pub mod blank;

/// Registers all source nodes.
pub fn register_source_nodes(registry: &mut FilterRegistry) {
    registry.register_with_description(
        blank::NAME,
        blank::params(),
        blank::create,
        "Produces blank frames tagged with their clip name and frame number.",
    );
}
