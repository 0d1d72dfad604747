// SPDX-FileCopyrightText: © 2025 FrameKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Shared defaults for the pull engine.
//!
//! The request concurrency default lives in
//! [`framekit_core::node_config`], next to the cache size, because graph
//! construction and execution read it from the same process-wide config.

/// Default bound on how many nodes a single pull may pass through.
///
/// Pulls recurse once per graph edge, so this bounds stack use. Real graphs
/// rarely exceed a few dozen nodes between sink and source.
///
/// Recommended range: 256-4096
pub const DEFAULT_MAX_GRAPH_DEPTH: usize = 1024;
