// SPDX-FileCopyrightText: © 2025 FrameKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Reconciling stream metadata across several inputs.

use crate::types::StreamInfo;

/// Result of [`find_common_info`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergedInfo {
    pub info: StreamInfo,
    /// Set when any property could not be reconciled.
    pub mismatch: bool,
}

/// Merges the stream info of several inputs into one descriptor.
///
/// The merge starts from the first input. Differing dimensions zero both
/// width and height, a differing format becomes unknown, and the frame count
/// narrows to the shortest known length. An unknown-length input only
/// narrows the count when the running count is still known. Two differing
/// known lengths flag a mismatch unless `ignore_length` is set.
///
/// Returns `None` for an empty input list.
pub fn find_common_info(infos: &[StreamInfo], ignore_length: bool) -> Option<MergedInfo> {
    let (first, rest) = infos.split_first()?;
    let mut out = *first;
    let mut mismatch = false;

    for vi in rest {
        if out.width != vi.width || out.height != vi.height {
            out.width = 0;
            out.height = 0;
            mismatch = true;
        }

        if out.format != vi.format {
            out.format = None;
            mismatch = true;
        }

        if out.num_frames != 0 && vi.num_frames < out.num_frames {
            // Unknown length is compatible with any length
            if !ignore_length && vi.num_frames != 0 {
                mismatch = true;
            }
            out.num_frames = vi.num_frames;
        }
    }

    Some(MergedInfo { info: out, mismatch })
}
