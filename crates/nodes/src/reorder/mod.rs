// SPDX-FileCopyrightText: © 2025 FrameKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Frame-index remapping filters.
//!
//! Every filter in this module answers a request for output frame `n` with
//! exactly one upstream frame, handed through untouched. The filters differ
//! only in how `n` is translated and in how the output [`StreamInfo`] is
//! derived from their inputs at construction.
//!
//! All of them run in [`FilterMode::Parallel`](framekit_core::FilterMode)
//! and opt out of caching, except [`splice`] after it has bypassed the
//! caches of its inputs.
//!
//! [`StreamInfo`]: framekit_core::StreamInfo

use framekit_core::{frame_index, FilterRegistry, FrameKitError, Result};

pub mod delete;
pub mod duplicate;
pub mod freeze;
pub mod interleave;
pub mod loop_clip;
pub mod reverse;
pub mod select_every;
pub mod splice;
pub mod trim;

/// Upstream frame number computed at `Initial` and reused at `AllFramesReady`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct UpstreamFrame(pub usize);

/// Registers all remapping filters.
pub fn register_reorder_nodes(registry: &mut FilterRegistry) {
    registry.register_with_description(
        trim::NAME,
        trim::params(),
        trim::create,
        "Keeps a contiguous range of frames given by a first frame and either \
         a last frame or a length.",
    );
    registry.register_with_description(
        reverse::NAME,
        reverse::params(),
        reverse::create,
        "Plays a clip of known length backwards.",
    );
    registry.register_with_description(
        loop_clip::NAME,
        loop_clip::params(),
        loop_clip::create,
        "Repeats a clip a number of times, or forever when times is 0.",
    );
    registry.register_with_description(
        interleave::NAME,
        interleave::params(),
        interleave::create,
        "Alternates frames from several clips, one frame from each in turn.",
    );
    registry.register_with_description(
        select_every::NAME,
        select_every::params(),
        select_every::create,
        "Keeps the given offsets out of every cycle of frames.",
    );
    registry.register_with_description(
        splice::NAME,
        splice::params(),
        splice::create,
        "Concatenates clips end to end.",
    );
    registry.register_with_description(
        duplicate::NAME,
        duplicate::params(),
        duplicate::create,
        "Inserts a repeat of each listed frame right after it.",
    );
    registry.register_with_description(
        delete::NAME,
        delete::params(),
        delete::create,
        "Drops the listed frames.",
    );
    registry.register_with_description(
        freeze::NAME,
        freeze::params(),
        freeze::create,
        "Replaces every frame in each range with a single replacement frame.",
    );
}

/// Error for an output length or rate that no longer fits.
pub(crate) fn too_long(filter: &str) -> FrameKitError {
    FrameKitError::configuration(format!("{filter}: resulting clip is too long"))
}

/// Error for an output frame number whose upstream index does not fit.
///
/// Only reachable on unknown-length inputs, which accept any frame number.
pub(crate) fn frame_overflow(filter: &str) -> FrameKitError {
    FrameKitError::runtime(format!("{filter}: frame number overflow"))
}

/// Multiplies a frame rate component by a clip or offset count.
pub(crate) fn scale_rate(rate: i64, factor: usize, filter: &str) -> Result<i64> {
    i64::try_from(factor).ok().and_then(|factor| rate.checked_mul(factor)).ok_or_else(|| {
        FrameKitError::configuration(format!("{filter}: resulting frame rate is too large"))
    })
}

/// Converts a list of frame numbers, each of which must exist in the clip.
///
/// An unknown `num_frames` only rules out negative numbers.
pub(crate) fn frame_list(filter: &str, values: &[i64], num_frames: usize) -> Result<Vec<usize>> {
    let message = format!("{filter}: Out of bounds frame number.");
    values
        .iter()
        .map(|&value| {
            let frame = frame_index(value, &message)?;
            if num_frames != 0 && frame >= num_frames {
                return Err(FrameKitError::configuration(message.as_str()));
            }
            Ok(frame)
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_list_bounds() {
        assert_eq!(frame_list("Test", &[0, 4, 9], 10).unwrap(), vec![0, 4, 9]);
        assert!(frame_list("Test", &[10], 10).is_err());
        assert!(frame_list("Test", &[-1], 10).is_err());
        // unknown length
        assert_eq!(frame_list("Test", &[1000], 0).unwrap(), vec![1000]);
    }

    #[test]
    fn test_scale_rate_overflow() {
        assert_eq!(scale_rate(30_000, 2, "Test").unwrap(), 60_000);
        let err = scale_rate(i64::MAX, 2, "Test").unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: Test: resulting frame rate is too large");
    }
}
