// SPDX-FileCopyrightText: © 2025 FrameKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

use framekit_core::{
    frame_index, ActivationReason, ArgMap, Filter, Frame, FrameContext, FrameData, FrameKitError,
    NodeRef, ParamSpec, Result, StreamInfo,
};

use super::UpstreamFrame;

pub const NAME: &str = "FreezeFrames";

const OUT_OF_BOUNDS: &str = "FreezeFrames: Out of bounds frame number(s).";

pub fn params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::clip("clip"),
        ParamSpec::int("first").array(),
        ParamSpec::int("last").array(),
        ParamSpec::int("replacement").array(),
    ]
}

/// Frames `first..=last` all show frame `replacement`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FreezeRange {
    first: usize,
    last: usize,
    replacement: usize,
}

pub struct FreezeFrames {
    node: NodeRef,
    info: StreamInfo,
    // Ordered and disjoint, never empty
    ranges: Vec<FreezeRange>,
}

impl FreezeFrames {
    fn upstream(&self, n: usize) -> usize {
        let (Some(head), Some(tail)) = (self.ranges.first(), self.ranges.last()) else {
            return n;
        };
        if n < head.first || n > tail.last {
            return n;
        }
        self.ranges
            .iter()
            .find(|range| (range.first..=range.last).contains(&n))
            .map_or(n, |range| range.replacement)
    }
}

fn freeze_range(first: i64, last: i64, replacement: i64, num_frames: usize) -> Result<FreezeRange> {
    let (first, last) = if first > last { (last, first) } else { (first, last) };
    let range = FreezeRange {
        first: frame_index(first, OUT_OF_BOUNDS)?,
        last: frame_index(last, OUT_OF_BOUNDS)?,
        replacement: frame_index(replacement, OUT_OF_BOUNDS)?,
    };
    if num_frames != 0 && (range.last >= num_frames || range.replacement >= num_frames) {
        return Err(FrameKitError::configuration(OUT_OF_BOUNDS));
    }
    Ok(range)
}

/// # Errors
///
/// Returns `FrameKitError::Configuration` if the three lists differ in length,
/// a frame lies outside the clip, or the ranges overlap or are out of order.
pub fn create(args: &ArgMap) -> Result<NodeRef> {
    let first = args.get_int_array("first")?;
    let last = args.get_int_array("last")?;
    let replacement = args.get_int_array("replacement")?;
    if first.len() != last.len() || first.len() != replacement.len() {
        return Err(FrameKitError::configuration(
            "FreezeFrames: 'first', 'last', and 'replacement' must have the same length.",
        ));
    }

    let node = args.get_node("clip")?;
    let info = *node.stream_info();

    let ranges = first
        .iter()
        .zip(&last)
        .zip(&replacement)
        .map(|((&first, &last), &replacement)| {
            freeze_range(first, last, replacement, info.num_frames)
        })
        .collect::<Result<Vec<_>>>()?;
    if ranges.windows(2).any(|pair| pair[0].last >= pair[1].first) {
        return Err(FrameKitError::configuration(
            "FreezeFrames: The frame ranges must not overlap and must be in ascending order.",
        ));
    }
    if ranges.is_empty() {
        return Ok(node);
    }

    Ok(NodeRef::new(FreezeFrames { node, info, ranges }, args.clone()))
}

impl Filter for FreezeFrames {
    fn name(&self) -> &str {
        NAME
    }

    fn stream_info(&self) -> StreamInfo {
        self.info
    }

    fn dependencies(&self) -> Vec<NodeRef> {
        vec![self.node.clone()]
    }

    fn get_frame(
        &self,
        n: usize,
        reason: ActivationReason,
        frame_data: &mut FrameData,
        ctx: &mut FrameContext,
    ) -> Result<Option<Frame>> {
        match reason {
            ActivationReason::Initial => {
                let upstream = self.upstream(n);
                frame_data.set(UpstreamFrame(upstream));
                ctx.request_frame(upstream, &self.node);
                Ok(None)
            },
            ActivationReason::AllFramesReady => {
                let UpstreamFrame(upstream) = frame_data.take_required(NAME)?;
                ctx.get_frame(upstream, &self.node).map(Some)
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::{assert_configuration_error, blank, origins};

    fn freeze(
        clip: &NodeRef,
        first: &[i64],
        last: &[i64],
        replacement: &[i64],
    ) -> Result<NodeRef> {
        let args = ArgMap::new()
            .with_node("clip", clip)
            .with_ints("first", first)
            .with_ints("last", last)
            .with_ints("replacement", replacement);
        create(&args)
    }

    #[test]
    fn test_ranges_show_replacement() {
        let node = freeze(&blank(10), &[2, 6], &[4, 6], &[0, 1]).unwrap();
        assert_eq!(node.stream_info().num_frames, 10);
        assert_eq!(origins(&node), vec![0, 1, 0, 0, 0, 5, 1, 7, 8, 9]);
    }

    #[test]
    fn test_inverted_range_is_swapped() {
        let node = freeze(&blank(10), &[4], &[2], &[9]).unwrap();
        assert_eq!(origins(&node), vec![0, 1, 9, 9, 9, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_empty_lists_pass_through() {
        let clip = blank(4);
        assert!(freeze(&clip, &[], &[], &[]).unwrap().ptr_eq(&clip));
    }

    #[test]
    fn test_argument_errors() {
        let clip = blank(10);
        assert_configuration_error(
            freeze(&clip, &[1, 5], &[2], &[0]),
            "FreezeFrames: 'first', 'last', and 'replacement' must have the same length.",
        );
        assert_configuration_error(freeze(&clip, &[-1], &[2], &[0]), OUT_OF_BOUNDS);
        assert_configuration_error(freeze(&clip, &[1], &[10], &[0]), OUT_OF_BOUNDS);
        assert_configuration_error(freeze(&clip, &[1], &[2], &[10]), OUT_OF_BOUNDS);
        assert_configuration_error(
            freeze(&clip, &[1, 3], &[3, 5], &[0, 0]),
            "FreezeFrames: The frame ranges must not overlap and must be in ascending order.",
        );
        assert_configuration_error(
            freeze(&clip, &[6, 1], &[7, 2], &[0, 0]),
            "FreezeFrames: The frame ranges must not overlap and must be in ascending order.",
        );
    }

    #[test]
    fn test_unknown_length_only_checks_sign() {
        let node = freeze(&blank(0), &[100], &[200], &[50]).unwrap();
        assert_eq!(node.stream_info().num_frames, 0);
    }
}
