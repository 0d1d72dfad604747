// SPDX-FileCopyrightText: © 2025 FrameKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

use framekit_core::{
    ActivationReason, ArgMap, Filter, Frame, FrameContext, FrameData, FrameKitError, NodeRef,
    ParamSpec, Result, StreamInfo,
};

use super::{frame_list, too_long, UpstreamFrame};

pub const NAME: &str = "DuplicateFrames";

pub fn params() -> Vec<ParamSpec> {
    vec![ParamSpec::clip("clip"), ParamSpec::int("frames").array()]
}

/// Shows each listed frame twice in a row.
pub struct DuplicateFrames {
    node: NodeRef,
    info: StreamInfo,
    // Ascending, repeats allowed
    frames: Vec<usize>,
}

impl DuplicateFrames {
    fn upstream(&self, n: usize) -> usize {
        let mut upstream = n;
        for &dup in &self.frames {
            if upstream > dup {
                upstream -= 1;
            } else {
                break;
            }
        }
        upstream
    }
}

/// # Errors
///
/// Returns `FrameKitError::Configuration` if a frame lies outside the clip or
/// the list is not in ascending order.
pub fn create(args: &ArgMap) -> Result<NodeRef> {
    let node = args.get_node("clip")?;
    let mut info = *node.stream_info();

    let frames = frame_list(NAME, &args.get_int_array("frames")?, info.num_frames)?;
    if frames.windows(2).any(|pair| pair[0] > pair[1]) {
        return Err(FrameKitError::configuration(
            "DuplicateFrames: The frame numbers must be in ascending order.",
        ));
    }
    if frames.is_empty() {
        return Ok(node);
    }

    if info.has_known_length() {
        info.num_frames = info.num_frames.checked_add(frames.len()).ok_or_else(|| too_long(NAME))?;
    }

    Ok(NodeRef::new(DuplicateFrames { node, info, frames }, args.clone()))
}

impl Filter for DuplicateFrames {
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
    use crate::test_utils::{assert_configuration_error, blank, origins, pull};

    fn duplicate(clip: &NodeRef, frames: &[i64]) -> Result<NodeRef> {
        create(&ArgMap::new().with_node("clip", clip).with_ints("frames", frames))
    }

    #[test]
    fn test_listed_frames_repeat() {
        let node = duplicate(&blank(5), &[1, 3]).unwrap();
        assert_eq!(node.stream_info().num_frames, 7);
        assert_eq!(origins(&node), vec![0, 1, 1, 2, 3, 3, 4]);
    }

    #[test]
    fn test_repeated_entries_add_copies() {
        let node = duplicate(&blank(3), &[0, 0, 2]).unwrap();
        assert_eq!(origins(&node), vec![0, 0, 0, 1, 2, 2]);
    }

    #[test]
    fn test_unknown_length_stays_unknown() {
        let node = duplicate(&blank(0), &[5]).unwrap();
        assert_eq!(node.stream_info().num_frames, 0);
        assert_eq!(pull(&node, 6).unwrap().origin(), ("src", 5));
        assert_eq!(pull(&node, 7).unwrap().origin(), ("src", 6));
    }

    #[test]
    fn test_empty_list_passes_through() {
        let clip = blank(3);
        assert!(duplicate(&clip, &[]).unwrap().ptr_eq(&clip));
    }

    #[test]
    fn test_argument_errors() {
        let clip = blank(5);
        assert_configuration_error(
            duplicate(&clip, &[5]),
            "DuplicateFrames: Out of bounds frame number.",
        );
        assert_configuration_error(
            duplicate(&clip, &[-1]),
            "DuplicateFrames: Out of bounds frame number.",
        );
        assert_configuration_error(
            duplicate(&clip, &[3, 1]),
            "DuplicateFrames: The frame numbers must be in ascending order.",
        );
    }
}
