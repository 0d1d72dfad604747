// SPDX-FileCopyrightText: © 2025 FrameKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

use framekit_core::{
    ActivationReason, ArgMap, Filter, Frame, FrameContext, FrameData, FrameKitError, NodeRef,
    ParamSpec, Result, StreamInfo,
};

use super::{frame_list, frame_overflow, UpstreamFrame};

pub const NAME: &str = "DeleteFrames";

pub fn params() -> Vec<ParamSpec> {
    vec![ParamSpec::clip("clip"), ParamSpec::int("frames").array()]
}

/// Skips each listed frame.
pub struct DeleteFrames {
    node: NodeRef,
    info: StreamInfo,
    // Strictly ascending
    frames: Vec<usize>,
}

impl DeleteFrames {
    fn upstream(&self, n: usize) -> Result<usize> {
        let mut upstream = n;
        for &deleted in &self.frames {
            if upstream < deleted {
                break;
            }
            upstream = upstream.checked_add(1).ok_or_else(|| frame_overflow(NAME))?;
        }
        Ok(upstream)
    }
}

/// # Errors
///
/// Returns `FrameKitError::Configuration` if a frame lies outside the clip, the
/// list is not strictly ascending, or every frame of the clip would be deleted.
pub fn create(args: &ArgMap) -> Result<NodeRef> {
    let node = args.get_node("clip")?;
    let mut info = *node.stream_info();

    let frames = frame_list(NAME, &args.get_int_array("frames")?, info.num_frames)?;
    for pair in frames.windows(2) {
        if pair[0] > pair[1] {
            return Err(FrameKitError::configuration(
                "DeleteFrames: The frame numbers must be in ascending order.",
            ));
        }
        if pair[0] == pair[1] {
            return Err(FrameKitError::configuration(
                "DeleteFrames: Can't delete a frame more than once.",
            ));
        }
    }
    if frames.is_empty() {
        return Ok(node);
    }

    if let Some(len) = info.frame_count() {
        // Distinct and in bounds, so at most `len` of them
        if frames.len() == len {
            return Err(FrameKitError::configuration("DeleteFrames: Can't delete every frame."));
        }
        info.num_frames = len - frames.len();
    }

    Ok(NodeRef::new(DeleteFrames { node, info, frames }, args.clone()))
}

impl Filter for DeleteFrames {
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
                let upstream = self.upstream(n)?;
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
