// SPDX-FileCopyrightText: © 2025 FrameKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

use framekit_core::{
    ActivationReason, ArgMap, Filter, Frame, FrameContext, FrameData, FrameKitError, NodeRef,
    ParamSpec, Result, StreamInfo,
};

use super::too_long;

pub const NAME: &str = "Loop";

pub fn params() -> Vec<ParamSpec> {
    vec![ParamSpec::clip("clip"), ParamSpec::int("times").optional()]
}

/// Repeats its input; an unbounded loop reports unknown length.
pub struct Loop {
    node: NodeRef,
    info: StreamInfo,
    // Input length, never 0
    period: usize,
}

/// # Errors
///
/// Returns `FrameKitError::Topology` if the clip length is unknown.
pub fn create(args: &ArgMap) -> Result<NodeRef> {
    let times = args.get_int("times")?.unwrap_or(0);
    let node = args.get_node("clip")?;
    let upstream = *node.stream_info();

    let Some(period) = upstream.frame_count() else {
        return Err(FrameKitError::topology("Loop: cannot loop clips with unknown length"));
    };

    if times == 1 {
        return Ok(node);
    }

    let num_frames = match usize::try_from(times) {
        Ok(times) if times > 0 => period.checked_mul(times).ok_or_else(|| too_long(NAME))?,
        _ => 0,
    };
    tracing::debug!(filter = NAME, times, num_frames, "Looping clip");

    let info = StreamInfo { num_frames, ..upstream };
    Ok(NodeRef::new(Loop { node, info, period }, args.clone()))
}

impl Filter for Loop {
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
        _frame_data: &mut FrameData,
        ctx: &mut FrameContext,
    ) -> Result<Option<Frame>> {
        let upstream = n % self.period;
        match reason {
            ActivationReason::Initial => {
                ctx.request_frame(upstream, &self.node);
                Ok(None)
            },
            ActivationReason::AllFramesReady => ctx.get_frame(upstream, &self.node).map(Some),
        }
    }
}
