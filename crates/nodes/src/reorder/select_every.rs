// SPDX-FileCopyrightText: © 2025 FrameKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

use framekit_core::{
    ActivationReason, ArgMap, Filter, Frame, FrameContext, FrameData, FrameKitError, NodeRef,
    ParamSpec, Result, StreamInfo,
};

use super::{frame_overflow, scale_rate, too_long, UpstreamFrame};

pub const NAME: &str = "SelectEvery";

pub fn params() -> Vec<ParamSpec> {
    vec![ParamSpec::clip("clip"), ParamSpec::int("cycle"), ParamSpec::int("offsets").array()]
}

/// Keeps `offsets` out of every `cycle` input frames, in the order given.
pub struct SelectEvery {
    node: NodeRef,
    info: StreamInfo,
    cycle: usize,
    offsets: Vec<usize>,
}

impl SelectEvery {
    fn upstream(&self, n: usize) -> Result<usize> {
        let per_cycle = self.offsets.len();
        (n / per_cycle)
            .checked_mul(self.cycle)
            .and_then(|start| start.checked_add(self.offsets[n % per_cycle]))
            .ok_or_else(|| frame_overflow(NAME))
    }
}

/// # Errors
///
/// Returns `FrameKitError::Configuration` if `cycle` is below 2, no offsets
/// are given, or an offset lies outside `0..cycle`.
pub fn create(args: &ArgMap) -> Result<NodeRef> {
    let cycle = args
        .get_int("cycle")?
        .and_then(|cycle| usize::try_from(cycle).ok())
        .filter(|cycle| *cycle > 1)
        .ok_or_else(|| FrameKitError::configuration("SelectEvery: invalid cycle size"))?;

    let offsets = args
        .get_int_array("offsets")?
        .into_iter()
        .map(|offset| {
            usize::try_from(offset)
                .ok()
                .filter(|offset| *offset < cycle)
                .ok_or_else(|| {
                    FrameKitError::configuration("SelectEvery: invalid offset specified")
                })
        })
        .collect::<Result<Vec<_>>>()?;
    if offsets.is_empty() {
        return Err(FrameKitError::configuration("SelectEvery: no offsets specified"));
    }

    let node = args.get_node("clip")?;
    let mut info = *node.stream_info();
    if let Some(len) = info.frame_count() {
        let remainder = len % cycle;
        let partial = offsets.iter().filter(|offset| **offset < remainder).count();
        info.num_frames = (len / cycle)
            .checked_mul(offsets.len())
            .and_then(|full| full.checked_add(partial))
            .ok_or_else(|| too_long(NAME))?;
    }
    info.fps_den = scale_rate(info.fps_den, cycle, NAME)?;
    info.fps_num = scale_rate(info.fps_num, offsets.len(), NAME)?;

    Ok(NodeRef::new(SelectEvery { node, info, cycle, offsets }, args.clone()))
}

impl Filter for SelectEvery {
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
