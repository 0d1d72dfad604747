// SPDX-FileCopyrightText: © 2025 FrameKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

use framekit_core::{
    frame_index, ActivationReason, ArgMap, Filter, Frame, FrameContext, FrameData, FrameKitError,
    NodeRef, ParamSpec, Result, StreamInfo,
};

use super::frame_overflow;

pub const NAME: &str = "Trim";

pub fn params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::clip("clip"),
        ParamSpec::int("first").optional(),
        ParamSpec::int("last").optional(),
        ParamSpec::int("length").optional(),
    ]
}

/// Keeps frames `first..first + num_frames` of its input.
pub struct Trim {
    node: NodeRef,
    info: StreamInfo,
    first: usize,
}

/// Builds a Trim, or returns `clip` itself when the range covers all of it.
///
/// # Errors
///
/// Returns `FrameKitError::Configuration` when `last` and `length` are both
/// given, when a bound is negative or inverted, or when the range reaches past
/// the end of a clip of known length.
pub fn create(args: &ArgMap) -> Result<NodeRef> {
    let first = args.get_int("first")?;
    let last = args.get_int("last")?;
    let length = args.get_int("length")?;

    if last.is_some() && length.is_some() {
        return Err(FrameKitError::configuration("Trim: both last frame and length specified"));
    }
    if last.is_some_and(|last| last < first.unwrap_or(0)) {
        return Err(FrameKitError::configuration("Trim: invalid last frame specified"));
    }
    if length.is_some_and(|length| length < 1) {
        return Err(FrameKitError::configuration("Trim: invalid length specified"));
    }
    let start = frame_index(first.unwrap_or(0), "Trim: invalid first frame specified")?;
    let last = last.map(|v| frame_index(v, "Trim: invalid last frame specified")).transpose()?;
    let length = length.map(|v| frame_index(v, "Trim: invalid length specified")).transpose()?;

    let node = args.get_node("clip")?;
    let upstream = *node.stream_info();

    if let Some(len) = upstream.frame_count() {
        let beyond_end = last.is_some_and(|last| last >= len)
            || length.is_some_and(|length| start.saturating_add(length) > len)
            || start >= len;
        if beyond_end {
            return Err(FrameKitError::configuration("Trim: last frame beyond clip end"));
        }
    }

    let num_frames = match (last, length) {
        (Some(last), _) => last - start + 1,
        (None, Some(length)) => length,
        (None, None) => upstream.num_frames.saturating_sub(start),
    };

    let unbounded = first.is_none() && last.is_none() && length.is_none();
    if unbounded || (num_frames != 0 && num_frames == upstream.num_frames) {
        tracing::debug!(filter = NAME, "Range covers the whole clip, passing it through");
        return Ok(node);
    }

    let info = StreamInfo { num_frames, ..upstream };
    Ok(NodeRef::new(Trim { node, info, first: start }, args.clone()))
}

impl Filter for Trim {
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
        let upstream = n.checked_add(self.first).ok_or_else(|| frame_overflow(NAME))?;
        match reason {
            ActivationReason::Initial => {
                ctx.request_frame(upstream, &self.node);
                Ok(None)
            },
            ActivationReason::AllFramesReady => ctx.get_frame(upstream, &self.node).map(Some),
        }
    }
}
