// SPDX-FileCopyrightText: © 2025 FrameKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

use framekit_core::{
    find_common_info, ActivationReason, ArgMap, Filter, Frame, FrameContext, FrameData,
    FrameKitError, NodeRef, ParamSpec, Result, StreamInfo,
};

use super::{scale_rate, too_long};

pub const NAME: &str = "Interleave";

pub fn params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::clip("clips").array(),
        ParamSpec::int("extend").optional(),
        ParamSpec::int("mismatch").optional(),
    ]
}

/// Output frame `n` is frame `n / N` of clip `n % N`.
pub struct Interleave {
    nodes: Vec<NodeRef>,
    info: StreamInfo,
}

/// Builds an Interleave, or returns the only clip when given one.
///
/// Inputs are merged ignoring length differences. Without `extend` the
/// output ends at the last frame any input can still supply.
///
/// # Errors
///
/// Returns `FrameKitError::Topology` if the inputs disagree on dimensions or
/// format and `mismatch` is not set, or if any input uses a compat format.
pub fn create(args: &ArgMap) -> Result<NodeRef> {
    let extend = args.get_bool("extend")?;
    let allow_mismatch = args.get_bool("mismatch")?;
    let nodes = args.get_nodes("clips")?;

    match nodes.as_slice() {
        [] => return Err(FrameKitError::configuration("Interleave: no clips specified")),
        [single] => return Ok(single.clone()),
        _ => {},
    }

    let infos: Vec<StreamInfo> = nodes.iter().map(|node| *node.stream_info()).collect();
    let compat = infos.iter().any(StreamInfo::is_compat);
    let Some(merged) = find_common_info(&infos, true) else {
        return Err(FrameKitError::configuration("Interleave: no clips specified"));
    };
    if merged.mismatch && (!allow_mismatch || compat) {
        return Err(FrameKitError::topology("Interleave: clip property mismatch"));
    }

    let count = nodes.len();
    let mut info = merged.info;
    if extend {
        info.num_frames = info.num_frames.checked_mul(count).ok_or_else(|| too_long(NAME))?;
    } else if info.has_known_length() {
        // Every input is known here, since an unknown one would have made the merge unknown
        let mut num_frames = 0;
        for (i, vi) in infos.iter().enumerate() {
            let end = vi
                .num_frames
                .saturating_sub(1)
                .checked_mul(count)
                .and_then(|v| v.checked_add(i + 1))
                .ok_or_else(|| too_long(NAME))?;
            num_frames = num_frames.max(end);
        }
        info.num_frames = num_frames;
    }
    info.fps_num = scale_rate(info.fps_num, count, NAME)?;

    tracing::debug!(filter = NAME, clips = count, num_frames = info.num_frames, "Interleaving");
    Ok(NodeRef::new(Interleave { nodes, info }, args.clone()))
}

impl Filter for Interleave {
    fn name(&self) -> &str {
        NAME
    }

    fn stream_info(&self) -> StreamInfo {
        self.info
    }

    fn dependencies(&self) -> Vec<NodeRef> {
        self.nodes.clone()
    }

    fn get_frame(
        &self,
        n: usize,
        reason: ActivationReason,
        _frame_data: &mut FrameData,
        ctx: &mut FrameContext,
    ) -> Result<Option<Frame>> {
        let count = self.nodes.len();
        let node = &self.nodes[n % count];
        let upstream = n / count;
        match reason {
            ActivationReason::Initial => {
                ctx.request_frame(upstream, node);
                Ok(None)
            },
            ActivationReason::AllFramesReady => ctx.get_frame(upstream, node).map(Some),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::{assert_topology_error, blank_with, named_blank, origin};
    use framekit_core::VideoFormat;

    fn interleave(clips: &[NodeRef]) -> ArgMap {
        ArgMap::new().with_nodes("clips", clips)
    }

    #[test]
    fn test_equal_clips_alternate() {
        let clips = [named_blank("a", 4), named_blank("b", 4), named_blank("c", 4)];
        let node = create(&interleave(&clips)).unwrap();
        let info = node.stream_info();
        assert_eq!(info.num_frames, 12);
        assert_eq!(info.fps_num, 72);
        assert_eq!(info.fps_den, 1);

        for n in 0..12 {
            let expected = (["a", "b", "c"][n % 3].to_string(), n / 3);
            assert_eq!(origin(&node, n), expected);
        }
    }

    #[test]
    fn test_single_clip_passes_through() {
        let clip = named_blank("a", 4);
        assert!(create(&interleave(&[clip.clone()])).unwrap().ptr_eq(&clip));
    }

    #[test]
    fn test_uneven_lengths_end_with_longest() {
        let clips = [named_blank("a", 3), named_blank("b", 5)];
        let node = create(&interleave(&clips)).unwrap();
        // max((3-1)*2+1, (5-1)*2+2)
        assert_eq!(node.stream_info().num_frames, 10);
        assert_eq!(origin(&node, 9), ("b".to_string(), 4));
    }

    #[test]
    fn test_extend_uses_shortest() {
        let clips = [named_blank("a", 3), named_blank("b", 5)];
        let node = create(&interleave(&clips).with_int("extend", 1)).unwrap();
        assert_eq!(node.stream_info().num_frames, 6);
    }

    #[test]
    fn test_unknown_length_stays_unknown() {
        let clips = [named_blank("a", 0), named_blank("b", 5)];
        let node = create(&interleave(&clips)).unwrap();
        assert_eq!(node.stream_info().num_frames, 0);
        assert_eq!(origin(&node, 100), ("a".to_string(), 50));
    }

    #[test]
    fn test_mismatch_requires_flag() {
        let a = named_blank("a", 4);
        let b = blank_with(StreamInfo { width: 320, num_frames: 4, ..StreamInfo::default() }, "b");
        let clips = [a, b];
        assert_topology_error(create(&interleave(&clips)), "Interleave: clip property mismatch");

        let node = create(&interleave(&clips).with_int("mismatch", 1)).unwrap();
        assert_eq!((node.stream_info().width, node.stream_info().height), (0, 0));
    }

    #[test]
    fn test_compat_mismatch_always_rejected() {
        let compat = StreamInfo {
            format: Some(VideoFormat::COMPAT_BGR32),
            num_frames: 4,
            ..StreamInfo::default()
        };
        let clips = [blank_with(compat, "a"), named_blank("b", 4)];
        assert_topology_error(
            create(&interleave(&clips).with_int("mismatch", 1)),
            "Interleave: clip property mismatch",
        );
    }
}
