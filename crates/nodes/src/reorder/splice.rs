// SPDX-FileCopyrightText: © 2025 FrameKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Concatenation of clips.
//!
//! A Splice over several cached clips would keep one cache per input even
//! though every frame of the output passes through the Splice itself. When
//! two or more inputs are caches, Splice bypasses them and holds their inputs
//! directly, and drops [`NodeFlags::NO_CACHE`] so that the registry gives the
//! Splice a single cache of its own.

use framekit_core::{
    find_common_info, ActivationReason, ArgMap, ArgValue, Filter, Frame, FrameContext, FrameData,
    FrameKitError, NodeFlags, NodeRef, ParamSpec, Result, StreamInfo,
};

use super::too_long;

pub const NAME: &str = "Splice";

pub fn params() -> Vec<ParamSpec> {
    vec![ParamSpec::clip("clips").array(), ParamSpec::int("mismatch").optional()]
}

pub struct Splice {
    nodes: Vec<NodeRef>,
    // Length of each input; only the last may be 0 (unknown)
    lengths: Vec<usize>,
    info: StreamInfo,
    flags: NodeFlags,
}

/// Where an output frame comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SpliceTarget {
    clip: usize,
    frame: usize,
}

impl Splice {
    fn locate(&self, n: usize) -> SpliceTarget {
        let last = self.nodes.len() - 1;
        // Never exceeds n, so n - start cannot underflow
        let mut start = 0;
        for (clip, &len) in self.lengths.iter().enumerate() {
            // The last clip takes everything past the known lengths
            if n - start < len || clip == last {
                return SpliceTarget { clip, frame: n - start };
            }
            start += len;
        }
        SpliceTarget { clip: last, frame: n - start }
    }
}

/// Replaces cache inputs by the nodes they cache, if there are at least two.
///
/// Returns the inputs to hold and the flags of the new node.
fn bypass_caches(nodes: Vec<NodeRef>) -> (Vec<NodeRef>, NodeFlags) {
    let caches = nodes.iter().filter(|node| node.relay_source().is_some()).count();
    if caches < 2 {
        return (nodes, NodeFlags::NO_CACHE);
    }

    tracing::debug!(filter = NAME, caches, "Bypassing input caches");
    let nodes =
        nodes.into_iter().map(|node| node.relay_source().cloned().unwrap_or(node)).collect();
    (nodes, NodeFlags::NONE)
}

/// Builds a Splice, or returns the only clip when given one.
///
/// Inputs are merged strictly, but a mismatch is tolerated when the merged
/// dimensions and format still equal those of the first clip.
///
/// # Errors
///
/// Returns `FrameKitError::Topology` on an unresolvable property mismatch or
/// when a clip other than the last has unknown length.
pub fn create(args: &ArgMap) -> Result<NodeRef> {
    let allow_mismatch = args.get_bool("mismatch")?;
    let nodes = args.get_nodes("clips")?;

    let (first, last) = match nodes.as_slice() {
        [] => return Err(FrameKitError::configuration("Splice: no clips specified")),
        [single] => return Ok(single.clone()),
        [first, .., last] => (*first.stream_info(), *last.stream_info()),
    };

    let infos: Vec<StreamInfo> = nodes.iter().map(|node| *node.stream_info()).collect();
    let compat = infos.iter().any(StreamInfo::is_compat);
    let Some(merged) = find_common_info(&infos, false) else {
        return Err(FrameKitError::configuration("Splice: no clips specified"));
    };
    if merged.mismatch && (!allow_mismatch || compat) && !merged.info.is_same_format(&first) {
        return Err(FrameKitError::topology("Splice: clip property mismatch"));
    }

    let lengths: Vec<usize> = infos.iter().map(|vi| vi.num_frames).collect();
    if lengths[..lengths.len() - 1].contains(&0) {
        return Err(FrameKitError::topology(
            "Splice: unknown length clips can only be last in a splice operation",
        ));
    }

    let num_frames = if last.has_known_length() {
        lengths
            .iter()
            .try_fold(0usize, |total, len| total.checked_add(*len))
            .ok_or_else(|| too_long(NAME))?
    } else {
        0
    };
    let info = StreamInfo { num_frames, ..merged.info };

    let (nodes, flags) = bypass_caches(nodes);

    // Report the inputs actually held
    let mut stored = args.clone();
    stored.delete_key("clips");
    for node in &nodes {
        stored.append("clips", ArgValue::Node(node.clone()));
    }

    Ok(NodeRef::new(Splice { nodes, lengths, info, flags }, stored))
}

impl Filter for Splice {
    fn name(&self) -> &str {
        NAME
    }

    fn stream_info(&self) -> StreamInfo {
        self.info
    }

    fn flags(&self) -> NodeFlags {
        self.flags
    }

    fn dependencies(&self) -> Vec<NodeRef> {
        self.nodes.clone()
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
                let target = self.locate(n);
                ctx.request_frame(target.frame, &self.nodes[target.clip]);
                frame_data.set(target);
                Ok(None)
            },
            ActivationReason::AllFramesReady => {
                let target: SpliceTarget = frame_data.take_required(NAME)?;
                ctx.get_frame(target.frame, &self.nodes[target.clip]).map(Some)
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::{assert_topology_error, blank_with, named_blank, origin, pull};
    use framekit_core::{Cache, VideoFormat};

    fn splice(clips: &[NodeRef]) -> ArgMap {
        ArgMap::new().with_nodes("clips", clips)
    }

    #[test]
    fn test_concatenates_in_order() {
        let node = create(&splice(&[named_blank("a", 3), named_blank("b", 4)])).unwrap();
        assert_eq!(node.stream_info().num_frames, 7);
        assert_eq!(origin(&node, 2), ("a".to_string(), 2));
        assert_eq!(origin(&node, 3), ("b".to_string(), 0));
        assert_eq!(origin(&node, 6), ("b".to_string(), 3));
    }

    #[test]
    fn test_middle_clip_of_three() {
        let clips = [named_blank("a", 2), named_blank("b", 3), named_blank("c", 4)];
        let node = create(&splice(&clips)).unwrap();
        assert_eq!(node.stream_info().num_frames, 9);
        assert_eq!(origin(&node, 1), ("a".to_string(), 1));
        assert_eq!(origin(&node, 2), ("b".to_string(), 0));
        assert_eq!(origin(&node, 4), ("b".to_string(), 2));
        assert_eq!(origin(&node, 5), ("c".to_string(), 0));
        assert_eq!(origin(&node, 8), ("c".to_string(), 3));
    }

    #[test]
    fn test_huge_frame_number_reaches_unknown_tail() {
        let node = create(&splice(&[named_blank("a", 3), named_blank("b", 0)])).unwrap();
        let n = usize::MAX / 2;
        assert_eq!(pull(&node, n).unwrap().origin(), ("b", n - 3));
        assert_eq!(pull(&node, usize::MAX).unwrap().origin(), ("b", usize::MAX - 3));
    }

    #[test]
    fn test_single_clip_passes_through() {
        let clip = named_blank("a", 3);
        assert!(create(&splice(&[clip.clone()])).unwrap().ptr_eq(&clip));
    }

    #[test]
    fn test_unknown_last_clip_absorbs_tail() {
        let node = create(&splice(&[named_blank("a", 3), named_blank("b", 0)])).unwrap();
        assert_eq!(node.stream_info().num_frames, 0);
        assert_eq!(origin(&node, 1), ("a".to_string(), 1));
        assert_eq!(origin(&node, 500), ("b".to_string(), 497));
    }

    #[test]
    fn test_unknown_clip_before_last_rejected() {
        assert_topology_error(
            create(&splice(&[named_blank("a", 0), named_blank("b", 3)])),
            "Splice: unknown length clips can only be last in a splice operation",
        );
    }

    #[test]
    fn test_shape_mismatch_requires_flag() {
        let a = named_blank("a", 3);
        let b = blank_with(StreamInfo { height: 240, num_frames: 3, ..StreamInfo::default() }, "b");
        let clips = [a, b];
        assert_topology_error(create(&splice(&clips)), "Splice: clip property mismatch");

        let node = create(&splice(&clips).with_int("mismatch", 1)).unwrap();
        assert_eq!(node.stream_info().num_frames, 6);
        assert_eq!(node.stream_info().height, 0);
    }

    #[test]
    fn test_compat_mismatch_always_rejected() {
        let compat = StreamInfo {
            format: Some(VideoFormat::COMPAT_YUY2),
            num_frames: 3,
            ..StreamInfo::default()
        };
        let clips = [named_blank("a", 3), blank_with(compat, "b")];
        assert_topology_error(
            create(&splice(&clips).with_int("mismatch", 1)),
            "Splice: clip property mismatch",
        );
    }

    #[test]
    fn test_length_only_mismatch_is_tolerated() {
        // Strict merging flags the length difference, but the shape still matches clip 0
        let node = create(&splice(&[named_blank("a", 5), named_blank("b", 2)])).unwrap();
        assert_eq!(node.stream_info().num_frames, 7);
    }

    #[test]
    fn test_caches_bypassed_with_two_or_more() {
        let a = named_blank("a", 3);
        let b = named_blank("b", 4);
        let node = create(&splice(&[Cache::wrap(&a), Cache::wrap(&b)])).unwrap();

        assert!(!node.flags().contains(NodeFlags::NO_CACHE));
        let deps = node.dependencies();
        assert!(deps[0].ptr_eq(&a));
        assert!(deps[1].ptr_eq(&b));

        let stored: Vec<_> = node.args().get_nodes("clips").unwrap();
        assert!(stored[0].ptr_eq(&a));
        assert!(stored[1].ptr_eq(&b));
        assert_eq!(origin(&node, 4), ("b".to_string(), 1));
    }

    #[test]
    fn test_single_cache_is_kept() {
        let a = named_blank("a", 3);
        let cached = Cache::wrap(&a);
        let b = named_blank("b", 4);
        let node = create(&splice(&[cached.clone(), b])).unwrap();

        assert!(node.flags().contains(NodeFlags::NO_CACHE));
        assert!(node.dependencies()[0].ptr_eq(&cached));
        assert!(matches!(
            node.args().values("clips").unwrap()[0],
            ArgValue::Node(ref held) if held.ptr_eq(&cached)
        ));
    }
}
