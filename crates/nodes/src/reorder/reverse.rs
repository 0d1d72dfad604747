// SPDX-FileCopyrightText: © 2025 FrameKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

use framekit_core::{
    ActivationReason, ArgMap, Filter, Frame, FrameContext, FrameData, FrameKitError, NodeRef,
    ParamSpec, Result, StreamInfo,
};

pub const NAME: &str = "Reverse";

pub fn params() -> Vec<ParamSpec> {
    vec![ParamSpec::clip("clip")]
}

pub struct Reverse {
    node: NodeRef,
    info: StreamInfo,
}

/// # Errors
///
/// Returns `FrameKitError::Topology` if the clip length is unknown.
pub fn create(args: &ArgMap) -> Result<NodeRef> {
    let node = args.get_node("clip")?;
    let info = *node.stream_info();
    if !info.has_known_length() {
        return Err(FrameKitError::topology("Reverse: cannot reverse clips with unknown length"));
    }
    Ok(NodeRef::new(Reverse { node, info }, args.clone()))
}

impl Filter for Reverse {
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
        let upstream = self.info.num_frames.saturating_sub(n + 1);
        match reason {
            ActivationReason::Initial => {
                ctx.request_frame(upstream, &self.node);
                Ok(None)
            },
            ActivationReason::AllFramesReady => ctx.get_frame(upstream, &self.node).map(Some),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::{assert_topology_error, blank, origins};

    #[test]
    fn test_reverse_order() {
        let clip = blank(5);
        let node = create(&ArgMap::new().with_node("clip", &clip)).unwrap();
        assert_eq!(node.stream_info(), clip.stream_info());
        assert_eq!(origins(&node), vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_reverse_twice_is_identity() {
        let clip = blank(6);
        let once = create(&ArgMap::new().with_node("clip", &clip)).unwrap();
        let twice = create(&ArgMap::new().with_node("clip", &once)).unwrap();
        assert_eq!(origins(&twice), (0..6).collect::<Vec<_>>());
    }

    #[test]
    fn test_unknown_length_rejected() {
        assert_topology_error(
            create(&ArgMap::new().with_node("clip", &blank(0))),
            "Reverse: cannot reverse clips with unknown length",
        );
    }
}
