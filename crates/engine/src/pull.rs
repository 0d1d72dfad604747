// SPDX-FileCopyrightText: © 2025 FrameKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Drivers for the two-phase activation protocol.
//!
//! A pull activates the target with `Initial`, resolves every frame it
//! requested by pulling those in turn, hands them back through the
//! [`FrameContext`] and finishes with `AllFramesReady`. The same
//! [`FrameData`] slot is carried between the two phases.

use framekit_core::{
    ActivationReason, Frame, FrameContext, FrameData, FrameKitError, NodeRef, Result,
};
use futures::future::{try_join_all, BoxFuture, FutureExt};

/// Rejects requests the node cannot serve before activating it.
fn check_request(node: &NodeRef, n: usize, depth: usize, max_depth: usize) -> Result<()> {
    if depth > max_depth {
        return Err(FrameKitError::ResourceExhausted(format!(
            "pull of frame {n} from '{}' {} exceeded the graph depth limit of {max_depth}",
            node.name(),
            node.id()
        )));
    }
    match node.stream_info().frame_count() {
        Some(len) if n >= len => Err(FrameKitError::runtime(format!(
            "frame {n} requested from node '{}' {} which has {len} frames",
            node.name(),
            node.id()
        ))),
        _ => Ok(()),
    }
}

fn finish(
    node: &NodeRef,
    n: usize,
    frame_data: &mut FrameData,
    ctx: &mut FrameContext,
) -> Result<Frame> {
    node.activate(n, ActivationReason::AllFramesReady, frame_data, ctx)?.ok_or_else(|| {
        let (name, id) = (node.name(), node.id());
        FrameKitError::runtime(format!("node '{name}' {id} produced no frame {n}"))
    })
}

/// Pulls frame `n` of `node` on the calling thread, depth-first.
///
/// # Errors
///
/// Returns `FrameKitError::Runtime` for a frame past the end of a node of
/// known length, `FrameKitError::ResourceExhausted` when the chain of
/// requests is deeper than `max_depth`, and any error raised by a filter.
pub fn pull_frame(node: &NodeRef, n: usize, max_depth: usize) -> Result<Frame> {
    pull_at_depth(node, n, 0, max_depth)
}

fn pull_at_depth(node: &NodeRef, n: usize, depth: usize, max_depth: usize) -> Result<Frame> {
    check_request(node, n, depth, max_depth)?;
    tracing::trace!(node = %node.name(), id = %node.id(), n, depth, "Pulling frame");

    let mut frame_data = FrameData::new();
    let mut ctx = FrameContext::new();
    node.activate(n, ActivationReason::Initial, &mut frame_data, &mut ctx)?;

    for request in ctx.take_requests() {
        let frame = pull_at_depth(&request.node, request.n, depth + 1, max_depth)?;
        ctx.provide_frame(&request.node, request.n, frame);
    }

    finish(node, n, &mut frame_data, &mut ctx)
}

/// Pulls frame `n` of `node`, resolving the requests of each node concurrently.
///
/// # Errors
///
/// Same as [`pull_frame`].
pub fn pull_frame_async(
    node: NodeRef,
    n: usize,
    max_depth: usize,
) -> BoxFuture<'static, Result<Frame>> {
    pull_async_at_depth(node, n, 0, max_depth)
}

fn pull_async_at_depth(
    node: NodeRef,
    n: usize,
    depth: usize,
    max_depth: usize,
) -> BoxFuture<'static, Result<Frame>> {
    async move {
        check_request(&node, n, depth, max_depth)?;
        tracing::trace!(node = %node.name(), id = %node.id(), n, depth, "Pulling frame");

        let mut frame_data = FrameData::new();
        let mut ctx = FrameContext::new();
        node.activate(n, ActivationReason::Initial, &mut frame_data, &mut ctx)?;

        let requests = ctx.take_requests();
        let frames = try_join_all(
            requests
                .iter()
                .map(|r| pull_async_at_depth(r.node.clone(), r.n, depth + 1, max_depth)),
        )
        .await?;
        for (request, frame) in requests.iter().zip(frames) {
            ctx.provide_frame(&request.node, request.n, frame);
        }

        finish(&node, n, &mut frame_data, &mut ctx)
    }
    .boxed()
}
