// SPDX-FileCopyrightText: © 2025 FrameKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Test utilities for node testing

use framekit_core::{
    ActivationReason, ArgMap, Frame, FrameContext, FrameData, FrameKitError, NodeRef, Result,
    StreamInfo,
};

use crate::source::blank::BlankClip;

/// Creates a 640x480 Gray8 blank clip whose frames report `name` as origin.
pub fn named_blank(name: &str, num_frames: usize) -> NodeRef {
    blank_with(StreamInfo { num_frames, ..StreamInfo::default() }, name)
}

/// Creates a blank clip named "src".
pub fn blank(num_frames: usize) -> NodeRef {
    named_blank("src", num_frames)
}

/// Creates a blank clip with explicit stream info.
pub fn blank_with(info: StreamInfo, name: &str) -> NodeRef {
    NodeRef::new(BlankClip::new(info, name), ArgMap::new())
}

/// Pulls frame `n` of `node`, resolving sub-requests depth-first on the calling thread.
pub fn pull(node: &NodeRef, n: usize) -> Result<Frame> {
    let mut frame_data = FrameData::new();
    let mut ctx = FrameContext::new();
    node.activate(n, ActivationReason::Initial, &mut frame_data, &mut ctx)?;
    for request in ctx.take_requests() {
        let frame = pull(&request.node, request.n)?;
        ctx.provide_frame(&request.node, request.n, frame);
    }
    node.activate(n, ActivationReason::AllFramesReady, &mut frame_data, &mut ctx)?
        .ok_or_else(|| FrameKitError::runtime(format!("{} returned no frame", node.name())))
}

/// Origin (clip name, frame number) of frame `n`.
#[allow(clippy::unwrap_used)]
pub fn origin(node: &NodeRef, n: usize) -> (String, usize) {
    let frame = pull(node, n).unwrap();
    let (name, index) = frame.origin();
    (name.to_string(), index)
}

/// Upstream frame numbers of every frame of a known-length node.
#[allow(clippy::unwrap_used)]
pub fn origins(node: &NodeRef) -> Vec<usize> {
    (0..node.stream_info().num_frames).map(|n| pull(node, n).unwrap().props.origin_index).collect()
}

/// Asserts that `result` failed with a configuration error carrying `message`.
pub fn assert_configuration_error(result: Result<NodeRef>, message: &str) {
    match result {
        Err(FrameKitError::Configuration(msg)) => assert_eq!(msg, message),
        Err(other) => panic!("Expected configuration error '{message}', got {other}"),
        Ok(node) => panic!("Expected configuration error '{message}', got node {node:?}"),
    }
}

/// Asserts that a pull failed with a runtime error carrying `message`.
pub fn assert_runtime_error(result: Result<Frame>, message: &str) {
    match result {
        Err(FrameKitError::Runtime(msg)) => assert_eq!(msg, message),
        Err(other) => panic!("Expected runtime error '{message}', got {other}"),
        Ok(frame) => panic!("Expected runtime error '{message}', got frame {:?}", frame.origin()),
    }
}

/// Asserts that `result` failed with a topology error carrying `message`.
pub fn assert_topology_error(result: Result<NodeRef>, message: &str) {
    match result {
        Err(FrameKitError::Topology(msg)) => assert_eq!(msg, message),
        Err(other) => panic!("Expected topology error '{message}', got {other}"),
        Ok(node) => panic!("Expected topology error '{message}', got node {node:?}"),
    }
}
