// SPDX-FileCopyrightText: © 2025 FrameKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Core node abstractions and the two-phase activation protocol.
//!
//! This module defines the fundamental interface for frame nodes:
//! - [`Filter`]: The trait every node implementation provides
//! - [`NodeRef`]: Shared handle to a constructed node
//! - [`FrameContext`]: Collects sub-requests and serves resolved frames
//! - [`FrameData`]: Per-request scratch slot carried from `Initial` to `AllFramesReady`
//!
//! ## Activation
//!
//! A request for output frame `n` is served in two calls made by the executor:
//!
//! ```text
//!   get_frame(n, Initial)         -> declares upstream requests, returns None
//!         (executor resolves every declared request)
//!   get_frame(n, AllFramesReady)  -> reads resolved frames, returns Some(frame)
//! ```
//!
//! A node never blocks inside either call. State that must survive between
//! the two calls lives in the request's [`FrameData`], never on the node.

use smallvec::SmallVec;
use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::args::ArgMap;
use crate::error::{FrameKitError, Result};
use crate::frame::Frame;
use crate::types::StreamInfo;

/// Which of the two activation phases is being invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationReason {
    /// Declare upstream dependencies for the requested frame.
    Initial,
    /// Every declared dependency is available; produce the frame.
    AllFramesReady,
}

/// Concurrency contract a node declares to its executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Activations for different frames may run concurrently.
    #[default]
    Parallel,
    /// Activations are serialized per node, in no particular order.
    Unordered,
}

/// Construction-time flags of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeFlags {
    bits: u8,
}

impl NodeFlags {
    pub const NONE: Self = Self { bits: 0 };
    /// The registry must not put a cache in front of this node.
    pub const NO_CACHE: Self = Self { bits: 1 };

    pub const fn contains(self, other: Self) -> bool {
        self.bits & other.bits == other.bits
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self { bits: self.bits | other.bits }
    }
}

/// Process-unique node identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Per-request scratch slot.
///
/// Set during `Initial`, consumed during `AllFramesReady` of the same request.
/// Each in-flight request owns its own slot, so no synchronization is needed.
#[derive(Default)]
pub struct FrameData(Option<Box<dyn Any + Send>>);

impl FrameData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<T: Any + Send>(&mut self, value: T) {
        self.0 = Some(Box::new(value));
    }

    /// Takes the stored value if it has type `T`.
    pub fn take<T: Any + Send>(&mut self) -> Option<T> {
        let boxed = self.0.take()?;
        match boxed.downcast::<T>() {
            Ok(value) => Some(*value),
            Err(other) => {
                self.0 = Some(other);
                None
            },
        }
    }

    /// Like [`take`](Self::take), reporting a missing value as an invariant violation.
    ///
    /// # Errors
    ///
    /// Returns `FrameKitError::Runtime` if nothing of type `T` was stored.
    pub fn take_required<T: Any + Send>(&mut self, filter: &str) -> Result<T> {
        self.take().ok_or_else(|| {
            FrameKitError::runtime(format!("{filter}: missing per-request data at AllFramesReady"))
        })
    }

    pub const fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

impl fmt::Debug for FrameData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameData").field("set", &self.0.is_some()).finish()
    }
}

/// An upstream frame a node asked for during `Initial`.
#[derive(Debug, Clone)]
pub struct FrameRequest {
    pub node: NodeRef,
    pub n: usize,
}

/// Typical fan-in of a remap filter is one upstream frame.
pub type RequestList = SmallVec<[FrameRequest; 2]>;

/// The channel between a node and its executor for one output frame.
///
/// During `Initial` the node records upstream requests with
/// [`request_frame`](Self::request_frame). The executor resolves them and hands
/// the frames back with [`provide_frame`](Self::provide_frame) before invoking
/// `AllFramesReady`, where the node reads them with
/// [`get_frame`](Self::get_frame).
#[derive(Debug, Default)]
pub struct FrameContext {
    requests: RequestList,
    resolved: SmallVec<[(NodeId, usize, Frame); 2]>,
}

impl FrameContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares that frame `n` of `node` is needed. Duplicate requests are merged.
    pub fn request_frame(&mut self, n: usize, node: &NodeRef) {
        let id = node.id();
        if self.requests.iter().any(|r| r.n == n && r.node.id() == id) {
            return;
        }
        self.requests.push(FrameRequest { node: node.clone(), n });
    }

    /// Requests declared so far.
    pub fn requests(&self) -> &[FrameRequest] {
        &self.requests
    }

    /// Hands the declared requests to the executor.
    pub fn take_requests(&mut self) -> RequestList {
        std::mem::take(&mut self.requests)
    }

    /// Supplies a resolved upstream frame. Called by the executor.
    pub fn provide_frame(&mut self, node: &NodeRef, n: usize, frame: Frame) {
        self.resolved.push((node.id(), n, frame));
    }

    /// Retrieves a resolved upstream frame during `AllFramesReady`.
    ///
    /// # Errors
    ///
    /// Returns `FrameKitError::Runtime` if the frame was never requested or
    /// has not been resolved.
    pub fn get_frame(&self, n: usize, node: &NodeRef) -> Result<Frame> {
        let id = node.id();
        self.resolved
            .iter()
            .find(|(node_id, index, _)| *node_id == id && *index == n)
            .map(|(_, _, frame)| frame.clone())
            .ok_or_else(|| {
                FrameKitError::runtime(format!(
                    "frame {n} of node '{}' {id} was not requested or not resolved",
                    node.name()
                ))
            })
    }
}

/// The interface every node implementation provides.
///
/// Implementations are immutable after construction. With the default
/// [`FilterMode::Parallel`] the executor may call `get_frame` concurrently
/// for different `n`.
pub trait Filter: Send + Sync {
    /// Name of the filter, e.g. `"Trim"`.
    fn name(&self) -> &str;

    /// Output stream description. Must not change after construction.
    fn stream_info(&self) -> StreamInfo;

    fn mode(&self) -> FilterMode {
        FilterMode::Parallel
    }

    /// Filters opt in to caching; by default the registry inserts no cache.
    fn flags(&self) -> NodeFlags {
        NodeFlags::NO_CACHE
    }

    /// Upstream nodes this filter holds.
    fn dependencies(&self) -> Vec<NodeRef>;

    /// For transparent single-input relays (caches), the relayed node.
    fn relay_source(&self) -> Option<&NodeRef> {
        None
    }

    /// Serves one activation phase for output frame `n`.
    ///
    /// Returns `Ok(None)` from `Initial` and `Ok(Some(frame))` from
    /// `AllFramesReady`.
    ///
    /// # Errors
    ///
    /// Returns an error if the activation cannot be served.
    fn get_frame(
        &self,
        n: usize,
        reason: ActivationReason,
        frame_data: &mut FrameData,
        ctx: &mut FrameContext,
    ) -> Result<Option<Frame>>;
}

/// A constructed node: the filter plus what the graph needs to know about it.
pub struct Node {
    id: NodeId,
    name: Arc<str>,
    info: StreamInfo,
    mode: FilterMode,
    flags: NodeFlags,
    args: ArgMap,
    filter: Box<dyn Filter>,
    activation_lock: Mutex<()>,
}

impl Drop for Node {
    fn drop(&mut self) {
        tracing::trace!(node = %self.name, id = %self.id, "releasing node");
    }
}

/// Shared handle to a [`Node`].
///
/// Every downstream consumer holds a clone; the node and all of its upstream
/// references are released when the last clone is dropped.
#[derive(Clone)]
pub struct NodeRef(Arc<Node>);

impl NodeRef {
    /// Wraps a constructed filter into a node.
    ///
    /// `args` is the argument map the node was created from, kept for
    /// introspection.
    pub fn new<F: Filter + 'static>(filter: F, args: ArgMap) -> Self {
        let node = Node {
            id: NodeId::next(),
            name: Arc::from(filter.name()),
            info: filter.stream_info(),
            mode: filter.mode(),
            flags: filter.flags(),
            args,
            filter: Box::new(filter),
            activation_lock: Mutex::new(()),
        };
        tracing::debug!(
            node = %node.name,
            id = %node.id,
            num_frames = node.info.num_frames,
            "created node"
        );
        Self(Arc::new(node))
    }

    pub fn id(&self) -> NodeId {
        self.0.id
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn stream_info(&self) -> &StreamInfo {
        &self.0.info
    }

    pub fn mode(&self) -> FilterMode {
        self.0.mode
    }

    pub fn flags(&self) -> NodeFlags {
        self.0.flags
    }

    /// The argument map this node was created from.
    pub fn args(&self) -> &ArgMap {
        &self.0.args
    }

    pub fn dependencies(&self) -> Vec<Self> {
        self.0.filter.dependencies()
    }

    /// The single node this one relays unchanged, if it is a transparent relay.
    pub fn relay_source(&self) -> Option<&Self> {
        self.0.filter.relay_source()
    }

    /// Number of live handles to this node.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Invokes one activation phase, honouring the node's [`FilterMode`].
    ///
    /// # Errors
    ///
    /// Propagates any error returned by the filter.
    pub fn activate(
        &self,
        n: usize,
        reason: ActivationReason,
        frame_data: &mut FrameData,
        ctx: &mut FrameContext,
    ) -> Result<Option<Frame>> {
        match self.0.mode {
            FilterMode::Parallel => self.0.filter.get_frame(n, reason, frame_data, ctx),
            FilterMode::Unordered => {
                let _guard = self.0.activation_lock.lock().map_err(|_| {
                    FrameKitError::runtime(format!("{}: poisoned activation lock", self.name()))
                })?;
                self.0.filter.get_frame(n, reason, frame_data, ctx)
            },
        }
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.0.id)
            .field("name", &self.0.name)
            .field("num_frames", &self.0.info.num_frames)
            .finish_non_exhaustive()
    }
}
