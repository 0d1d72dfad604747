// SPDX-FileCopyrightText: © 2025 FrameKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Transparent frame cache.
//!
//! A [`Cache`] relays exactly one input unchanged and remembers the most
//! recently served frames. The registry puts one in front of every node that
//! does not carry [`NodeFlags::NO_CACHE`]. Because a cache reports its input
//! through [`Filter::relay_source`], graph rewrites can see through it.

use indexmap::IndexMap;
use std::sync::Mutex;

use crate::args::ArgMap;
use crate::error::{FrameKitError, Result};
use crate::frame::Frame;
use crate::node::{ActivationReason, Filter, FrameContext, FrameData, NodeFlags, NodeRef};
use crate::node_config::get_cache_size;
use crate::params::ParamSpec;
use crate::types::StreamInfo;

pub const CACHE_NAME: &str = "Cache";

/// Registration schema of the cache filter.
pub fn cache_params() -> Vec<ParamSpec> {
    vec![ParamSpec::clip("clip"), ParamSpec::int("size").optional()]
}

/// A hit found during `Initial`, carried to `AllFramesReady`.
struct CacheHit(Frame);

pub struct Cache {
    node: NodeRef,
    info: StreamInfo,
    capacity: usize,
    // Least recently used first
    frames: Mutex<IndexMap<usize, Frame>>,
}

impl Cache {
    pub fn new(node: NodeRef, capacity: usize) -> Self {
        let info = *node.stream_info();
        Self { node, info, capacity, frames: Mutex::new(IndexMap::with_capacity(capacity)) }
    }

    /// Wraps `node` in a cache sized by the global graph configuration.
    pub fn wrap(node: &NodeRef) -> NodeRef {
        let mut args = ArgMap::new();
        args.set_node("clip", node);
        NodeRef::new(Self::new(node.clone(), get_cache_size()), args)
    }

    /// Constructor used by the registry.
    ///
    /// # Errors
    ///
    /// Returns `FrameKitError::Configuration` if `size` is negative.
    pub fn create(args: &ArgMap) -> Result<NodeRef> {
        let node = args.get_node("clip")?;
        let capacity = match args.get_int("size")? {
            Some(size) => usize::try_from(size)
                .map_err(|_| FrameKitError::configuration("Cache: size must not be negative"))?,
            None => get_cache_size(),
        };
        Ok(NodeRef::new(Self::new(node, capacity), args.clone()))
    }

    fn lookup(&self, n: usize) -> Result<Option<Frame>> {
        let mut frames = self.lock()?;
        let Some(index) = frames.get_index_of(&n) else {
            return Ok(None);
        };
        let last = frames.len() - 1;
        frames.move_index(index, last);
        Ok(frames.get_index(last).map(|(_, frame)| frame.clone()))
    }

    fn insert(&self, n: usize, frame: Frame) -> Result<()> {
        if self.capacity == 0 {
            return Ok(());
        }
        let mut frames = self.lock()?;
        if frames.len() >= self.capacity && !frames.contains_key(&n) {
            frames.shift_remove_index(0);
        }
        frames.insert(n, frame);
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, IndexMap<usize, Frame>>> {
        self.frames.lock().map_err(|_| FrameKitError::runtime("Cache: poisoned frame map"))
    }

    /// Number of frames currently held.
    pub fn len(&self) -> usize {
        self.frames.lock().map_or(0, |frames| frames.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Filter for Cache {
    fn name(&self) -> &str {
        CACHE_NAME
    }

    fn stream_info(&self) -> StreamInfo {
        self.info
    }

    fn flags(&self) -> NodeFlags {
        NodeFlags::NO_CACHE
    }

    fn dependencies(&self) -> Vec<NodeRef> {
        vec![self.node.clone()]
    }

    fn relay_source(&self) -> Option<&NodeRef> {
        Some(&self.node)
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
                if let Some(frame) = self.lookup(n)? {
                    frame_data.set(CacheHit(frame));
                } else {
                    ctx.request_frame(n, &self.node);
                }
                Ok(None)
            },
            ActivationReason::AllFramesReady => {
                if let Some(CacheHit(frame)) = frame_data.take::<CacheHit>() {
                    return Ok(Some(frame));
                }
                let frame = ctx.get_frame(n, &self.node)?;
                self.insert(n, frame.clone())?;
                Ok(Some(frame))
            },
        }
    }
}
