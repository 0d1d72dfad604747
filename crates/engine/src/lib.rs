// SPDX-FileCopyrightText: © 2025 FrameKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! engine: The pull engine for FrameKit graphs.
//! This crate owns the filter registry and resolves frame requests against
//! graphs built from it, either on the calling thread or on the tokio runtime.

use std::sync::{Arc, RwLock, RwLockReadGuard};

use framekit_core::{
    ArgMap, FilterDefinition, FilterRegistry, Frame, FrameKitError, NodeRef, Result,
};
use tokio::sync::Semaphore;

// --- Public Modules ---

pub mod config;
pub mod constants;
pub mod pull;

// Re-exports
pub use config::EngineConfig;
pub use pull::{pull_frame, pull_frame_async};

// --- Engine Structs ---

/// The main Engine struct, a unified entry point for building graphs and
/// pulling frames out of them.
pub struct Engine {
    pub registry: Arc<RwLock<FilterRegistry>>,
    config: EngineConfig,
    limiter: Arc<Semaphore>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Creates a new engine with a populated filter registry.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Creates a new engine with a populated filter registry and explicit limits.
    pub fn with_config(config: EngineConfig) -> Self {
        let mut registry = FilterRegistry::new();
        framekit_nodes::register_nodes(&mut registry);

        tracing::info!(
            filters = registry.definitions().len(),
            max_concurrent_requests = config.max_concurrent_requests,
            max_graph_depth = config.max_graph_depth,
            "Engine initialized"
        );

        let permits = config.max_concurrent_requests.max(1);
        Self {
            registry: Arc::new(RwLock::new(registry)),
            config,
            limiter: Arc::new(Semaphore::new(permits)),
        }
    }

    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn registry(&self) -> Result<RwLockReadGuard<'_, FilterRegistry>> {
        self.registry.read().map_err(|_| FrameKitError::runtime("filter registry lock poisoned"))
    }

    /// Creates a node through the registry.
    ///
    /// # Errors
    ///
    /// Returns whatever the registry or the filter constructor reports.
    pub fn create(&self, name: &str, args: &ArgMap) -> Result<NodeRef> {
        self.registry()?.create(name, args)
    }

    /// Lists every registered filter, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns `FrameKitError::Runtime` if the registry lock is poisoned.
    pub fn definitions(&self) -> Result<Vec<FilterDefinition>> {
        Ok(self.registry()?.definitions())
    }

    /// Pulls frame `n` of `node` on the calling thread.
    ///
    /// # Errors
    ///
    /// See [`pull_frame`].
    pub fn get_frame(&self, node: &NodeRef, n: usize) -> Result<Frame> {
        pull_frame(node, n, self.config.max_graph_depth)
    }

    /// Pulls frame `n` of `node`, resolving independent upstream requests
    /// concurrently.
    ///
    /// # Errors
    ///
    /// See [`pull_frame`].
    pub async fn get_frame_async(&self, node: &NodeRef, n: usize) -> Result<Frame> {
        pull_frame_async(node.clone(), n, self.config.max_graph_depth).await
    }

    /// Pulls several frames of `node` on the blocking pool.
    ///
    /// At most `max_concurrent_requests` frames are in flight at once. The
    /// result holds the frames in the order they were asked for.
    ///
    /// # Errors
    ///
    /// Returns the first error of any request, or `FrameKitError::Runtime`
    /// if a worker task panicked.
    pub async fn get_frames(&self, node: &NodeRef, frames: &[usize]) -> Result<Vec<Frame>> {
        let max_depth = self.config.max_graph_depth;
        let mut tasks = Vec::with_capacity(frames.len());

        for &n in frames {
            let permit = self
                .limiter
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| FrameKitError::runtime("request limiter closed"))?;
            let node = node.clone();
            tasks.push(tokio::task::spawn_blocking(move || {
                let _permit = permit;
                pull_frame(&node, n, max_depth)
            }));
        }

        tracing::debug!(node = %node.name(), requests = frames.len(), "Waiting for frames");
        let results = futures::future::try_join_all(tasks)
            .await
            .map_err(|e| FrameKitError::runtime(format!("frame request task failed: {e}")))?;
        results.into_iter().collect()
    }
}
