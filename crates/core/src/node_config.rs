// SPDX-FileCopyrightText: © 2025 FrameKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Process-wide configuration for graph construction and execution.
//!
//! These settings are typically set once at startup, before any node is
//! created, and remain constant for the lifetime of the process.
//!
//! ## Usage
//!
//! ```ignore
//! use framekit_core::node_config::{set_graph_config, GraphConfig};
//!
//! set_graph_config(GraphConfig { cache_size: 40, max_concurrent_requests: 8 });
//! ```
//!
//! ## Default Values
//!
//! If `set_graph_config` is never called, the getters return:
//!
//! - `cache_size`: 20 frames per cache node
//! - `max_concurrent_requests`: 16 in-flight top-level pulls

use serde::Deserialize;
use std::sync::OnceLock;

/// Default number of frames held by each automatically inserted cache.
const DEFAULT_CACHE_SIZE: usize = 20;

/// Default bound on concurrently served top-level frame requests.
const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 16;

/// Runtime configuration for graph nodes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Frames retained by each cache node before the oldest is evicted.
    pub cache_size: usize,

    /// Upper bound on top-level frame requests an executor serves at once.
    pub max_concurrent_requests: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            cache_size: DEFAULT_CACHE_SIZE,
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
        }
    }
}

/// Global storage for the graph configuration.
static GRAPH_CONFIG: OnceLock<GraphConfig> = OnceLock::new();

/// Sets the global graph configuration.
///
/// Subsequent calls are ignored (the first configuration wins).
pub fn set_graph_config(config: GraphConfig) {
    if GRAPH_CONFIG.set(config).is_err() {
        tracing::warn!("Graph config already set, ignoring new configuration");
    }
}

/// Returns the configured cache size. Returns the default (20) if unset.
#[inline]
pub fn get_cache_size() -> usize {
    GRAPH_CONFIG.get().map_or(DEFAULT_CACHE_SIZE, |c| c.cache_size)
}

/// Returns the configured request concurrency. Returns the default (16) if unset.
#[inline]
pub fn get_max_concurrent_requests() -> usize {
    GRAPH_CONFIG.get().map_or(DEFAULT_MAX_CONCURRENT_REQUESTS, |c| c.max_concurrent_requests)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        // Getters may observe a config set by another test, so only check the constants
        assert_eq!(DEFAULT_CACHE_SIZE, 20);
        assert_eq!(DEFAULT_MAX_CONCURRENT_REQUESTS, 16);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: GraphConfig = serde_json::from_str(r#"{"cache_size": 4}"#).unwrap();
        assert_eq!(config.cache_size, 4);
        assert_eq!(config.max_concurrent_requests, DEFAULT_MAX_CONCURRENT_REQUESTS);
    }
}
