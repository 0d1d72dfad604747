// SPDX-FileCopyrightText: © 2025 FrameKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Configuration for the pull engine.

use framekit_core::config_helpers::{parse_config_optional, parse_config_str};
use framekit_core::{get_max_concurrent_requests, Result};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAX_GRAPH_DEPTH;

/// Configuration for [`Engine`](crate::Engine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Top-level frame requests served at once by `get_frames` (default: 16)
    pub max_concurrent_requests: usize,
    /// Longest chain of nodes a single pull may walk (default: 1024)
    pub max_graph_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: get_max_concurrent_requests(),
            max_graph_depth: DEFAULT_MAX_GRAPH_DEPTH,
        }
    }
}

impl EngineConfig {
    /// Reads a config from an optional JSON value, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Never fails in practice; see [`parse_config_optional`].
    pub fn from_value(value: Option<&serde_json::Value>) -> Result<Self> {
        parse_config_optional(value)
    }

    /// Parses a JSON document. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `FrameKitError::Configuration` if the text is not valid JSON
    /// or a field has the wrong type.
    pub fn from_json(text: &str) -> Result<Self> {
        parse_config_str(text, "engine config")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{ "max_concurrent_requests": 4 }"#).unwrap();
        assert_eq!(config.max_concurrent_requests, 4);
        assert_eq!(config.max_graph_depth, DEFAULT_MAX_GRAPH_DEPTH);
    }

    #[test]
    fn test_bad_json_is_configuration_error() {
        let err = EngineConfig::from_json(r#"{ "max_graph_depth": "deep" }"#).unwrap_err();
        assert!(matches!(err, framekit_core::FrameKitError::Configuration(_)));
    }

    #[test]
    fn test_missing_value_uses_defaults() {
        assert_eq!(EngineConfig::from_value(None).unwrap(), EngineConfig::default());
    }
}
