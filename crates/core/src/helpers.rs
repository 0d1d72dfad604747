// SPDX-FileCopyrightText: © 2025 FrameKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Utility functions for configuration parsing.
//!
//! - [`config_helpers`]: Parse typed configuration from JSON values

/// Helper functions for parsing configuration from JSON values.
pub mod config_helpers {
    use crate::error::FrameKitError;
    use serde::Deserialize;

    /// Parses configuration from an optional JSON value, using defaults if not provided.
    ///
    /// # Errors
    ///
    /// This function always returns `Ok` in practice, as it uses `Default` when parsing fails.
    /// The `Result` return type is maintained for API consistency with other config helpers.
    pub fn parse_config_optional<T>(params: Option<&serde_json::Value>) -> Result<T, FrameKitError>
    where
        T: for<'de> Deserialize<'de> + Default,
    {
        Ok(serde_json::from_value(params.unwrap_or(&serde_json::Value::Null).clone())
            .unwrap_or_default())
    }

    /// Parses a JSON document, naming `context` in any error.
    ///
    /// # Errors
    ///
    /// Returns `FrameKitError::Configuration` if the text is not valid JSON for `T`.
    pub fn parse_config_str<T>(text: &str, context: &str) -> Result<T, FrameKitError>
    where
        T: for<'de> Deserialize<'de>,
    {
        serde_json::from_str(text)
            .map_err(|e| FrameKitError::configuration(format!("Failed to parse {context}: {e}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::config_helpers::*;
    use crate::node_config::GraphConfig;

    #[test]
    fn test_optional_falls_back_to_default() {
        let config: GraphConfig = parse_config_optional(None).unwrap();
        assert_eq!(config.cache_size, 20);

        let bad = serde_json::json!({ "cache_size": "many" });
        let config: GraphConfig = parse_config_optional(Some(&bad)).unwrap();
        assert_eq!(config.cache_size, 20);
    }

    #[test]
    fn test_optional_reads_partial_value() {
        let value = serde_json::json!({ "max_concurrent_requests": 2 });
        let config: GraphConfig = parse_config_optional(Some(&value)).unwrap();
        assert_eq!(config.max_concurrent_requests, 2);
        assert_eq!(config.cache_size, 20);
    }

    #[test]
    fn test_parse_str_names_context() {
        let err = parse_config_str::<GraphConfig>("{", "graph config").unwrap_err();
        assert!(err.to_string().contains("Failed to parse graph config"));
    }
}
