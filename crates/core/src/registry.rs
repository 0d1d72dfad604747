// SPDX-FileCopyrightText: © 2025 FrameKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Filter factory registry and discovery.
//!
//! This module provides the factory pattern for constructing nodes:
//! - [`FilterRegistry`]: Central registry of all available filters
//! - [`FilterDefinition`]: Serializable filter metadata for API exposure
//! - [`FilterFactory`]: Constructor signature shared by all filters

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::args::{ArgMap, ArgValue};
use crate::cache::Cache;
use crate::error::{FrameKitError, Result};
use crate::node::{NodeFlags, NodeRef};
use crate::params::{signature, validate_args, ParamSpec};

/// A constructor that turns a validated argument map into a node.
///
/// A constructor may return one of its input nodes unchanged when the
/// requested operation is the identity (pass-through).
pub type FilterFactory = Arc<dyn Fn(&ArgMap) -> Result<NodeRef> + Send + Sync>;

/// A serializable representation of a filter's definition for API exposure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub params: Vec<ParamSpec>,
    /// Compact `name:type[]:opt;` rendering of `params`.
    pub signature: String,
}

/// Internal filter registration information.
#[derive(Clone)]
pub(crate) struct FilterInfo {
    pub factory: FilterFactory,
    pub params: Vec<ParamSpec>,
    pub description: Option<String>,
}

/// The FilterRegistry holds all filters that can be constructed by name.
#[derive(Clone, Default)]
pub struct FilterRegistry {
    info: HashMap<String, FilterInfo>,
}

impl FilterRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a filter under `name` with its parameter schema.
    pub fn register<F>(&mut self, name: &str, params: Vec<ParamSpec>, factory: F)
    where
        F: Fn(&ArgMap) -> Result<NodeRef> + Send + Sync + 'static,
    {
        self.insert(name, params, Arc::new(factory), None);
    }

    /// Registers a filter with a human-readable description.
    pub fn register_with_description<F>(
        &mut self,
        name: &str,
        params: Vec<ParamSpec>,
        factory: F,
        description: impl Into<String>,
    ) where
        F: Fn(&ArgMap) -> Result<NodeRef> + Send + Sync + 'static,
    {
        self.insert(name, params, Arc::new(factory), Some(description.into()));
    }

    fn insert(
        &mut self,
        name: &str,
        params: Vec<ParamSpec>,
        factory: FilterFactory,
        description: Option<String>,
    ) {
        if self.info.contains_key(name) {
            tracing::warn!(filter = %name, "Replacing existing filter registration");
        }
        self.info.insert(name.to_string(), FilterInfo { factory, params, description });
    }

    /// Constructs a filter by its registered name.
    ///
    /// Arguments are checked against the registered schema before the
    /// constructor runs. Nodes that do not opt out of caching are returned
    /// behind a [`Cache`].
    ///
    /// # Errors
    ///
    /// Returns `FrameKitError::Configuration` if the filter is not registered
    /// or the arguments do not match its schema, and propagates any error
    /// from the constructor. No node is produced on error.
    pub fn create(&self, name: &str, args: &ArgMap) -> Result<NodeRef> {
        let info = self.info.get(name).ok_or_else(|| {
            FrameKitError::configuration(format!("Filter '{name}' not found in registry"))
        })?;

        validate_args(name, &info.params, args)
            .and_then(|()| (info.factory)(args))
            .map(|node| Self::with_cache(node, args))
            .inspect_err(|e| tracing::warn!(filter = %name, error = %e, "Construction failed"))
    }

    fn with_cache(node: NodeRef, args: &ArgMap) -> NodeRef {
        let is_input = args.keys().filter_map(|key| args.values(key)).flatten().any(
            |value| matches!(value, ArgValue::Node(input) if input.ptr_eq(&node)),
        );
        if is_input || node.relay_source().is_some() || node.flags().contains(NodeFlags::NO_CACHE)
        {
            return node;
        }
        tracing::debug!(node = %node.name(), "Inserting cache in front of node");
        Cache::wrap(&node)
    }

    /// Returns definitions for all registered filters, sorted by name.
    pub fn definitions(&self) -> Vec<FilterDefinition> {
        let mut defs: Vec<FilterDefinition> = self
            .info
            .iter()
            .map(|(name, info)| FilterDefinition {
                name: name.clone(),
                description: info.description.clone(),
                params: info.params.clone(),
                signature: signature(&info.params),
            })
            .collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Checks whether a filter definition exists in the registry.
    pub fn contains(&self, name: &str) -> bool {
        self.info.contains_key(name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::frame::Frame;
    use crate::node::{ActivationReason, Filter, FrameContext, FrameData};
    use crate::types::StreamInfo;

    struct Empty {
        flags: NodeFlags,
    }

    impl Filter for Empty {
        fn name(&self) -> &str {
            "Empty"
        }

        fn stream_info(&self) -> StreamInfo {
            StreamInfo { num_frames: 1, ..StreamInfo::default() }
        }

        fn flags(&self) -> NodeFlags {
            self.flags
        }

        fn dependencies(&self) -> Vec<NodeRef> {
            Vec::new()
        }

        fn get_frame(
            &self,
            _n: usize,
            _reason: ActivationReason,
            _frame_data: &mut FrameData,
            _ctx: &mut FrameContext,
        ) -> Result<Option<Frame>> {
            Err(FrameKitError::runtime("Empty: no frames"))
        }
    }

    fn registry() -> FilterRegistry {
        let mut registry = FilterRegistry::new();
        registry.register("Uncached", vec![], |args| {
            Ok(NodeRef::new(Empty { flags: NodeFlags::NO_CACHE }, args.clone()))
        });
        registry.register_with_description(
            "Cached",
            vec![ParamSpec::int("value").optional()],
            |args| Ok(NodeRef::new(Empty { flags: NodeFlags::NONE }, args.clone())),
            "A node that opts in to caching",
        );
        registry.register("Identity", vec![ParamSpec::clip("clip")], |args| args.get_node("clip"));
        registry
    }

    #[test]
    fn test_unknown_filter() {
        let err = registry().create("Missing", &ArgMap::new()).unwrap_err();
        assert!(matches!(err, FrameKitError::Configuration(_)));
    }

    #[test]
    fn test_schema_checked_before_factory() {
        let err = registry().create("Cached", &ArgMap::new().with_data("value", "x")).unwrap_err();
        assert!(err.to_string().contains("expects int"));
    }

    #[test]
    fn test_cache_inserted_only_when_requested() {
        let registry = registry();
        let uncached = registry.create("Uncached", &ArgMap::new()).unwrap();
        assert_eq!(uncached.name(), "Empty");

        let cached = registry.create("Cached", &ArgMap::new()).unwrap();
        assert_eq!(cached.name(), "Cache");
        assert_eq!(cached.relay_source().unwrap().name(), "Empty");
    }

    #[test]
    fn test_pass_through_is_not_wrapped() {
        let registry = registry();
        let source = NodeRef::new(Empty { flags: NodeFlags::NONE }, ArgMap::new());
        let out = registry.create("Identity", &ArgMap::new().with_node("clip", &source)).unwrap();
        assert!(out.ptr_eq(&source));
    }

    #[test]
    fn test_definitions_sorted_and_serializable() {
        let registry = registry();
        let defs = registry.definitions();
        let names: Vec<_> = defs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Cached", "Identity", "Uncached"]);
        assert_eq!(defs[0].signature, "value:int:opt;");

        let json = serde_json::to_value(&defs[0]).unwrap();
        assert_eq!(json["description"], "A node that opts in to caching");
        assert!(serde_json::to_value(&defs[2]).unwrap().get("description").is_none());
        assert!(registry.contains("Cached"));
        assert!(!registry.contains("Sharpen"));
    }
}
