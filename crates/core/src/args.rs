// SPDX-FileCopyrightText: © 2025 FrameKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Argument maps passed to filter constructors.
//!
//! An [`ArgMap`] is an insertion-ordered map from argument name to a list of
//! values. Scalar arguments are lists of one element; array arguments such as
//! `clips` or `frames` may hold many. Node handles are ordinary values, so a
//! map keeps its referenced nodes alive for as long as it exists.

use indexmap::IndexMap;
use std::sync::Arc;

use crate::error::{FrameKitError, Result};
use crate::node::NodeRef;

/// A single argument value.
#[derive(Debug, Clone)]
pub enum ArgValue {
    Int(i64),
    Data(Arc<str>),
    Node(NodeRef),
}

impl ArgValue {
    /// Short type name used in error messages.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Data(_) => "data",
            Self::Node(_) => "clip",
        }
    }
}

/// Insertion-ordered argument map.
#[derive(Debug, Clone, Default)]
pub struct ArgMap {
    entries: IndexMap<String, Vec<ArgValue>>,
}

impl ArgMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of values stored under `key`, 0 if absent.
    pub fn num_elements(&self, key: &str) -> usize {
        self.entries.get(key).map_or(0, Vec::len)
    }

    pub fn values(&self, key: &str) -> Option<&[ArgValue]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Removes `key`, returning true if it was present.
    pub fn delete_key(&mut self, key: &str) -> bool {
        self.entries.shift_remove(key).is_some()
    }

    /// Replaces all values under `key` with a single value.
    pub fn set(&mut self, key: impl Into<String>, value: ArgValue) {
        self.entries.insert(key.into(), vec![value]);
    }

    /// Appends a value under `key`, creating the key if needed.
    pub fn append(&mut self, key: impl Into<String>, value: ArgValue) {
        self.entries.entry(key.into()).or_default().push(value);
    }

    pub fn set_int(&mut self, key: impl Into<String>, value: i64) {
        self.set(key, ArgValue::Int(value));
    }

    pub fn set_ints(&mut self, key: impl Into<String>, values: impl IntoIterator<Item = i64>) {
        self.entries.insert(key.into(), values.into_iter().map(ArgValue::Int).collect());
    }

    pub fn set_data(&mut self, key: impl Into<String>, value: &str) {
        self.set(key, ArgValue::Data(Arc::from(value)));
    }

    pub fn set_node(&mut self, key: impl Into<String>, node: &NodeRef) {
        self.set(key, ArgValue::Node(node.clone()));
    }

    pub fn set_nodes<'a>(
        &mut self,
        key: impl Into<String>,
        nodes: impl IntoIterator<Item = &'a NodeRef>,
    ) {
        self.entries
            .insert(key.into(), nodes.into_iter().map(|n| ArgValue::Node(n.clone())).collect());
    }

    /// Builder form of [`set_int`](Self::set_int).
    #[must_use]
    pub fn with_int(mut self, key: &str, value: i64) -> Self {
        self.set_int(key, value);
        self
    }

    /// Builder form of [`set_ints`](Self::set_ints).
    #[must_use]
    pub fn with_ints(mut self, key: &str, values: &[i64]) -> Self {
        self.set_ints(key, values.iter().copied());
        self
    }

    /// Builder form of [`set_data`](Self::set_data).
    #[must_use]
    pub fn with_data(mut self, key: &str, value: &str) -> Self {
        self.set_data(key, value);
        self
    }

    /// Builder form of [`set_node`](Self::set_node).
    #[must_use]
    pub fn with_node(mut self, key: &str, node: &NodeRef) -> Self {
        self.set_node(key, node);
        self
    }

    /// Builder form of [`set_nodes`](Self::set_nodes).
    #[must_use]
    pub fn with_nodes(mut self, key: &str, nodes: &[NodeRef]) -> Self {
        self.set_nodes(key, nodes);
        self
    }

    /// First integer under `key`, or `None` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns `FrameKitError::Configuration` if the value is not an integer.
    pub fn get_int(&self, key: &str) -> Result<Option<i64>> {
        match self.entries.get(key).and_then(|v| v.first()) {
            None => Ok(None),
            Some(ArgValue::Int(v)) => Ok(Some(*v)),
            Some(other) => Err(wrong_type(key, "int", other)),
        }
    }

    /// Integer flag under `key`; absent means `false`, any non-zero value `true`.
    ///
    /// # Errors
    ///
    /// Returns `FrameKitError::Configuration` if the value is not an integer.
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        Ok(self.get_int(key)?.is_some_and(|v| v != 0))
    }

    /// All integers under `key`; empty if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns `FrameKitError::Configuration` if any value is not an integer.
    pub fn get_int_array(&self, key: &str) -> Result<Vec<i64>> {
        self.entries.get(key).map_or_else(
            || Ok(Vec::new()),
            |values| {
                values
                    .iter()
                    .map(|value| match value {
                        ArgValue::Int(v) => Ok(*v),
                        other => Err(wrong_type(key, "int", other)),
                    })
                    .collect()
            },
        )
    }

    /// First string under `key`, or `None` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns `FrameKitError::Configuration` if the value is not data.
    pub fn get_data(&self, key: &str) -> Result<Option<&str>> {
        match self.entries.get(key).and_then(|v| v.first()) {
            None => Ok(None),
            Some(ArgValue::Data(v)) => Ok(Some(v.as_ref())),
            Some(other) => Err(wrong_type(key, "data", other)),
        }
    }

    /// The node under `key`, which must be present.
    ///
    /// # Errors
    ///
    /// Returns `FrameKitError::Configuration` if the key is absent or does not hold a node.
    pub fn get_node(&self, key: &str) -> Result<NodeRef> {
        match self.entries.get(key).and_then(|v| v.first()) {
            None => Err(FrameKitError::configuration(format!("argument '{key}' is required"))),
            Some(ArgValue::Node(node)) => Ok(node.clone()),
            Some(other) => Err(wrong_type(key, "clip", other)),
        }
    }

    /// All nodes under `key`; empty if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns `FrameKitError::Configuration` if any value is not a node.
    pub fn get_nodes(&self, key: &str) -> Result<Vec<NodeRef>> {
        self.entries.get(key).map_or_else(
            || Ok(Vec::new()),
            |values| {
                values
                    .iter()
                    .map(|value| match value {
                        ArgValue::Node(node) => Ok(node.clone()),
                        other => Err(wrong_type(key, "clip", other)),
                    })
                    .collect()
            },
        )
    }
}

fn wrong_type(key: &str, expected: &str, got: &ArgValue) -> FrameKitError {
    FrameKitError::configuration(format!(
        "argument '{key}' has wrong type: expected {expected}, got {}",
        got.type_name()
    ))
}

/// Converts a frame index argument to `usize`, rejecting negative values.
///
/// # Errors
///
/// Returns `FrameKitError::Configuration` with `message` if `value` is negative.
pub fn frame_index(value: i64, message: &str) -> Result<usize> {
    usize::try_from(value).map_err(|_| FrameKitError::configuration(message))
}
