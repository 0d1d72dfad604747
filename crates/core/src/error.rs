// SPDX-FileCopyrightText: © 2025 FrameKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Structured error types for FrameKit.
//!
//! Construction of a filter is all-or-nothing: every validation failure is
//! reported through [`FrameKitError`] before a node exists, and any upstream
//! node handles acquired on the way are dropped with the error.

use thiserror::Error;

/// Main error type for FrameKit operations.
#[derive(Debug, Error)]
pub enum FrameKitError {
    /// Argument validation error.
    ///
    /// Examples:
    /// - Out-of-range frame index
    /// - Non-ascending or overlapping frame lists
    /// - Mutually exclusive parameters given together
    /// - Unknown filter name or badly typed argument
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Graph topology error.
    ///
    /// Examples:
    /// - Incompatible stream properties across inputs
    /// - Unknown-length clip where a bound is required
    /// - Unknown-length clip in a non-terminal splice position
    #[error("Topology error: {0}")]
    Topology(String),

    /// Runtime error while activating a node.
    ///
    /// Frame arithmetic is validated at construction, so reaching this from a
    /// remap filter means an internal invariant was violated.
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Resource exhaustion reported by a frame allocator or executor.
    #[error("Resource exhaustion: {0}")]
    ResourceExhausted(String),
}

/// Convenience type alias for Results using `FrameKitError`.
pub type Result<T> = std::result::Result<T, FrameKitError>;

impl FrameKitError {
    /// Build a [`FrameKitError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`FrameKitError::Topology`] value.
    pub fn topology(msg: impl Into<String>) -> Self {
        Self::Topology(msg.into())
    }

    /// Build a [`FrameKitError::Runtime`] value.
    pub fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }
}

impl From<FrameKitError> for String {
    fn from(err: FrameKitError) -> Self {
        err.to_string()
    }
}

// Untyped string errors default to Runtime
impl From<String> for FrameKitError {
    fn from(s: String) -> Self {
        Self::Runtime(s)
    }
}

impl From<&str> for FrameKitError {
    fn from(s: &str) -> Self {
        Self::Runtime(s.to_string())
    }
}
