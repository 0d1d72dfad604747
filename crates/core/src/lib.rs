// SPDX-FileCopyrightText: © 2025 FrameKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! FrameKit Core - Fundamental traits and data structures for demand-driven frame graphs.
//!
//! This crate defines the core abstractions for building FrameKit graphs:
//!
//! ## Core Modules
//!
//! - [`types`]: Stream metadata (StreamInfo, VideoFormat)
//! - [`frame`]: Opaque, cheaply cloneable frame handles
//! - [`merge`]: Reconciling stream metadata across inputs
//! - [`node`]: Filter trait, node handles and the two-phase activation protocol
//! - [`args`]: Argument maps passed to filter constructors
//! - [`params`]: Typed parameter schemas and argument validation
//! - [`registry`]: Filter factory and discovery system
//! - [`cache`]: Transparent frame cache relay
//! - [`node_config`]: Process-wide graph configuration
//! - [`error`]: Error types and handling
//! - [`helpers`]: Utility functions for configuration
//!
//! ## Quick Start
//!
//! ```ignore
//! use framekit_core::{ArgMap, FilterRegistry, ParamSpec};
//!
//! let mut registry = FilterRegistry::new();
//! registry.register("Reverse", vec![ParamSpec::clip("clip")], reverse::create);
//!
//! let source = registry.create("BlankClip", &ArgMap::new().with_int("length", 10))?;
//! let reversed = registry.create("Reverse", &ArgMap::new().with_node("clip", &source))?;
//! assert_eq!(reversed.stream_info().num_frames, 10);
//! ```

// Module declarations
pub mod args;
pub mod cache;
pub mod error;
pub mod frame;
pub mod helpers;
pub mod merge;
pub mod node;
pub mod node_config;
pub mod params;
pub mod registry;
pub mod types;

// Convenience re-exports for commonly used types

// Error handling
pub use error::{FrameKitError, Result};

// Stream metadata and frames
pub use frame::{Frame, FrameProps};
pub use merge::{find_common_info, MergedInfo};
pub use types::{ColorFamily, SampleType, StreamInfo, VideoFormat};

// Core node abstractions
pub use node::{
    ActivationReason, Filter, FilterMode, FrameContext, FrameData, FrameRequest, NodeFlags,
    NodeId, NodeRef, RequestList,
};

// Arguments and registry
pub use args::{frame_index, ArgMap, ArgValue};
pub use params::{ParamKind, ParamSpec};
pub use registry::{FilterDefinition, FilterFactory, FilterRegistry};

// Caching
pub use cache::{Cache, CACHE_NAME};

// Helper modules
pub use helpers::config_helpers;

// Graph configuration
pub use node_config::{
    get_cache_size, get_max_concurrent_requests, set_graph_config, GraphConfig,
};
