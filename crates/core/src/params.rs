// SPDX-FileCopyrightText: © 2025 FrameKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Typed parameter schemas for filter registration.
//!
//! Each registered filter declares an ordered list of [`ParamSpec`]s. The
//! registry checks an [`ArgMap`] against that list before the constructor
//! runs, so constructors only deal with semantic validation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::args::{ArgMap, ArgValue};
use crate::error::{FrameKitError, Result};

/// Value type accepted by a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Int,
    Data,
    Clip,
}

impl ParamKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Data => "data",
            Self::Clip => "clip",
        }
    }

    const fn accepts(self, value: &ArgValue) -> bool {
        matches!(
            (self, value),
            (Self::Int, ArgValue::Int(_))
                | (Self::Data, ArgValue::Data(_))
                | (Self::Clip, ArgValue::Node(_))
        )
    }
}

/// One declared parameter of a filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
    /// Accepts any number of values instead of exactly one.
    #[serde(default)]
    pub array: bool,
    #[serde(default)]
    pub optional: bool,
}

impl ParamSpec {
    fn new(name: &str, kind: ParamKind) -> Self {
        Self { name: name.to_string(), kind, array: false, optional: false }
    }

    pub fn int(name: &str) -> Self {
        Self::new(name, ParamKind::Int)
    }

    pub fn data(name: &str) -> Self {
        Self::new(name, ParamKind::Data)
    }

    pub fn clip(name: &str) -> Self {
        Self::new(name, ParamKind::Clip)
    }

    #[must_use]
    pub const fn array(mut self) -> Self {
        self.array = true;
        self
    }

    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

impl fmt::Display for ParamSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.kind.as_str())?;
        if self.array {
            f.write_str("[]")?;
        }
        if self.optional {
            f.write_str(":opt")?;
        }
        Ok(())
    }
}

/// Renders a parameter list as `clip:clip;first:int:opt;`.
pub fn signature(params: &[ParamSpec]) -> String {
    params.iter().map(|p| format!("{p};")).collect()
}

/// Checks `args` against the declared parameters of `filter`.
///
/// # Errors
///
/// Returns `FrameKitError::Configuration` for unknown arguments, missing
/// required arguments (an empty array counts as missing), values of the wrong
/// type, and multiple values for a scalar parameter.
pub fn validate_args(filter: &str, params: &[ParamSpec], args: &ArgMap) -> Result<()> {
    if let Some(unknown) = args.keys().find(|key| !params.iter().any(|p| p.name == *key)) {
        return Err(FrameKitError::configuration(format!(
            "{filter}: function does not take argument(s) named {unknown}"
        )));
    }

    for param in params {
        let values = args.values(&param.name).unwrap_or_default();
        if values.is_empty() {
            if param.optional {
                continue;
            }
            return Err(FrameKitError::configuration(format!(
                "{filter}: argument {} is required",
                param.name
            )));
        }

        if !param.array && values.len() > 1 {
            return Err(FrameKitError::configuration(format!(
                "{filter}: argument {} is not an array",
                param.name
            )));
        }

        if let Some(bad) = values.iter().find(|v| !param.kind.accepts(v)) {
            return Err(FrameKitError::configuration(format!(
                "{filter}: argument {} expects {}, got {}",
                param.name,
                param.kind.as_str(),
                bad.type_name()
            )));
        }
    }

    Ok(())
}
