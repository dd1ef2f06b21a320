//! Typed value model shared by every filtering stage.
//!
//! # Responsibilities
//! - Represent filtered parameter values as a tagged union (scalar/list/map)
//! - Carry whole request bodies as recursively nested document trees
//! - Distinguish "coercion failed" from legitimate `null`/`false` results
//! - Bound conversion depth so hostile payloads cannot blow the stack
//!
//! # Design Decisions
//! - One enum for scalars and containers; no trait objects in the data path
//! - Interop with `serde_json::Value` at the boundary, own type internally
//! - INVALID is a separate wrapper (`Filtered`), never a `Value` variant,
//!   so it cannot leak into an output tree

use std::collections::BTreeMap;

use serde::ser::{Serialize, Serializer};
use thiserror::Error;

/// Default nesting bound applied when a caller does not impose one.
pub const DEFAULT_DEPTH_LIMIT: usize = 32;

/// A parameter value or document node.
///
/// Containers nest arbitrarily; conversion from untrusted JSON enforces a
/// depth limit (see [`Value::from_json`]).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

/// Input document nesting exceeded the caller-imposed limit.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("document nesting exceeds the depth limit of {0}")]
pub struct DepthExceeded(pub usize);

impl Value {
    /// Returns true for `Value::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Human-readable tag, used in error messages and logs.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "double",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Borrow the string content, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the boolean content, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Render a scalar as the string a flat input source would have carried.
    ///
    /// Containers and null have no flat rendering and return `None`.
    pub fn to_flat_string(&self) -> Option<String> {
        match self {
            Value::Bool(b) => Some(b.to_string()),
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::String(s) => Some(s.clone()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Convert an untrusted `serde_json::Value`, refusing trees nested
    /// deeper than `depth_limit` container levels.
    pub fn from_json(json: serde_json::Value, depth_limit: usize) -> Result<Self, DepthExceeded> {
        Self::from_json_at(json, 0, depth_limit)
    }

    fn from_json_at(
        json: serde_json::Value,
        depth: usize,
        limit: usize,
    ) -> Result<Self, DepthExceeded> {
        let value = match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                if depth >= limit {
                    return Err(DepthExceeded(limit));
                }
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(Self::from_json_at(item, depth + 1, limit)?);
                }
                Value::Array(out)
            }
            serde_json::Value::Object(map) => {
                if depth >= limit {
                    return Err(DepthExceeded(limit));
                }
                let mut out = BTreeMap::new();
                for (k, v) in map {
                    out.insert(k, Self::from_json_at(v, depth + 1, limit)?);
                }
                Value::Object(out)
            }
        };
        Ok(value)
    }

    /// Convert back into a `serde_json::Value` for the caller's response path.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => {
                serde_json::Number::from_f64(*f).map_or(serde_json::Value::Null, serde_json::Value::Number)
            }
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => items.serialize(serializer),
            Value::Object(map) => map.serialize(serializer),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Result of one parameter's filtering pass.
///
/// `Invalid` means coercion (or a custom filter) rejected the raw input.
/// It is deliberately not a [`Value`] variant: `Value::Null` and
/// `Value::Bool(false)` are legitimate filtered results and must never be
/// conflated with failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Filtered {
    Value(Value),
    Invalid,
}

impl Filtered {
    /// Returns true if coercion failed for this parameter.
    pub fn is_invalid(&self) -> bool {
        matches!(self, Filtered::Invalid)
    }

    /// Borrow the filtered value, if coercion succeeded.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Filtered::Value(v) => Some(v),
            Filtered::Invalid => None,
        }
    }

    /// Consume into the filtered value, if coercion succeeded.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Filtered::Value(v) => Some(v),
            Filtered::Invalid => None,
        }
    }
}

impl From<Value> for Filtered {
    fn from(v: Value) -> Self {
        Filtered::Value(v)
    }
}
