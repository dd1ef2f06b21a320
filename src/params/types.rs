//! Parameter type vocabulary and spec-construction errors.

use thiserror::Error;

use crate::value::Value;

/// Names a spec may never claim; they collide with routing internals that
/// the dispatch layer injects into every request.
pub const RESERVED_NAMES: &[&str] = &["method", "path", "route", "controller", "action", "format"];

/// Declared type of one input parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    String,
    Integer,
    Double,
    Boolean,
    Email,
    Url,
    Array,
    Document,
}

impl ParamType {
    /// Lowercase tag used by descriptors, errors, and logs.
    pub fn name(self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Double => "double",
            ParamType::Boolean => "boolean",
            ParamType::Email => "email",
            ParamType::Url => "url",
            ParamType::Array => "array",
            ParamType::Document => "document",
        }
    }

    /// Numeric family: min/max value bounds apply.
    pub fn is_numeric(self) -> bool {
        matches!(self, ParamType::Integer | ParamType::Double)
    }

    /// Text family: min/max length bounds apply.
    pub fn is_text(self) -> bool {
        matches!(self, ParamType::String | ParamType::Email | ParamType::Url)
    }

    /// Structured family: defaults must match structurally, not by scalar tag.
    pub fn is_structured(self) -> bool {
        matches!(self, ParamType::Array | ParamType::Document)
    }

    /// Whether `value` is an acceptable default for this type.
    ///
    /// Booleans accept only booleans, arrays only lists, documents only
    /// maps; integers do not accept fractional defaults, but doubles accept
    /// whole-number ones.
    pub fn accepts_default(self, value: &Value) -> bool {
        match self {
            ParamType::String | ParamType::Email | ParamType::Url => {
                matches!(value, Value::String(_))
            }
            ParamType::Integer => matches!(value, Value::Int(_)),
            ParamType::Double => matches!(value, Value::Int(_) | Value::Float(_)),
            ParamType::Boolean => matches!(value, Value::Bool(_)),
            ParamType::Array => matches!(value, Value::Array(_)),
            ParamType::Document => matches!(value, Value::Object(_)),
        }
    }
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors raised while constructing or mutating a [`super::ParameterSpec`].
///
/// These are programmer mistakes and surface at route-registration time,
/// never during request handling.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpecError {
    /// Parameter name was empty.
    #[error("parameter name must not be empty")]
    EmptyName,

    /// Parameter name collides with a routing-internal name.
    #[error("parameter name {0:?} is reserved")]
    ReservedName(String),

    /// A numeric value bound was set on a non-numeric parameter.
    #[error("numeric bound not applicable to {name:?} of type {ty}")]
    BoundNotNumeric { name: String, ty: &'static str },

    /// A length bound was set on a non-text parameter.
    #[error("length bound not applicable to {name:?} of type {ty}")]
    BoundNotText { name: String, ty: &'static str },

    /// Setting this bound would invert the opposite bound.
    #[error("bound {attempted} on {name:?} conflicts with existing bound {existing}")]
    InvertedBounds {
        name: String,
        attempted: f64,
        existing: f64,
    },

    /// Setting this length bound would invert the opposite length bound.
    #[error("length bound {attempted} on {name:?} conflicts with existing bound {existing}")]
    InvertedLengthBounds {
        name: String,
        attempted: usize,
        existing: usize,
    },

    /// Default value's runtime type does not match the declared type.
    #[error("default of type {actual} does not match parameter {name:?} of type {expected}")]
    DefaultTypeMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Allow-empty applies to the text family only.
    #[error("allow-empty not applicable to {name:?} of type {ty}")]
    AllowEmptyNotText { name: String, ty: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_families() {
        assert!(ParamType::Integer.is_numeric());
        assert!(ParamType::Double.is_numeric());
        assert!(!ParamType::String.is_numeric());

        assert!(ParamType::String.is_text());
        assert!(ParamType::Email.is_text());
        assert!(ParamType::Url.is_text());
        assert!(!ParamType::Array.is_text());

        assert!(ParamType::Array.is_structured());
        assert!(ParamType::Document.is_structured());
    }

    #[test]
    fn test_default_compatibility() {
        assert!(ParamType::Boolean.accepts_default(&Value::Bool(false)));
        assert!(!ParamType::Boolean.accepts_default(&Value::Int(0)));

        assert!(ParamType::Integer.accepts_default(&Value::Int(5)));
        assert!(!ParamType::Integer.accepts_default(&Value::Float(5.5)));
        assert!(ParamType::Double.accepts_default(&Value::Int(5)));

        assert!(ParamType::Array.accepts_default(&Value::Array(vec![])));
        assert!(!ParamType::Array.accepts_default(&Value::String("[]".into())));

        assert!(ParamType::Document.accepts_default(&Value::Object(Default::default())));
    }
}
