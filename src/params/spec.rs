//! Declarative description of one input parameter.
//!
//! # Responsibilities
//! - Hold name, type, optionality, default, bounds, and custom filter
//! - Validate every mutation eagerly (bounds on the right family, default
//!   compatible with the declared type, no inverted ranges)
//! - Emit the descriptor consumed by the external documentation generator
//!
//! # Design Decisions
//! - Pure data holder: no I/O, no side effects beyond its own fields
//! - Built once at registration time via setters or the chainable builder
//! - Custom filters are `Arc<dyn Fn>` with a fixed three-argument signature

use std::sync::Arc;

use http::Method;
use serde::Serialize;

use crate::params::types::{ParamType, SpecError, RESERVED_NAMES};
use crate::value::{Filtered, Value};

/// Basic-filtering result handed to a custom filter.
///
/// `NotApplicable` means the pipeline skipped basic coercion for this pass,
/// so there is no intermediate value to inspect.
#[derive(Debug, Clone, Copy)]
pub enum BasicFiltered<'a> {
    Applied(&'a Filtered),
    NotApplicable,
}

impl<'a> BasicFiltered<'a> {
    /// The basic-filtered value, when basic filtering ran and succeeded.
    pub fn value(&self) -> Option<&'a Value> {
        match self {
            BasicFiltered::Applied(f) => f.value(),
            BasicFiltered::NotApplicable => None,
        }
    }
}

/// Caller-supplied post-processing hook.
///
/// Receives the raw value, the basic-filtered result (or "not applicable"),
/// and the spec itself. The return value overrides the basic result; `None`
/// maps to INVALID, except for boolean parameters where `None` means an
/// explicit `false`. A panicking filter is a programmer error and is allowed
/// to propagate.
pub type CustomFilter =
    Arc<dyn Fn(&Value, BasicFiltered<'_>, &ParameterSpec) -> Option<Value> + Send + Sync>;

/// Constraints for a single named input value.
///
/// Created at route-registration time and owned by the registering route;
/// immutable afterwards except through the validating setters.
#[derive(Clone)]
pub struct ParameterSpec {
    name: String,
    ty: ParamType,
    optional: bool,
    default: Option<Value>,
    min: Option<f64>,
    max: Option<f64>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    allow_empty: bool,
    methods: Vec<Method>,
    filter: Option<CustomFilter>,
}

impl std::fmt::Debug for ParameterSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterSpec")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("optional", &self.optional)
            .field("default", &self.default)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("allow_empty", &self.allow_empty)
            .field("methods", &self.methods)
            .field("filter", &self.filter.as_ref().map(|_| "<custom>"))
            .finish()
    }
}

impl ParameterSpec {
    /// Create a required spec with no bounds, default, or custom filter.
    pub fn new(name: impl Into<String>, ty: ParamType) -> Result<Self, SpecError> {
        let name = name.into();
        if name.is_empty() {
            return Err(SpecError::EmptyName);
        }
        if RESERVED_NAMES.contains(&name.as_str()) {
            return Err(SpecError::ReservedName(name));
        }
        Ok(Self {
            name,
            ty,
            optional: false,
            default: None,
            min: None,
            max: None,
            min_length: None,
            max_length: None,
            allow_empty: false,
            methods: Vec::new(),
            filter: None,
        })
    }

    /// Start a chainable builder for this name and type.
    pub fn builder(name: impl Into<String>, ty: ParamType) -> SpecBuilder {
        SpecBuilder::new(name, ty)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn param_type(&self) -> ParamType {
        self.ty
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    pub fn min_length(&self) -> Option<usize> {
        self.min_length
    }

    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    pub fn allows_empty(&self) -> bool {
        self.allow_empty
    }

    pub fn custom_filter(&self) -> Option<&CustomFilter> {
        self.filter.as_ref()
    }

    /// Methods this spec applies to; empty means all.
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// Whether this spec participates in a request with the given method.
    pub fn applies_to(&self, method: &Method) -> bool {
        self.methods.is_empty() || self.methods.contains(method)
    }

    /// Mark the parameter optional or required.
    pub fn set_optional(&mut self, optional: bool) {
        self.optional = optional;
    }

    /// Set the lower numeric bound. Numeric family only; must not exceed an
    /// existing upper bound.
    pub fn set_min(&mut self, min: f64) -> Result<(), SpecError> {
        if !self.ty.is_numeric() {
            return Err(SpecError::BoundNotNumeric {
                name: self.name.clone(),
                ty: self.ty.name(),
            });
        }
        if let Some(max) = self.max {
            if min > max {
                return Err(SpecError::InvertedBounds {
                    name: self.name.clone(),
                    attempted: min,
                    existing: max,
                });
            }
        }
        self.min = Some(min);
        Ok(())
    }

    /// Set the upper numeric bound. Numeric family only; must not undercut
    /// an existing lower bound.
    pub fn set_max(&mut self, max: f64) -> Result<(), SpecError> {
        if !self.ty.is_numeric() {
            return Err(SpecError::BoundNotNumeric {
                name: self.name.clone(),
                ty: self.ty.name(),
            });
        }
        if let Some(min) = self.min {
            if max < min {
                return Err(SpecError::InvertedBounds {
                    name: self.name.clone(),
                    attempted: max,
                    existing: min,
                });
            }
        }
        self.max = Some(max);
        Ok(())
    }

    /// Set the minimum length in characters. Text family only.
    pub fn set_min_length(&mut self, min: usize) -> Result<(), SpecError> {
        if !self.ty.is_text() {
            return Err(SpecError::BoundNotText {
                name: self.name.clone(),
                ty: self.ty.name(),
            });
        }
        if let Some(max) = self.max_length {
            if min > max {
                return Err(SpecError::InvertedLengthBounds {
                    name: self.name.clone(),
                    attempted: min,
                    existing: max,
                });
            }
        }
        self.min_length = Some(min);
        Ok(())
    }

    /// Set the maximum length in characters. Text family only.
    pub fn set_max_length(&mut self, max: usize) -> Result<(), SpecError> {
        if !self.ty.is_text() {
            return Err(SpecError::BoundNotText {
                name: self.name.clone(),
                ty: self.ty.name(),
            });
        }
        if let Some(min) = self.min_length {
            if max < min {
                return Err(SpecError::InvertedLengthBounds {
                    name: self.name.clone(),
                    attempted: max,
                    existing: min,
                });
            }
        }
        self.max_length = Some(max);
        Ok(())
    }

    /// Set the default, rejecting values whose runtime type does not match
    /// the declared type.
    pub fn set_default(&mut self, default: Value) -> Result<(), SpecError> {
        if !self.ty.accepts_default(&default) {
            return Err(SpecError::DefaultTypeMismatch {
                name: self.name.clone(),
                expected: self.ty.name(),
                actual: default.type_name(),
            });
        }
        self.default = Some(default);
        Ok(())
    }

    /// Permit an empty string result. Text family only; email and URL
    /// coercion still rejects empty values regardless of this flag.
    pub fn set_allow_empty(&mut self, allow: bool) -> Result<(), SpecError> {
        if !self.ty.is_text() {
            return Err(SpecError::AllowEmptyNotText {
                name: self.name.clone(),
                ty: self.ty.name(),
            });
        }
        self.allow_empty = allow;
        Ok(())
    }

    /// Restrict the spec to the given methods. Empty restores "all".
    pub fn set_methods(&mut self, methods: Vec<Method>) {
        self.methods = methods;
    }

    /// Attach a custom filter.
    pub fn set_filter(&mut self, filter: CustomFilter) {
        self.filter = Some(filter);
    }

    /// Descriptor for the external documentation generator.
    pub fn descriptor(&self) -> Descriptor {
        Descriptor {
            name: self.name.clone(),
            ty: self.ty.name(),
            required: !self.optional,
            default: self.default.clone(),
            min: self.min,
            max: self.max,
            min_length: self.min_length,
            max_length: self.max_length,
        }
    }
}

/// Serialized shape consumed by the documentation generator.
///
/// Field names are a wire contract; do not rename.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Descriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: &'static str,
    pub required: bool,
    pub default: Option<Value>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    #[serde(rename = "minLength")]
    pub min_length: Option<usize>,
    #[serde(rename = "maxLength")]
    pub max_length: Option<usize>,
}

/// Chainable construction for [`ParameterSpec`].
///
/// Collects settings infallibly and validates them all in [`SpecBuilder::build`],
/// so route registration reads as one declarative expression.
#[derive(Clone)]
pub struct SpecBuilder {
    name: String,
    ty: ParamType,
    optional: bool,
    default: Option<Value>,
    min: Option<f64>,
    max: Option<f64>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    allow_empty: Option<bool>,
    methods: Vec<Method>,
    filter: Option<CustomFilter>,
}

impl SpecBuilder {
    fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            default: None,
            min: None,
            max: None,
            min_length: None,
            max_length: None,
            allow_empty: None,
            methods: Vec::new(),
            filter: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn allow_empty(mut self) -> Self {
        self.allow_empty = Some(true);
        self
    }

    pub fn methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.methods = methods.into_iter().collect();
        self
    }

    pub fn filter<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, BasicFiltered<'_>, &ParameterSpec) -> Option<Value> + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(f));
        self
    }

    /// Validate every collected setting and produce the spec.
    pub fn build(self) -> Result<ParameterSpec, SpecError> {
        let mut spec = ParameterSpec::new(self.name, self.ty)?;
        spec.set_optional(self.optional);
        if let Some(min) = self.min {
            spec.set_min(min)?;
        }
        if let Some(max) = self.max {
            spec.set_max(max)?;
        }
        if let Some(min) = self.min_length {
            spec.set_min_length(min)?;
        }
        if let Some(max) = self.max_length {
            spec.set_max_length(max)?;
        }
        if let Some(default) = self.default {
            spec.set_default(default)?;
        }
        if let Some(allow) = self.allow_empty {
            spec.set_allow_empty(allow)?;
        }
        spec.set_methods(self.methods);
        if let Some(filter) = self.filter {
            spec.set_filter(filter);
        }
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_names_rejected() {
        for name in RESERVED_NAMES {
            let err = ParameterSpec::new(*name, ParamType::String).unwrap_err();
            assert_eq!(err, SpecError::ReservedName(name.to_string()));
        }
        assert!(ParameterSpec::new("user_id", ParamType::Integer).is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        assert_eq!(
            ParameterSpec::new("", ParamType::String).unwrap_err(),
            SpecError::EmptyName
        );
    }

    #[test]
    fn test_numeric_bounds_wrong_family() {
        let mut spec = ParameterSpec::new("title", ParamType::String).unwrap();
        assert!(matches!(
            spec.set_min(1.0),
            Err(SpecError::BoundNotNumeric { .. })
        ));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let mut spec = ParameterSpec::new("age", ParamType::Integer).unwrap();
        spec.set_min(10.0).unwrap();
        spec.set_max(20.0).unwrap();
        assert!(matches!(
            spec.set_min(30.0),
            Err(SpecError::InvertedBounds { .. })
        ));
        assert!(matches!(
            spec.set_max(5.0),
            Err(SpecError::InvertedBounds { .. })
        ));
    }

    #[test]
    fn test_length_bounds_text_only() {
        let mut spec = ParameterSpec::new("count", ParamType::Integer).unwrap();
        assert!(matches!(
            spec.set_max_length(10),
            Err(SpecError::BoundNotText { .. })
        ));

        let mut spec = ParameterSpec::new("title", ParamType::String).unwrap();
        spec.set_min_length(2).unwrap();
        assert!(matches!(
            spec.set_max_length(1),
            Err(SpecError::InvertedLengthBounds { .. })
        ));
    }

    #[test]
    fn test_default_type_checked() {
        let mut spec = ParameterSpec::new("active", ParamType::Boolean).unwrap();
        assert!(matches!(
            spec.set_default(Value::String("yes".into())),
            Err(SpecError::DefaultTypeMismatch { .. })
        ));
        spec.set_default(Value::Bool(true)).unwrap();

        let mut spec = ParameterSpec::new("tags", ParamType::Array).unwrap();
        assert!(spec.set_default(Value::String("[]".into())).is_err());
        spec.set_default(Value::Array(vec![Value::Int(1)])).unwrap();
    }

    #[test]
    fn test_method_applicability() {
        let spec = ParameterSpec::builder("q", ParamType::String)
            .methods([Method::GET, Method::HEAD])
            .build()
            .unwrap();
        assert!(spec.applies_to(&Method::GET));
        assert!(!spec.applies_to(&Method::POST));

        let open = ParameterSpec::new("q", ParamType::String).unwrap();
        assert!(open.applies_to(&Method::POST));
    }

    #[test]
    fn test_descriptor_field_names() {
        let spec = ParameterSpec::builder("limit", ParamType::Integer)
            .optional()
            .default_value(25i64)
            .min(1.0)
            .max(100.0)
            .build()
            .unwrap();
        let json = serde_json::to_value(spec.descriptor()).unwrap();
        assert_eq!(json["name"], "limit");
        assert_eq!(json["type"], "integer");
        assert_eq!(json["required"], false);
        assert_eq!(json["default"], 25);
        assert_eq!(json["min"], 1.0);
        assert_eq!(json["max"], 100.0);
        assert!(json.as_object().unwrap().contains_key("minLength"));
        assert!(json.as_object().unwrap().contains_key("maxLength"));
    }

    #[test]
    fn test_builder_surfaces_setter_errors() {
        let err = ParameterSpec::builder("age", ParamType::Integer)
            .min(50.0)
            .max(10.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, SpecError::InvertedBounds { .. }));
    }
}
