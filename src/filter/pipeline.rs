//! Flat-input validation pipeline.
//!
//! # Responsibilities
//! - Drive absent/default handling, basic coercion, custom filters, and
//!   default substitution for every declared spec
//! - Accumulate missing and invalid names independently
//! - Echo raw input (or substituted defaults) alongside filtered values
//!
//! # Design Decisions
//! - One pass is a pure function of (specs, raw map, context); the pipeline
//!   itself holds only configuration, never request state
//! - Specs outside the request method are skipped entirely
//! - A custom filter returning `None` is INVALID, except booleans where it
//!   means an explicit `false`; an explicit `false` is never replaced by a
//!   default
//! - A panicking custom filter is a programmer error and propagates

use std::collections::BTreeMap;

use crate::context::RequestContext;
use crate::filter::coerce::coerce;
use crate::filter::outcome::FilterOutcome;
use crate::params::{BasicFiltered, ParamType, ParameterSpec};
use crate::value::{Filtered, Value, DEFAULT_DEPTH_LIMIT};

/// Applies type coercion, custom filters, and defaults over a flat
/// key/value input set.
#[derive(Debug, Clone)]
pub struct ValidationPipeline {
    depth_limit: usize,
}

impl Default for ValidationPipeline {
    fn default() -> Self {
        Self {
            depth_limit: DEFAULT_DEPTH_LIMIT,
        }
    }
}

impl ValidationPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the nesting bound applied to document-typed parameters.
    pub fn with_depth_limit(depth_limit: usize) -> Self {
        Self { depth_limit }
    }

    /// Run one validation pass. Never fails; all request-time conditions
    /// land in the returned [`FilterOutcome`].
    pub fn filter(
        &self,
        specs: &[ParameterSpec],
        raw: &BTreeMap<String, String>,
        ctx: &RequestContext,
    ) -> FilterOutcome {
        let mut outcome = FilterOutcome::new();

        for spec in specs {
            if !spec.applies_to(&ctx.method) {
                continue;
            }

            let Some(raw_value) = raw.get(spec.name()) else {
                self.handle_absent(spec, &mut outcome);
                continue;
            };

            let filtered = self.filter_present(spec, raw_value, ctx);
            let filtered = substitute_default(spec, filtered);

            if filtered.is_invalid() {
                tracing::debug!(name = %spec.name(), ty = %spec.param_type(),
                    "parameter invalid after coercion");
                outcome.record_invalid(spec.name());
            }
            outcome.record(spec.name(), filtered, Value::String(raw_value.clone()));
        }

        outcome
    }

    fn handle_absent(&self, spec: &ParameterSpec, outcome: &mut FilterOutcome) {
        if !spec.is_optional() {
            tracing::debug!(name = %spec.name(), "required parameter missing");
            outcome.record_missing(spec.name());
            return;
        }
        // Optional and absent: the default (or null) stands in for both the
        // filtered value and the raw echo.
        let value = spec.default().cloned().unwrap_or(Value::Null);
        outcome.record(spec.name(), Filtered::Value(value.clone()), value);
    }

    fn filter_present(&self, spec: &ParameterSpec, raw: &str, ctx: &RequestContext) -> Filtered {
        let basic = if ctx.apply_basic_filtering {
            Some(coerce(spec, raw, self.depth_limit))
        } else {
            None
        };

        if let Some(custom) = spec.custom_filter() {
            let raw_value = Value::String(raw.to_string());
            let basic_arg = match &basic {
                Some(f) => BasicFiltered::Applied(f),
                None => BasicFiltered::NotApplicable,
            };
            return apply_custom_filter(spec, custom(&raw_value, basic_arg, spec));
        }

        match basic {
            Some(filtered) => filtered,
            // Basic filtering skipped and no custom filter: pass through.
            None => Filtered::Value(Value::String(raw.to_string())),
        }
    }
}

/// Map a custom filter's return value onto the sentinel rules.
pub(crate) fn apply_custom_filter(spec: &ParameterSpec, returned: Option<Value>) -> Filtered {
    match returned {
        Some(value) => Filtered::Value(value),
        None if spec.param_type() == ParamType::Boolean => Filtered::Value(Value::Bool(false)),
        None => Filtered::Invalid,
    }
}

/// Replace a final INVALID with the spec's default, if one exists.
///
/// A boolean `false` is a value, not a failure, so it never reaches the
/// substitution and is never replaced.
pub(crate) fn substitute_default(spec: &ParameterSpec, filtered: Filtered) -> Filtered {
    match filtered {
        Filtered::Invalid => match spec.default() {
            Some(default) => Filtered::Value(default.clone()),
            None => Filtered::Invalid,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    fn raw(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_missing_required_recorded() {
        let specs = vec![ParameterSpec::new("who", ParamType::String).unwrap()];
        let outcome =
            ValidationPipeline::new().filter(&specs, &raw(&[]), &RequestContext::default());
        assert_eq!(outcome.missing(), ["who"]);
        assert!(outcome.invalid().is_empty());
        assert!(outcome.get("who").is_none());
    }

    #[test]
    fn test_absent_optional_uses_default_then_null() {
        let with_default = ParameterSpec::builder("limit", ParamType::Integer)
            .optional()
            .default_value(25i64)
            .build()
            .unwrap();
        let without_default = ParameterSpec::builder("offset", ParamType::Integer)
            .optional()
            .build()
            .unwrap();

        let outcome = ValidationPipeline::new().filter(
            &[with_default, without_default],
            &raw(&[]),
            &RequestContext::default(),
        );
        assert!(outcome.is_clean());
        assert_eq!(outcome.value("limit"), Some(&Value::Int(25)));
        assert_eq!(outcome.raw("limit"), Some(&Value::Int(25)));
        assert_eq!(outcome.value("offset"), Some(&Value::Null));
        assert_eq!(outcome.raw("offset"), Some(&Value::Null));
    }

    #[test]
    fn test_invalid_with_default_is_replaced_and_not_reported() {
        let spec = ParameterSpec::builder("page", ParamType::Integer)
            .min(1.0)
            .max(10.0)
            .default_value(1i64)
            .build()
            .unwrap();

        let outcome = ValidationPipeline::new().filter(
            &[spec],
            &raw(&[("page", "4488")]),
            &RequestContext::default(),
        );
        assert!(outcome.invalid().is_empty());
        assert_eq!(outcome.value("page"), Some(&Value::Int(1)));
        // Raw echo keeps what the request actually carried.
        assert_eq!(outcome.raw("page"), Some(&Value::String("4488".into())));
    }

    #[test]
    fn test_invalid_without_default_is_reported() {
        let spec = ParameterSpec::builder("age", ParamType::Integer)
            .min(50.0)
            .max(100.0)
            .build()
            .unwrap();

        let outcome = ValidationPipeline::new().filter(
            &[spec],
            &raw(&[("age", "4488")]),
            &RequestContext::default(),
        );
        assert_eq!(outcome.invalid(), ["age"]);
        assert!(outcome.get("age").unwrap().is_invalid());
    }

    #[test]
    fn test_missing_and_invalid_in_same_pass() {
        let specs = vec![
            ParameterSpec::new("needed", ParamType::String).unwrap(),
            ParameterSpec::new("flag", ParamType::Boolean).unwrap(),
        ];
        let outcome = ValidationPipeline::new().filter(
            &specs,
            &raw(&[("flag", "banana")]),
            &RequestContext::default(),
        );
        assert_eq!(outcome.missing(), ["needed"]);
        assert_eq!(outcome.invalid(), ["flag"]);
    }

    #[test]
    fn test_boolean_false_is_not_failure() {
        let spec = ParameterSpec::builder("active", ParamType::Boolean)
            .default_value(true)
            .build()
            .unwrap();

        let outcome = ValidationPipeline::new().filter(
            &[spec],
            &raw(&[("active", "off")]),
            &RequestContext::default(),
        );
        // The default must not clobber an explicit false.
        assert_eq!(outcome.value("active"), Some(&Value::Bool(false)));
        assert!(outcome.is_clean());
    }

    #[test]
    fn test_custom_filter_overrides_basic_result() {
        let spec = ParameterSpec::builder("tag", ParamType::String)
            .filter(|raw, basic, _spec| {
                // Basic result is available alongside the raw value.
                assert!(basic.value().is_some());
                raw.as_str().map(|s| Value::String(s.to_uppercase()))
            })
            .build()
            .unwrap();

        let outcome = ValidationPipeline::new().filter(
            &[spec],
            &raw(&[("tag", "abc")]),
            &RequestContext::default(),
        );
        assert_eq!(outcome.value("tag"), Some(&Value::String("ABC".into())));
    }

    #[test]
    fn test_custom_filter_none_is_invalid_except_boolean() {
        let rejecting = ParameterSpec::builder("s", ParamType::String)
            .filter(|_, _, _| None)
            .build()
            .unwrap();
        let boolean = ParameterSpec::builder("b", ParamType::Boolean)
            .filter(|_, _, _| None)
            .build()
            .unwrap();

        let outcome = ValidationPipeline::new().filter(
            &[rejecting, boolean],
            &raw(&[("s", "anything"), ("b", "anything")]),
            &RequestContext::default(),
        );
        assert_eq!(outcome.invalid(), ["s"]);
        assert_eq!(outcome.value("b"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_custom_filter_sees_not_applicable_when_basic_skipped() {
        let spec = ParameterSpec::builder("s", ParamType::String)
            .filter(|raw, basic, _| {
                assert!(matches!(basic, BasicFiltered::NotApplicable));
                raw.as_str().map(Value::from)
            })
            .build()
            .unwrap();

        let ctx = RequestContext::default().without_basic_filtering();
        let outcome =
            ValidationPipeline::new().filter(&[spec], &raw(&[("s", "<b>x</b>")]), &ctx);
        // No basic pass, so tags survive untouched.
        assert_eq!(outcome.value("s"), Some(&Value::String("<b>x</b>".into())));
    }

    #[test]
    fn test_method_scoped_spec_skipped() {
        let spec = ParameterSpec::builder("body_field", ParamType::String)
            .methods([Method::POST])
            .build()
            .unwrap();

        let outcome = ValidationPipeline::new().filter(
            &[spec],
            &raw(&[]),
            &RequestContext::new(Method::GET),
        );
        // Not applicable to GET: neither missing nor present.
        assert!(outcome.is_clean());
        assert!(outcome.get("body_field").is_none());
    }
}
