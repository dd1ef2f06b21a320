//! Per-type basic coercion.
//!
//! # Responsibilities
//! - Sanitize raw strings per declared type (tag stripping, numeric and
//!   email/URL character sets)
//! - Convert to typed values and apply declared bounds
//! - Map lexical boolean tokens without conflating `false` with failure
//!
//! # Design Decisions
//! - Sanitizers are character scans, not regexes
//! - Empty email/URL after sanitization is always INVALID; empty is never
//!   a valid address
//! - Out-of-range and unparseable both coerce to INVALID, letting default
//!   substitution decide what happens next

use crate::filter::array::parse_array_literal;
use crate::params::{ParamType, ParameterSpec};
use crate::value::{Filtered, Value};

/// Apply the built-in coercion for `spec` to one raw string.
///
/// `depth_limit` bounds document parsing for `ParamType::Document` inputs.
pub(crate) fn coerce(spec: &ParameterSpec, raw: &str, depth_limit: usize) -> Filtered {
    match spec.param_type() {
        ParamType::String => coerce_string(spec, raw),
        ParamType::Integer => coerce_integer(spec, raw),
        ParamType::Double => coerce_double(spec, raw),
        ParamType::Boolean => match parse_boolean(raw) {
            Some(b) => Filtered::Value(Value::Bool(b)),
            None => Filtered::Invalid,
        },
        ParamType::Email => coerce_email(spec, raw),
        ParamType::Url => coerce_url(spec, raw),
        ParamType::Array => match parse_array_literal(raw) {
            Ok(items) => Filtered::Value(Value::Array(items)),
            Err(error) => {
                tracing::debug!(name = %spec.name(), %error, "array literal rejected");
                Filtered::Invalid
            }
        },
        ParamType::Document => coerce_document(spec, raw, depth_limit),
    }
}

fn coerce_string(spec: &ParameterSpec, raw: &str) -> Filtered {
    let stripped = strip_tags(raw);
    if stripped.is_empty() && !spec.allows_empty() {
        return Filtered::Invalid;
    }
    if !length_in_bounds(spec, &stripped) {
        return Filtered::Invalid;
    }
    Filtered::Value(Value::String(stripped))
}

fn coerce_integer(spec: &ParameterSpec, raw: &str) -> Filtered {
    let sanitized = sanitize_numeric(raw, false);
    let Ok(value) = sanitized.parse::<i64>() else {
        return Filtered::Invalid;
    };
    if !range_in_bounds(spec, value as f64) {
        return Filtered::Invalid;
    }
    Filtered::Value(Value::Int(value))
}

fn coerce_double(spec: &ParameterSpec, raw: &str) -> Filtered {
    let sanitized = sanitize_numeric(raw, true);
    let Ok(value) = sanitized.parse::<f64>() else {
        return Filtered::Invalid;
    };
    if !range_in_bounds(spec, value) {
        return Filtered::Invalid;
    }
    Filtered::Value(Value::Float(value))
}

fn coerce_email(spec: &ParameterSpec, raw: &str) -> Filtered {
    let sanitized = sanitize_email(raw);
    if sanitized.is_empty() || !is_valid_email(&sanitized) || !length_in_bounds(spec, &sanitized) {
        return Filtered::Invalid;
    }
    Filtered::Value(Value::String(sanitized))
}

fn coerce_url(spec: &ParameterSpec, raw: &str) -> Filtered {
    let sanitized = sanitize_url(raw);
    if sanitized.is_empty() || !length_in_bounds(spec, &sanitized) {
        return Filtered::Invalid;
    }
    if url::Url::parse(&sanitized).is_err() {
        return Filtered::Invalid;
    }
    Filtered::Value(Value::String(sanitized))
}

fn coerce_document(spec: &ParameterSpec, raw: &str, depth_limit: usize) -> Filtered {
    let Ok(json) = serde_json::from_str::<serde_json::Value>(raw) else {
        return Filtered::Invalid;
    };
    match Value::from_json(json, depth_limit) {
        Ok(value @ Value::Object(_)) => Filtered::Value(value),
        Ok(_) => Filtered::Invalid,
        Err(error) => {
            tracing::debug!(name = %spec.name(), %error, "document rejected");
            Filtered::Invalid
        }
    }
}

fn range_in_bounds(spec: &ParameterSpec, value: f64) -> bool {
    if spec.min().is_some_and(|min| value < min) {
        return false;
    }
    if spec.max().is_some_and(|max| value > max) {
        return false;
    }
    true
}

fn length_in_bounds(spec: &ParameterSpec, value: &str) -> bool {
    let len = value.chars().count();
    if spec.min_length().is_some_and(|min| len < min) {
        return false;
    }
    if spec.max_length().is_some_and(|max| len > max) {
        return false;
    }
    true
}

/// Remove markup: everything from `<` through the matching `>` is dropped.
/// An unclosed tag drops the remainder of the input.
pub(crate) fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;
    for c in input.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Keep digits, at most one leading `-`, and (for doubles) at most one `.`.
pub(crate) fn sanitize_numeric(input: &str, allow_fraction: bool) -> String {
    let mut out = String::with_capacity(input.len());
    let mut seen_dot = false;
    for c in input.chars() {
        match c {
            '0'..='9' => out.push(c),
            '-' if out.is_empty() => out.push(c),
            '.' if allow_fraction && !seen_dot => {
                seen_dot = true;
                out.push(c);
            }
            _ => {}
        }
    }
    out
}

/// Drop characters outside the email-safe set.
pub(crate) fn sanitize_email(input: &str) -> String {
    input
        .chars()
        .filter(|c| {
            c.is_ascii_alphanumeric() || "!#$%&'*+-=?^_`{|}~@.[]".contains(*c)
        })
        .collect()
}

/// Minimal structural check: one `@`, non-empty local part, dotted domain.
pub(crate) fn is_valid_email(input: &str) -> bool {
    let Some((local, domain)) = input.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    if !domain.contains('.') {
        return false;
    }
    !domain.starts_with('.') && !domain.ends_with('.') && !domain.starts_with('-')
}

/// Drop whitespace, control characters, and non-ASCII from a URL candidate.
pub(crate) fn sanitize_url(input: &str) -> String {
    input.chars().filter(char::is_ascii_graphic).collect()
}

/// Lexical boolean table, case-insensitive.
///
/// A `false` result is a legitimate value; only `None` means the token was
/// not a boolean at all.
pub(crate) fn parse_boolean(token: &str) -> Option<bool> {
    match token.trim().to_ascii_lowercase().as_str() {
        "t" | "yes" | "1" | "true" | "on" | "y" | "ok" => Some(true),
        "f" | "no" | "0" | "false" | "off" | "n" | "-1" => Some(false),
        _ => None,
    }
}
