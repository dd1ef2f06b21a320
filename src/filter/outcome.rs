//! Accumulated result of one validation pass.

use std::collections::BTreeMap;

use crate::value::{Filtered, Value};

/// Everything a validation pass produced for one request.
///
/// Created fresh per pass and handed back to the dispatch collaborator,
/// which decides the user-visible response. Never shared across requests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOutcome {
    filtered: BTreeMap<String, Filtered>,
    raw: BTreeMap<String, Value>,
    missing: Vec<String>,
    invalid: Vec<String>,
}

impl FilterOutcome {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, name: &str, filtered: Filtered, raw: Value) {
        self.filtered.insert(name.to_string(), filtered);
        self.raw.insert(name.to_string(), raw);
    }

    pub(crate) fn record_missing(&mut self, name: &str) {
        self.missing.push(name.to_string());
    }

    pub(crate) fn record_invalid(&mut self, name: &str) {
        self.invalid.push(name.to_string());
    }

    /// Filtered result for a parameter, if it was processed at all.
    pub fn get(&self, name: &str) -> Option<&Filtered> {
        self.filtered.get(name)
    }

    /// Successfully filtered value for a parameter.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.filtered.get(name).and_then(Filtered::value)
    }

    /// Unfiltered echo of what the input carried (or the substituted
    /// default / null for absent optionals).
    pub fn raw(&self, name: &str) -> Option<&Value> {
        self.raw.get(name)
    }

    /// All filtered entries, keyed by parameter name.
    pub fn filtered(&self) -> &BTreeMap<String, Filtered> {
        &self.filtered
    }

    /// The raw echo map.
    pub fn raw_values(&self) -> &BTreeMap<String, Value> {
        &self.raw
    }

    /// Required parameters the input did not carry, in spec order.
    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    /// Parameters still INVALID after coercion, custom filters, and default
    /// substitution, in spec order.
    pub fn invalid(&self) -> &[String] {
        &self.invalid
    }

    /// True when nothing is missing and nothing is invalid.
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_and_invalid_are_independent() {
        let mut outcome = FilterOutcome::new();
        outcome.record_missing("a");
        outcome.record_invalid("b");
        outcome.record("b", Filtered::Invalid, Value::String("raw".into()));

        assert_eq!(outcome.missing(), ["a"]);
        assert_eq!(outcome.invalid(), ["b"]);
        assert!(!outcome.is_clean());
        assert!(outcome.get("b").unwrap().is_invalid());
        assert_eq!(outcome.value("b"), None);
        assert_eq!(outcome.raw("b"), Some(&Value::String("raw".into())));
    }

    #[test]
    fn test_clean_outcome() {
        let mut outcome = FilterOutcome::new();
        outcome.record("x", Filtered::Value(Value::Int(1)), Value::String("1".into()));
        assert!(outcome.is_clean());
        assert_eq!(outcome.value("x"), Some(&Value::Int(1)));
    }
}
