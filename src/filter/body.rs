//! Recursive filtering over tree-shaped request bodies.
//!
//! # Responsibilities
//! - Locate each declared parameter by depth-first name lookup anywhere in
//!   the input tree (first match wins)
//! - Apply the flat pipeline's coercion/custom-filter/default rules to each
//!   matched leaf
//! - Recursively clean nested lists/objects for array/document specs
//! - Emit a fresh tree containing declared names only
//!
//! # Design Decisions
//! - Undeclared keys are silently dropped: data minimization, not a bug
//! - Recursion is bounded by the filter's depth limit; anything past the
//!   bound is discarded
//! - Output order follows spec order, not input order

use std::collections::BTreeMap;

use crate::context::RequestContext;
use crate::filter::coerce::{coerce, strip_tags};
use crate::filter::pipeline::{apply_custom_filter, substitute_default};
use crate::params::{BasicFiltered, ParamType, ParameterSpec};
use crate::value::{Filtered, Value, DEFAULT_DEPTH_LIMIT};

/// Result of one structured-body pass: the minimized tree plus the same
/// missing/invalid bookkeeping the flat pipeline produces.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyOutcome {
    tree: Value,
    missing: Vec<String>,
    invalid: Vec<String>,
}

impl BodyOutcome {
    /// The filtered tree: an object keyed by declared parameter names.
    pub fn tree(&self) -> &Value {
        &self.tree
    }

    pub fn into_tree(self) -> Value {
        self.tree
    }

    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    pub fn invalid(&self) -> &[String] {
        &self.invalid
    }

    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty()
    }
}

/// Recursive variant of the validation pipeline for document bodies.
#[derive(Debug, Clone)]
pub struct StructuredBodyFilter {
    depth_limit: usize,
}

impl Default for StructuredBodyFilter {
    fn default() -> Self {
        Self {
            depth_limit: DEFAULT_DEPTH_LIMIT,
        }
    }
}

impl StructuredBodyFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound lookup and cleaning recursion to `depth_limit` container levels.
    pub fn with_depth_limit(depth_limit: usize) -> Self {
        Self { depth_limit }
    }

    /// Run one pass over a document tree.
    pub fn filter(
        &self,
        specs: &[ParameterSpec],
        tree: &Value,
        ctx: &RequestContext,
    ) -> BodyOutcome {
        let mut out = BTreeMap::new();
        let mut missing = Vec::new();
        let mut invalid = Vec::new();

        for spec in specs {
            if !spec.applies_to(&ctx.method) {
                continue;
            }

            let Some(found) = find_by_name(tree, spec.name(), 0, self.depth_limit) else {
                if spec.is_optional() {
                    let value = spec.default().cloned().unwrap_or(Value::Null);
                    out.insert(spec.name().to_string(), value);
                } else {
                    tracing::debug!(name = %spec.name(), "required body parameter missing");
                    missing.push(spec.name().to_string());
                }
                continue;
            };

            let filtered = self.filter_node(spec, found, ctx);
            let filtered = substitute_default(spec, filtered);
            match filtered {
                Filtered::Value(value) => {
                    out.insert(spec.name().to_string(), value);
                }
                Filtered::Invalid => {
                    tracing::debug!(name = %spec.name(), ty = %spec.param_type(),
                        "body parameter invalid after coercion");
                    invalid.push(spec.name().to_string());
                }
            }
        }

        BodyOutcome {
            tree: Value::Object(out),
            missing,
            invalid,
        }
    }

    fn filter_node(&self, spec: &ParameterSpec, node: &Value, ctx: &RequestContext) -> Filtered {
        let basic = if ctx.apply_basic_filtering {
            Some(self.basic_for_node(spec, node, ctx))
        } else {
            None
        };

        if let Some(custom) = spec.custom_filter() {
            let basic_arg = match &basic {
                Some(f) => BasicFiltered::Applied(f),
                None => BasicFiltered::NotApplicable,
            };
            return apply_custom_filter(spec, custom(node, basic_arg, spec));
        }

        match basic {
            Some(filtered) => filtered,
            None => Filtered::Value(node.clone()),
        }
    }

    /// Basic coercion for a tree node: containers matched to structured
    /// specs are cleaned recursively; everything else goes through the flat
    /// coercion on its string rendering.
    fn basic_for_node(&self, spec: &ParameterSpec, node: &Value, ctx: &RequestContext) -> Filtered {
        match (spec.param_type(), node) {
            (ParamType::Array, Value::Array(_)) | (ParamType::Document, Value::Object(_)) => {
                match self.clean_tree(node, 0, ctx) {
                    Some(cleaned) => Filtered::Value(cleaned),
                    None => Filtered::Invalid,
                }
            }
            _ => match node.to_flat_string() {
                Some(flat) => coerce(spec, &flat, self.depth_limit),
                None => Filtered::Invalid,
            },
        }
    }

    /// Rebuild a container with strings tag-stripped, preserving structure.
    /// Returns `None` once nesting exceeds the depth limit.
    fn clean_tree(&self, node: &Value, depth: usize, ctx: &RequestContext) -> Option<Value> {
        match node {
            Value::String(s) => Some(if ctx.apply_basic_filtering {
                Value::String(strip_tags(s))
            } else {
                Value::String(s.clone())
            }),
            Value::Array(items) => {
                if depth >= self.depth_limit {
                    return None;
                }
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.clean_tree(item, depth + 1, ctx)?);
                }
                Some(Value::Array(out))
            }
            Value::Object(map) => {
                if depth >= self.depth_limit {
                    return None;
                }
                let mut out = BTreeMap::new();
                for (key, value) in map {
                    out.insert(key.clone(), self.clean_tree(value, depth + 1, ctx)?);
                }
                Some(Value::Object(out))
            }
            scalar => Some(scalar.clone()),
        }
    }
}

/// Depth-first lookup of `name` anywhere in the tree; first match wins.
///
/// At each object the own keys are checked before descending, in key order;
/// list elements are visited in list order. Containers at `limit` or deeper
/// are not inspected, matching the bound `clean_tree` applies.
fn find_by_name<'a>(tree: &'a Value, name: &str, depth: usize, limit: usize) -> Option<&'a Value> {
    if depth >= limit {
        return None;
    }
    match tree {
        Value::Object(map) => {
            if let Some(found) = map.get(name) {
                return Some(found);
            }
            map.values()
                .find_map(|child| find_by_name(child, name, depth + 1, limit))
        }
        Value::Array(items) => items
            .iter()
            .find_map(|child| find_by_name(child, name, depth + 1, limit)),
        _ => None,
    }
}
