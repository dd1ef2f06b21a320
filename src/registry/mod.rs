//! Route registration and lookup.
//!
//! # Data Flow
//! ```text
//! At startup:
//!     pattern + method tokens + ParameterSpecs
//!     → template parse (fatal on malformed pattern)
//!     → duplicate-shape check against registered routes
//!     → RouteRegistry takes ownership; frozen before the first request
//!
//! Per request:
//!     path + method
//!     → first registered route whose template binds and allows the method
//!     → RouteMatch {bindings, specs} handed to the filtering stages
//! ```
//!
//! # Design Decisions
//! - Registration fails loudly; a duplicate shape for an overlapping method
//!   set is a programmer mistake, not a request-time condition
//! - First match wins, in registration order
//! - The registry is read-only after startup; no request mutates it

use http::Method;
use thiserror::Error;

use crate::params::{Descriptor, ParameterSpec, SpecError};
use crate::template::{Bindings, TemplateError, UriTemplate};

/// Errors raised while registering a route.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The route pattern failed to parse.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// A parameter spec was misconfigured.
    #[error(transparent)]
    Spec(#[from] SpecError),

    /// Two specs on one route share a name.
    #[error("route declares parameter {0:?} more than once")]
    DuplicateParameter(String),

    /// A route with the same shape and an overlapping method set exists.
    #[error("route {pattern:?} duplicates the shape of registered route {existing:?}")]
    DuplicateRoute { pattern: String, existing: String },
}

/// Opaque handle to a registered route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteId(usize);

/// A matched route: bindings from the path plus the specs to validate with.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub id: RouteId,
    pub template: &'a UriTemplate,
    pub bindings: Bindings,
    pub specs: &'a [ParameterSpec],
}

struct RouteEntry {
    template: UriTemplate,
    specs: Vec<ParameterSpec>,
}

/// Owns every registered route and its parameter specs.
#[derive(Default)]
pub struct RouteRegistry {
    routes: Vec<RouteEntry>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route. Fails on malformed patterns, duplicate parameter
    /// names within the route, and duplicate shapes with overlapping
    /// methods.
    pub fn register(
        &mut self,
        pattern: &str,
        methods: &[&str],
        specs: Vec<ParameterSpec>,
    ) -> Result<RouteId, RegistryError> {
        let mut template = UriTemplate::parse(pattern)?;
        template.allow_methods(methods);

        for (i, spec) in specs.iter().enumerate() {
            if specs[..i].iter().any(|s| s.name() == spec.name()) {
                return Err(RegistryError::DuplicateParameter(spec.name().to_string()));
            }
        }

        for entry in &self.routes {
            if entry.template.same_shape(&template)
                && methods_overlap(entry.template.methods(), template.methods())
            {
                return Err(RegistryError::DuplicateRoute {
                    pattern: pattern.to_string(),
                    existing: entry.template.pattern().to_string(),
                });
            }
        }

        let id = RouteId(self.routes.len());
        tracing::info!(pattern = %pattern, params = specs.len(), "route registered");
        self.routes.push(RouteEntry { template, specs });
        Ok(id)
    }

    /// Find the first registered route that binds the path and allows the
    /// method. `None` means no route matched; the caller decides the
    /// response.
    pub fn match_path(&self, path: &str, method: &Method) -> Option<RouteMatch<'_>> {
        for (index, entry) in self.routes.iter().enumerate() {
            if !entry.template.is_method_allowed(method) {
                continue;
            }
            if let Some(bindings) = entry.template.bind_path(path) {
                return Some(RouteMatch {
                    id: RouteId(index),
                    template: &entry.template,
                    bindings,
                    specs: &entry.specs,
                });
            }
        }
        None
    }

    /// Specs registered for a route.
    pub fn specs(&self, id: RouteId) -> Option<&[ParameterSpec]> {
        self.routes.get(id.0).map(|entry| entry.specs.as_slice())
    }

    /// Template registered for a route.
    pub fn template(&self, id: RouteId) -> Option<&UriTemplate> {
        self.routes.get(id.0).map(|entry| &entry.template)
    }

    /// Descriptors for a route's parameters, for the documentation
    /// generator.
    pub fn descriptors(&self, id: RouteId) -> Option<Vec<Descriptor>> {
        self.routes
            .get(id.0)
            .map(|entry| entry.specs.iter().map(ParameterSpec::descriptor).collect())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Effective method sets overlap; an empty set means "any" and overlaps
/// everything.
fn methods_overlap(a: &[Method], b: &[Method]) -> bool {
    if a.is_empty() || b.is_empty() {
        return true;
    }
    a.iter().any(|m| b.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamType;

    #[test]
    fn test_duplicate_shape_same_method_rejected() {
        let mut registry = RouteRegistry::new();
        registry.register("/users/{id}", &["GET"], vec![]).unwrap();

        let err = registry
            .register("/users/{key}", &["GET"], vec![])
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateRoute { .. }));
    }

    #[test]
    fn test_same_shape_disjoint_methods_allowed() {
        let mut registry = RouteRegistry::new();
        registry.register("/users/{id}", &["GET"], vec![]).unwrap();
        registry.register("/users/{id}", &["POST"], vec![]).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_permissive_methods_overlap_everything() {
        let mut registry = RouteRegistry::new();
        registry.register("/users/{id}", &[], vec![]).unwrap();

        let err = registry
            .register("/users/{id}", &["DELETE"], vec![])
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateRoute { .. }));
    }

    #[test]
    fn test_malformed_pattern_propagates() {
        let mut registry = RouteRegistry::new();
        let err = registry.register("/a/{}", &["GET"], vec![]).unwrap_err();
        assert!(matches!(err, RegistryError::Template(_)));
    }

    #[test]
    fn test_duplicate_parameter_name_rejected() {
        let mut registry = RouteRegistry::new();
        let specs = vec![
            ParameterSpec::new("q", ParamType::String).unwrap(),
            ParameterSpec::new("q", ParamType::Integer).unwrap(),
        ];
        let err = registry.register("/search", &["GET"], specs).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateParameter(name) if name == "q"));
    }

    #[test]
    fn test_match_respects_method_and_order() {
        let mut registry = RouteRegistry::new();
        let first = registry
            .register("/items/{id}", &["GET"], vec![])
            .unwrap();
        registry.register("/items/create", &["POST"], vec![]).unwrap();

        let matched = registry.match_path("/items/42", &Method::GET).unwrap();
        assert_eq!(matched.id, first);
        assert_eq!(matched.bindings.get("id").map(String::as_str), Some("42"));

        assert!(registry.match_path("/items/42", &Method::DELETE).is_none());
        assert!(registry.match_path("/nothing/42", &Method::GET).is_none());
    }

    #[test]
    fn test_descriptors_exposed() {
        let mut registry = RouteRegistry::new();
        let specs = vec![ParameterSpec::new("q", ParamType::String).unwrap()];
        let id = registry.register("/search", &["GET"], specs).unwrap();

        let descriptors = registry.descriptors(id).unwrap();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].name, "q");
        assert_eq!(descriptors[0].ty, "string");
    }
}
