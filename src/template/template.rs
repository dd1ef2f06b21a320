//! Parsed route template and request-time matching.
//!
//! # Responsibilities
//! - Hold the frozen result of pattern parsing
//! - Bind concrete request paths to placeholder names
//! - Track the allowed-method set (permissive when empty)
//! - Decide shape equality for registration-time de-duplication
//!
//! # Design Decisions
//! - Matching is a positional segment walk; no allocation on the miss path
//! - Unknown method tokens are skipped during registration, not errors
//! - Equality ignores placeholder names: `/{a}/x` and `/{b}/x` collide

use std::collections::BTreeMap;

use http::Method;

use crate::template::parser::{parse_pattern, Segment, TemplateError};

/// The canonical method vocabulary; tokens outside it are never registered.
const CANONICAL_METHODS: [Method; 9] = [
    Method::GET,
    Method::HEAD,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::TRACE,
    Method::OPTIONS,
    Method::PATCH,
    Method::CONNECT,
];

/// Placeholder name → bound path segment.
pub type Bindings = BTreeMap<String, String>;

/// A parsed route pattern, immutable after registration.
#[derive(Debug, Clone)]
pub struct UriTemplate {
    pattern: String,
    scheme: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    segments: Vec<Segment>,
    query: BTreeMap<String, String>,
    fragment: Option<String>,
    methods: Vec<Method>,
}

impl UriTemplate {
    /// Parse a route pattern. Fails fast on malformed patterns; see
    /// [`TemplateError`] for the cases.
    pub fn parse(pattern: &str) -> Result<Self, TemplateError> {
        let parsed = parse_pattern(pattern)?;
        Ok(Self {
            pattern: pattern.to_string(),
            scheme: parsed.scheme,
            host: parsed.host,
            port: parsed.port,
            segments: parsed.segments,
            query: parsed.query,
            fragment: parsed.fragment,
            methods: Vec::new(),
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Path segments rendered back to pattern form, e.g. `["{x}", "ok", "{y?}"]`.
    pub fn path_shape(&self) -> Vec<String> {
        self.segments.iter().map(ToString::to_string).collect()
    }

    pub fn query(&self) -> &BTreeMap<String, String> {
        &self.query
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Methods this template answers to; empty means any.
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// Register allowed methods from raw tokens.
    ///
    /// Tokens are trimmed and upper-cased, then checked against the canonical
    /// set; unknown tokens are skipped without error.
    pub fn allow_methods<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for token in tokens {
            let normalized = token.as_ref().trim().to_ascii_uppercase();
            match CANONICAL_METHODS.iter().find(|m| m.as_str() == normalized) {
                Some(method) => {
                    if !self.methods.contains(method) {
                        self.methods.push(method.clone());
                    }
                }
                None => {
                    tracing::debug!(token = %token.as_ref(), pattern = %self.pattern,
                        "skipping unknown method token");
                }
            }
        }
    }

    /// Whether this template accepts the method. Permissive when no methods
    /// were ever registered.
    pub fn is_method_allowed(&self, method: &Method) -> bool {
        self.methods.is_empty() || self.methods.contains(method)
    }

    /// Walk an actual request path against the template segments.
    ///
    /// Literals must match exactly; placeholders record any non-empty
    /// segment; trailing optional placeholders may be absent. Returns `None`
    /// on a miss; a miss is not an error.
    pub fn bind_path(&self, actual: &str) -> Option<Bindings> {
        let actual: Vec<&str> = actual.split('/').filter(|s| !s.is_empty()).collect();
        if actual.len() > self.segments.len() {
            return None;
        }

        let mut bindings = Bindings::new();
        for (i, segment) in self.segments.iter().enumerate() {
            match (segment, actual.get(i)) {
                (Segment::Literal(lit), Some(part)) => {
                    if lit != part {
                        return None;
                    }
                }
                (Segment::Placeholder { name, .. }, Some(part)) => {
                    // Repeated placeholder names alias one binding.
                    bindings.insert(name.clone(), (*part).to_string());
                }
                (Segment::Placeholder { optional: true, .. }, None) => {}
                (_, None) => return None,
            }
        }
        Some(bindings)
    }

    /// Positional shape equality: same authority, same segment count, and
    /// segment-by-segment equality where any placeholder matches any
    /// placeholder while literals must be identical.
    pub fn same_shape(&self, other: &Self) -> bool {
        if self.host != other.host || self.port != other.port {
            return false;
        }
        if self.segments.len() != other.segments.len() {
            return false;
        }
        self.segments
            .iter()
            .zip(other.segments.iter())
            .all(|(a, b)| match (a, b) {
                (Segment::Literal(x), Segment::Literal(y)) => x == y,
                (Segment::Placeholder { .. }, Segment::Placeholder { .. }) => true,
                _ => false,
            })
    }
}

impl PartialEq for UriTemplate {
    fn eq(&self, other: &Self) -> bool {
        self.same_shape(other)
    }
}
