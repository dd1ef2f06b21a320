//! Request-scoped validation context.
//!
//! # Responsibilities
//! - Carry the per-request facts the filtering stages need (HTTP method,
//!   whether basic coercion applies)
//! - Belong to exactly one in-flight request; never shared, never global
//!
//! # Design Decisions
//! - Plain value type built by the dispatch collaborator for each request
//! - Replaces any notion of process-wide request state; a pipeline call is a
//!   pure function of (specs, raw input, context)

use http::Method;

/// Per-request inputs to a validation pass.
///
/// The dispatch layer constructs one of these for every incoming request and
/// hands it to [`crate::filter::ValidationPipeline`] or
/// [`crate::filter::StructuredBodyFilter`] alongside the raw input.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Method of the incoming request; specs that do not apply to it are
    /// skipped entirely.
    pub method: Method,

    /// When false, per-type basic coercion is skipped and custom filters
    /// receive a "not applicable" basic result.
    pub apply_basic_filtering: bool,
}

impl RequestContext {
    /// Context for a request with the given method, basic filtering enabled.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            apply_basic_filtering: true,
        }
    }

    /// Disable per-type basic coercion for this pass.
    pub fn without_basic_filtering(mut self) -> Self {
        self.apply_basic_filtering = false;
        self
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new(Method::GET)
    }
}
