//! Request-surface validation core for parameter-validated HTTP-style
//! services.
//!
//! The crate has two load-bearing parts: a URI-template parser/matcher that
//! turns route patterns into literal/placeholder segments with ordering
//! rules, and a parameter filtering pipeline that type-coerces,
//! bounds-checks, and sanitizes raw input, including a hand-rolled parser
//! for array-literal strings and a recursive sanitizer for nested document
//! bodies. Transport, dispatch, and response shaping stay with the caller:
//! this crate performs no I/O of its own.

pub mod context;
pub mod filter;
pub mod params;
pub mod registry;
pub mod template;
pub mod value;

pub use context::RequestContext;
pub use filter::{
    parse_array_literal, ArrayParseError, BodyOutcome, FilterOutcome, StructuredBodyFilter,
    ValidationPipeline,
};
pub use params::{
    BasicFiltered, CustomFilter, Descriptor, ParamType, ParameterSpec, SpecBuilder, SpecError,
};
pub use registry::{RegistryError, RouteId, RouteMatch, RouteRegistry};
pub use template::{Bindings, Segment, TemplateError, UriTemplate};
pub use value::{Filtered, Value};
