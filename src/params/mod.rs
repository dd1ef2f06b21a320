//! Parameter specification subsystem.
//!
//! # Data Flow
//! ```text
//! Route registration (at startup):
//!     SpecBuilder / validating setters
//!     → ParameterSpec (name, type, bounds, default, custom filter)
//!     → owned by the registering route, immutable during requests
//!
//! Per request:
//!     ParameterSpec consulted by the filtering stages
//!     → descriptor() feeds the external documentation generator
//! ```
//!
//! # Design Decisions
//! - Specs are built once, before any request-time validation
//! - Setters validate eagerly; a misconfigured spec never exists
//! - Custom filters have a fixed signature, not an arbitrary callable
//! - Reserved names are rejected at construction, loudly

pub mod spec;
pub mod types;

pub use spec::{BasicFiltered, CustomFilter, Descriptor, ParameterSpec, SpecBuilder};
pub use types::{ParamType, SpecError, RESERVED_NAMES};
