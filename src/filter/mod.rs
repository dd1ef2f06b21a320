//! Parameter filtering subsystem.
//!
//! # Data Flow
//! ```text
//! Per request (flat input):
//!     raw key/value map + specs + RequestContext
//!     → pipeline.rs (absent/default handling)
//!     → coerce.rs (per-type basic coercion)
//!     → array.rs (bracketed array literals)
//!     → custom filter hook
//!     → FilterOutcome {filtered, raw echo, missing, invalid}
//!
//! Per request (tree input):
//!     document tree + specs + RequestContext
//!     → body.rs (depth-first name lookup, recursive cleaning)
//!     → BodyOutcome {tree of declared names only, missing, invalid}
//! ```
//!
//! # Design Decisions
//! - One outcome object per pass; nothing survives across requests
//! - Missing and invalid are separate lists, populated independently
//! - Coercion failure is data, never an error return
//! - Array parsing is all-or-nothing: one bad element invalidates the value

pub mod array;
pub mod body;
pub mod coerce;
pub mod outcome;
pub mod pipeline;

pub use array::{parse_array_literal, ArrayParseError};
pub use body::{BodyOutcome, StructuredBodyFilter};
pub use outcome::FilterOutcome;
pub use pipeline::ValidationPipeline;
