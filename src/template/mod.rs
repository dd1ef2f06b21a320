//! URI template subsystem.
//!
//! # Data Flow
//! ```text
//! Route registration (at startup):
//!     pattern string ("https://h:80/{x}/ok/{y?}/?a=1#f")
//!     → parser.rs (fragment, query, scheme/authority, segments)
//!     → placeholder ordering check
//!     → Freeze as immutable UriTemplate
//!
//! Per request:
//!     actual path + method
//!     → template.rs (positional bind, method check)
//!     → Return: Bindings or explicit no-match
//! ```
//!
//! # Design Decisions
//! - Parsing happens once; request-time matching is a plain segment walk
//! - No regex anywhere in the match path
//! - No-match is `None`, never an error; malformed patterns fail loudly
//!   at parse time instead
//! - Shape equality is positional: any placeholder equals any placeholder

pub mod parser;
pub mod template;

pub use parser::{Segment, TemplateError};
pub use template::{Bindings, UriTemplate};
