//! Route pattern parsing.
//!
//! # Responsibilities
//! - Split a pattern into fragment, query, scheme/authority, and segments
//! - Recognize `{name}` and `{name?}` placeholders
//! - Enforce the placeholder ordering invariant (optional only at the tail)
//!
//! # Design Decisions
//! - The query split ignores `?` inside placeholder braces, so `{y?}` in the
//!   path never truncates the pattern
//! - Query pairs are parsed eagerly; duplicate keys overwrite
//! - Violations are descriptive hard errors, never silent truncation

use std::collections::BTreeMap;

use thiserror::Error;

/// Errors raised while parsing a route pattern.
///
/// All of these are programmer mistakes in a registered route and fail
/// registration immediately.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// Pattern was empty or whitespace.
    #[error("route pattern must not be empty")]
    EmptyPattern,

    /// A `{}` or `{?}` placeholder has no name.
    #[error("placeholder at path segment {index} has an empty name")]
    EmptyPlaceholder { index: usize },

    /// A required placeholder appeared after an optional one.
    #[error(
        "required placeholder {{{name}}} appears after an optional placeholder; \
         optional placeholders must form the tail of the pattern"
    )]
    RequiredAfterOptional { name: String },

    /// Authority carried a port that is not a valid u16.
    #[error("invalid port {0:?} in route pattern")]
    InvalidPort(String),
}

/// One path segment of a parsed pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must match the actual path segment exactly.
    Literal(String),
    /// Matches any non-empty segment; records it under `name`.
    Placeholder { name: String, optional: bool },
}

impl Segment {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Segment::Placeholder { .. })
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Segment::Literal(s) => f.write_str(s),
            Segment::Placeholder { name, optional } => {
                if *optional {
                    write!(f, "{{{name}?}}")
                } else {
                    write!(f, "{{{name}}}")
                }
            }
        }
    }
}

/// Outcome of pattern parsing, consumed by `UriTemplate`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParsedPattern {
    pub scheme: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub segments: Vec<Segment>,
    pub query: BTreeMap<String, String>,
    pub fragment: Option<String>,
}

/// Parse a route pattern. Order: fragment, query, scheme/authority, path.
pub(crate) fn parse_pattern(pattern: &str) -> Result<ParsedPattern, TemplateError> {
    let trimmed = pattern.trim();
    if trimmed.is_empty() {
        return Err(TemplateError::EmptyPattern);
    }

    let (rest, fragment) = match trimmed.split_once('#') {
        Some((before, after)) => (before, Some(after.to_string())),
        None => (trimmed, None),
    };

    let (rest, query_raw) = split_query(rest);
    let query = query_raw.map(parse_query).unwrap_or_default();

    let (scheme, host, port, path_part) = split_authority(rest)?;

    let mut segments = Vec::new();
    for (index, raw) in path_part.split('/').filter(|s| !s.is_empty()).enumerate() {
        segments.push(parse_segment(raw, index)?);
    }

    enforce_placeholder_order(&segments)?;

    Ok(ParsedPattern {
        scheme,
        host,
        port,
        segments,
        query,
        fragment,
    })
}

/// Split at the first `?` that sits outside placeholder braces.
fn split_query(input: &str) -> (&str, Option<&str>) {
    let mut in_braces = false;
    for (i, c) in input.char_indices() {
        match c {
            '{' => in_braces = true,
            '}' => in_braces = false,
            '?' if !in_braces => return (&input[..i], Some(&input[i + 1..])),
            _ => {}
        }
    }
    (input, None)
}

fn parse_query(raw: &str) -> BTreeMap<String, String> {
    let mut query = BTreeMap::new();
    for pair in raw.split('&').filter(|p| !p.is_empty()) {
        match pair.split_once('=') {
            Some((k, v)) => query.insert(k.to_string(), v.to_string()),
            None => query.insert(pair.to_string(), String::new()),
        };
    }
    query
}

/// Extract scheme and `host[:port]`; the remainder is the path.
#[allow(clippy::type_complexity)]
fn split_authority(
    input: &str,
) -> Result<(Option<String>, Option<String>, Option<u16>, &str), TemplateError> {
    let Some((scheme, after)) = input.split_once("://") else {
        return Ok((None, None, None, input));
    };

    let (authority, path) = match after.find('/') {
        Some(i) => (&after[..i], &after[i..]),
        None => (after, ""),
    };

    let (host, port) = match authority.split_once(':') {
        Some((host, port_raw)) => {
            let port = port_raw
                .parse::<u16>()
                .map_err(|_| TemplateError::InvalidPort(port_raw.to_string()))?;
            (host, Some(port))
        }
        None => (authority, None),
    };

    Ok((
        Some(scheme.to_string()),
        Some(host.to_string()).filter(|h| !h.is_empty()),
        port,
        path,
    ))
}

fn parse_segment(raw: &str, index: usize) -> Result<Segment, TemplateError> {
    let Some(inner) = raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) else {
        return Ok(Segment::Literal(raw.to_string()));
    };
    let (name, optional) = match inner.strip_suffix('?') {
        Some(name) => (name, true),
        None => (inner, false),
    };
    if name.is_empty() {
        return Err(TemplateError::EmptyPlaceholder { index });
    }
    Ok(Segment::Placeholder {
        name: name.to_string(),
        optional,
    })
}

/// Once a placeholder is optional, every later placeholder must be too.
fn enforce_placeholder_order(segments: &[Segment]) -> Result<(), TemplateError> {
    let mut seen_optional = false;
    for segment in segments {
        if let Segment::Placeholder { name, optional } = segment {
            if seen_optional && !optional {
                return Err(TemplateError::RequiredAfterOptional { name: name.clone() });
            }
            seen_optional |= optional;
        }
    }
    Ok(())
}
