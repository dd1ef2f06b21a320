//! Hand-rolled parser for bracketed array literals.
//!
//! # Responsibilities
//! - Turn `[v1, v2, ...]` strings into lists of scalar values
//! - Honor quoted strings (both quote characters) with backslash escapes
//! - Classify bare tokens as booleans, null, or numeric literals
//!
//! # Design Decisions
//! - All-or-nothing: one malformed element fails the whole parse, so the
//!   pipeline reports the parameter INVALID rather than partially parsed
//! - Character scan with an explicit string sub-scan; no regex
//! - After a closing quote only `,` or `]` may follow (whitespace aside)

use thiserror::Error;

use crate::value::Value;

/// Why an array literal failed to parse.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArrayParseError {
    /// Input does not start with `[`.
    #[error("array literal must start with '['")]
    MissingOpenBracket,

    /// Input does not end with `]`.
    #[error("array literal is unbalanced; expected closing ']'")]
    Unbalanced,

    /// A quoted string never closed.
    #[error("unterminated string starting at byte {0}")]
    UnterminatedString(usize),

    /// Something other than `,` or `]` followed a closing quote.
    #[error("unexpected {found:?} after string element at byte {at}")]
    AfterString { found: char, at: usize },

    /// A bare token is not true/false/null or a numeric literal.
    #[error("unrecognized token {0:?}")]
    BadToken(String),
}

/// Parse a flat-string array literal into scalar values.
pub fn parse_array_literal(input: &str) -> Result<Vec<Value>, ArrayParseError> {
    let trimmed = input.trim();
    if !trimmed.starts_with('[') {
        return Err(ArrayParseError::MissingOpenBracket);
    }
    if trimmed.len() < 2 || !trimmed.ends_with(']') {
        return Err(ArrayParseError::Unbalanced);
    }

    let inner = &trimmed[1..trimmed.len() - 1];
    let mut items = Vec::new();
    let mut chars = inner.char_indices().peekable();
    // Set after a quoted element closes; a trailing comma then demands
    // another element.
    let mut expect_element = false;

    loop {
        skip_spaces(&mut chars);
        let Some(&(start, c)) = chars.peek() else {
            if expect_element {
                return Err(ArrayParseError::BadToken(String::new()));
            }
            return Ok(items);
        };

        if c == '"' || c == '\'' {
            chars.next();
            let text = scan_string(&mut chars, c, start)?;
            items.push(Value::String(text));

            skip_spaces(&mut chars);
            match chars.next() {
                None => return Ok(items),
                Some((_, ',')) => expect_element = true,
                Some((at, found)) => return Err(ArrayParseError::AfterString { found, at }),
            }
        } else {
            let token = scan_bare_token(&mut chars);
            let had_comma = matches!(chars.peek(), Some((_, ',')));
            if had_comma {
                chars.next();
            }
            let token = token.trim();
            if token.is_empty() {
                return Err(ArrayParseError::BadToken(String::new()));
            }
            items.push(classify_bare_token(token)?);
            if !had_comma {
                // Bare scan stops only at a comma or the end of input.
                return Ok(items);
            }
            expect_element = true;
        }
    }
}

fn skip_spaces(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>) {
    while matches!(chars.peek(), Some((_, c)) if c.is_whitespace()) {
        chars.next();
    }
}

/// Consume until the matching quote, honoring backslash escapes.
fn scan_string(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    quote: char,
    start: usize,
) -> Result<String, ArrayParseError> {
    let mut out = String::new();
    while let Some((_, c)) = chars.next() {
        if c == quote {
            return Ok(out);
        }
        if c == '\\' {
            match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 't')) => out.push('\t'),
                Some((_, 'r')) => out.push('\r'),
                Some((_, escaped)) => out.push(escaped),
                None => return Err(ArrayParseError::UnterminatedString(start)),
            }
        } else {
            out.push(c);
        }
    }
    Err(ArrayParseError::UnterminatedString(start))
}

/// Accumulate an unquoted token up to (not including) the next comma.
fn scan_bare_token(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>) -> String {
    let mut token = String::new();
    while let Some(&(_, c)) = chars.peek() {
        if c == ',' {
            break;
        }
        token.push(c);
        chars.next();
    }
    token
}

/// Bare tokens are true/false/null (case-insensitive) or numeric literals.
fn classify_bare_token(token: &str) -> Result<Value, ArrayParseError> {
    match token.to_ascii_lowercase().as_str() {
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        "null" => return Ok(Value::Null),
        _ => {}
    }

    if !is_numeric_literal(token) {
        return Err(ArrayParseError::BadToken(token.to_string()));
    }
    if token.contains('.') {
        token
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| ArrayParseError::BadToken(token.to_string()))
    } else {
        token
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| ArrayParseError::BadToken(token.to_string()))
    }
}

/// One optional leading `-`, at most one `.`, at least one digit.
fn is_numeric_literal(token: &str) -> bool {
    let body = token.strip_prefix('-').unwrap_or(token);
    if body.is_empty() {
        return false;
    }
    let mut seen_dot = false;
    let mut seen_digit = false;
    for c in body.chars() {
        match c {
            '.' if !seen_dot => seen_dot = true,
            '.' => return false,
            d if d.is_ascii_digit() => seen_digit = true,
            _ => return false,
        }
    }
    seen_digit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_scalars() {
        let parsed = parse_array_literal("[false, \"Hello\", null, \"World\"]").unwrap();
        assert_eq!(
            parsed,
            vec![
                Value::Bool(false),
                Value::String("Hello".into()),
                Value::Null,
                Value::String("World".into()),
            ]
        );
    }

    #[test]
    fn test_numeric_literals() {
        let parsed = parse_array_literal("[1, -2, 3.5, -0.25]").unwrap();
        assert_eq!(
            parsed,
            vec![
                Value::Int(1),
                Value::Int(-2),
                Value::Float(3.5),
                Value::Float(-0.25),
            ]
        );
    }

    #[test]
    fn test_unbalanced_fails() {
        assert_eq!(
            parse_array_literal("[1,2,"),
            Err(ArrayParseError::Unbalanced)
        );
        assert_eq!(
            parse_array_literal("1,2]"),
            Err(ArrayParseError::MissingOpenBracket)
        );
    }

    #[test]
    fn test_empty_array() {
        assert_eq!(parse_array_literal("[]").unwrap(), vec![]);
        assert_eq!(parse_array_literal("  [ ]  ").unwrap(), vec![]);
    }

    #[test]
    fn test_quoted_escapes_and_both_quote_chars() {
        let parsed = parse_array_literal(r#"["a\"b", 'c\'d', "tab\there"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                Value::String("a\"b".into()),
                Value::String("c'd".into()),
                Value::String("tab\there".into()),
            ]
        );
    }

    #[test]
    fn test_garbage_after_string_fails() {
        assert!(matches!(
            parse_array_literal(r#"["a" x, 1]"#),
            Err(ArrayParseError::AfterString { .. })
        ));
    }

    #[test]
    fn test_bad_bare_token_fails_whole_parse() {
        assert!(matches!(
            parse_array_literal("[1, banana, 3]"),
            Err(ArrayParseError::BadToken(_))
        ));
        assert!(matches!(
            parse_array_literal("[1.2.3]"),
            Err(ArrayParseError::BadToken(_))
        ));
        assert!(matches!(
            parse_array_literal("[--5]"),
            Err(ArrayParseError::BadToken(_))
        ));
    }

    #[test]
    fn test_unterminated_string() {
        assert!(matches!(
            parse_array_literal(r#"["open, 1]"#),
            Err(ArrayParseError::UnterminatedString(_))
        ));
    }

    #[test]
    fn test_trailing_comma_fails() {
        assert!(matches!(
            parse_array_literal("[1, 2,]"),
            Err(ArrayParseError::BadToken(_))
        ));
    }

    #[test]
    fn test_case_insensitive_keywords() {
        let parsed = parse_array_literal("[TRUE, False, NULL]").unwrap();
        assert_eq!(parsed, vec![Value::Bool(true), Value::Bool(false), Value::Null]);
    }
}
