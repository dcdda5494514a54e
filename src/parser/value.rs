//! Typed field values and raw token coercion.
//!
//! Every `key:value` token on an event line carries its value as raw text.
//! This module turns that text into a number, boolean or string, and parses
//! the brace-delimited topology lists found on bus declarations.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single typed value from an event line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    /// Processor ids from a `topo:{1,2,3}` field
    List(Vec<i64>),
}

impl FieldValue {
    /// Integer view of the value, if it is one
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Text view of a scalar value
    ///
    /// Numbers and booleans are rendered, so `name:5` still yields a name.
    /// Lists have no text form.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Integer(i) => Some(i.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::List(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(s) => write!(f, "\"{}\"", s),
            Self::List(ids) => {
                let joined: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
                write!(f, "{{{}}}", joined.join(","))
            }
        }
    }
}

/// Coerce a raw token value into a typed value
///
/// **Public** - used by the tokenizer for every field
///
/// Order of checks:
/// 1. Numeric (zero included; `"0"` is the number 0)
/// 2. `true` / `false`, case-insensitive
/// 3. `""` becomes the empty string
/// 4. Anything else is a string with its surrounding quotes removed
///
/// An empty, unquoted value is the empty string, not zero.
pub fn coerce_value(raw: &str) -> FieldValue {
    if let Some(number) = parse_number(raw) {
        return number;
    }

    if raw.eq_ignore_ascii_case("true") {
        return FieldValue::Bool(true);
    }

    if raw.eq_ignore_ascii_case("false") {
        return FieldValue::Bool(false);
    }

    if raw == "\"\"" {
        return FieldValue::Text(String::new());
    }

    FieldValue::Text(unquote(raw).to_string())
}

/// Parse a topology list like `{1,2,3}` into processor ids
///
/// **Public** - the `topo` field bypasses scalar coercion
pub fn parse_topology(raw: &str) -> Vec<i64> {
    raw.trim_start_matches('{')
        .trim_end_matches('}')
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| match token.parse::<i64>() {
            Ok(id) => Some(id),
            Err(_) => {
                debug!("Ignoring non-numeric topology entry '{}'", token);
                None
            }
        })
        .collect()
}

/// Parse a numeric token
///
/// **Private** - integers first so ids and timestamps stay exact
fn parse_number(raw: &str) -> Option<FieldValue> {
    if raw.is_empty() {
        return None;
    }

    if let Ok(int) = raw.parse::<i64>() {
        return Some(FieldValue::Integer(int));
    }

    match raw.parse::<f64>() {
        Ok(float) if float.is_finite() => Some(FieldValue::Float(float)),
        _ => None,
    }
}

/// Remove one leading and one trailing double quote, when present
fn unquote(raw: &str) -> &str {
    let trimmed = raw.strip_prefix('"').unwrap_or(raw);
    trimmed.strip_suffix('"').unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_a_number() {
        assert_eq!(coerce_value("0"), FieldValue::Integer(0));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(coerce_value("42"), FieldValue::Integer(42));
        assert_eq!(coerce_value("-3"), FieldValue::Integer(-3));
        assert_eq!(coerce_value("2.5"), FieldValue::Float(2.5));
    }

    #[test]
    fn test_non_finite_is_text() {
        assert_eq!(coerce_value("NaN"), FieldValue::Text("NaN".to_string()));
        assert_eq!(coerce_value("inf"), FieldValue::Text("inf".to_string()));
    }

    #[test]
    fn test_booleans_case_insensitive() {
        assert_eq!(coerce_value("true"), FieldValue::Bool(true));
        assert_eq!(coerce_value("FALSE"), FieldValue::Bool(false));
        assert_eq!(coerce_value("True"), FieldValue::Bool(true));
    }

    #[test]
    fn test_quoted_values_stay_strings() {
        assert_eq!(coerce_value("\"\""), FieldValue::Text(String::new()));
        assert_eq!(coerce_value("\"5\""), FieldValue::Text("5".to_string()));
        assert_eq!(coerce_value("\"true\""), FieldValue::Text("true".to_string()));
        assert_eq!(coerce_value("\"foo bar\""), FieldValue::Text("foo bar".to_string()));
    }

    #[test]
    fn test_empty_unquoted_value() {
        assert_eq!(coerce_value(""), FieldValue::Text(String::new()));
    }

    #[test]
    fn test_orphaned_quote_is_stripped() {
        assert_eq!(coerce_value("\"abc"), FieldValue::Text("abc".to_string()));
    }

    #[test]
    fn test_parse_topology() {
        assert_eq!(parse_topology("{1,2,3}"), vec![1, 2, 3]);
        assert_eq!(parse_topology("{}"), Vec::<i64>::new());
        assert_eq!(parse_topology("{4, x ,5}"), vec![4, 5]);
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldValue::List(vec![2, 5]).to_string(), "{2,5}");
        assert_eq!(FieldValue::Text("a".to_string()).to_string(), "\"a\"");
    }
}
