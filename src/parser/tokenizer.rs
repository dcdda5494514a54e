//! Field tokenizer for raw log lines.
//!
//! An event line looks like
//!
//! ```text
//! MessageRequest -> msgid:7 busid:0 fromcpu:1 tocpu:2 opname:"foo bar" time:5
//! ```
//!
//! Everything before the separator is the event kind tag, everything after is
//! a whitespace-delimited list of `key:value` tokens. Quoted values may contain
//! whitespace, so they are masked out before the split and restored afterwards.

use super::value::{coerce_value, parse_topology, FieldValue};
use crate::utils::config::{FIELD_SEPARATOR, STRING_PLACEHOLDER};
use log::debug;

/// One `key:value` pair from an event line
#[derive(Debug, Clone, PartialEq)]
pub struct RawField {
    pub key: String,
    pub value: FieldValue,
}

/// A tokenized event line: its kind tag and its fields in line order
#[derive(Debug, Clone, PartialEq)]
pub struct TokenizedLine {
    pub kind: String,
    pub fields: Vec<RawField>,
}

/// Tokenize one raw log line
///
/// **Public** - first stage of ingestion
///
/// # Returns
/// `None` if the line has no kind/content separator (not an event line)
///
/// Both `key:value` and the producer's native `key: value` spelling are
/// accepted. An unterminated quote is kept as a literal character.
pub fn tokenize_line(line: &str) -> Option<TokenizedLine> {
    let (kind, content) = line.split_once(FIELD_SEPARATOR)?;
    let kind = kind.trim();
    if kind.is_empty() {
        return None;
    }

    let (masked, embedded) = extract_quoted(content);
    let tokens = restore_quoted(split_tokens(&masked), embedded);

    Some(TokenizedLine {
        kind: kind.to_string(),
        fields: pair_fields(tokens),
    })
}

/// Replace every complete `"..."` span with the placeholder
///
/// **Private** - returns the masked content and the extracted spans in order
fn extract_quoted(content: &str) -> (String, Vec<String>) {
    let mut masked = String::with_capacity(content.len());
    let mut embedded = Vec::new();
    let mut rest = content;

    while let Some(open) = rest.find('"') {
        let Some(close_offset) = rest[open + 1..].find('"') else {
            debug!("Unterminated quote in line content, keeping it literally");
            break;
        };
        let close = open + 1 + close_offset;

        masked.push_str(&rest[..open]);
        masked.push(STRING_PLACEHOLDER);
        embedded.push(rest[open..=close].to_string());
        rest = &rest[close + 1..];
    }

    masked.push_str(rest);
    (masked, embedded)
}

fn split_tokens(masked: &str) -> Vec<String> {
    masked.split_whitespace().map(str::to_string).collect()
}

/// Substitute placeholders back, left to right, in extraction order
fn restore_quoted(tokens: Vec<String>, embedded: Vec<String>) -> Vec<String> {
    if embedded.is_empty() {
        return tokens;
    }

    let mut embedded = embedded.into_iter();
    tokens
        .into_iter()
        .map(|token| {
            if !token.contains(STRING_PLACEHOLDER) {
                return token;
            }
            let mut restored = String::with_capacity(token.len());
            for ch in token.chars() {
                match (ch == STRING_PLACEHOLDER).then(|| embedded.next()).flatten() {
                    Some(quoted) => restored.push_str(&quoted),
                    None => restored.push(ch),
                }
            }
            restored
        })
        .collect()
}

/// Group tokens into key/value fields
///
/// **Private** - a token ending in `:` takes the following token as its value
/// unless that token is itself a field
fn pair_fields(tokens: Vec<String>) -> Vec<RawField> {
    let mut fields = Vec::with_capacity(tokens.len());
    let mut tokens = tokens.into_iter().peekable();

    while let Some(token) = tokens.next() {
        let Some((key, inline)) = token.split_once(':') else {
            debug!("Skipping token without key: '{}'", token);
            continue;
        };
        if key.is_empty() {
            debug!("Skipping token with empty key: '{}'", token);
            continue;
        }

        let raw_value = if inline.is_empty() {
            tokens.next_if(|next| !looks_like_field(next)).unwrap_or_default()
        } else {
            inline.to_string()
        };

        let value = if key == "topo" {
            FieldValue::List(parse_topology(&raw_value))
        } else {
            coerce_value(&raw_value)
        };

        fields.push(RawField {
            key: key.to_string(),
            value,
        });
    }

    fields
}

/// `ident:...` where ident is alphanumeric or underscore
fn looks_like_field(token: &str) -> bool {
    match token.split_once(':') {
        Some((key, _)) => {
            !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    }
}
