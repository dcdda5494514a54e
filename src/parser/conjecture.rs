//! Validation conjecture annotations.
//!
//! Conjectures are computed outside the engine and stored next to the log as
//! newline-delimited JSON. Each line is parsed on its own; a bad line is a
//! warning, never a failure.

use crate::utils::error::AnnotationError;
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};

/// Call site referenced by a conjecture
///
/// All fields are strings; the empty target is the placeholder for an absent one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConjectureTarget {
    #[serde(default, deserialize_with = "lenient_string")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub opname: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub time: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub thid: String,
}

impl ConjectureTarget {
    pub fn is_placeholder(&self) -> bool {
        *self == Self::default()
    }
}

/// A correctness-violation annotation with total shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConjecture {
    pub status: bool,
    pub name: String,
    pub expression: String,
    pub source: ConjectureTarget,
    pub destination: ConjectureTarget,
}

/// Line shape before normalization: targets may be missing or null
#[derive(Debug, Deserialize)]
struct RawConjecture {
    status: bool,
    name: String,
    expression: String,
    #[serde(default)]
    source: Option<ConjectureTarget>,
    #[serde(default)]
    destination: Option<ConjectureTarget>,
}

impl From<RawConjecture> for ValidationConjecture {
    fn from(raw: RawConjecture) -> Self {
        Self {
            status: raw.status,
            name: raw.name,
            expression: raw.expression,
            source: raw.source.unwrap_or_default(),
            destination: raw.destination.unwrap_or_default(),
        }
    }
}

/// Parse one annotation line
pub fn parse_conjecture(line: &str) -> Result<ValidationConjecture, serde_json::Error> {
    serde_json::from_str::<RawConjecture>(line).map(ValidationConjecture::from)
}

/// Parse newline-delimited conjectures
///
/// **Public** - the violation merger input
///
/// # Returns
/// The parsed conjectures in file order and one error per malformed line.
/// Blank lines are ignored.
pub fn parse_conjectures(content: &str) -> (Vec<ValidationConjecture>, Vec<AnnotationError>) {
    let mut conjectures = Vec::new();
    let mut errors = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_conjecture(line) {
            Ok(conjecture) => conjectures.push(conjecture),
            Err(source) => {
                let error = AnnotationError {
                    line: index + 1,
                    source,
                };
                warn!("{}", error);
                errors.push(error);
            }
        }
    }

    (conjectures, errors)
}

/// Accept strings, numbers, booleans and null as a string field
///
/// **Private** - producers write `time` and `thid` as either numbers or strings
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!(
            "Expected string or number, found {}",
            other
        ))),
    }
}
