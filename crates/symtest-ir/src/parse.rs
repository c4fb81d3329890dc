//! Decoding of the driver script's line-delimited JSON log.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::record::{ExecutionRecord, Outcome, TestCase};
use crate::value::{ConcreteValue, SymbolicValue};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("log line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: Box<ParseError>,
    },

    #[error("record carries both a result and an error")]
    AmbiguousOutcome,

    #[error("record error must be a string, got: {found}")]
    InvalidError { found: String },
}

/// A log line as written by the driver script, before outcome validation.
#[derive(Debug, Deserialize)]
struct RawRecord {
    input: Vec<SymbolicValue>,
    #[serde(default, deserialize_with = "present")]
    result: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    error: Option<Value>,
}

/// Distinguishes an explicit `null` from an absent key.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl TryFrom<RawRecord> for ExecutionRecord {
    type Error = ParseError;

    fn try_from(raw: RawRecord) -> Result<Self, ParseError> {
        let error = match raw.error {
            None | Some(Value::Null) => None,
            Some(Value::String(message)) => Some(message),
            Some(other) => {
                return Err(ParseError::InvalidError {
                    found: other.to_string(),
                })
            }
        };

        let outcome = match (raw.result, error) {
            (Some(_), Some(_)) => return Err(ParseError::AmbiguousOutcome),
            (None, Some(message)) => Outcome::Threw(message),
            (Some(result), None) => Outcome::Returned(SymbolicValue::from(result)),
            // JSON encoders drop `undefined`, so a bare `input` means the call returned it.
            (None, None) => Outcome::Returned(SymbolicValue::Plain(ConcreteValue::Undefined)),
        };

        Ok(ExecutionRecord {
            input: raw.input,
            outcome,
        })
    }
}

/// Decode a single log line.
pub fn parse_record(line: &str) -> Result<ExecutionRecord, ParseError> {
    let raw: RawRecord = serde_json::from_str(line)?;
    ExecutionRecord::try_from(raw)
}

/// Decode a whole log, skipping blank lines. Records keep log order.
pub fn parse_log(text: &str) -> Result<Vec<ExecutionRecord>, ParseError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            parse_record(line).map_err(|e| ParseError::Line {
                line: idx + 1,
                source: Box::new(e),
            })
        })
        .collect()
}

/// Decode a log straight into test cases.
pub fn parse_test_cases(text: &str) -> Result<Vec<TestCase>, ParseError> {
    Ok(parse_log(text)?.into_iter().map(TestCase::from).collect())
}
