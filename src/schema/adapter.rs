//! Readers and writers for session inputs
//!
//! Trigger streams arrive as JSON (`numpy.ndarray.tolist()`), NDJSON, or
//! MNE text event files. Behavioral logs arrive as a JSON array of records
//! or as NDJSON.

use super::trial_row::TrialRow;
use crate::error::RelabelError;
use crate::types::{TrialRecord, TriggerEvent};
use serde::de::DeserializeOwned;
use std::fmt::Write as _;

/// Adapter for trigger stream inputs
pub struct EventStreamAdapter;

impl EventStreamAdapter {
    /// Parse a JSON array of `[sample, previous, code]` triples
    pub fn parse_array(json: &str) -> Result<Vec<TriggerEvent>, RelabelError> {
        let events: Vec<TriggerEvent> = serde_json::from_str(json)?;
        Ok(events)
    }

    /// Parse NDJSON with one `[sample, previous, code]` triple per line
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<TriggerEvent>, RelabelError> {
        parse_ndjson_lines(ndjson)
    }

    /// Parse an MNE text event file.
    ///
    /// Accepts `sample previous code` lines and the four-column
    /// `sample time previous code` variant. Blank lines and `#` comments are
    /// skipped.
    pub fn parse_eve(text: &str) -> Result<Vec<TriggerEvent>, RelabelError> {
        let mut events = Vec::new();

        for (line_num, line) in text.lines().enumerate() {
            let content = line.split('#').next().unwrap_or_default().trim();
            if content.is_empty() {
                continue;
            }

            let columns: Vec<&str> = content.split_whitespace().collect();
            let (sample, previous, code) = match columns.as_slice() {
                [sample, previous, code] => (*sample, *previous, *code),
                [sample, _time, previous, code] => (*sample, *previous, *code),
                _ => {
                    return Err(RelabelError::ParseError(format!(
                        "line {}: expected 3 or 4 columns, found {}",
                        line_num + 1,
                        columns.len()
                    )));
                }
            };

            let int = |s: &str| {
                s.parse::<i64>().map_err(|_| {
                    RelabelError::ParseError(format!("line {}: not an integer: {s}", line_num + 1))
                })
            };
            let event = TriggerEvent::try_from([int(sample)?, int(previous)?, int(code)?])
                .map_err(|e| RelabelError::ParseError(format!("line {}: {e}", line_num + 1)))?;
            events.push(event);
        }

        Ok(events)
    }

    /// Detect the format from the first meaningful character.
    ///
    /// Input starting with `[` is read as one JSON array, falling back to
    /// NDJSON when it holds several top-level triples.
    pub fn parse_auto(input: &str) -> Result<Vec<TriggerEvent>, RelabelError> {
        let first = input
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty() && !l.starts_with('#'));

        match first {
            None => Ok(Vec::new()),
            Some(line) if line.starts_with('[') => {
                Self::parse_array(input).or_else(|array_err| {
                    Self::parse_ndjson(input).map_err(|ndjson_err| {
                        if looks_like_array(input) {
                            array_err
                        } else {
                            ndjson_err
                        }
                    })
                })
            }
            Some(_) => Self::parse_eve(input),
        }
    }

    /// Render events in the three-column MNE text format
    pub fn to_eve(events: &[TriggerEvent]) -> String {
        let mut out = String::with_capacity(events.len() * 24);
        for event in events {
            let _ = writeln!(
                out,
                "{:>10} {:>6} {:>6}",
                event.sample, event.previous, event.code
            );
        }
        out
    }
}

/// Adapter for behavioral log inputs
pub struct TrialLogAdapter;

impl TrialLogAdapter {
    /// Parse a JSON array of records
    pub fn parse_array(json: &str) -> Result<Vec<TrialRow>, RelabelError> {
        let rows: Vec<TrialRow> = serde_json::from_str(json)?;
        Ok(rows)
    }

    /// Parse NDJSON with one record per line
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<TrialRow>, RelabelError> {
        parse_ndjson_lines(ndjson)
    }

    /// JSON array when the input starts with `[`, NDJSON otherwise
    pub fn parse_auto(input: &str) -> Result<Vec<TrialRow>, RelabelError> {
        if input.trim_start().starts_with('[') {
            Self::parse_array(input)
        } else {
            Self::parse_ndjson(input)
        }
    }

    /// Validate every row, stopping at the first invalid one
    pub fn to_records(rows: &[TrialRow]) -> Result<Vec<TrialRecord>, RelabelError> {
        rows.iter()
            .enumerate()
            .map(|(idx, row)| row.validate(idx))
            .collect()
    }

    /// Validate every row and collect all failures
    pub fn validate_rows(rows: &[TrialRow]) -> Vec<RowValidation> {
        rows.iter()
            .enumerate()
            .filter_map(|(idx, row)| {
                row.validate(idx).err().map(|error| RowValidation { index: idx, error })
            })
            .collect()
    }
}

/// A trial log row that failed validation
#[derive(Debug)]
pub struct RowValidation {
    pub index: usize,
    pub error: RelabelError,
}

/// `[[` or `[]` once whitespace is ignored
fn looks_like_array(input: &str) -> bool {
    let head: String = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .take(2)
        .collect();
    head == "[[" || head == "[]"
}

fn parse_ndjson_lines<T: DeserializeOwned>(ndjson: &str) -> Result<Vec<T>, RelabelError> {
    let mut items = Vec::new();
    for (line_num, line) in ndjson.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<T>(trimmed) {
            Ok(item) => items.push(item),
            Err(e) => {
                return Err(RelabelError::ParseError(format!(
                    "Failed to parse line {}: {}",
                    line_num + 1,
                    e
                )));
            }
        }
    }
    Ok(items)
}
