//! Behavioral log rows
//!
//! A row as it appears in the exported log: string categories, a 0/1
//! correctness flag that may have been written as an integer, float or bool,
//! and any number of extra columns that are ignored.

use crate::error::RelabelError;
use crate::types::{
    Correctness, PrimeAge, PrimeGender, ResponseButton, TargetGender, TrialRecord,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One unvalidated row of the behavioral log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrialRow {
    pub prime_gender: Option<String>,
    /// Often empty or null for filler primes
    pub prime_age: Option<String>,
    pub target_gender: Option<String>,
    pub correct: Option<serde_json::Value>,
    pub response: Option<String>,
}

impl TrialRow {
    /// Validate into a typed record; `row` is the 0-based log index used in errors
    pub fn validate(&self, row: usize) -> Result<TrialRecord, RelabelError> {
        let prime_gender: PrimeGender = parse_field(row, "prime_gender", &self.prime_gender)?;

        let prime_age = if prime_gender == PrimeGender::Filler {
            None
        } else {
            Some(parse_field::<PrimeAge>(row, "prime_age", &self.prime_age)?)
        };

        let target_gender: TargetGender = parse_field(row, "target_gender", &self.target_gender)?;
        let correctness = parse_correct(row, self.correct.as_ref())?;
        let response: ResponseButton = parse_field(row, "response", &self.response)?;

        Ok(TrialRecord {
            prime_gender,
            prime_age,
            target_gender,
            correctness,
            response,
        })
    }
}

fn parse_field<T: FromStr>(
    row: usize,
    field: &'static str,
    value: &Option<String>,
) -> Result<T, RelabelError> {
    let raw = value.as_deref().map(str::trim).unwrap_or_default();
    raw.parse().map_err(|_| RelabelError::InvalidTrialField {
        row,
        field,
        value: raw.to_string(),
    })
}

fn parse_correct(
    row: usize,
    value: Option<&serde_json::Value>,
) -> Result<Correctness, RelabelError> {
    use serde_json::Value;

    let flag = match value {
        Some(Value::Bool(b)) => Some(i64::from(*b)),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    flag.and_then(Correctness::from_flag)
        .ok_or_else(|| RelabelError::InvalidTrialField {
            row,
            field: "correct",
            value: value.map(|v| v.to_string()).unwrap_or_default(),
        })
}
