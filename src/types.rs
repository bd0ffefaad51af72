//! Core types for the relabeling pipeline
//!
//! This module defines the data that flows through each stage: raw trigger
//! events from the recording, validated trial records from the behavioral log,
//! relabeled events, and the hand-off payload for the epoching stage.

use crate::config::EpochingConfig;
use crate::convention::Convention;
use crate::error::RelabelError;
use crate::taxonomy::LabelTaxonomy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Raw code stamped at prime word onset
pub const PRIME_CODE: u32 = 10;

/// Raw code stamped at target word onset
pub const TARGET_CODE: u32 = 20;

/// Raw code stamped at the behavioral response
pub const RESPONSE_CODE: u32 = 30;

/// Condition-bearing raw trigger kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    Prime,
    Target,
    Response,
}

impl TriggerKind {
    /// Classify a raw code; `None` for codes that carry no condition
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            PRIME_CODE => Some(TriggerKind::Prime),
            TARGET_CODE => Some(TriggerKind::Target),
            RESPONSE_CODE => Some(TriggerKind::Response),
            _ => None,
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            TriggerKind::Prime => PRIME_CODE,
            TriggerKind::Target => TARGET_CODE,
            TriggerKind::Response => RESPONSE_CODE,
        }
    }
}

/// One row of an MNE-style event array: `[sample, previous, code]`
///
/// Serialized as a three-element JSON array so that `numpy.ndarray.tolist()`
/// output can be read directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[i64; 3]", into = "[i64; 3]")]
pub struct TriggerEvent {
    /// Sample index of the onset
    pub sample: i64,
    /// Value on the trigger channel before the onset (carried through untouched)
    pub previous: i64,
    /// Trigger code
    pub code: u32,
}

impl TriggerEvent {
    pub fn new(sample: i64, previous: i64, code: u32) -> Self {
        Self {
            sample,
            previous,
            code,
        }
    }

    /// Same onset with a different code
    pub fn with_code(&self, code: u32) -> Self {
        Self { code, ..*self }
    }
}

impl TryFrom<[i64; 3]> for TriggerEvent {
    type Error = RelabelError;

    fn try_from([sample, previous, code]: [i64; 3]) -> Result<Self, Self::Error> {
        let code = u32::try_from(code)
            .map_err(|_| RelabelError::ParseError(format!("trigger code out of range: {code}")))?;
        Ok(Self::new(sample, previous, code))
    }
}

impl From<TriggerEvent> for [i64; 3] {
    fn from(event: TriggerEvent) -> Self {
        [event.sample, event.previous, i64::from(event.code)]
    }
}

/// An event produced by the relabeler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelabeledEvent {
    /// The onset with its taxonomy code
    pub event: TriggerEvent,
    /// Resolved label path (`None` for passed-through events)
    pub label: Option<String>,
    /// 0-based trial row the label was built from
    pub trial: Option<usize>,
}

/// Gender category of the prime word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimeGender {
    Female,
    Male,
    Neutral,
    Filler,
}

impl PrimeGender {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimeGender::Female => "female",
            PrimeGender::Male => "male",
            PrimeGender::Neutral => "neutral",
            PrimeGender::Filler => "filler",
        }
    }

    /// Female or male
    pub fn is_gendered(&self) -> bool {
        matches!(self, PrimeGender::Female | PrimeGender::Male)
    }
}

impl FromStr for PrimeGender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "female" => Ok(PrimeGender::Female),
            "male" => Ok(PrimeGender::Male),
            "neutral" => Ok(PrimeGender::Neutral),
            "filler" => Ok(PrimeGender::Filler),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for PrimeGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Age category of the prime word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimeAge {
    Adult,
    Child,
    Neutral,
}

impl PrimeAge {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimeAge::Adult => "adult",
            PrimeAge::Child => "child",
            PrimeAge::Neutral => "neutral",
        }
    }
}

impl FromStr for PrimeAge {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "adult" => Ok(PrimeAge::Adult),
            "child" => Ok(PrimeAge::Child),
            "neutral" => Ok(PrimeAge::Neutral),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for PrimeAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gender category of the target word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetGender {
    Female,
    Male,
    Neutral,
    Control,
    Filler,
}

impl TargetGender {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetGender::Female => "female",
            TargetGender::Male => "male",
            TargetGender::Neutral => "neutral",
            TargetGender::Control => "control",
            TargetGender::Filler => "filler",
        }
    }

    /// Female or male
    pub fn is_gendered(&self) -> bool {
        matches!(self, TargetGender::Female | TargetGender::Male)
    }
}

impl FromStr for TargetGender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "female" => Ok(TargetGender::Female),
            "male" => Ok(TargetGender::Male),
            "neutral" => Ok(TargetGender::Neutral),
            "control" => Ok(TargetGender::Control),
            "filler" => Ok(TargetGender::Filler),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for TargetGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the behavioral response was correct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Correctness {
    Correct,
    Incorrect,
}

impl Correctness {
    /// The log encodes correctness as 1 (correct) / 0 (incorrect)
    pub fn from_flag(flag: i64) -> Option<Self> {
        match flag {
            1 => Some(Correctness::Correct),
            0 => Some(Correctness::Incorrect),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Correctness::Correct => "correct",
            Correctness::Incorrect => "incorrect",
        }
    }
}

impl fmt::Display for Correctness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response button pressed by the participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseButton {
    M,
    Z,
}

impl ResponseButton {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseButton::M => "m",
            ResponseButton::Z => "z",
        }
    }
}

impl FromStr for ResponseButton {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "m" => Ok(ResponseButton::M),
            "z" => Ok(ResponseButton::Z),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for ResponseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prime/target congruency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Congruency {
    Congruent,
    Incongruent,
}

impl Congruency {
    /// Congruent when both words carry the same category name
    pub fn between(prime: PrimeGender, target: TargetGender) -> Self {
        if prime.as_str() == target.as_str() {
            Congruency::Congruent
        } else {
            Congruency::Incongruent
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Congruency::Congruent => "congruent",
            Congruency::Incongruent => "incongruent",
        }
    }
}

impl fmt::Display for Congruency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated row of the behavioral log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub prime_gender: PrimeGender,
    /// Absent for filler primes
    pub prime_age: Option<PrimeAge>,
    pub target_gender: TargetGender,
    pub correctness: Correctness,
    pub response: ResponseButton,
}

impl TrialRecord {
    pub fn congruency(&self) -> Congruency {
        Congruency::between(self.prime_gender, self.target_gender)
    }

    /// Both prime and target are female/male words
    pub fn both_gendered(&self) -> bool {
        self.prime_gender.is_gendered() && self.target_gender.is_gendered()
    }
}

/// Producer metadata for the hand-off payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandoffProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Where a hand-off payload came from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandoffProvenance {
    pub session_id: String,
    pub convention: Convention,
    pub computed_at_utc: String,
}

/// Counts describing one relabeling pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelabelSummary {
    /// Events in the raw trigger stream
    pub raw_events: usize,
    /// Events in the output stream
    pub relabeled_events: usize,
    /// Raw events with no condition that were not emitted
    pub dropped_events: usize,
    /// Trial log rows consumed by prime triggers
    pub trials_consumed: usize,
    /// Emitted events per label path
    pub label_counts: BTreeMap<String, usize>,
}

/// Everything the external epoching stage needs for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandoffPayload {
    pub format_version: String,
    pub producer: HandoffProducer,
    pub provenance: HandoffProvenance,
    /// Label → code map restricted to codes present in `events`
    pub event_id: LabelTaxonomy,
    pub events: Vec<TriggerEvent>,
    pub epoching: EpochingConfig,
    pub summary: RelabelSummary,
}
