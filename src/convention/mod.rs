//! Labeling conventions
//!
//! Two recording sessions used different rules for turning a trial record
//! into target and response label paths. Each rule set is a strategy
//! implementing [`LabelingConvention`]; [`Convention`] names them.

mod prime_anchored;
mod target_anchored;

pub use prime_anchored::PrimeAnchored;
pub use target_anchored::TargetAnchored;

use crate::taxonomy::LabelTaxonomy;
use crate::types::{PrimeGender, TrialRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Label construction rules for one session convention
pub trait LabelingConvention {
    /// Short name used in logs and payload provenance
    fn name(&self) -> &'static str;

    /// The full taxonomy whose paths this convention produces
    fn taxonomy(&self) -> LabelTaxonomy;

    /// Label for a prime onset (code 10). Identical across conventions.
    fn prime_label(&self, trial: &TrialRecord) -> String {
        match (trial.prime_gender, trial.prime_age) {
            (PrimeGender::Filler, _) => "word/prime/filler".to_string(),
            (gender, Some(age)) => format!("word/prime/{gender}/{age}"),
            // Records without an age for a non-filler prime are rejected when
            // the log is validated; this path only names the resulting miss.
            (gender, None) => format!("word/prime/{gender}"),
        }
    }

    /// Label for a target onset (code 20)
    fn target_label(&self, trial: &TrialRecord) -> String;

    /// Label for a behavioral response (code 30)
    fn response_label(&self, trial: &TrialRecord) -> String;
}

/// Selectable session convention
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Convention {
    /// Target-anchored paths (`word/target/<target>/...`)
    #[default]
    A,
    /// Prime-anchored paths (`word/target/<prime>/...`)
    B,
}

impl Convention {
    pub fn as_str(&self) -> &'static str {
        match self {
            Convention::A => "a",
            Convention::B => "b",
        }
    }

    /// The strategy implementing this convention
    pub fn strategy(&self) -> &'static dyn LabelingConvention {
        match self {
            Convention::A => &TargetAnchored,
            Convention::B => &PrimeAnchored,
        }
    }

    /// Shorthand for `self.strategy().taxonomy()`
    pub fn taxonomy(&self) -> LabelTaxonomy {
        self.strategy().taxonomy()
    }
}

impl FromStr for Convention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a" | "target_anchored" => Ok(Convention::A),
            "b" | "prime_anchored" => Ok(Convention::B),
            other => Err(format!("unknown labeling convention: {other}")),
        }
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
