//! Convention B: prime-anchored label paths
//!
//! Target and response paths start from the prime word's gender. Filler
//! primes collapse to a single target label and a single response label per
//! correctness and button.

use super::LabelingConvention;
use crate::taxonomy::LabelTaxonomy;
use crate::types::{PrimeGender, TrialRecord};

/// Prime-anchored labeling convention (B)
pub struct PrimeAnchored;

impl LabelingConvention for PrimeAnchored {
    fn name(&self) -> &'static str {
        "prime_anchored"
    }

    fn taxonomy(&self) -> LabelTaxonomy {
        LabelTaxonomy::convention_b()
    }

    fn target_label(&self, trial: &TrialRecord) -> String {
        let prime = trial.prime_gender;
        if trial.both_gendered() {
            format!("word/target/{prime}/{}", trial.congruency())
        } else if prime == PrimeGender::Filler {
            "word/target/filler".to_string()
        } else {
            format!("word/target/{prime}/{}", trial.target_gender)
        }
    }

    fn response_label(&self, trial: &TrialRecord) -> String {
        let correctness = trial.correctness;
        let prime = trial.prime_gender;
        let button = trial.response;

        if prime == PrimeGender::Filler {
            format!("response/{correctness}/filler/{button}")
        } else if trial.both_gendered() {
            format!(
                "response/{correctness}/{prime}/{}/{button}",
                trial.congruency()
            )
        } else {
            format!(
                "response/{correctness}/{prime}/{}/{button}",
                trial.target_gender
            )
        }
    }
}
