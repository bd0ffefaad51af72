//! Convention A: target-anchored label paths
//!
//! Target and response paths start from the target word's gender. The second
//! key is the congruency when both words are female/male, otherwise the prime
//! gender.

use super::LabelingConvention;
use crate::taxonomy::LabelTaxonomy;
use crate::types::{TargetGender, TrialRecord};

/// Target-anchored labeling convention (A)
pub struct TargetAnchored;

impl LabelingConvention for TargetAnchored {
    fn name(&self) -> &'static str {
        "target_anchored"
    }

    fn taxonomy(&self) -> LabelTaxonomy {
        LabelTaxonomy::convention_a()
    }

    fn target_label(&self, trial: &TrialRecord) -> String {
        let target = trial.target_gender;
        if trial.both_gendered() {
            format!("word/target/{target}/{}", trial.congruency())
        } else {
            format!("word/target/{target}/{}", trial.prime_gender)
        }
    }

    fn response_label(&self, trial: &TrialRecord) -> String {
        let correctness = trial.correctness;
        let target = trial.target_gender;
        let button = trial.response;

        match target {
            TargetGender::Control | TargetGender::Neutral => format!(
                "response/{correctness}/{target}/{}/{button}",
                trial.prime_gender
            ),
            _ if trial.both_gendered() => format!(
                "response/{correctness}/{target}/{}/{button}",
                trial.congruency()
            ),
            _ => format!(
                "response/{correctness}/{target}/{}/{button}",
                trial.prime_gender
            ),
        }
    }
}
