//! Pipeline orchestration
//!
//! This module provides the public API for a session: parse both inputs,
//! validate the behavioral log, relabel the trigger stream and encode the
//! hand-off payload for the epoching stage.

use crate::config::{EpochingConfig, RelabelConfig};
use crate::convention::Convention;
use crate::encoder::HandoffEncoder;
use crate::error::RelabelError;
use crate::relabeler::{EventRelabeler, Relabeling};
use crate::schema::{EventStreamAdapter, RowValidation, TrialLogAdapter, TrialRow};
use crate::taxonomy::LabelTaxonomy;
use crate::types::{HandoffPayload, TriggerEvent, TriggerKind};
use serde::Serialize;
use tracing::info;

/// Session id recorded when the caller does not name the session
pub const DEFAULT_SESSION_ID: &str = "unnamed";

/// Relabel one session and return the hand-off payload as JSON.
///
/// # Arguments
/// * `events_json` - Trigger stream (JSON array, NDJSON or MNE text events)
/// * `trials_json` - Behavioral log (JSON array of records or NDJSON)
/// * `convention` - Labeling convention of the recording session
///
/// # Example
/// ```ignore
/// let payload = relabel_session_json(
///     "[[1000, 0, 10], [1205, 0, 20], [1630, 0, 30]]".to_string(),
///     trials_json,
///     Convention::A,
/// )?;
/// ```
pub fn relabel_session_json(
    events_json: String,
    trials_json: String,
    convention: Convention,
) -> Result<String, RelabelError> {
    let processor = SessionProcessor::new(RelabelConfig {
        convention,
        ..RelabelConfig::default()
    });
    processor.process_json(DEFAULT_SESSION_ID, &events_json, &trials_json)
}

/// Prime/row alignment of a session, computed without relabeling
#[derive(Debug, Clone, Serialize)]
pub struct AlignmentReport {
    pub events: usize,
    pub prime_triggers: usize,
    pub target_triggers: usize,
    pub response_triggers: usize,
    pub unmapped_triggers: usize,
    pub trial_rows: usize,
    /// `(row index, message)` for every invalid log row
    pub invalid_rows: Vec<(usize, String)>,
}

impl AlignmentReport {
    pub fn build(events: &[TriggerEvent], rows: &[TrialRow]) -> Self {
        let count = |kind: TriggerKind| events.iter().filter(|e| e.code == kind.code()).count();
        let prime_triggers = count(TriggerKind::Prime);
        let target_triggers = count(TriggerKind::Target);
        let response_triggers = count(TriggerKind::Response);

        let invalid_rows = TrialLogAdapter::validate_rows(rows)
            .into_iter()
            .map(|RowValidation { index, error }| (index, error.to_string()))
            .collect();

        Self {
            events: events.len(),
            prime_triggers,
            target_triggers,
            response_triggers,
            unmapped_triggers: events.len() - prime_triggers - target_triggers - response_triggers,
            trial_rows: rows.len(),
            invalid_rows,
        }
    }

    /// Every row valid and one row per prime trigger
    pub fn is_aligned(&self) -> bool {
        self.invalid_rows.is_empty() && self.prime_triggers == self.trial_rows
    }
}

/// Processor holding a taxonomy, relabeling options and epoching parameters.
///
/// One processor can relabel any number of sessions recorded under the same
/// convention.
pub struct SessionProcessor {
    config: RelabelConfig,
    taxonomy: LabelTaxonomy,
    epoching: EpochingConfig,
    encoder: HandoffEncoder,
}

impl Default for SessionProcessor {
    fn default() -> Self {
        Self::new(RelabelConfig::default())
    }
}

impl SessionProcessor {
    /// Create a processor using the built-in taxonomy of the configured convention
    pub fn new(config: RelabelConfig) -> Self {
        Self {
            taxonomy: config.convention.taxonomy(),
            config,
            epoching: EpochingConfig::default(),
            encoder: HandoffEncoder::new(),
        }
    }

    /// Replace the taxonomy, e.g. one loaded from a JSON label map
    pub fn with_taxonomy(mut self, taxonomy: LabelTaxonomy) -> Self {
        self.taxonomy = taxonomy;
        self
    }

    /// Replace the epoching parameters after validating them
    pub fn with_epoching(mut self, epoching: EpochingConfig) -> Result<Self, RelabelError> {
        self.set_epoching(epoching)?;
        Ok(self)
    }

    /// In-place variant of [`Self::with_epoching`]; the old parameters are kept on error
    pub fn set_epoching(&mut self, epoching: EpochingConfig) -> Result<(), RelabelError> {
        epoching.validate()?;
        self.epoching = epoching;
        Ok(())
    }

    pub fn with_encoder(mut self, encoder: HandoffEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn config(&self) -> &RelabelConfig {
        &self.config
    }

    pub fn taxonomy(&self) -> &LabelTaxonomy {
        &self.taxonomy
    }

    pub fn epoching(&self) -> &EpochingConfig {
        &self.epoching
    }

    /// Validate the whole log, then relabel.
    ///
    /// Any invalid row fails the session before a single event is rewritten.
    pub fn relabel(
        &self,
        events: &[TriggerEvent],
        rows: &[TrialRow],
    ) -> Result<Relabeling, RelabelError> {
        let trials = TrialLogAdapter::to_records(rows)?;
        EventRelabeler::with_config(&self.taxonomy, &self.config).relabel(events, &trials)
    }

    /// Relabel and build the hand-off payload
    pub fn process(
        &self,
        session_id: &str,
        events: &[TriggerEvent],
        rows: &[TrialRow],
    ) -> Result<HandoffPayload, RelabelError> {
        let relabeling = self.relabel(events, rows)?;
        let payload = self.encoder.encode(
            session_id,
            self.config.convention,
            &self.taxonomy,
            &relabeling,
            &self.epoching,
        )?;
        info!(
            session = session_id,
            labels = payload.event_id.len(),
            events = payload.events.len(),
            "session encoded"
        );
        Ok(payload)
    }

    /// Parse both inputs, process, and serialize the payload
    pub fn process_json(
        &self,
        session_id: &str,
        events_input: &str,
        trials_input: &str,
    ) -> Result<String, RelabelError> {
        let events = EventStreamAdapter::parse_auto(events_input)?;
        let rows = TrialLogAdapter::parse_auto(trials_input)?;
        let payload = self.process(session_id, &events, &rows)?;
        HandoffEncoder::to_json(&payload, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UnmappedPolicy;
    use pretty_assertions::assert_eq;

    fn sample_events() -> &'static str {
        "[[1000, 0, 10], [1205, 0, 20], [1630, 0, 30], [1700, 0, 99],
          [2500, 0, 10], [2705, 0, 20], [3120, 0, 30]]"
    }

    fn sample_trials() -> &'static str {
        r#"[
            {"prime_gender": "female", "prime_age": "adult", "target_gender": "male",
             "correct": 1, "response": "m", "rt": 0.42},
            {"prime_gender": "filler", "prime_age": null, "target_gender": "control",
             "correct": 0, "response": "z", "rt": 0.61}
        ]"#
    }

    #[test]
    fn test_relabel_session_json() {
        let json = relabel_session_json(
            sample_events().to_string(),
            sample_trials().to_string(),
            Convention::A,
        )
        .unwrap();

        let payload: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(payload["format_version"], "1.0.0");
        assert_eq!(payload["provenance"]["session_id"], DEFAULT_SESSION_ID);
        assert_eq!(
            payload["events"],
            serde_json::json!([
                [1000, 0, 11],
                [1205, 0, 112],
                [1630, 0, 212],
                [2500, 0, 40],
                [2705, 0, 144],
                [3120, 0, 199]
            ])
        );
        assert_eq!(payload["event_id"].as_object().unwrap().len(), 6);
        assert_eq!(payload["event_id"]["word/target/control/filler"], 144);
        assert_eq!(payload["summary"]["dropped_events"], 1);
        assert_eq!(payload["summary"]["trials_consumed"], 2);
    }

    #[test]
    fn test_convention_b_session() {
        let json = relabel_session_json(
            sample_events().to_string(),
            sample_trials().to_string(),
            Convention::B,
        )
        .unwrap();

        let payload: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(payload["provenance"]["convention"], "b");
        assert_eq!(payload["event_id"]["word/target/female/incongruent"], 112);
        assert_eq!(payload["event_id"]["word/target/filler"], 140);
        assert_eq!(payload["event_id"]["response/incorrect/filler/z"], 195);
    }

    #[test]
    fn test_invalid_row_fails_before_relabeling() {
        let trials = r#"[
            {"prime_gender": "female", "prime_age": "adult", "target_gender": "male",
             "correct": 1, "response": "m"},
            {"prime_gender": "filler", "target_gender": "control", "correct": 0, "response": "q"}
        ]"#;

        let err = SessionProcessor::default()
            .process_json("sub-01", sample_events(), trials)
            .unwrap_err();
        assert!(matches!(
            err,
            RelabelError::InvalidTrialField { row: 1, field: "response", .. }
        ));
    }

    #[test]
    fn test_processor_options() {
        let processor = SessionProcessor::new(RelabelConfig {
            convention: Convention::A,
            unmapped: UnmappedPolicy::PassThrough,
            strict_alignment: true,
        })
        .with_encoder(HandoffEncoder::with_instance_id("fixed".to_string()))
        .with_epoching(EpochingConfig {
            h_freq: 30.0,
            ..EpochingConfig::default()
        })
        .unwrap();

        let events = EventStreamAdapter::parse_auto(sample_events()).unwrap();
        let rows = TrialLogAdapter::parse_auto(sample_trials()).unwrap();
        let payload = processor.process("sub-04", &events, &rows).unwrap();

        assert_eq!(payload.events.len(), 7);
        assert_eq!(payload.events[3], TriggerEvent::new(1700, 0, 99));
        // 99 is carried in the stream but has no label.
        assert!(!payload.event_id.contains_code(99));
        assert_eq!(payload.epoching.h_freq, 30.0);
        assert_eq!(payload.producer.instance_id, "fixed");

        let bad = SessionProcessor::default().with_epoching(EpochingConfig {
            l_freq: 50.0,
            ..EpochingConfig::default()
        });
        assert!(bad.is_err());
    }

    #[test]
    fn test_custom_taxonomy() {
        let taxonomy = LabelTaxonomy::from_entries([
            ("word/prime/female/adult", 1),
            ("word/target/male/incongruent", 2),
            ("response/correct/male/incongruent/m", 3),
        ])
        .unwrap();
        let processor = SessionProcessor::default().with_taxonomy(taxonomy);

        let events =
            EventStreamAdapter::parse_auto("[[0, 0, 10], [5, 0, 20], [9, 0, 30]]").unwrap();
        let rows = TrialLogAdapter::parse_auto(
            r#"[{"prime_gender": "female", "prime_age": "adult", "target_gender": "male",
                 "correct": 1, "response": "m"}]"#,
        )
        .unwrap();

        let relabeling = processor.relabel(&events, &rows).unwrap();
        let codes: Vec<u32> = relabeling.trigger_events().iter().map(|e| e.code).collect();
        assert_eq!(codes, vec![1, 2, 3]);
    }

    #[test]
    fn test_alignment_report() {
        let events = EventStreamAdapter::parse_auto(sample_events()).unwrap();
        let rows = TrialLogAdapter::parse_auto(sample_trials()).unwrap();

        let report = AlignmentReport::build(&events, &rows);
        assert_eq!(report.prime_triggers, 2);
        assert_eq!(report.target_triggers, 2);
        assert_eq!(report.response_triggers, 2);
        assert_eq!(report.unmapped_triggers, 1);
        assert!(report.is_aligned());

        let report = AlignmentReport::build(&events[..3], &rows);
        assert!(!report.is_aligned());
    }

    #[test]
    fn test_invalid_json() {
        let result = relabel_session_json(
            "not valid json".to_string(),
            sample_trials().to_string(),
            Convention::A,
        );
        assert!(result.is_err());
    }
}
