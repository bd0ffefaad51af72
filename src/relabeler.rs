//! Event relabeling
//!
//! A single left-to-right pass over the raw trigger stream. Every prime
//! trigger (10) advances a cursor into the behavioral log; target (20) and
//! response (30) triggers read the row under the cursor. Each condition-bearing
//! trigger is rewritten to the taxonomy code of the label the active
//! convention builds from that row. The input is never modified.

use crate::config::{RelabelConfig, UnmappedPolicy};
use crate::convention::Convention;
use crate::error::RelabelError;
use crate::taxonomy::LabelTaxonomy;
use crate::types::{RelabelSummary, RelabeledEvent, TrialRecord, TriggerEvent, TriggerKind};
use tracing::{debug, info, warn};

/// Position of the pass in the behavioral log
#[derive(Debug, Clone, Copy, Default)]
struct TrialCursor {
    /// Number of prime triggers seen; the current row is `consumed - 1`
    consumed: usize,
}

impl TrialCursor {
    fn advance<'t>(
        &mut self,
        trials: &'t [TrialRecord],
        event: &TriggerEvent,
    ) -> Result<(usize, &'t TrialRecord), RelabelError> {
        let index = self.consumed;
        let trial = trials.get(index).ok_or_else(|| {
            RelabelError::Alignment(format!(
                "prime trigger #{} at sample {} has no trial log row ({} rows)",
                index + 1,
                event.sample,
                trials.len()
            ))
        })?;
        self.consumed += 1;
        Ok((index, trial))
    }

    fn current<'t>(
        &self,
        trials: &'t [TrialRecord],
        kind: TriggerKind,
        event: &TriggerEvent,
    ) -> Result<(usize, &'t TrialRecord), RelabelError> {
        let index = self.consumed.checked_sub(1).ok_or_else(|| {
            RelabelError::Alignment(format!(
                "{kind:?} trigger at sample {} precedes the first prime trigger",
                event.sample
            ))
        })?;
        // `advance` only moves onto rows that exist.
        Ok((index, &trials[index]))
    }
}

/// Result of a relabeling pass
#[derive(Debug, Clone)]
pub struct Relabeling {
    pub events: Vec<RelabeledEvent>,
    pub summary: RelabelSummary,
}

impl Relabeling {
    /// The relabeled stream as plain `[sample, previous, code]` events
    pub fn trigger_events(&self) -> Vec<TriggerEvent> {
        self.events.iter().map(|e| e.event).collect()
    }
}

/// Relabels a raw trigger stream against a behavioral log
pub struct EventRelabeler<'a> {
    taxonomy: &'a LabelTaxonomy,
    convention: Convention,
    unmapped: UnmappedPolicy,
    strict_alignment: bool,
}

impl<'a> EventRelabeler<'a> {
    /// Relabeler with default options: unmapped codes dropped, strict alignment
    pub fn new(taxonomy: &'a LabelTaxonomy, convention: Convention) -> Self {
        Self::with_config(
            taxonomy,
            &RelabelConfig {
                convention,
                ..RelabelConfig::default()
            },
        )
    }

    pub fn with_config(taxonomy: &'a LabelTaxonomy, config: &RelabelConfig) -> Self {
        Self {
            taxonomy,
            convention: config.convention,
            unmapped: config.unmapped,
            strict_alignment: config.strict_alignment,
        }
    }

    pub fn unmapped(mut self, policy: UnmappedPolicy) -> Self {
        self.unmapped = policy;
        self
    }

    pub fn strict_alignment(mut self, strict: bool) -> Self {
        self.strict_alignment = strict;
        self
    }

    /// Relabel `events` using `trials`, the Nth prime trigger consuming row N.
    ///
    /// Any error aborts the pass; partial output is never returned.
    pub fn relabel(
        &self,
        events: &[TriggerEvent],
        trials: &[TrialRecord],
    ) -> Result<Relabeling, RelabelError> {
        let strategy = self.convention.strategy();
        let mut cursor = TrialCursor::default();
        let mut output = Vec::with_capacity(events.len());
        let mut summary = RelabelSummary {
            raw_events: events.len(),
            ..RelabelSummary::default()
        };

        for event in events {
            let Some(kind) = TriggerKind::from_code(event.code) else {
                match self.unmapped {
                    UnmappedPolicy::Drop => summary.dropped_events += 1,
                    UnmappedPolicy::PassThrough => output.push(RelabeledEvent {
                        event: *event,
                        label: None,
                        trial: None,
                    }),
                }
                continue;
            };

            let (trial_index, trial) = match kind {
                TriggerKind::Prime => {
                    let advanced = cursor.advance(trials, event)?;
                    debug!(trial = advanced.0, sample = event.sample, "prime trigger");
                    advanced
                }
                TriggerKind::Target | TriggerKind::Response => {
                    cursor.current(trials, kind, event)?
                }
            };

            let label = match kind {
                TriggerKind::Prime => strategy.prime_label(trial),
                TriggerKind::Target => strategy.target_label(trial),
                TriggerKind::Response => strategy.response_label(trial),
            };
            let code = self.taxonomy.code(&label).map_err(|_| {
                RelabelError::UnknownLabel(format!(
                    "{label} (trial row {trial_index}, sample {})",
                    event.sample
                ))
            })?;

            *summary.label_counts.entry(label.clone()).or_insert(0) += 1;
            output.push(RelabeledEvent {
                event: event.with_code(code),
                label: Some(label),
                trial: Some(trial_index),
            });
        }

        summary.trials_consumed = cursor.consumed;
        summary.relabeled_events = output.len();

        if cursor.consumed != trials.len() {
            if self.strict_alignment {
                return Err(RelabelError::TrialCountMismatch {
                    primes: cursor.consumed,
                    rows: trials.len(),
                });
            }
            warn!(
                primes = cursor.consumed,
                rows = trials.len(),
                "trial log has rows without a prime trigger"
            );
        }

        info!(
            convention = strategy.name(),
            raw = summary.raw_events,
            relabeled = summary.relabeled_events,
            dropped = summary.dropped_events,
            trials = summary.trials_consumed,
            "relabeling pass complete"
        );

        Ok(Relabeling {
            events: output,
            summary,
        })
    }
}

/// Relabel with default options and return the plain event stream
pub fn relabel(
    events: &[TriggerEvent],
    trials: &[TrialRecord],
    taxonomy: &LabelTaxonomy,
    convention: Convention,
) -> Result<Vec<TriggerEvent>, RelabelError> {
    EventRelabeler::new(taxonomy, convention)
        .relabel(events, trials)
        .map(|r| r.trigger_events())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convention::test_support::trial;
    use crate::types::{Correctness, PrimeAge, PrimeGender, ResponseButton, TargetGender};
    use pretty_assertions::assert_eq;

    fn female_male_trial() -> TrialRecord {
        trial(
            PrimeGender::Female,
            Some(PrimeAge::Adult),
            TargetGender::Male,
            Correctness::Correct,
            ResponseButton::M,
        )
    }

    fn filler_trial() -> TrialRecord {
        trial(
            PrimeGender::Filler,
            Some(PrimeAge::Child),
            TargetGender::Neutral,
            Correctness::Incorrect,
            ResponseButton::Z,
        )
    }

    fn one_trial_stream(offset: i64) -> Vec<TriggerEvent> {
        vec![
            TriggerEvent::new(offset, 0, 10),
            TriggerEvent::new(offset + 200, 0, 20),
            TriggerEvent::new(offset + 450, 0, 30),
        ]
    }

    fn labels(relabeling: &Relabeling) -> Vec<&str> {
        relabeling
            .events
            .iter()
            .filter_map(|e| e.label.as_deref())
            .collect()
    }

    #[test]
    fn test_single_trial_convention_a() {
        let taxonomy = LabelTaxonomy::convention_a();
        let result = EventRelabeler::new(&taxonomy, Convention::A)
            .relabel(&one_trial_stream(0), &[female_male_trial()])
            .unwrap();

        assert_eq!(
            labels(&result),
            vec![
                "word/prime/female/adult",
                "word/target/male/incongruent",
                "response/correct/male/incongruent/m",
            ]
        );
        let expected: Vec<u32> = labels(&result)
            .iter()
            .map(|l| taxonomy.code(l).unwrap())
            .collect();
        let codes: Vec<u32> = result.events.iter().map(|e| e.event.code).collect();
        assert_eq!(codes, expected);
        assert_eq!(result.events[1].event.sample, 200);
    }

    #[test]
    fn test_single_trial_convention_b() {
        let taxonomy = LabelTaxonomy::convention_b();
        let result = EventRelabeler::new(&taxonomy, Convention::B)
            .relabel(&one_trial_stream(0), &[female_male_trial()])
            .unwrap();

        assert_eq!(
            labels(&result),
            vec![
                "word/prime/female/adult",
                "word/target/female/incongruent",
                "response/correct/female/incongruent/m",
            ]
        );
    }

    #[test]
    fn test_filler_trial() {
        let taxonomy = LabelTaxonomy::convention_a();
        let result = EventRelabeler::new(&taxonomy, Convention::A)
            .relabel(&one_trial_stream(0), &[filler_trial()])
            .unwrap();

        assert_eq!(result.events[0].event.code, 40);
        assert_eq!(
            labels(&result),
            vec![
                "word/prime/filler",
                "word/target/neutral/filler",
                "response/incorrect/neutral/filler/z",
            ]
        );
    }

    #[test]
    fn test_nth_prime_consumes_nth_row() {
        let taxonomy = LabelTaxonomy::convention_a();
        let mut events = one_trial_stream(0);
        events.extend(one_trial_stream(1000));
        let trials = [female_male_trial(), filler_trial()];

        let result = EventRelabeler::new(&taxonomy, Convention::A)
            .relabel(&events, &trials)
            .unwrap();

        let rows: Vec<Option<usize>> = result.events.iter().map(|e| e.trial).collect();
        assert_eq!(rows, vec![Some(0), Some(0), Some(0), Some(1), Some(1), Some(1)]);
        assert_eq!(result.summary.trials_consumed, 2);
    }

    #[test]
    fn test_unknown_codes_dropped_without_advancing() {
        let taxonomy = LabelTaxonomy::convention_a();
        let events = vec![
            TriggerEvent::new(0, 0, 99),
            TriggerEvent::new(10, 0, 10),
            TriggerEvent::new(20, 0, 99),
            TriggerEvent::new(30, 0, 20),
            TriggerEvent::new(40, 0, 30),
            TriggerEvent::new(50, 0, 5),
        ];

        let result = EventRelabeler::new(&taxonomy, Convention::A)
            .relabel(&events, &[female_male_trial()])
            .unwrap();

        assert_eq!(result.events.len(), 3);
        assert_eq!(result.summary.dropped_events, 3);
        assert_eq!(result.summary.trials_consumed, 1);
        assert!(result.events.iter().all(|e| e.trial == Some(0)));
    }

    #[test]
    fn test_pass_through_keeps_position() {
        let taxonomy = LabelTaxonomy::convention_a();
        let events = vec![
            TriggerEvent::new(0, 0, 99),
            TriggerEvent::new(10, 0, 10),
            TriggerEvent::new(20, 0, 20),
            TriggerEvent::new(25, 0, 7),
            TriggerEvent::new(30, 0, 30),
        ];

        let result = EventRelabeler::new(&taxonomy, Convention::A)
            .unmapped(UnmappedPolicy::PassThrough)
            .relabel(&events, &[female_male_trial()])
            .unwrap();

        let codes: Vec<u32> = result.trigger_events().iter().map(|e| e.code).collect();
        assert_eq!(codes, vec![99, 11, 112, 7, 212]);
        assert_eq!(result.events[0].label, None);
        assert_eq!(result.summary.dropped_events, 0);
    }

    #[test]
    fn test_more_primes_than_rows_is_fatal() {
        let taxonomy = LabelTaxonomy::convention_a();
        let mut events = one_trial_stream(0);
        events.extend(one_trial_stream(1000));

        let err = EventRelabeler::new(&taxonomy, Convention::A)
            .relabel(&events, &[female_male_trial()])
            .unwrap_err();
        assert!(matches!(err, RelabelError::Alignment(_)));
    }

    #[test]
    fn test_target_before_first_prime_is_fatal() {
        let taxonomy = LabelTaxonomy::convention_a();
        let events = vec![TriggerEvent::new(0, 0, 20), TriggerEvent::new(10, 0, 10)];

        let err = EventRelabeler::new(&taxonomy, Convention::A)
            .relabel(&events, &[female_male_trial()])
            .unwrap_err();
        assert!(matches!(err, RelabelError::Alignment(ref m) if m.contains("precedes")));
    }

    #[test]
    fn test_leftover_rows() {
        let taxonomy = LabelTaxonomy::convention_a();
        let trials = [female_male_trial(), filler_trial()];

        let err = EventRelabeler::new(&taxonomy, Convention::A)
            .relabel(&one_trial_stream(0), &trials)
            .unwrap_err();
        assert!(matches!(
            err,
            RelabelError::TrialCountMismatch { primes: 1, rows: 2 }
        ));

        let lenient = EventRelabeler::new(&taxonomy, Convention::A)
            .strict_alignment(false)
            .relabel(&one_trial_stream(0), &trials)
            .unwrap();
        assert_eq!(lenient.events.len(), 3);
    }

    #[test]
    fn test_label_missing_from_taxonomy_is_fatal() {
        // A filler target after a gendered prime has no convention A label.
        let taxonomy = LabelTaxonomy::convention_a();
        let bad = trial(
            PrimeGender::Female,
            Some(PrimeAge::Adult),
            TargetGender::Filler,
            Correctness::Correct,
            ResponseButton::M,
        );

        let err = EventRelabeler::new(&taxonomy, Convention::A)
            .relabel(&one_trial_stream(0), &[bad])
            .unwrap_err();
        assert!(matches!(
            err,
            RelabelError::UnknownLabel(ref l) if l.starts_with("word/target/filler/female")
        ));
    }

    #[test]
    fn test_taxonomy_of_other_convention_fails() {
        let taxonomy = LabelTaxonomy::convention_a();
        let err = EventRelabeler::new(&taxonomy, Convention::B)
            .relabel(&one_trial_stream(0), &[filler_trial()])
            .unwrap_err();
        assert!(matches!(err, RelabelError::UnknownLabel(_)));
    }

    #[test]
    fn test_free_function_and_label_counts() {
        let taxonomy = LabelTaxonomy::convention_a();
        let mut events = one_trial_stream(0);
        events.extend(one_trial_stream(1000));
        let trials = [female_male_trial(), female_male_trial()];

        let plain = relabel(&events, &trials, &taxonomy, Convention::A).unwrap();
        assert_eq!(plain.len(), 6);

        let result = EventRelabeler::new(&taxonomy, Convention::A)
            .relabel(&events, &trials)
            .unwrap();
        assert_eq!(result.summary.label_counts["word/prime/female/adult"], 2);
        assert_eq!(result.summary.label_counts.len(), 3);
    }
}
