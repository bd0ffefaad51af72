use erp_relabel::config::UnmappedPolicy;
use erp_relabel::convention::Convention;
use erp_relabel::filter::{observed_codes, restrict};
use erp_relabel::relabeler::EventRelabeler;
use erp_relabel::taxonomy::LabelTaxonomy;
use erp_relabel::types::{
    Correctness, PrimeAge, PrimeGender, ResponseButton, TargetGender, TrialRecord, TriggerEvent,
};
use proptest::prelude::*;

fn trial_strategy() -> impl Strategy<Value = TrialRecord> {
    (
        prop_oneof![
            Just(PrimeGender::Female),
            Just(PrimeGender::Male),
            Just(PrimeGender::Neutral),
            Just(PrimeGender::Filler),
        ],
        prop_oneof![
            Just(PrimeAge::Adult),
            Just(PrimeAge::Child),
            Just(PrimeAge::Neutral),
        ],
        prop_oneof![
            Just(TargetGender::Female),
            Just(TargetGender::Male),
            Just(TargetGender::Neutral),
            Just(TargetGender::Control),
        ],
        prop_oneof![Just(Correctness::Correct), Just(Correctness::Incorrect)],
        prop_oneof![Just(ResponseButton::M), Just(ResponseButton::Z)],
    )
        .prop_map(|(prime_gender, age, target_gender, correctness, response)| TrialRecord {
            prime_gender,
            prime_age: (prime_gender != PrimeGender::Filler).then_some(age),
            target_gender,
            correctness,
            response,
        })
}

fn noise_code() -> impl Strategy<Value = u32> {
    (1u32..300).prop_filter("condition code", |c| ![10, 20, 30].contains(c))
}

/// Per trial: whether the target and response triggers were recorded, and
/// stray codes written after the prime
fn layout_strategy() -> impl Strategy<Value = (bool, bool, Vec<u32>)> {
    (any::<bool>(), any::<bool>(), prop::collection::vec(noise_code(), 0..3))
}

/// A session: trial log plus a trigger stream with one prime per row
fn session_strategy() -> impl Strategy<Value = (Vec<TrialRecord>, Vec<TriggerEvent>)> {
    (
        prop::collection::vec((trial_strategy(), layout_strategy()), 1..25),
        prop::collection::vec(noise_code(), 0..3),
    )
        .prop_map(|(trials, leading_noise)| {
            let mut events = Vec::new();
            let mut sample = 0i64;
            let mut push = |code: u32, events: &mut Vec<TriggerEvent>| {
                sample += 137;
                events.push(TriggerEvent::new(sample, 0, code));
            };

            for code in leading_noise {
                push(code, &mut events);
            }
            let mut records = Vec::with_capacity(trials.len());
            for (trial, (has_target, has_response, noise)) in trials {
                push(10, &mut events);
                for code in noise {
                    push(code, &mut events);
                }
                if has_target {
                    push(20, &mut events);
                }
                if has_response {
                    push(30, &mut events);
                }
                records.push(trial);
            }
            (records, events)
        })
}

fn is_condition_code(code: u32) -> bool {
    matches!(code, 10 | 20 | 30)
}

proptest! {
    #[test]
    fn emitted_count_equals_condition_triggers((trials, events) in session_strategy()) {
        for convention in [Convention::A, Convention::B] {
            let taxonomy = convention.taxonomy();
            let result = EventRelabeler::new(&taxonomy, convention)
                .relabel(&events, &trials)
                .unwrap();

            let expected = events.iter().filter(|e| is_condition_code(e.code)).count();
            prop_assert_eq!(result.events.len(), expected);
            prop_assert_eq!(result.summary.dropped_events, events.len() - expected);
            prop_assert!(result.events.iter().all(|e| taxonomy.contains_code(e.event.code)));
        }
    }

    #[test]
    fn nth_prime_consumes_nth_row((trials, events) in session_strategy()) {
        let taxonomy = LabelTaxonomy::convention_a();
        let result = EventRelabeler::new(&taxonomy, Convention::A)
            .relabel(&events, &trials)
            .unwrap();

        let prime_rows: Vec<usize> = result
            .events
            .iter()
            .filter(|e| e.label.as_deref().is_some_and(|l| l.starts_with("word/prime/")))
            .filter_map(|e| e.trial)
            .collect();
        let expected: Vec<usize> = (0..trials.len()).collect();
        prop_assert_eq!(prime_rows, expected);
        prop_assert_eq!(result.summary.trials_consumed, trials.len());
    }

    #[test]
    fn onsets_are_preserved((trials, events) in session_strategy()) {
        let taxonomy = LabelTaxonomy::convention_b();
        let result = EventRelabeler::new(&taxonomy, Convention::B)
            .unmapped(UnmappedPolicy::PassThrough)
            .relabel(&events, &trials)
            .unwrap();

        prop_assert_eq!(result.events.len(), events.len());
        for (raw, out) in events.iter().zip(&result.events) {
            prop_assert_eq!(raw.sample, out.event.sample);
            prop_assert_eq!(raw.previous, out.event.previous);
            if !is_condition_code(raw.code) {
                prop_assert_eq!(raw.code, out.event.code);
            }
        }
    }

    #[test]
    fn restrict_is_idempotent(codes in prop::collection::vec(0u32..300, 0..40)) {
        let taxonomy = LabelTaxonomy::convention_a();
        let once = restrict(&taxonomy, codes.iter().copied());
        let twice = restrict(&once, codes.iter().copied());
        prop_assert_eq!(&once, &twice);

        for (label, code) in once.iter() {
            prop_assert!(codes.contains(&code));
            prop_assert_eq!(taxonomy.code(label).unwrap(), code);
        }
    }

    #[test]
    fn restricted_taxonomy_covers_relabeled_stream((trials, events) in session_strategy()) {
        let taxonomy = LabelTaxonomy::convention_a();
        let relabeled = EventRelabeler::new(&taxonomy, Convention::A)
            .relabel(&events, &trials)
            .unwrap()
            .trigger_events();

        let event_id = restrict(&taxonomy, observed_codes(&relabeled));
        prop_assert!(relabeled.iter().all(|e| event_id.contains_code(e.code)));
        prop_assert_eq!(event_id.len(), observed_codes(&relabeled).len());
    }

    #[test]
    fn conventions_agree_on_congruent_trials(
        genders in prop::collection::vec(any::<bool>(), 1..15),
        correct in any::<bool>(),
        button_m in any::<bool>(),
    ) {
        let trials: Vec<TrialRecord> = genders
            .iter()
            .map(|&female| TrialRecord {
                prime_gender: if female { PrimeGender::Female } else { PrimeGender::Male },
                prime_age: Some(PrimeAge::Adult),
                target_gender: if female { TargetGender::Female } else { TargetGender::Male },
                correctness: if correct { Correctness::Correct } else { Correctness::Incorrect },
                response: if button_m { ResponseButton::M } else { ResponseButton::Z },
            })
            .collect();
        let events: Vec<TriggerEvent> = (0..trials.len() as i64)
            .flat_map(|i| {
                [
                    TriggerEvent::new(i * 1000, 0, 10),
                    TriggerEvent::new(i * 1000 + 200, 0, 20),
                    TriggerEvent::new(i * 1000 + 500, 0, 30),
                ]
            })
            .collect();

        let a = Convention::A.taxonomy();
        let b = Convention::B.taxonomy();
        let with_a = EventRelabeler::new(&a, Convention::A).relabel(&events, &trials).unwrap();
        let with_b = EventRelabeler::new(&b, Convention::B).relabel(&events, &trials).unwrap();

        prop_assert_eq!(with_a.trigger_events(), with_b.trigger_events());
    }
}
