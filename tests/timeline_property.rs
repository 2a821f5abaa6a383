#[macro_use]
extern crate proptest;

use proptest::prelude::{Strategy, any, prop};

use waypoint::stage::{ClassifiedStage, StageEvent, StageKind, classify};
use waypoint::timeline::Timeline;

// Generators for classified milestone events

fn retrieval_stage(source_count: usize) -> ClassifiedStage {
    let sources: Vec<serde_json::Value> = (0..source_count)
        .map(|i| serde_json::json!({"url": format!("https://example.com/{i}")}))
        .collect();
    let event = StageEvent::new("retrieval", serde_json::json!({"sources": sources}));
    classify(&event).expect("retrieval always classifies")
}

fn reflection_stage(is_sufficient: Option<bool>, follow_up: &str) -> ClassifiedStage {
    let payload = match is_sufficient {
        Some(sufficient) => {
            serde_json::json!({"isSufficient": sufficient, "followUps": [follow_up]})
        }
        None => serde_json::json!({}),
    };
    classify(&StageEvent::new("reflection", payload)).expect("reflection always classifies")
}

fn follow_up_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9 ]{0,12}").unwrap()
}

proptest! {
    /// N events of a repeatable kind yield exactly N entries, in arrival order.
    #[test]
    fn prop_repeatable_events_accumulate(counts in prop::collection::vec(0usize..6, 1..32)) {
        let mut timeline = Timeline::new();
        for &count in &counts {
            timeline.apply_classified(retrieval_stage(count));
        }

        prop_assert_eq!(timeline.len(), counts.len());
        for (entry, &count) in timeline.iter().zip(&counts) {
            let expected = if count == 0 {
                "Searching...".to_string()
            } else {
                format!("Gathered {count} sources.")
            };
            prop_assert_eq!(&entry.data, &expected);
        }
    }

    /// N >= 1 events of a singleton kind collapse to one entry equal to the
    /// classification of the last event, at the position of the first.
    #[test]
    fn prop_singleton_events_collapse_to_the_last(
        states in prop::collection::vec((prop::option::of(any::<bool>()), follow_up_strategy()), 1..16),
    ) {
        let mut timeline = Timeline::new();
        // A repeatable entry first, so the singleton's position is not trivially zero.
        timeline.apply_classified(retrieval_stage(1));

        for (is_sufficient, follow_up) in &states {
            timeline.apply_classified(reflection_stage(*is_sufficient, follow_up));
        }

        prop_assert_eq!(timeline.len(), 2);
        let (last_state, last_follow_up) = states.last().unwrap();
        let expected = reflection_stage(*last_state, last_follow_up).descriptor;
        prop_assert_eq!(&timeline.entries()[1], &expected);
    }

    /// Singleton replacement never disturbs surrounding entries.
    #[test]
    fn prop_replacement_preserves_untouched_order(
        prefix in 1usize..8,
        suffix in 1usize..8,
        updates in 1usize..6,
    ) {
        let mut timeline = Timeline::new();
        for i in 0..prefix {
            timeline.apply_classified(retrieval_stage(i));
        }
        timeline.apply_classified(reflection_stage(None, ""));
        for i in 0..suffix {
            timeline.apply_classified(retrieval_stage(prefix + i));
        }

        let before: Vec<String> = timeline.iter().map(|e| e.data.clone()).collect();
        for _ in 0..updates {
            timeline.apply_classified(reflection_stage(Some(true), ""));
        }

        prop_assert_eq!(timeline.len(), prefix + suffix + 1);
        // Everything except the singleton slot is byte-identical.
        for (index, entry) in timeline.iter().enumerate() {
            if index == prefix {
                prop_assert_eq!(
                    &entry.data,
                    "Search successful, generating final answer."
                );
            } else {
                prop_assert_eq!(&entry.data, &before[index]);
            }
        }
    }

    /// Classification is deterministic across repeated calls.
    #[test]
    fn prop_classify_is_deterministic(count in 0usize..6) {
        let event = StageEvent::new(
            "retrieval",
            serde_json::json!({"sources": vec![serde_json::json!({}); count]}),
        );
        prop_assert_eq!(classify(&event), classify(&event));
    }

    /// Unknown stage kinds never classify, whatever their payload looks like.
    #[test]
    fn prop_unknown_kinds_classify_to_nothing(
        key in prop::string::string_regex("[a-z][a-z_-]{0,12}").unwrap(),
        value in 0u32..1000,
    ) {
        prop_assume!(StageKind::decode(&key).is_none());
        let event = StageEvent::new(key, serde_json::json!({"value": value}));
        prop_assert_eq!(classify(&event), None);
    }
}
