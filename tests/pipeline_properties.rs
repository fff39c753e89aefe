use std::collections::BTreeSet;

use personality_dashboard::data::filter::{filter, filtered_indices, Choice, FilterCriteria};
use personality_dashboard::data::model::{Dataset, NumericRange, Record};
use personality_dashboard::data::summary::summarize;
use proptest::prelude::*;

fn record_strategy() -> impl Strategy<Value = Record> {
    (
        0.0..12.0f64,
        any::<bool>(),
        0.0..10.0f64,
        0.0..8.0f64,
        any::<bool>(),
        0u32..16,
        0.0..11.0f64,
        prop::sample::select(vec!["Introvert", "Extrovert"]),
    )
        .prop_map(
            |(alone, fear, social, outside, drained, friends, post, personality)| Record {
                time_spent_alone: alone,
                stage_fear: if fear { "Yes" } else { "No" }.to_string(),
                social_event_attendance: social,
                going_outside: outside,
                drained_after_socializing: if drained { "Yes" } else { "No" }.to_string(),
                friends_circle_size: friends,
                post_frequency: post,
                personality: personality.to_string(),
            },
        )
}

fn dataset_strategy() -> impl Strategy<Value = Dataset> {
    prop::collection::vec(record_strategy(), 0..60).prop_map(Dataset::from_records)
}

fn range_strategy(lo: f64, hi: f64) -> impl Strategy<Value = NumericRange> {
    (lo..hi, lo..hi).prop_map(|(a, b)| NumericRange::new(a.min(b), a.max(b)))
}

fn choice_strategy() -> impl Strategy<Value = Choice> {
    prop_oneof![
        Just(Choice::All),
        Just(Choice::Only("Yes".to_string())),
        Just(Choice::Only("No".to_string())),
    ]
}

fn criteria_strategy() -> impl Strategy<Value = FilterCriteria> {
    (
        prop::sample::subsequence(vec!["Introvert", "Extrovert"], 0..=2),
        choice_strategy(),
        choice_strategy(),
        range_strategy(-1.0, 13.0),
        range_strategy(-1.0, 17.0),
        range_strategy(-1.0, 12.0),
    )
        .prop_map(
            |(personalities, stage_fear, drained, alone_range, friends_range, post_range)| {
                FilterCriteria {
                    personalities: personalities
                        .into_iter()
                        .map(str::to_string)
                        .collect::<BTreeSet<_>>(),
                    stage_fear,
                    drained,
                    alone_range,
                    friends_range,
                    post_range,
                }
            },
        )
}

proptest! {
    #[test]
    fn result_is_ordered_subsequence_of_matching_rows(
        ds in dataset_strategy(),
        c in criteria_strategy(),
    ) {
        let indices = filtered_indices(&ds, &c);
        prop_assert!(indices.windows(2).all(|w| w[0] < w[1]));

        let out = filter(&ds, &c);
        prop_assert_eq!(out.len(), indices.len());
        for (r, &i) in out.records().iter().zip(&indices) {
            prop_assert_eq!(r, &ds.records()[i]);
            prop_assert!(c.personalities.contains(&r.personality));
            prop_assert!(c.stage_fear.matches(&r.stage_fear));
            prop_assert!(c.drained.matches(&r.drained_after_socializing));
            prop_assert!(c.alone_range.contains(r.time_spent_alone));
            prop_assert!(c.friends_range.contains(r.friends_circle_size as f64));
            prop_assert!(c.post_range.contains(r.post_frequency));
        }

        // Every rejected row fails at least one predicate.
        for (i, r) in ds.records().iter().enumerate() {
            if !indices.contains(&i) {
                prop_assert!(!c.accepts(r));
            }
        }
    }

    #[test]
    fn default_criteria_return_the_whole_dataset(ds in dataset_strategy()) {
        let c = FilterCriteria::defaults_for(&ds);
        prop_assert_eq!(filter(&ds, &c), ds);
    }

    #[test]
    fn filtering_is_idempotent(ds in dataset_strategy(), c in criteria_strategy()) {
        let once = filter(&ds, &c);
        let twice = filter(&once, &c);
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn narrowing_a_range_never_grows_the_result(
        ds in dataset_strategy(),
        c in criteria_strategy(),
        shrink_lo in 0.0..3.0f64,
        shrink_hi in 0.0..3.0f64,
        which in 0usize..3,
    ) {
        let mut narrowed = c.clone();
        let range = match which {
            0 => &mut narrowed.alone_range,
            1 => &mut narrowed.friends_range,
            _ => &mut narrowed.post_range,
        };
        *range = NumericRange::new(range.min + shrink_lo, range.max - shrink_hi);

        prop_assert!(filter(&ds, &narrowed).len() <= filter(&ds, &c).len());
    }

    #[test]
    fn summary_means_stay_within_observed_bounds(ds in dataset_strategy()) {
        let s = summarize(ds.records());
        match ds.bounds {
            None => prop_assert!(s.is_insufficient()),
            Some(b) => {
                let mean = s.mean_time_alone.unwrap();
                prop_assert!(mean >= b.time_spent_alone.min - 1e-9);
                prop_assert!(mean <= b.time_spent_alone.max + 1e-9);
                let personality = s.most_common_personality.unwrap();
                prop_assert!(ds.personalities.contains(&personality));
                prop_assert_eq!(s.group_mean_time_alone.len(), ds.personalities.len());
            }
        }
    }
}
