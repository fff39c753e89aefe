use std::collections::BTreeSet;
use std::fmt;

use super::model::{Dataset, NumericRange, Record};

// ---------------------------------------------------------------------------
// Choice: single-select categorical filter with an "All" option
// ---------------------------------------------------------------------------

/// Selection from a single-choice categorical widget.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Choice {
    #[default]
    All,
    Only(String),
}

impl Choice {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(wanted) => wanted == value,
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::All => write!(f, "All"),
            Choice::Only(v) => write!(f, "{v}"),
        }
    }
}

// ---------------------------------------------------------------------------
// FilterCriteria: the full predicate set driven by the sidebar
// ---------------------------------------------------------------------------

/// User-selected predicates. A record passes when it satisfies all of them.
///
/// An empty `personalities` set means nothing is selected, so nothing passes.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub personalities: BTreeSet<String>,
    pub stage_fear: Choice,
    pub drained: Choice,
    pub alone_range: NumericRange,
    pub friends_range: NumericRange,
    pub post_range: NumericRange,
}

impl FilterCriteria {
    /// Criteria that pass every row of `dataset`: all observed personalities,
    /// `All` for both choices, ranges at the observed bounds.
    pub fn defaults_for(dataset: &Dataset) -> Self {
        let (alone_range, friends_range, post_range) = match dataset.bounds {
            Some(b) => (b.time_spent_alone, b.friends_circle_size, b.post_frequency),
            None => (
                NumericRange::unbounded(),
                NumericRange::unbounded(),
                NumericRange::unbounded(),
            ),
        };
        FilterCriteria {
            personalities: dataset.personalities.iter().cloned().collect(),
            stage_fear: Choice::All,
            drained: Choice::All,
            alone_range,
            friends_range,
            post_range,
        }
    }

    pub fn accepts(&self, record: &Record) -> bool {
        self.personalities.contains(&record.personality)
            && self.stage_fear.matches(&record.stage_fear)
            && self.drained.matches(&record.drained_after_socializing)
            && self.alone_range.contains(record.time_spent_alone)
            && self.friends_range.contains(record.friends_circle_size as f64)
            && self.post_range.contains(record.post_frequency)
    }
}

/// Return indices of records that pass all active filters.
pub fn filtered_indices(dataset: &Dataset, criteria: &FilterCriteria) -> Vec<usize> {
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, r)| criteria.accepts(r))
        .map(|(i, _)| i)
        .collect()
}

/// The order-preserving subset of `dataset` accepted by `criteria`.
pub fn filter(dataset: &Dataset, criteria: &FilterCriteria) -> Dataset {
    let records = dataset
        .records()
        .iter()
        .filter(|r| criteria.accepts(r))
        .cloned()
        .collect();
    Dataset::from_records(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::four_rows;

    #[test]
    fn defaults_pass_everything() {
        let ds = four_rows();
        let criteria = FilterCriteria::defaults_for(&ds);
        assert_eq!(filter(&ds, &criteria), ds);
    }

    #[test]
    fn personality_subset_keeps_order() {
        let ds = four_rows();
        let mut criteria = FilterCriteria::defaults_for(&ds);
        criteria.personalities = ["Extrovert".to_string()].into_iter().collect();

        assert_eq!(filtered_indices(&ds, &criteria), vec![1, 3]);
        let out = filter(&ds, &criteria);
        assert_eq!(out.len(), 2);
        assert!(out.records().iter().all(|r| r.personality == "Extrovert"));
        assert_eq!(out.records()[0].time_spent_alone, 1.0);
        assert_eq!(out.records()[1].time_spent_alone, 2.0);
    }

    #[test]
    fn empty_personality_set_passes_nothing() {
        let ds = four_rows();
        let mut criteria = FilterCriteria::defaults_for(&ds);
        criteria.personalities.clear();
        assert!(filter(&ds, &criteria).is_empty());
    }

    #[test]
    fn choices_and_ranges_combine_with_and() {
        let ds = four_rows();
        let mut criteria = FilterCriteria::defaults_for(&ds);
        criteria.stage_fear = Choice::Only("Yes".into());
        criteria.alone_range = NumericRange::new(5.5, 6.0);
        assert_eq!(filtered_indices(&ds, &criteria), vec![2]);

        criteria.drained = Choice::Only("No".into());
        assert!(filtered_indices(&ds, &criteria).is_empty());
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let ds = four_rows();
        let mut criteria = FilterCriteria::defaults_for(&ds);
        criteria.friends_range = NumericRange::new(8.0, 10.0);
        assert_eq!(filtered_indices(&ds, &criteria), vec![1, 3]);
    }

    #[test]
    fn inverted_range_yields_empty_result() {
        let ds = four_rows();
        let mut criteria = FilterCriteria::defaults_for(&ds);
        criteria.post_range = NumericRange::new(9.0, 0.0);
        assert!(filter(&ds, &criteria).is_empty());
    }

    #[test]
    fn empty_dataset_filters_to_empty() {
        let ds = Dataset::default();
        let criteria = FilterCriteria::defaults_for(&ds);
        assert!(filter(&ds, &criteria).is_empty());
    }
}
