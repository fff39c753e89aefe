use std::collections::BTreeMap;

use super::model::Record;

/// Shown wherever a statistic is undefined.
pub const PLACEHOLDER: &str = "—";

// ---------------------------------------------------------------------------
// Summary – KPI values and grouped means
// ---------------------------------------------------------------------------

/// Scalar and grouped statistics of a set of records.
///
/// Every scalar is `None` when there are no rows to summarize.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Summary {
    pub row_count: usize,
    pub mean_time_alone: Option<f64>,
    pub mean_post_frequency: Option<f64>,
    /// Unrounded; round with [`round_to`] when displaying.
    pub mean_friends_circle: Option<f64>,
    pub most_common_personality: Option<String>,
    /// Mean `Time_spent_Alone` per observed personality.
    pub group_mean_time_alone: BTreeMap<String, f64>,
}

impl Summary {
    /// True when the statistics are undefined (no rows).
    pub fn is_insufficient(&self) -> bool {
        self.row_count == 0
    }
}

pub fn summarize(records: &[Record]) -> Summary {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for r in records {
        let entry = groups.entry(r.personality.as_str()).or_insert((0.0, 0));
        entry.0 += r.time_spent_alone;
        entry.1 += 1;
    }

    Summary {
        row_count: records.len(),
        mean_time_alone: mean(records.iter().map(|r| r.time_spent_alone)),
        mean_post_frequency: mean(records.iter().map(|r| r.post_frequency)),
        mean_friends_circle: mean(records.iter().map(|r| r.friends_circle_size as f64)),
        most_common_personality: mode_first(records.iter().map(|r| r.personality.as_str()))
            .map(str::to_string),
        group_mean_time_alone: groups
            .into_iter()
            .map(|(k, (sum, n))| (k.to_string(), sum / n as f64))
            .collect(),
    }
}

/// Arithmetic mean, `None` for no values.
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Most frequent value. Ties go to the value encountered first.
pub fn mode_first<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    // (value, count) in first-encountered order
    let mut counts: Vec<(&'a str, usize)> = Vec::new();
    for v in values {
        match counts.iter_mut().find(|(seen, _)| *seen == v) {
            Some((_, n)) => *n += 1,
            None => counts.push((v, 1)),
        }
    }

    let mut best: Option<(&'a str, usize)> = None;
    for (v, n) in counts {
        if best.map_or(true, |(_, best_n)| n > best_n) {
            best = Some((v, n));
        }
    }
    best.map(|(v, _)| v)
}

/// Round half away from zero to `places` decimals (5.25 → 5.3 at one place).
pub fn round_to(value: f64, places: u32) -> f64 {
    let scale = 10f64.powi(places as i32);
    (value * scale).round() / scale
}

/// Format a statistic for display, or the placeholder when it is undefined.
pub fn format_stat(value: Option<f64>, places: u32, unit: &str) -> String {
    match value {
        Some(v) => {
            let rounded = round_to(v, places);
            let text = format!("{rounded:.prec$}", prec = places as usize);
            if unit.is_empty() {
                text
            } else {
                format!("{text} {unit}")
            }
        }
        None => PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter, FilterCriteria};
    use crate::data::model::tests::four_rows;

    #[test]
    fn four_row_example() {
        let ds = four_rows();
        let s = summarize(ds.records());

        assert_eq!(s.row_count, 4);
        assert_eq!(s.mean_time_alone, Some(3.5));
        assert_eq!(s.mean_post_frequency, Some(4.25));
        assert_eq!(s.mean_friends_circle, Some(5.25));
        assert_eq!(round_to(s.mean_friends_circle.unwrap(), 1), 5.3);
        assert_eq!(s.most_common_personality.as_deref(), Some("Introvert"));
        assert_eq!(s.group_mean_time_alone["Introvert"], 5.5);
        assert_eq!(s.group_mean_time_alone["Extrovert"], 1.5);
    }

    #[test]
    fn extrovert_subset() {
        let ds = four_rows();
        let mut criteria = FilterCriteria::defaults_for(&ds);
        criteria.personalities = ["Extrovert".to_string()].into_iter().collect();
        let s = summarize(filter(&ds, &criteria).records());
        assert_eq!(s.mean_time_alone, Some(1.5));
        assert_eq!(s.most_common_personality.as_deref(), Some("Extrovert"));
    }

    #[test]
    fn empty_input_is_insufficient() {
        let s = summarize(&[]);
        assert!(s.is_insufficient());
        assert_eq!(s.mean_time_alone, None);
        assert_eq!(s.mean_post_frequency, None);
        assert_eq!(s.mean_friends_circle, None);
        assert_eq!(s.most_common_personality, None);
        assert!(s.group_mean_time_alone.is_empty());
    }

    #[test]
    fn mode_tie_goes_to_first_encountered() {
        assert_eq!(mode_first(["A", "B", "A", "B"]), Some("A"));
        assert_eq!(mode_first(["B", "A", "A", "B"]), Some("B"));
        assert_eq!(mode_first(["B", "A", "A"]), Some("A"));
        assert_eq!(mode_first(std::iter::empty::<&str>()), None);
    }

    #[test]
    fn formatting_uses_placeholder() {
        assert_eq!(format_stat(None, 2, "hrs"), PLACEHOLDER);
        assert_eq!(format_stat(Some(3.5), 2, "hrs"), "3.50 hrs");
        assert_eq!(format_stat(Some(5.25), 1, ""), "5.3");
    }
}
