use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

pub const TIME_SPENT_ALONE: &str = "Time_spent_Alone";
pub const STAGE_FEAR: &str = "Stage_fear";
pub const SOCIAL_EVENT_ATTENDANCE: &str = "Social_event_attendance";
pub const GOING_OUTSIDE: &str = "Going_outside";
pub const DRAINED_AFTER_SOCIALIZING: &str = "Drained_after_socializing";
pub const FRIENDS_CIRCLE_SIZE: &str = "Friends_circle_size";
pub const POST_FREQUENCY: &str = "Post_frequency";
pub const PERSONALITY: &str = "Personality";

/// The exact column set every source must carry (case-sensitive), in the
/// order the cleaned survey file uses.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    TIME_SPENT_ALONE,
    STAGE_FEAR,
    SOCIAL_EVENT_ATTENDANCE,
    GOING_OUTSIDE,
    DRAINED_AFTER_SOCIALIZING,
    FRIENDS_CIRCLE_SIZE,
    POST_FREQUENCY,
    PERSONALITY,
];

// ---------------------------------------------------------------------------
// Record – one survey respondent
// ---------------------------------------------------------------------------

/// One respondent's survey row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    #[serde(rename = "Time_spent_Alone")]
    pub time_spent_alone: f64,
    #[serde(rename = "Stage_fear")]
    pub stage_fear: String,
    #[serde(rename = "Social_event_attendance")]
    pub social_event_attendance: f64,
    #[serde(rename = "Going_outside")]
    pub going_outside: f64,
    #[serde(rename = "Drained_after_socializing")]
    pub drained_after_socializing: String,
    #[serde(rename = "Friends_circle_size")]
    pub friends_circle_size: u32,
    #[serde(rename = "Post_frequency")]
    pub post_frequency: f64,
    #[serde(rename = "Personality")]
    pub personality: String,
}

// ---------------------------------------------------------------------------
// NumericRange – inclusive [min, max]
// ---------------------------------------------------------------------------

/// Inclusive numeric interval. A range with `min > max` contains nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    pub fn new(min: f64, max: f64) -> Self {
        NumericRange { min, max }
    }

    /// A range that admits every finite value.
    pub fn unbounded() -> Self {
        NumericRange {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Smallest range covering every value, `None` for an empty iterator.
    pub fn covering(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some(NumericRange::new(v, v)),
            Some(r) => Some(NumericRange::new(r.min.min(v), r.max.max(v))),
        })
    }
}

impl fmt::Display for NumericRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// Observed `[min, max]` of the three filterable numeric columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub time_spent_alone: NumericRange,
    pub friends_circle_size: NumericRange,
    pub post_frequency: NumericRange,
}

/// Ordered rows plus attributes derived once at construction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    records: Vec<Record>,
    /// Observed `Personality` values, first-encountered order.
    pub personalities: Vec<String>,
    /// Observed `Stage_fear` values, first-encountered order.
    pub stage_fear_values: Vec<String>,
    /// Observed `Drained_after_socializing` values, first-encountered order.
    pub drained_values: Vec<String>,
    /// `None` for an empty dataset.
    pub bounds: Option<Bounds>,
}

impl Dataset {
    /// Build column indices from the loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut personalities = Vec::new();
        let mut stage_fear_values = Vec::new();
        let mut drained_values = Vec::new();

        for r in &records {
            push_unique(&mut personalities, &r.personality);
            push_unique(&mut stage_fear_values, &r.stage_fear);
            push_unique(&mut drained_values, &r.drained_after_socializing);
        }

        let bounds = match (
            NumericRange::covering(records.iter().map(|r| r.time_spent_alone)),
            NumericRange::covering(records.iter().map(|r| r.friends_circle_size as f64)),
            NumericRange::covering(records.iter().map(|r| r.post_frequency)),
        ) {
            (Some(time_spent_alone), Some(friends_circle_size), Some(post_frequency)) => {
                Some(Bounds {
                    time_spent_alone,
                    friends_circle_size,
                    post_frequency,
                })
            }
            _ => None,
        };

        Dataset {
            records,
            personalities,
            stage_fear_values,
            drained_values,
            bounds,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}
