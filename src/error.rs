/// Failures while turning a data source into a [`Dataset`](crate::data::model::Dataset).
///
/// These are the only errors the dashboard treats as blocking: an empty
/// filter result or an undefined statistic is a value, not an error.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("could not fetch {url}: {reason}")]
    Unreachable { url: String, reason: String },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("schema mismatch: missing columns {missing:?}, unexpected columns {unexpected:?}")]
    SchemaMismatch {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    /// `row` is the 1-based data row, or 0 for problems before the first row.
    #[error("malformed row {row}: {reason}")]
    Malformed { row: usize, reason: String },

    #[error("row {row}: invalid value {value} in column {column}")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },
}

impl LoadError {
    /// Short category label for the status bar.
    pub fn kind(&self) -> &'static str {
        match self {
            LoadError::Io { .. } => "I/O error",
            LoadError::Unreachable { .. } => "network error",
            LoadError::UnsupportedFormat(_) => "unsupported format",
            LoadError::SchemaMismatch { .. } => "schema mismatch",
            LoadError::Malformed { .. } | LoadError::InvalidValue { .. } => "malformed data",
        }
    }
}
