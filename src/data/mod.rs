/// Data layer: typed records, loading, filtering and summaries.
///
/// Architecture:
/// ```text
///  URL / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐     ┌──────────────┐
///   │  loader   │ ──▶ │    cache      │  one Arc<Dataset> per source
///   └──────────┘     └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Record>, observed categories and bounds
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterCriteria → filtered Dataset
///   └──────────┘
///        │
///        ▼
///   ┌───────────────────┐
///   │ summary / charts   │  KPIs, grouped means, plot aggregates
///   └───────────────────┘
/// ```

pub mod cache;
pub mod charts;
pub mod filter;
pub mod loader;
pub mod model;
pub mod summary;
