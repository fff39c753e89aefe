use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::cache::SourceCache;
use crate::data::filter::{filter, Choice, FilterCriteria};
use crate::data::loader::{load_source, DataSource};
use crate::data::model::{Dataset, NumericRange};
use crate::data::summary::{summarize, Summary};

// ---------------------------------------------------------------------------
// Navigation and KPI scope
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    DatasetPreview,
}

/// Which rows the KPI row summarizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KpiScope {
    #[default]
    Filtered,
    FullDataset,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full session state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Datasets loaded this session, keyed by source.
    pub cache: SourceCache,

    /// Active dataset (None until a source loads successfully).
    pub dataset: Option<Arc<Dataset>>,
    pub source: Option<DataSource>,

    /// Current sidebar selections.
    pub criteria: FilterCriteria,

    /// Rows passing `criteria` (recomputed on every change).
    pub filtered: Dataset,
    pub filtered_summary: Summary,
    pub full_summary: Summary,

    pub color_map: ColorMap,
    pub view: View,
    pub kpi_scope: KpiScope,
    /// Preview table shows only filtered rows.
    pub preview_filtered: bool,

    /// Text of the URL field in the top bar.
    pub url_input: String,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let empty = Dataset::default();
        Self {
            url_input: config.source.url.clone(),
            criteria: FilterCriteria::defaults_for(&empty),
            filtered: empty,
            filtered_summary: Summary::default(),
            full_summary: Summary::default(),
            color_map: ColorMap::default(),
            cache: SourceCache::new(),
            dataset: None,
            source: None,
            view: View::default(),
            kpi_scope: KpiScope::default(),
            preview_filtered: false,
            status_message: None,
            config,
        }
    }

    /// Load `source` (through the cache) and make it the active dataset.
    ///
    /// On failure the previous dataset stays active and the error is shown.
    pub fn load(&mut self, source: DataSource) {
        let timeout = self.config.timeout();
        match self
            .cache
            .get_or_load(&source, |s| load_source(s, timeout))
        {
            Ok(dataset) => {
                self.source = Some(source);
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load {source}: {e}");
                self.status_message = Some(format!("{}: {e}", e.kind()));
            }
        }
    }

    /// Ingest a newly loaded dataset, initialise filters and colours.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.criteria = FilterCriteria::defaults_for(&dataset);
        self.color_map = ColorMap::new(&dataset.personalities, &self.config.charts.palette);
        self.full_summary = summarize(dataset.records());
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the filtered view and its summary after a filter change.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        self.filtered = filter(ds, &self.criteria);
        self.filtered_summary = summarize(self.filtered.records());
        log::debug!("{} of {} records pass the filters", self.filtered.len(), ds.len());
    }

    /// The summary the KPI row should show.
    pub fn kpi_summary(&self) -> &Summary {
        match self.kpi_scope {
            KpiScope::Filtered => &self.filtered_summary,
            KpiScope::FullDataset => &self.full_summary,
        }
    }

    /// Personality types of the loaded dataset, first-seen order.
    pub fn personalities(&self) -> &[String] {
        self.dataset
            .as_ref()
            .map(|ds| ds.personalities.as_slice())
            .unwrap_or(&[])
    }

    /// Toggle a single personality type in the multi-select.
    pub fn toggle_personality(&mut self, personality: &str) {
        if !self.criteria.personalities.remove(personality) {
            self.criteria.personalities.insert(personality.to_string());
        }
        self.refilter();
    }

    /// Select every observed personality type.
    pub fn select_all_personalities(&mut self) {
        self.criteria.personalities = self.personalities().iter().cloned().collect();
        self.refilter();
    }

    /// Deselect every personality type.
    pub fn select_no_personalities(&mut self) {
        self.criteria.personalities.clear();
        self.refilter();
    }

    pub fn set_stage_fear(&mut self, choice: Choice) {
        self.criteria.stage_fear = choice;
        self.refilter();
    }

    pub fn set_drained(&mut self, choice: Choice) {
        self.criteria.drained = choice;
        self.refilter();
    }

    /// Replace one of the three numeric ranges.
    pub fn set_range(&mut self, which: RangeFilter, range: NumericRange) {
        match which {
            RangeFilter::TimeAlone => self.criteria.alone_range = range,
            RangeFilter::FriendsCircle => self.criteria.friends_range = range,
            RangeFilter::PostFrequency => self.criteria.post_range = range,
        }
        self.refilter();
    }

    /// Back to "everything selected".
    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            self.criteria = FilterCriteria::defaults_for(ds);
            self.refilter();
        }
    }
}

/// The numeric range filters shown as slider pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeFilter {
    TimeAlone,
    FriendsCircle,
    PostFrequency,
}

impl RangeFilter {
    pub const ALL: [RangeFilter; 3] = [
        RangeFilter::TimeAlone,
        RangeFilter::FriendsCircle,
        RangeFilter::PostFrequency,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RangeFilter::TimeAlone => "Time Spent Alone (hrs)",
            RangeFilter::FriendsCircle => "Friends Circle Size",
            RangeFilter::PostFrequency => "Post Frequency",
        }
    }

    /// Whole-number steps for integer columns.
    pub fn is_integer(self) -> bool {
        matches!(self, RangeFilter::FriendsCircle)
    }

    pub fn current(self, criteria: &FilterCriteria) -> NumericRange {
        match self {
            RangeFilter::TimeAlone => criteria.alone_range,
            RangeFilter::FriendsCircle => criteria.friends_range,
            RangeFilter::PostFrequency => criteria.post_range,
        }
    }

    /// Observed bounds of the column in `dataset`.
    pub fn bounds(self, dataset: &Dataset) -> Option<NumericRange> {
        let b = dataset.bounds?;
        Some(match self {
            RangeFilter::TimeAlone => b.time_spent_alone,
            RangeFilter::FriendsCircle => b.friends_circle_size,
            RangeFilter::PostFrequency => b.post_frequency,
        })
    }
}
