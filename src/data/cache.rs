use std::collections::HashMap;
use std::sync::Arc;

use super::loader::DataSource;
use super::model::Dataset;
use crate::error::LoadError;

/// Loaded datasets keyed by their source, kept for the life of the session.
///
/// Entries are never evicted and failed loads are not remembered, so a
/// source that failed once is retried on the next request.
#[derive(Debug, Default)]
pub struct SourceCache {
    entries: HashMap<DataSource, Arc<Dataset>>,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dataset for `source`, calling `load` only on a miss.
    pub fn get_or_load<F>(
        &mut self,
        source: &DataSource,
        load: F,
    ) -> Result<Arc<Dataset>, LoadError>
    where
        F: FnOnce(&DataSource) -> Result<Dataset, LoadError>,
    {
        if let Some(ds) = self.entries.get(source) {
            log::debug!("Cache hit for {source}");
            return Ok(Arc::clone(ds));
        }
        let dataset = Arc::new(load(source)?);
        self.entries.insert(source.clone(), Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn contains(&self, source: &DataSource) -> bool {
        self.entries.contains_key(source)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::data::model::tests::four_rows;

    #[test]
    fn second_request_is_served_from_cache() {
        let mut cache = SourceCache::new();
        let source = DataSource::Url("https://example.org/survey.csv".into());
        let calls = Cell::new(0);
        let loader = |_: &DataSource| {
            calls.set(calls.get() + 1);
            Ok(four_rows())
        };

        let first = cache.get_or_load(&source, loader).unwrap();
        let second = cache.get_or_load(&source, loader).unwrap();
        assert_eq!(calls.get(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn distinct_sources_load_separately() {
        let mut cache = SourceCache::new();
        let a = DataSource::File("a.csv".into());
        let b = DataSource::File("b.csv".into());
        cache.get_or_load(&a, |_| Ok(four_rows())).unwrap();
        cache.get_or_load(&b, |_| Ok(Dataset::default())).unwrap();
        assert!(cache.contains(&a) && cache.contains(&b));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn failures_are_not_cached() {
        let mut cache = SourceCache::new();
        let source = DataSource::File("broken.csv".into());
        let result =
            cache.get_or_load(&source, |_| Err(LoadError::UnsupportedFormat("xyz".into())));
        assert!(result.is_err());
        assert!(!cache.contains(&source));

        cache.get_or_load(&source, |_| Ok(four_rows())).unwrap();
        assert!(cache.contains(&source));
    }
}
