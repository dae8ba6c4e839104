use crate::error::DatasetError;
use crate::loader::load_records_file;
use analytics::MetricsEngine;
use chrono::{DateTime, Utc};
use core_types::{EnrichedRecord, Facets};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

/// Identifies one version of the source file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFingerprint {
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
    pub len: u64,
}

impl SourceFingerprint {
    pub fn of(path: &Path) -> Result<Self, DatasetError> {
        let metadata = std::fs::metadata(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            modified: metadata.modified().ok(),
            len: metadata.len(),
        })
    }
}

/// The loaded and enriched dataset, shared read-only between requests.
#[derive(Debug)]
pub struct LoadedDataset {
    pub records: Vec<EnrichedRecord>,
    pub facets: Facets,
    pub loaded_at: DateTime<Utc>,
    pub fingerprint: SourceFingerprint,
}

/// Memoizes load + enrich for one source file.
///
/// The cached dataset is reused while the file's path, modification time and
/// length are unchanged. Filtering and aggregation are never cached.
#[derive(Debug)]
pub struct DatasetCache {
    source: PathBuf,
    engine: MetricsEngine,
    cached: Option<Arc<LoadedDataset>>,
}

impl DatasetCache {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            engine: MetricsEngine::new(),
            cached: None,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn is_cached(&self) -> bool {
        self.cached.is_some()
    }

    /// Returns the cached dataset, reloading it first if the file changed.
    pub fn get_or_load(&mut self) -> Result<Arc<LoadedDataset>, DatasetError> {
        let fingerprint = SourceFingerprint::of(&self.source)?;

        if let Some(cached) = &self.cached {
            if cached.fingerprint == fingerprint {
                return Ok(Arc::clone(cached));
            }
            tracing::info!(path = %self.source.display(), "Dataset source changed, reloading.");
        }

        let records = self.engine.enrich(&load_records_file(&self.source)?);
        let dataset = Arc::new(LoadedDataset {
            facets: Facets::observe(&records),
            records,
            loaded_at: Utc::now(),
            fingerprint,
        });
        self.cached = Some(Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Drops the cached dataset so the next `get_or_load` reads the file again.
    pub fn invalidate(&mut self) {
        if self.cached.take().is_some() {
            tracing::debug!(path = %self.source.display(), "Dataset cache invalidated.");
        }
    }
}
