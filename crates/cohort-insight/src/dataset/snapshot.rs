use super::loader::DatasetLoader;
use super::table::TabularDataset;
use crate::config::DataConfig;
use crate::residency::ResidencyArchive;
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, warn};

/// Everything a query reads, loaded together and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct DatasetSnapshot {
    pub scores: TabularDataset,
    pub ranks: TabularDataset,
    pub residency: ResidencyArchive,
    pub loaded_at: DateTime<Utc>,
}

impl DatasetSnapshot {
    pub fn new(scores: TabularDataset, ranks: TabularDataset, residency: ResidencyArchive) -> Self {
        Self {
            scores,
            ranks,
            residency,
            loaded_at: Utc::now(),
        }
    }

    pub fn empty(id_column: &str) -> Self {
        Self::new(
            TabularDataset::empty(id_column),
            TabularDataset::empty(id_column),
            ResidencyArchive::default(),
        )
    }

    /// Load all configured exports. A file that cannot be read degrades to an
    /// empty dataset so the service still answers (with "not found").
    pub fn load(config: &DataConfig) -> Self {
        let scores = load_or_empty(&config.scores_path, &config.id_column, "scores");
        let ranks = load_or_empty(&config.ranks_path, &config.id_column, "ranks");
        let residency = ResidencyArchive::load_dir(&config.residency_dir);

        info!(
            scores = scores.count(),
            ranks = ranks.count(),
            "analytics snapshot built"
        );

        Self::new(scores, ranks, residency)
    }
}

fn load_or_empty(path: &Path, id_column: &str, kind: &'static str) -> TabularDataset {
    match DatasetLoader::from_path(path, id_column) {
        Ok(dataset) => dataset,
        Err(err) => {
            warn!(kind, path = %path.display(), error = %err, "dataset unavailable; serving empty table");
            TabularDataset::empty(id_column)
        }
    }
}

/// Holder of the current snapshot. Readers take a cheap `Arc` clone; reload
/// swaps the whole snapshot in one write so in-flight queries keep a
/// consistent view.
#[derive(Debug)]
pub struct SnapshotStore {
    current: RwLock<Arc<DatasetSnapshot>>,
}

impl SnapshotStore {
    pub fn new(snapshot: DatasetSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    pub fn current(&self) -> Arc<DatasetSnapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Install `snapshot`, returning the one it replaced.
    pub fn replace(&self, snapshot: DatasetSnapshot) -> Arc<DatasetSnapshot> {
        self.install(Arc::new(snapshot))
    }

    /// Rebuild from the configured exports and install; returns the snapshot
    /// this call installed, even if another reload lands right after it.
    pub fn reload(&self, config: &DataConfig) -> Arc<DatasetSnapshot> {
        let next = Arc::new(DatasetSnapshot::load(config));
        self.install(Arc::clone(&next));
        next
    }

    fn install(&self, next: Arc<DatasetSnapshot>) -> Arc<DatasetSnapshot> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }
}
