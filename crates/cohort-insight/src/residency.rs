//! Residency placement rosters published per graduation year.

use crate::dataset::CellValue;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// Year served when a request names a year with no roster.
pub const DEFAULT_RESIDENCY_YEAR: &str = "2024";

const STATUS_WITH_POST: &str = "بوست";
const STATUS_WITHOUT_POST: &str = "بدون بوست";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementStatus {
    WithPost,
    WithoutPost,
    Other,
}

impl PlacementStatus {
    fn classify(raw: &str) -> Self {
        match raw.trim() {
            STATUS_WITH_POST => Self::WithPost,
            STATUS_WITHOUT_POST => Self::WithoutPost,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResidencyEntry {
    pub rank: CellValue,
    pub residency: String,
    pub status: String,
    pub placement: PlacementStatus,
}

#[derive(Debug, Deserialize)]
struct ResidencyRow {
    #[serde(rename = "RANK", default, deserialize_with = "cell")]
    rank: CellValue,
    #[serde(rename = "RESIDENCY", default)]
    residency: String,
    #[serde(rename = "STATUS", default)]
    status: String,
}

fn cell<'de, D>(deserializer: D) -> Result<CellValue, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().map(CellValue::parse).unwrap_or(CellValue::Missing))
}

/// One year's placement list in publication order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResidencyRoster {
    entries: Vec<ResidencyEntry>,
}

impl ResidencyRoster {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut entries = Vec::new();
        for row in csv_reader.deserialize::<ResidencyRow>() {
            let row = row?;
            entries.push(ResidencyEntry {
                placement: PlacementStatus::classify(&row.status),
                rank: row.rank,
                residency: row.residency,
                status: row.status,
            });
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ResidencyEntry] {
        &self.entries
    }

    pub fn summary(&self, year: &str) -> ResidencySummary {
        let count = |placement| {
            self.entries
                .iter()
                .filter(|entry| entry.placement == placement)
                .count()
        };

        ResidencySummary {
            year: year.to_string(),
            total: self.entries.len(),
            with_post: count(PlacementStatus::WithPost),
            without_post: count(PlacementStatus::WithoutPost),
            entries: self.entries.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResidencySummary {
    pub year: String,
    pub total: usize,
    pub with_post: usize,
    pub without_post: usize,
    pub entries: Vec<ResidencyEntry>,
}

/// Rosters keyed by year label (the CSV file stem).
#[derive(Debug, Clone, Default)]
pub struct ResidencyArchive {
    rosters: BTreeMap<String, ResidencyRoster>,
}

impl ResidencyArchive {
    /// Load every `<year>.csv` in `dir`. Unreadable files are skipped with a
    /// warning; a missing directory yields an empty archive.
    pub fn load_dir(dir: &Path) -> Self {
        let mut archive = Self::default();
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "residency rosters unavailable");
                return archive;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("csv") {
                continue;
            }
            let Some(year) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            let loaded = std::fs::File::open(&path)
                .map_err(csv::Error::from)
                .and_then(ResidencyRoster::from_reader);
            match loaded {
                Ok(roster) => {
                    info!(year, entries = roster.entries().len(), "residency roster loaded");
                    archive.insert(year, roster);
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable residency roster");
                }
            }
        }

        archive
    }

    pub fn insert(&mut self, year: impl Into<String>, roster: ResidencyRoster) {
        self.rosters.insert(year.into(), roster);
    }

    pub fn years(&self) -> impl Iterator<Item = &str> {
        self.rosters.keys().map(String::as_str)
    }

    /// Summary for `year`, falling back to [`DEFAULT_RESIDENCY_YEAR`] when the
    /// year is absent or has no roster.
    pub fn summary(&self, year: Option<&str>) -> ResidencySummary {
        let requested = year.map(str::trim).filter(|year| !year.is_empty());
        let resolved = match requested {
            Some(year) if self.rosters.contains_key(year) => year,
            _ => DEFAULT_RESIDENCY_YEAR,
        };

        match self.rosters.get(resolved) {
            Some(roster) => roster.summary(resolved),
            None => ResidencyRoster::default().summary(resolved),
        }
    }
}
