use super::distribution::cohort_standing;
use super::percentile::percentile;
use super::projection::project;
use super::rank::{current_rank, distance};
use super::report::{
    AnalyticsResult, DistanceReport, NeedReport, ScoreReport, SubjectScore,
};
use super::trajectory::{build_trajectory, RankTrajectory};
use crate::config::GradingCeilings;
use crate::dataset::{is_percentage_column, CellValue, DatasetSnapshot, RANK_PERIODS};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::debug;

pub const TOTAL_COLUMN: &str = "TOTAL";
pub const NAME_COLUMN: &str = "NAME";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMode {
    Search,
    Distance,
    Need,
}

impl QueryMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "search" | "lookup" => Some(Self::Search),
            "distance" => Some(Self::Distance),
            "need" => Some(Self::Need),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Distance => "distance",
            Self::Need => "need",
        }
    }
}

/// Parse a target rank parameter: a whole number of at least one.
pub fn parse_target_rank(raw: Option<&str>) -> Option<NonZeroUsize> {
    raw?.trim().parse::<usize>().ok().and_then(NonZeroUsize::new)
}

/// Parse a target percentage parameter: a finite number in `[0, 100]`.
pub fn parse_target_percentage(raw: Option<&str>) -> Option<f64> {
    raw?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && (0.0..=100.0).contains(value))
}

/// Stateless per-query dispatcher over one snapshot.
///
/// Every failure (unknown student, malformed parameter, empty dataset) is
/// reported as `None`; nothing here panics or errors.
#[derive(Debug, Clone)]
pub struct AnalyticsFacade {
    snapshot: Arc<DatasetSnapshot>,
    ceilings: GradingCeilings,
}

impl AnalyticsFacade {
    pub fn new(snapshot: Arc<DatasetSnapshot>, ceilings: GradingCeilings) -> Self {
        Self { snapshot, ceilings }
    }

    pub fn snapshot(&self) -> &DatasetSnapshot {
        &self.snapshot
    }

    /// Dispatch a raw `(identifier, mode, parameter)` query.
    pub fn query(
        &self,
        identifier: &str,
        mode: &str,
        parameter: Option<&str>,
    ) -> Option<AnalyticsResult> {
        let Some(mode) = QueryMode::parse(mode) else {
            debug!(mode, "unknown analytics mode");
            return None;
        };

        let result = match mode {
            QueryMode::Search => self.search(identifier).map(AnalyticsResult::Score),
            QueryMode::Distance => parse_target_rank(parameter)
                .and_then(|target| self.distance(identifier, target))
                .map(AnalyticsResult::Distance),
            QueryMode::Need => parse_target_percentage(parameter)
                .and_then(|target| self.need(identifier, target))
                .map(AnalyticsResult::Need),
        };

        debug!(
            mode = mode.label(),
            found = result.is_some(),
            "analytics query resolved"
        );
        result
    }

    pub fn search(&self, identifier: &str) -> Option<ScoreReport> {
        let scores = &self.snapshot.scores;
        let row = scores.lookup(identifier)?;
        let id_column = scores.id_column();

        let subjects = row
            .cells()
            .filter(|(column, _)| {
                !column.name.eq_ignore_ascii_case(id_column)
                    && !column.name.eq_ignore_ascii_case(NAME_COLUMN)
            })
            .map(|(column, value)| SubjectScore {
                subject: column.name.clone(),
                category: column.category,
                value: normalize_score(&column.name, value),
            })
            .collect();

        let totals = scores.column(TOTAL_COLUMN);
        let student_total = row.number(TOTAL_COLUMN);

        Some(ScoreReport {
            identifier: row.identifier().to_string(),
            name: row.text(NAME_COLUMN),
            subjects,
            percentile: percentile(student_total, &totals),
            standing: student_total
                .and_then(|total| cohort_standing(total, &totals, &self.ceilings)),
            trajectory: self.trajectory(identifier),
        })
    }

    /// Rank trajectory from the rank table, if the student appears there.
    pub fn trajectory(&self, identifier: &str) -> Option<RankTrajectory> {
        let row = self.snapshot.ranks.lookup(identifier)?;
        let trajectory = build_trajectory(
            RANK_PERIODS
                .iter()
                .map(|(column, label)| (*label, row.number(column))),
        );
        Some(trajectory)
    }

    pub fn distance(&self, identifier: &str, target_rank: NonZeroUsize) -> Option<DistanceReport> {
        let scores = &self.snapshot.scores;
        let row = scores.lookup(identifier)?;
        let current_score = row.number(TOTAL_COLUMN)?;
        let totals = scores.column(TOTAL_COLUMN);

        Some(DistanceReport {
            name: row.text(NAME_COLUMN),
            current_rank: current_rank(current_score, &totals),
            target_rank: target_rank.get(),
            distance: distance(current_score, target_rank, &totals),
        })
    }

    pub fn need(&self, identifier: &str, target_percentage: f64) -> Option<NeedReport> {
        let row = self.snapshot.scores.lookup(identifier)?;
        let current_total = row.number(TOTAL_COLUMN)?;

        Some(NeedReport {
            name: row.text(NAME_COLUMN),
            projection: project(current_total, target_percentage, &self.ceilings),
        })
    }
}

/// Percentage columns exported as fractions (including a bare `0` or `1`) are
/// scaled to 0-100 and whole floats are reported as integers.
fn normalize_score(column: &str, value: &CellValue) -> CellValue {
    match value {
        CellValue::Float(raw) if is_percentage_column(column) && *raw <= 1.0 => {
            CellValue::Float(raw * 100.0)
        }
        CellValue::Integer(raw @ (0 | 1)) if is_percentage_column(column) => {
            CellValue::Float(*raw as f64 * 100.0)
        }
        CellValue::Float(raw) if raw.fract() == 0.0 && raw.abs() < 1e15 => {
            CellValue::Integer(*raw as i64)
        }
        other => other.clone(),
    }
}
