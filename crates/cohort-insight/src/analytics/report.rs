use super::distribution::CohortStanding;
use super::projection::Projection;
use super::rank::RankDistance;
use super::trajectory::RankTrajectory;
use crate::dataset::{CellValue, ColumnCategory};
use serde::Serialize;

/// One score column of a student's row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectScore {
    pub subject: String,
    pub category: ColumnCategory,
    pub value: CellValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub identifier: String,
    pub name: Option<String>,
    pub subjects: Vec<SubjectScore>,
    pub percentile: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standing: Option<CohortStanding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trajectory: Option<RankTrajectory>,
}

impl ScoreReport {
    pub fn subject(&self, name: &str) -> Option<&CellValue> {
        self.subjects
            .iter()
            .find(|subject| subject.subject == name)
            .map(|subject| &subject.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceReport {
    pub name: Option<String>,
    pub current_rank: usize,
    pub target_rank: usize,
    #[serde(flatten)]
    pub distance: RankDistance,
}

impl DistanceReport {
    /// Signed points to the target, when the target rank exists.
    pub fn points_difference(&self) -> Option<f64> {
        match self.distance {
            RankDistance::Reachable { points_difference } => Some(points_difference),
            RankDistance::Unreachable { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeedReport {
    pub name: Option<String>,
    #[serde(flatten)]
    pub projection: Projection,
}

/// Result of one analytics query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalyticsResult {
    Score(ScoreReport),
    Distance(DistanceReport),
    Need(NeedReport),
}
