//! Student performance analytics: percentile standing, rank distance,
//! grade projection and rank trajectory over an immutable cohort snapshot.

mod distribution;
mod facade;
mod percentile;
mod projection;
mod rank;
mod report;
mod trajectory;

pub use distribution::{cohort_standing, histogram, CohortStanding, HistogramBin, HISTOGRAM_BINS};
pub use facade::{
    parse_target_percentage, parse_target_rank, AnalyticsFacade, QueryMode, NAME_COLUMN,
    TOTAL_COLUMN,
};
pub use percentile::percentile;
pub use projection::{project, Projection, ProjectionOutlook};
pub use rank::{current_rank, distance, score_at_rank, RankDistance, RankLookup};
pub use report::{AnalyticsResult, DistanceReport, NeedReport, ScoreReport, SubjectScore};
pub use trajectory::{build_trajectory, RankChange, RankDirection, RankTrajectory, TrajectoryPoint};
