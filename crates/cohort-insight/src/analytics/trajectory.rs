use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankDirection {
    Improved,
    Worsened,
    Unchanged,
}

/// Movement from the previous recorded period. A positive delta is an
/// improvement because a lower rank number is better.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankChange {
    pub delta: f64,
    pub direction: RankDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryPoint {
    pub period: String,
    pub rank: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<RankChange>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankTrajectory {
    pub points: Vec<TrajectoryPoint>,
}

impl RankTrajectory {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn changes(&self) -> impl Iterator<Item = &RankChange> {
        self.points.iter().filter_map(|point| point.change.as_ref())
    }
}

/// Build a trajectory from periods in order. Periods without a rank are
/// skipped, and deltas compare each point to the previous recorded one.
pub fn build_trajectory<I, S>(periods: I) -> RankTrajectory
where
    I: IntoIterator<Item = (S, Option<f64>)>,
    S: Into<String>,
{
    let mut points: Vec<TrajectoryPoint> = Vec::new();

    for (period, rank) in periods {
        let Some(rank) = rank else {
            continue;
        };

        let change = points.last().map(|previous| {
            let delta = previous.rank - rank;
            let direction = if delta > 0.0 {
                RankDirection::Improved
            } else if delta < 0.0 {
                RankDirection::Worsened
            } else {
                RankDirection::Unchanged
            };
            RankChange { delta, direction }
        });

        points.push(TrajectoryPoint {
            period: period.into(),
            rank,
            change,
        });
    }

    RankTrajectory { points }
}
