use serde::Serialize;
use std::num::NonZeroUsize;

/// Competition rank: one more than the number of strictly higher scores, so
/// equal totals share a rank.
pub fn current_rank(score: f64, distribution: &[f64]) -> usize {
    1 + distribution.iter().filter(|value| **value > score).count()
}

/// Score held at a given rank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RankLookup {
    Score { score: f64 },
    Unreachable { cohort_size: usize },
}

/// Score occupying `target_rank` once the cohort is ordered best-first.
///
/// The ordering is a stable descending sort: equal scores keep their row
/// order. A target beyond the cohort size is reported as unreachable.
pub fn score_at_rank(target_rank: NonZeroUsize, distribution: &[f64]) -> RankLookup {
    let cohort_size = distribution.len();
    if target_rank.get() > cohort_size {
        return RankLookup::Unreachable { cohort_size };
    }

    let mut ordered = distribution.to_vec();
    ordered.sort_by(|a, b| b.total_cmp(a));
    RankLookup::Score {
        score: ordered[target_rank.get() - 1],
    }
}

/// Points between a student and a target rank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RankDistance {
    /// Positive: behind the target. Zero: at it. Negative: ahead of it.
    Reachable { points_difference: f64 },
    Unreachable { cohort_size: usize },
}

pub fn distance(current_score: f64, target_rank: NonZeroUsize, distribution: &[f64]) -> RankDistance {
    match score_at_rank(target_rank, distribution) {
        RankLookup::Score { score } => RankDistance::Reachable {
            points_difference: score - current_score,
        },
        RankLookup::Unreachable { cohort_size } => RankDistance::Unreachable { cohort_size },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rank(value: usize) -> NonZeroUsize {
        NonZeroUsize::new(value).expect("rank is positive")
    }

    const COHORT: [f64; 3] = [100.0, 90.0, 80.0];

    #[test]
    fn ties_share_the_same_rank() {
        let cohort = [90.0, 90.0, 80.0];
        assert_eq!(current_rank(90.0, &cohort), 1);
        assert_eq!(current_rank(80.0, &cohort), 3);
        assert_eq!(current_rank(95.0, &cohort), 1);
    }

    #[test]
    fn score_at_rank_reads_descending_order() {
        let shuffled = [80.0, 100.0, 90.0];
        assert_eq!(
            score_at_rank(rank(1), &shuffled),
            RankLookup::Score { score: 100.0 }
        );
        assert_eq!(
            score_at_rank(rank(3), &shuffled),
            RankLookup::Score { score: 80.0 }
        );
    }

    #[test]
    fn tied_scores_occupy_consecutive_positions() {
        let cohort = [90.0, 70.0, 90.0];
        assert_eq!(score_at_rank(rank(2), &cohort), RankLookup::Score { score: 90.0 });
        assert_eq!(score_at_rank(rank(3), &cohort), RankLookup::Score { score: 70.0 });
    }

    #[test]
    fn rank_beyond_cohort_is_unreachable() {
        assert_eq!(
            score_at_rank(rank(10), &COHORT),
            RankLookup::Unreachable { cohort_size: 3 }
        );
        assert_eq!(
            score_at_rank(rank(1), &[]),
            RankLookup::Unreachable { cohort_size: 0 }
        );
    }

    #[test]
    fn distance_sign_convention() {
        assert_eq!(
            distance(100.0, rank(1), &COHORT),
            RankDistance::Reachable {
                points_difference: 0.0
            }
        );
        assert_eq!(
            distance(80.0, rank(1), &COHORT),
            RankDistance::Reachable {
                points_difference: 20.0
            }
        );
        assert_eq!(
            distance(100.0, rank(3), &COHORT),
            RankDistance::Reachable {
                points_difference: -20.0
            }
        );
        assert_eq!(
            distance(100.0, rank(4), &COHORT),
            RankDistance::Unreachable { cohort_size: 3 }
        );
    }
}
