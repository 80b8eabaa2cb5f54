/// Share of the cohort scoring strictly below `score`, as a whole percentage.
///
/// Rounds half to even, so 12.5 reports 12 and 37.5 reports 38. Returns `None`
/// when the score is missing or the distribution is empty.
pub fn percentile(score: Option<f64>, distribution: &[f64]) -> Option<u8> {
    let score = score?;
    if distribution.is_empty() {
        return None;
    }

    let below = distribution.iter().filter(|value| **value < score).count();
    let share = 100.0 * below as f64 / distribution.len() as f64;
    Some(share.round_ties_even().clamp(0.0, 100.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_only_strictly_lower_scores() {
        let cohort = [100.0, 90.0, 80.0, 70.0];
        assert_eq!(percentile(Some(100.0), &cohort), Some(75));
        assert_eq!(percentile(Some(70.0), &cohort), Some(0));
        assert_eq!(percentile(Some(85.0), &cohort), Some(50));
    }

    #[test]
    fn top_score_stays_below_hundred_when_cohort_varies() {
        let cohort = [100.0, 100.0, 60.0];
        let top = percentile(Some(100.0), &cohort).expect("percentile");
        assert!(top < 100);
        assert_eq!(top, 33);
    }

    #[test]
    fn score_above_every_member_reaches_hundred() {
        assert_eq!(percentile(Some(101.0), &[100.0, 90.0]), Some(100));
    }

    #[test]
    fn rounds_half_to_even() {
        let eight = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        // one of eight below: 12.5
        assert_eq!(percentile(Some(2.0), &eight), Some(12));
        // three of eight below: 37.5
        assert_eq!(percentile(Some(4.0), &eight), Some(38));
    }

    #[test]
    fn absent_inputs_yield_no_percentile() {
        assert_eq!(percentile(None, &[1.0, 2.0]), None);
        assert_eq!(percentile(Some(1.0), &[]), None);
    }

    #[test]
    fn repeated_calls_agree() {
        let cohort = [55.5, 71.25, 90.0, 12.0];
        assert_eq!(
            percentile(Some(71.25), &cohort),
            percentile(Some(71.25), &cohort)
        );
    }
}
