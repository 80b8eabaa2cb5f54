use crate::config::GradingCeilings;
use serde::Serialize;

/// How a projection reads once the numbers are in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionOutlook {
    /// The remaining periods cannot deliver the required score.
    Unreachable,
    /// Current performance already exceeds the target.
    AlreadyAchieved,
    Needed,
}

/// Linear projection of what the remaining periods must deliver.
///
/// Values are exact; nothing is clamped to `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Projection {
    pub current_total: f64,
    pub current_percentage: f64,
    pub target_percentage: f64,
    pub required_final_score: f64,
    pub required_remaining_score: f64,
    pub required_remaining_percentage: f64,
    pub outlook: ProjectionOutlook,
}

pub fn project(current_total: f64, target_percentage: f64, ceilings: &GradingCeilings) -> Projection {
    let required_final_score = target_percentage / 100.0 * ceilings.final_max();
    let required_remaining_score = required_final_score - current_total;
    let required_remaining_percentage = required_remaining_score / ceilings.remaining_max() * 100.0;
    let current_percentage = current_total / ceilings.current_max() * 100.0;

    let outlook = if required_remaining_percentage > 100.0 {
        ProjectionOutlook::Unreachable
    } else if required_remaining_percentage < 0.0 {
        ProjectionOutlook::AlreadyAchieved
    } else {
        ProjectionOutlook::Needed
    };

    Projection {
        current_total,
        current_percentage,
        target_percentage,
        required_final_score,
        required_remaining_score,
        required_remaining_percentage,
        outlook,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ceilings() -> GradingCeilings {
        GradingCeilings::new(3180.0, 4875.0, 1695.0).expect("consistent ceilings")
    }

    #[test]
    fn full_marks_so_far_need_nothing_for_matching_target() {
        let target = 3180.0 / 4875.0 * 100.0;
        let projection = project(3180.0, target, &ceilings());
        assert!(projection.required_remaining_score.abs() < 1e-9);
        assert!(projection.required_remaining_percentage.abs() < 1e-9);
        assert!((projection.current_percentage - 100.0).abs() < 1e-9);
    }

    #[test]
    fn rounded_target_lands_near_zero() {
        let projection = project(3180.0, 65.24, &ceilings());
        assert!(projection.required_remaining_score.abs() < 1.0);
        assert!(projection.required_remaining_percentage.abs() < 0.1);
    }

    #[test]
    fn impossible_target_exceeds_hundred_percent() {
        let projection = project(0.0, 100.0, &ceilings());
        assert_eq!(projection.required_final_score, 4875.0);
        assert!(projection.required_remaining_percentage > 100.0);
        assert_eq!(projection.outlook, ProjectionOutlook::Unreachable);
    }

    #[test]
    fn exceeded_target_reports_negative_requirement() {
        let projection = project(3000.0, 50.0, &ceilings());
        assert!(projection.required_remaining_score < 0.0);
        assert!(projection.required_remaining_percentage < 0.0);
        assert_eq!(projection.outlook, ProjectionOutlook::AlreadyAchieved);
    }

    #[test]
    fn ordinary_target_is_linear() {
        let projection = project(2544.0, 80.0, &ceilings());
        assert!((projection.required_final_score - 3900.0).abs() < 1e-9);
        assert!((projection.required_remaining_score - 1356.0).abs() < 1e-9);
        assert!((projection.required_remaining_percentage - 80.0).abs() < 1e-9);
        assert!((projection.current_percentage - 80.0).abs() < 1e-9);
        assert_eq!(projection.outlook, ProjectionOutlook::Needed);
    }
}
