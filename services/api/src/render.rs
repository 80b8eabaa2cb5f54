use cohort_insight::analytics::{
    AnalyticsResult, DistanceReport, NeedReport, ProjectionOutlook, RankDirection, RankDistance,
    ScoreReport,
};
use cohort_insight::residency::ResidencySummary;
use std::fmt::{self, Write};

/// Plain-text rendering of one analytics query for the terminal.
pub(crate) fn render_analytics(
    student_id: &str,
    mode: &str,
    result: Option<&AnalyticsResult>,
) -> String {
    let mut out = String::new();
    let _ = write_analytics(&mut out, student_id, mode, result);
    out
}

pub(crate) fn render_residency(summary: &ResidencySummary) -> String {
    let mut out = String::new();
    let _ = write_residency(&mut out, summary);
    out
}

fn write_analytics(
    out: &mut String,
    student_id: &str,
    mode: &str,
    result: Option<&AnalyticsResult>,
) -> fmt::Result {
    match result {
        None => writeln!(
            out,
            "No result for student {student_id} ({mode}): unknown student, mode or parameter"
        ),
        Some(AnalyticsResult::Score(report)) => write_score(out, report),
        Some(AnalyticsResult::Distance(report)) => write_distance(out, student_id, report),
        Some(AnalyticsResult::Need(report)) => write_need(out, student_id, report),
    }
}

fn write_score(out: &mut String, report: &ScoreReport) -> fmt::Result {
    writeln!(
        out,
        "Student {}{}",
        report.identifier,
        display_name(report.name.as_deref())
    )?;

    match report.percentile {
        Some(percentile) => writeln!(out, "Percentile: {percentile}")?,
        None => writeln!(out, "Percentile: unavailable")?,
    }

    if let Some(standing) = &report.standing {
        let relation = if standing.student_total >= standing.average {
            "above"
        } else {
            "below"
        };
        writeln!(
            out,
            "Cohort average {:.1} ({:.2}%) across {} students; {:.2}% {}",
            standing.average,
            standing.average_percentage,
            standing.cohort_size,
            standing.gap_percentage,
            relation
        )?;
    }

    writeln!(out, "\nScores")?;
    for subject in &report.subjects {
        let value = subject
            .value
            .to_display_string()
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "- {} [{}]: {}",
            subject.subject,
            subject.category.label(),
            value
        )?;
    }

    match &report.trajectory {
        Some(trajectory) if !trajectory.is_empty() => {
            writeln!(out, "\nRank trajectory")?;
            for point in &trajectory.points {
                match &point.change {
                    Some(change) => {
                        let direction = match change.direction {
                            RankDirection::Improved => "improved",
                            RankDirection::Worsened => "worsened",
                            RankDirection::Unchanged => "unchanged",
                        };
                        writeln!(
                            out,
                            "- {}: {} ({} by {})",
                            point.period,
                            point.rank,
                            direction,
                            change.delta.abs()
                        )?;
                    }
                    None => writeln!(out, "- {}: {}", point.period, point.rank)?,
                }
            }
        }
        _ => writeln!(out, "\nRank trajectory: none recorded")?,
    }

    Ok(())
}

fn write_distance(out: &mut String, student_id: &str, report: &DistanceReport) -> fmt::Result {
    writeln!(
        out,
        "Student {}{} holds rank {}",
        student_id,
        display_name(report.name.as_deref()),
        report.current_rank
    )?;

    match report.distance {
        RankDistance::Unreachable { cohort_size } => writeln!(
            out,
            "Rank {} does not exist in a cohort of {} students",
            report.target_rank, cohort_size
        ),
        RankDistance::Reachable { points_difference } if points_difference > 0.0 => writeln!(
            out,
            "{:.2} points behind rank {}",
            points_difference, report.target_rank
        ),
        RankDistance::Reachable { points_difference } if points_difference < 0.0 => writeln!(
            out,
            "{:.2} points ahead of rank {}",
            points_difference.abs(),
            report.target_rank
        ),
        RankDistance::Reachable { .. } => {
            writeln!(out, "Level with rank {}", report.target_rank)
        }
    }
}

fn write_need(out: &mut String, student_id: &str, report: &NeedReport) -> fmt::Result {
    let projection = &report.projection;
    writeln!(
        out,
        "Student {}{}: {} points so far ({:.2}%)",
        student_id,
        display_name(report.name.as_deref()),
        projection.current_total,
        projection.current_percentage
    )?;
    writeln!(
        out,
        "Target {:.2}% needs {:.2} final points",
        projection.target_percentage, projection.required_final_score
    )?;

    match projection.outlook {
        ProjectionOutlook::Unreachable => writeln!(
            out,
            "Impossible: the remaining periods would need {:.2}% ({:.2} points)",
            projection.required_remaining_percentage, projection.required_remaining_score
        ),
        ProjectionOutlook::AlreadyAchieved => writeln!(
            out,
            "Already achieved: {:.2} points above the target pace",
            projection.required_remaining_score.abs()
        ),
        ProjectionOutlook::Needed => writeln!(
            out,
            "Needs {:.2}% of the remaining marks ({:.2} points)",
            projection.required_remaining_percentage, projection.required_remaining_score
        ),
    }
}

fn write_residency(out: &mut String, summary: &ResidencySummary) -> fmt::Result {
    writeln!(
        out,
        "Residency placements {}: {} total, {} with post, {} without post",
        summary.year, summary.total, summary.with_post, summary.without_post
    )?;

    for entry in &summary.entries {
        let rank = entry
            .rank
            .to_display_string()
            .unwrap_or_else(|| "-".to_string());
        let status = if entry.status.is_empty() {
            "-"
        } else {
            entry.status.as_str()
        };
        writeln!(out, "- #{} {} ({})", rank, entry.residency, status)?;
    }

    Ok(())
}

fn display_name(name: Option<&str>) -> String {
    name.map(|name| format!(" ({name})")).unwrap_or_default()
}
