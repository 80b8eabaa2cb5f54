use crate::config::GradingCeilings;
use serde::Serialize;

/// Number of equal-width bins used for the cohort score chart.
pub const HISTOGRAM_BINS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width bins over `[min, max]`; the last bin is closed on the right.
/// A cohort where every score is equal is spread over `[v - 0.5, v + 0.5]`.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let (mut min, mut max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), value| {
            (lo.min(*value), hi.max(*value))
        });
    if min == max {
        min -= 0.5;
        max += 0.5;
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for value in values {
        let slot = ((value - min) / width).floor() as usize;
        counts[slot.min(bins - 1)] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(index, count)| HistogramBin {
            lower: min + width * index as f64,
            upper: if index + 1 == bins {
                max
            } else {
                min + width * (index + 1) as f64
            },
            count,
        })
        .collect()
}

/// Where a student sits relative to the cohort average.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortStanding {
    pub cohort_size: usize,
    pub average: f64,
    pub average_percentage: f64,
    pub student_total: f64,
    /// Absolute distance from the average, as a share of the current maximum.
    pub gap_percentage: f64,
    pub histogram: Vec<HistogramBin>,
}

pub fn cohort_standing(
    student_total: f64,
    distribution: &[f64],
    ceilings: &GradingCeilings,
) -> Option<CohortStanding> {
    if distribution.is_empty() {
        return None;
    }

    let average = distribution.iter().sum::<f64>() / distribution.len() as f64;
    Some(CohortStanding {
        cohort_size: distribution.len(),
        average,
        average_percentage: average / ceilings.current_max() * 100.0,
        student_total,
        gap_percentage: (student_total - average).abs() / ceilings.current_max() * 100.0,
        histogram: histogram(distribution, HISTOGRAM_BINS),
    })
}
