use super::normalizer::normalize_column;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Curriculum grouping of a score column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnCategory {
    FirstYear,
    SecondYear,
    ThirdYear,
    FourthYear,
    Totals,
    Rank,
    Other,
}

impl ColumnCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstYear => "First Year",
            Self::SecondYear => "Second Year",
            Self::ThirdYear => "Third Year",
            Self::FourthYear => "Fourth Year",
            Self::Totals => "Totals",
            Self::Rank => "Rank",
            Self::Other => "Other",
        }
    }
}

static CATEGORY_MAP: OnceLock<HashMap<String, ColumnCategory>> = OnceLock::new();

pub(crate) fn category_for_column(name: &str) -> ColumnCategory {
    let normalized = normalize_column(name);
    if let Some(category) = category_map().get(&normalized) {
        return *category;
    }

    if normalized.contains("RANK") {
        ColumnCategory::Rank
    } else {
        ColumnCategory::Other
    }
}

fn category_map() -> &'static HashMap<String, ColumnCategory> {
    CATEGORY_MAP.get_or_init(|| {
        const COLUMN_TO_CATEGORY: &[(&str, ColumnCategory)] = &[
            // First year
            ("FIRST YEAR", ColumnCategory::FirstYear),
            ("LONG FIRST YEAR", ColumnCategory::FirstYear),
            ("RESEARCH STEP I", ColumnCategory::FirstYear),
            ("COMMUNICATION STEP I", ColumnCategory::FirstYear),
            ("PROFESSIONALISM STEP I", ColumnCategory::FirstYear),
            // Second year
            ("SECOND YEAR", ColumnCategory::SecondYear),
            ("LONG SECOND YEAR", ColumnCategory::SecondYear),
            ("RESEARCH STEP II", ColumnCategory::SecondYear),
            ("COMMUNICATION STEP II", ColumnCategory::SecondYear),
            ("PROFESSIONALISM STEP II", ColumnCategory::SecondYear),
            // Third year
            ("THIRD YEAR", ColumnCategory::ThirdYear),
            ("LONG THIRD YEAR", ColumnCategory::ThirdYear),
            ("RESEARCH STEP III", ColumnCategory::ThirdYear),
            ("COMMUNICATION STEP III", ColumnCategory::ThirdYear),
            ("PROFESSIONALISM STEP III", ColumnCategory::ThirdYear),
            // Fourth year, exported with four strokes
            ("FOURTH YEAR", ColumnCategory::FourthYear),
            ("LONG FOURTH YEAR", ColumnCategory::FourthYear),
            ("RESEARCH STEP IIII", ColumnCategory::FourthYear),
            ("COMMUNICATION STEP IIII", ColumnCategory::FourthYear),
            ("PROFESSIONALISM STEP IIII", ColumnCategory::FourthYear),
            // Totals
            ("TOTAL", ColumnCategory::Totals),
            ("TOTAL RANK", ColumnCategory::Totals),
            ("%", ColumnCategory::Totals),
            ("PERCENTAGE", ColumnCategory::Totals),
        ];

        COLUMN_TO_CATEGORY
            .iter()
            .map(|(name, category)| (name.to_string(), *category))
            .collect()
    })
}

/// Percentage columns hold either a fraction or an already-scaled value.
pub(crate) fn is_percentage_column(name: &str) -> bool {
    let normalized = normalize_column(name);
    normalized.contains('%') || normalized == "PERCENTAGE"
}

/// Rank-table columns in period order, with the label reported for each.
pub const RANK_PERIODS: &[(&str, &str)] = &[
    ("FIRST YEAR RANK", "FIRST YEAR"),
    ("SECOND YEAR RANK C", "SECOND YEAR"),
    ("THIRD YEAR RANK C", "THIRD YEAR"),
    ("FOURTH YEAR RANK C", "FOURTH YEAR"),
];
