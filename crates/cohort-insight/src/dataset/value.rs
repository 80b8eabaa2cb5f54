use serde::Serialize;

/// One typed cell of a cohort export.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    #[default]
    Missing,
}

impl CellValue {
    /// Classify a raw CSV field. Empty strings and the usual spreadsheet
    /// placeholders for blanks become `Missing`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if is_missing_marker(trimmed) {
            return Self::Missing;
        }

        if let Ok(value) = trimmed.parse::<i64>() {
            return Self::Integer(value);
        }

        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => Self::Float(value),
            Ok(_) => Self::Missing,
            Err(_) => Self::Text(trimmed.to_string()),
        }
    }

    /// Keep a field verbatim (trimmed) as text. Used for identifier columns,
    /// where `007` and `1e3` are keys rather than numbers.
    pub fn text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if is_missing_marker(trimmed) {
            Self::Missing
        } else {
            Self::Text(trimmed.to_string())
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            Self::Text(_) | Self::Missing => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Text rendering used for identifier and name columns, which may be
    /// exported as numbers.
    pub fn to_display_string(&self) -> Option<String> {
        match self {
            Self::Text(value) => Some(value.clone()),
            Self::Integer(value) => Some(value.to_string()),
            Self::Float(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                Some(format!("{}", *value as i64))
            }
            Self::Float(value) => Some(value.to_string()),
            Self::Missing => None,
        }
    }
}

fn is_missing_marker(value: &str) -> bool {
    value.is_empty()
        || value == "-"
        || value.eq_ignore_ascii_case("nan")
        || value.eq_ignore_ascii_case("null")
        || value.eq_ignore_ascii_case("n/a")
}
