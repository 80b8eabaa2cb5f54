/// Canonical form of a column header: byte-order marks and zero-width spaces
/// removed, whitespace collapsed, upper-cased.
pub(crate) fn normalize_column(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_uppercase()
}

/// Identifiers are matched verbatim after trimming; no case folding.
pub(crate) fn normalize_identifier(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_column_removes_noise_and_case() {
        let source = "\u{feff}Long   first year ";
        assert_eq!(normalize_column(source), "LONG FIRST YEAR");
    }

    #[test]
    fn normalize_identifier_keeps_case() {
        assert_eq!(normalize_identifier("  ab12C \t"), "ab12C");
    }
}
