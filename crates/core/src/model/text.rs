/// Canonical form used for string comparisons: trimmed and case-folded.
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Returns true when both strings are equal after normalization.
#[must_use]
pub fn same_text(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_folds_case() {
        assert_eq!(normalize("  Tunneling \n"), "tunneling");
        assert!(same_text("TXT record", "txt RECORD "));
        assert!(!same_text("847MB", "847 MB"));
    }
}
