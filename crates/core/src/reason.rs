//! Free-text reason handling shared by cancellations and adjustments.

/// Returns the trimmed reason, or `None` when nothing but whitespace was given.
pub(crate) fn cancellation_reason(reason: &str) -> Option<String> {
    let trimmed = reason.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_reason() {
        assert_eq!(cancellation_reason("  damaged goods "), Some("damaged goods".into()));
        assert_eq!(cancellation_reason(""), None);
        assert_eq!(cancellation_reason(" \t\n"), None);
    }
}
