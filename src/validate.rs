//! Input rules applied before anything is sent.

/// Longest message the server accepts, in characters.
pub const MAX_MESSAGE_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("message is empty")]
    Empty,
    #[error("message has no letters or digits")]
    SymbolsOnly,
    #[error("message is longer than {MAX_MESSAGE_CHARS} characters")]
    TooLong,
}

/// Checks already-trimmed text. Rules are ordered; the first failing one wins.
pub fn check(text: &str) -> Result<(), ValidationError> {
    if text.is_empty() {
        return Err(ValidationError::Empty);
    }
    if !text.chars().any(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::SymbolsOnly);
    }
    if text.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ValidationError::TooLong);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_rejected() {
        assert_eq!(check(""), Err(ValidationError::Empty));
    }

    #[test]
    fn symbols_only_is_rejected() {
        assert_eq!(check("!!!"), Err(ValidationError::SymbolsOnly));
        assert_eq!(check("?? ..."), Err(ValidationError::SymbolsOnly));
        assert_eq!(check("ééé"), Err(ValidationError::SymbolsOnly));
    }

    #[test]
    fn one_alphanumeric_is_enough() {
        assert_eq!(check("!?1"), Ok(()));
        assert_eq!(check("café?"), Ok(()));
    }

    #[test]
    fn length_limit_counts_characters() {
        assert_eq!(check(&"a".repeat(500)), Ok(()));
        assert_eq!(check(&"a".repeat(501)), Err(ValidationError::TooLong));
        // 250 two-byte chars plus one letter stays under the limit
        let text = format!("a{}", "é".repeat(250));
        assert_eq!(check(&text), Ok(()));
    }

    #[test]
    fn symbols_rule_wins_over_length() {
        assert_eq!(check(&"!".repeat(600)), Err(ValidationError::SymbolsOnly));
    }

    #[test]
    fn plain_text_is_valid() {
        assert_eq!(check("hello"), Ok(()));
    }
}
