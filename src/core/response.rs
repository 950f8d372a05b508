//! Discord message limits
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Count the limit in characters, as Discord does
//! - 1.0.0: Message truncation for interaction replies

/// Discord message content limit, in characters
pub const MESSAGE_LIMIT: usize = 2000;

/// Truncate text to fit the message limit, adding an ellipsis if needed
pub fn truncate_for_message(text: &str) -> String {
    if text.chars().count() <= MESSAGE_LIMIT {
        return text.to_string();
    }
    // Room for "..."
    let mut truncated: String = text.chars().take(MESSAGE_LIMIT - 3).collect();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate_for_message("short text"), "short text");
    }

    #[test]
    fn test_exactly_at_limit() {
        let text = "a".repeat(MESSAGE_LIMIT);
        assert_eq!(truncate_for_message(&text), text);
    }

    #[test]
    fn test_truncate_long_text() {
        let result = truncate_for_message(&"a".repeat(3000));
        assert_eq!(result.chars().count(), MESSAGE_LIMIT);
        assert!(result.ends_with("..."));
    }

    #[test]
    fn test_utf8_safety() {
        // Multi-byte characters count once each
        let text = "世界".repeat(1500);
        let result = truncate_for_message(&text);
        assert_eq!(result.chars().count(), MESSAGE_LIMIT);
        assert!(result.starts_with("世界"));
    }
}
