//! Account handle helpers.

/// Trim surrounding whitespace and a leading `@` from user input.
pub fn normalize_handle(raw: &str) -> &str {
    raw.trim().trim_start_matches('@').trim()
}

/// Handles are ASCII letters, digits and underscores.
pub fn is_valid_handle(handle: &str) -> bool {
    !handle.is_empty()
        && handle
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Case-insensitive handle comparison.
pub fn same_handle(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Key used for case-insensitive lookups.
pub fn handle_key(handle: &str) -> String {
    handle.to_lowercase()
}
