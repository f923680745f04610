//! Small shared helpers

/// Truncate a message to `max_chars` characters, appending `...` when
/// anything was cut. Char-safe, so multi-byte text never splits.
pub fn truncate_snippet(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}
