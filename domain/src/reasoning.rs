//! Reasoning-signal utilities - pure text and arithmetic helpers.
//!
//! These functions sit on the hot path of every exchange: trace
//! extraction from raw agent output, score parsing from the backbone's
//! evaluation, the difficulty ramp, and the rolling signal blend.
//! No I/O, no state.

/// Neutral fallback when the backbone cannot produce a score.
///
/// Reasoning quality is an enrichment signal, not a blocking dependency,
/// so scorer failures degrade to this value instead of propagating.
/// Tunable; kept at 75 for behavioral compatibility with prior datasets.
pub const NEUTRAL_REASONING_SCORE: u8 = 75;

/// Split raw model output into `(thinking, answer)`.
///
/// Detects a delimited thinking span using the case-insensitive tag pair
/// `<thinking>...</thinking>` (or the abbreviated `<think>...</think>`).
/// The first span's interior becomes the trace; all complete spans are
/// stripped from the answer. Without any tag the trace is empty and the
/// input passes through unchanged.
pub fn split_reasoning(raw: &str) -> (String, String) {
    let mut thinking = String::new();
    let mut answer = String::new();
    let mut rest = raw;
    let mut found = false;

    while let Some((before, interior, after)) = next_thinking_span(rest) {
        answer.push_str(before);
        if !found {
            thinking = interior.trim().to_string();
            found = true;
        }
        rest = after;
    }
    answer.push_str(rest);

    if !found {
        return (String::new(), raw.to_string());
    }
    (thinking, answer.trim().to_string())
}

/// Find the next complete thinking span, returning the text before it,
/// the interior, and the text after the close tag.
fn next_thinking_span(text: &str) -> Option<(&str, &str, &str)> {
    let (open_at, open_len) = find_tag(text, ["<thinking>", "<think>"])?;
    let interior_start = open_at + open_len;
    let (close_rel, close_len) = find_tag(&text[interior_start..], ["</thinking>", "</think>"])?;

    let interior_end = interior_start + close_rel;
    Some((
        &text[..open_at],
        &text[interior_start..interior_end],
        &text[interior_end + close_len..],
    ))
}

/// Earliest ASCII-case-insensitive occurrence of either tag, returned as
/// `(byte_offset, tag_len)`. The scan compares slices of the original
/// string at char boundaries, so surrounding multi-byte text never skews
/// the offsets. At the same position the longer tag wins.
fn find_tag(text: &str, tags: [&str; 2]) -> Option<(usize, usize)> {
    for (at, _) in text.char_indices() {
        for tag in tags {
            if text
                .get(at..at + tag.len())
                .is_some_and(|s| s.eq_ignore_ascii_case(tag))
            {
                return Some((at, tag.len()));
            }
        }
    }
    None
}

/// Extract the first integer token from the backbone's score response,
/// clamped to 0..=100. Returns `None` when no digits appear; the caller
/// decides how to degrade.
pub fn parse_reasoning_score(response: &str) -> Option<u8> {
    let digits: String = response
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    // Longer runs than a u32 can hold are still "a big number"
    let value = digits.parse::<u64>().unwrap_or(u64::MAX);
    Some(value.min(100) as u8)
}

/// Difficulty for the current exchange, tied to transcript length so
/// re-entrant runs on a short transcript do not jump the ramp:
/// `clamp(existing_turns / 3 + 1, 1, 10)`.
pub fn difficulty_for(existing_turns: usize) -> u8 {
    ((existing_turns / 3) as u8).saturating_add(1).clamp(1, 10)
}

/// Follow-up difficulty presented to the second agent
pub fn escalate(difficulty: u8) -> u8 {
    difficulty.saturating_add(1).min(10)
}

/// Fold one exchange's average reasoning score into the rolling signal:
/// an exponential moving average with weight 1/2, so no single exchange
/// can swing the estimate by more than half the gap.
pub fn blend_signal(previous: u8, avg_reasoning: u8) -> u8 {
    let blended = (previous as f64 + avg_reasoning as f64) / 2.0;
    (blended.round() as u8).min(100)
}
