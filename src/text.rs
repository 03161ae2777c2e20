/// Unicode whitespace plus the ASCII separators U+001C..=U+001F, which
/// regex `\s` engines also treat as spaces.
fn is_space(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Trim both ends and collapse every internal whitespace run to one space.
pub fn normalize(raw: &str) -> String {
    raw.split(is_space)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// True when `raw` is short enough to send to the backend.
///
/// Length is counted in characters, not bytes, so CJK text gets the same
/// budget as ASCII.
pub fn within_limit(raw: &str, max_chars: usize) -> bool {
    raw.chars().count() < max_chars
}

/// Text shown in the pane for a finished translation.
pub fn compose_display(translation: &str, original: &str, show_original: bool) -> String {
    if show_original {
        format!("{}\n{}", translation, original)
    } else {
        translation.to_string()
    }
}
