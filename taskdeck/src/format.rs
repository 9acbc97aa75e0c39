//! Small display-formatting helpers shared across views.

/// Uppercased first initial of the first name part, or empty for a
/// blank name.
#[must_use]
pub fn first_initial(name: &str) -> String {
    name.split_whitespace()
        .next()
        .and_then(|part| part.chars().next())
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_default()
}

/// Uppercased first initial of the second name part, or empty when the
/// name has only one part.
#[must_use]
pub fn second_initial(name: &str) -> String {
    name.split_whitespace()
        .nth(1)
        .and_then(|part| part.chars().next())
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_default()
}

/// Avatar initials for a display name: "Jane Doe" becomes "JD", a
/// single-word name just its first initial.
#[must_use]
pub fn initials(name: &str) -> String {
    format!("{}{}", first_initial(name), second_initial(name))
}

/// Truncate a name to at most `max` characters, appending an ellipsis
/// when anything was cut.
#[must_use]
pub fn truncate_name(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        name.to_string()
    } else {
        let mut truncated: String = name.chars().take(max).collect();
        truncated.push('\u{2026}');
        truncated
    }
}
