//! Theme and styling constants for the TUI.

use ratatui::style::{Color, Modifier, Style};
use taskdeck_proto::task::{TaskPriority, TaskStatus};

/// Primary foreground color.
pub const FG_PRIMARY: Color = Color::White;

/// Secondary foreground color (dimmed text).
pub const FG_SECONDARY: Color = Color::Gray;

/// Highlight color for focused elements.
pub const HIGHLIGHT: Color = Color::Cyan;

/// Success/connected indicator color.
pub const SUCCESS: Color = Color::Green;

/// Warning indicator color.
pub const WARNING: Color = Color::Yellow;

/// Error/disconnected indicator color.
pub const ERROR: Color = Color::Red;

/// Offline indicator color.
pub const OFFLINE: Color = Color::DarkGray;

/// Brand color used for the header title.
pub const BRAND: Color = Color::Rgb(41, 171, 226);

/// Normal text style.
#[must_use]
pub fn normal() -> Style {
    Style::default().fg(FG_PRIMARY)
}

/// Dimmed text style (metadata, hints).
#[must_use]
pub fn dimmed() -> Style {
    Style::default().fg(FG_SECONDARY)
}

/// Bold text style.
#[must_use]
pub fn bold() -> Style {
    Style::default().fg(FG_PRIMARY).add_modifier(Modifier::BOLD)
}

/// Highlighted text style (focused borders, active tab).
#[must_use]
pub fn highlighted() -> Style {
    Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)
}

/// Selected item style (in lists).
#[must_use]
pub fn selected() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Style for the status bar background.
#[must_use]
pub fn status_bar_bg() -> Style {
    Style::default().fg(Color::White).bg(Color::Rgb(30, 30, 50))
}

/// Style for panel titles with a given color (bold).
#[must_use]
pub fn panel_title(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Indicator color for a task priority.
#[must_use]
pub const fn priority_color(priority: TaskPriority) -> Color {
    match priority {
        TaskPriority::Urgent => Color::Rgb(255, 61, 0),
        TaskPriority::Medium => Color::Rgb(255, 168, 0),
        TaskPriority::Low => Color::Rgb(122, 226, 41),
    }
}

/// Indicator symbol for a task priority.
#[must_use]
pub const fn priority_symbol(priority: TaskPriority) -> &'static str {
    match priority {
        TaskPriority::Urgent => "\u{25b2}",
        TaskPriority::Medium => "=",
        TaskPriority::Low => "\u{25bc}",
    }
}

/// Title color for a board column.
#[must_use]
pub const fn column_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::ToDo => Color::Blue,
        TaskStatus::InProgress => Color::Cyan,
        TaskStatus::AwaitingFeedback => Color::Yellow,
        TaskStatus::Done => Color::Green,
    }
}

/// Parse a `#rrggbb` accent color, falling back to the highlight color
/// for anything malformed.
#[must_use]
pub fn hex_color(hex: &str) -> Color {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 {
        return HIGHLIGHT;
    }
    let parse = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16);
    match (parse(0..2), parse(2..4), parse(4..6)) {
        (Ok(r), Ok(g), Ok(b)) => Color::Rgb(r, g, b),
        _ => HIGHLIGHT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_color_parses_accents() {
        assert_eq!(hex_color("#FF7A00"), Color::Rgb(255, 122, 0));
        assert_eq!(hex_color("1fd7c1"), Color::Rgb(31, 215, 193));
    }

    #[test]
    fn hex_color_falls_back_on_garbage() {
        assert_eq!(hex_color("red"), HIGHLIGHT);
        assert_eq!(hex_color("#12345"), HIGHLIGHT);
        assert_eq!(hex_color("#gggggg"), HIGHLIGHT);
    }
}
