//! Header bar with the screen tabs.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::theme;
use crate::app::{App, Screen};

/// Tabs shown in the header, with their shortcut digit.
const TABS: [(&str, char, Screen); 4] = [
    ("Summary", '1', Screen::Summary),
    ("Board", '2', Screen::Board),
    ("Add Task", '3', Screen::AddTask),
    ("Contacts", '4', Screen::Contacts),
];

/// Render the header bar with the title and screen tabs.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled("TaskDeck", theme::panel_title(theme::BRAND)),
        Span::raw("  "),
    ];
    for (label, digit, screen) in TABS {
        let style = if app.screen == screen {
            theme::highlighted()
        } else {
            theme::dimmed()
        };
        spans.push(Span::styled(format!(" {digit} {label} "), style));
    }
    spans.push(Span::styled("  m Menu", theme::dimmed()));

    let block = Block::default().borders(Borders::BOTTOM);
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
