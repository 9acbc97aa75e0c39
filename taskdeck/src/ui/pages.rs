//! Static pages: help, privacy policy, legal notice.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::theme;

/// Render the key binding help page.
pub fn render_help(frame: &mut Frame, area: Rect) {
    let lines = vec![
        section("Screens"),
        entry("1 / 2 / 3 / 4", "Summary, Board, Add Task, Contacts"),
        entry("m", "open the menu"),
        entry("q", "quit"),
        Line::from(""),
        section("Board"),
        entry("←→ / hl", "move between columns"),
        entry("↑↓ / jk", "select a task"),
        entry("Enter", "open the task details"),
        entry("< / >", "move the task one column left or right"),
        entry("x", "delete the selected task"),
        entry("/", "filter tasks by title or description"),
        Line::from(""),
        section("Task details"),
        entry("↑↓ / jk", "select a subtask"),
        entry("Space", "toggle the subtask"),
        entry("Esc", "close"),
        Line::from(""),
        section("Contacts"),
        entry("a / e / x", "add, edit, delete"),
        entry("Enter", "open the contact"),
        entry("↑↓ / jk", "step through contacts while one is open"),
        Line::from(""),
        section("Add Task"),
        entry("Tab", "next field"),
        entry("←→", "pick priority or category"),
        entry("Space", "toggle an assignee"),
        entry("Ctrl+S", "create the task"),
    ];
    render_page(frame, area, "Help", lines);
}

/// Render the privacy policy page.
pub fn render_privacy_policy(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(
            "TaskDeck stores contacts and tasks on the hub you configure and \
             nowhere else. No data leaves that hub.",
        ),
        Line::from(""),
        Line::from(
            "Contact records consist of the name, email address, phone number, \
             and an accent color. They are visible to every client connected \
             to the same hub and can be edited or deleted by any of them.",
        ),
        Line::from(""),
        Line::from(
            "The client keeps no local copy beyond the running session. Log \
             files contain connection metadata only, never contact data.",
        ),
    ];
    render_page(frame, area, "Privacy Policy", lines);
}

/// Render the legal notice page.
pub fn render_legal_notice(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from("TaskDeck is provided as is, without warranty of any kind."),
        Line::from(""),
        Line::from(
            "The operator of the hub you connect to is responsible for the \
             data stored there. Contact them for takedown or correction \
             requests.",
        ),
    ];
    render_page(frame, area, "Legal Notice", lines);
}

fn render_page(frame: &mut Frame, area: Rect, title: &str, lines: Vec<Line>) {
    let block = Block::default()
        .title(Span::styled(title, theme::panel_title(theme::BRAND)))
        .borders(Borders::ALL);
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
        area,
    );
}

fn section(label: &str) -> Line<'_> {
    Line::from(Span::styled(label, theme::panel_title(theme::HIGHLIGHT)))
}

fn entry<'a>(keys: &'a str, what: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {keys:<14}"), theme::bold()),
        Span::styled(what, theme::dimmed()),
    ])
}
