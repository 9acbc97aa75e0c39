//! Summary screen rendering.

use chrono::Timelike;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::theme;
use crate::app::App;
use crate::views::summary::{BoardStats, greeting_for_hour};

/// Render the summary dashboard.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let stats = BoardStats::from_tasks(&app.tasks);
    let hour = chrono::Local::now().hour();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let greeting = Line::from(vec![Span::styled(
        format!("{}!", greeting_for_hour(hour)),
        theme::panel_title(theme::BRAND),
    )]);
    frame.render_widget(Paragraph::new(greeting), chunks[0]);

    let urgent_line = match stats.next_urgent_due {
        Some(due) => format!(
            "{} urgent, next deadline {}",
            stats.urgent,
            due.format("%B %-d, %Y")
        ),
        None => "No urgent tasks".to_string(),
    };

    let lines = vec![
        stat_line("Tasks on the board", stats.total),
        stat_line("To do", stats.to_do),
        stat_line("In progress", stats.in_progress),
        stat_line("Awaiting feedback", stats.awaiting_feedback),
        stat_line("Done", stats.done),
        Line::from(Span::styled(
            urgent_line,
            theme::normal().fg(theme::ERROR),
        )),
    ];

    let block = Block::default()
        .title(Span::styled("Overview", theme::panel_title(theme::HIGHLIGHT)))
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), chunks[1]);
}

fn stat_line(label: &str, value: usize) -> Line<'_> {
    Line::from(vec![
        Span::styled(format!("{value:>4}  "), theme::bold()),
        Span::styled(label, theme::dimmed()),
    ])
}
