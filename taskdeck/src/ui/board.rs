//! Kanban board rendering.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

use taskdeck_proto::task::{AssignedContact, FullTask, TaskStatus};

use super::{centered_rect, theme};
use crate::app::App;
use crate::format::{initials, truncate_name};
use crate::store::columns::BoardColumns;

/// Render the board with its four columns and, if open, the task
/// detail overlay.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(area);

    render_search_line(frame, chunks[0], app);

    let columns = BoardColumns::partition(&app.tasks);
    let column_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(chunks[1]);

    for (idx, status) in TaskStatus::ALL.into_iter().enumerate() {
        render_column(frame, column_chunks[idx], app, status, columns.column(status));
    }

    if app.board.detail.is_some() {
        render_detail(frame, area, app);
    }
}

fn render_search_line(frame: &mut Frame, area: Rect, app: &App) {
    if !app.board.searching && app.board.search.is_empty() {
        return;
    }
    let cursor = if app.board.searching { "_" } else { "" };
    let line = Line::from(vec![
        Span::styled("Find task: ", theme::dimmed()),
        Span::styled(format!("{}{cursor}", app.board.search), theme::bold()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_column(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    status: TaskStatus,
    tasks: &[FullTask],
) {
    let is_focused = app.board.column == status && app.board.detail.is_none();
    let visible = app.board.visible(tasks);

    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .map(|(idx, task)| {
            let is_selected = is_focused && idx == app.board.selected;
            let style = if is_selected {
                theme::selected()
            } else {
                theme::normal()
            };
            ListItem::new(card_lines(task)).style(style)
        })
        .collect();

    let title = format!("{status} ({})", visible.len());
    let block = Block::default()
        .title(Span::styled(
            title,
            theme::panel_title(theme::column_color(status)),
        ))
        .borders(Borders::ALL)
        .border_style(if is_focused {
            theme::highlighted()
        } else {
            theme::normal()
        });

    frame.render_widget(List::new(items).block(block), area);
}

/// The two display lines of a board card: title, then priority marker,
/// subtask progress, and assignee initials.
fn card_lines(task: &FullTask) -> Vec<Line<'_>> {
    let mut meta = vec![Span::styled(
        theme::priority_symbol(task.task.priority),
        theme::normal().fg(theme::priority_color(task.task.priority)),
    )];
    if !task.subtasks.is_empty() {
        meta.push(Span::styled(
            format!(" {}/{}", task.done_subtasks(), task.subtasks.len()),
            theme::dimmed(),
        ));
    }
    for assignee in &task.assignees {
        meta.push(Span::raw(" "));
        meta.push(Span::styled(
            initials(&assignee.name),
            theme::normal().fg(theme::hex_color(&assignee.color)),
        ));
    }

    vec![Line::from(task.task.title.as_str()), Line::from(meta)]
}

/// One assignee row of the detail overlay: initials badge plus the
/// name truncated to the configured width.
fn assignee_line(assignee: &AssignedContact, name_width: usize) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {} ", initials(&assignee.name)),
            theme::bold().fg(theme::hex_color(&assignee.color)),
        ),
        Span::raw(truncate_name(&assignee.name, name_width)),
    ])
}

fn render_detail(frame: &mut Frame, area: Rect, app: &App) {
    let Some(task) = app.detail_task() else {
        return;
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(task.task.category.to_string(), theme::dimmed()),
            Span::raw("  "),
            Span::styled(
                format!(
                    "{} {}",
                    theme::priority_symbol(task.task.priority),
                    task.task.priority
                ),
                theme::normal().fg(theme::priority_color(task.task.priority)),
            ),
        ]),
        Line::from(Span::styled(task.task.title.as_str(), theme::bold())),
        Line::from(""),
    ];

    if let Some(description) = &task.task.description {
        lines.push(Line::from(description.as_str()));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(vec![
        Span::styled("Due: ", theme::dimmed()),
        Span::raw(task.task.due_date.format("%Y-%m-%d").to_string()),
    ]));

    if !task.assignees.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Assigned to", theme::dimmed())));
        for assignee in &task.assignees {
            lines.push(assignee_line(assignee, app.name_width));
        }
    }

    if !task.subtasks.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Subtasks", theme::dimmed())));
        for (idx, subtask) in task.subtasks.iter().enumerate() {
            let marker = if subtask.is_done { "[x]" } else { "[ ]" };
            let style = if idx == app.detail_subtask {
                theme::selected()
            } else {
                theme::normal()
            };
            lines.push(Line::from(Span::styled(
                format!("  {marker} {}", subtask.title),
                style,
            )));
        }
    }

    let popup = centered_rect(70, 80, area);
    let block = Block::default()
        .title(Span::styled("Task", theme::panel_title(theme::HIGHLIGHT)))
        .borders(Borders::ALL)
        .border_style(theme::highlighted());

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        popup,
    );
}
