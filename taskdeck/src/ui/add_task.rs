//! Add-task form rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::theme;
use crate::app::App;
use crate::format::initials;
use crate::views::add_task::AddTaskField;

/// Render the add-task form.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.add_task;
    let focus = form.focus;

    let mut lines = vec![
        text_line("Title      ", &form.title, focus == AddTaskField::Title),
        text_line("Description", &form.description, focus == AddTaskField::Description),
        text_line("Due date   ", &form.due_date, focus == AddTaskField::DueDate),
        pick_line(
            "Priority   ",
            &format!(
                "{} {}",
                theme::priority_symbol(form.priority()),
                form.priority()
            ),
            focus == AddTaskField::Priority,
        ),
        pick_line(
            "Category   ",
            &form
                .category
                .map_or_else(|| "select with ←→".to_string(), |c| c.to_string()),
            focus == AddTaskField::Category,
        ),
        Line::from(""),
        section_header("Assigned to", focus == AddTaskField::Assignees),
    ];

    if app.contacts.is_empty() {
        lines.push(Line::from(Span::styled("  no contacts yet", theme::dimmed())));
    }
    for (idx, contact) in app.contacts.iter().enumerate() {
        let marker = if form.is_assigned(contact.id) { "[x]" } else { "[ ]" };
        let style = if focus == AddTaskField::Assignees && idx == form.assignee_cursor {
            theme::selected()
        } else {
            theme::normal()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {marker} "), style),
            Span::styled(
                format!("{} ", initials(&contact.name)),
                theme::bold().fg(theme::hex_color(&contact.color)),
            ),
            Span::styled(contact.name.as_str(), style),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(section_header("Subtasks", focus == AddTaskField::Subtasks));
    for subtask in &form.subtasks {
        lines.push(Line::from(format!("  [ ] {subtask}")));
    }
    if focus == AddTaskField::Subtasks {
        lines.push(Line::from(vec![
            Span::styled("  + ", theme::dimmed()),
            Span::styled(format!("{}_", form.subtask_input), theme::bold()),
        ]));
    }

    let block = Block::default()
        .title(Span::styled("Add Task", theme::panel_title(theme::BRAND)))
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn text_line<'a>(label: &'a str, value: &'a str, focused: bool) -> Line<'a> {
    let cursor = if focused { "_" } else { "" };
    Line::from(vec![
        label_span(label, focused),
        Span::raw(format!("{value}{cursor}")),
    ])
}

fn pick_line<'a>(label: &'a str, value: &str, focused: bool) -> Line<'a> {
    Line::from(vec![label_span(label, focused), Span::raw(value.to_string())])
}

fn section_header(label: &str, focused: bool) -> Line<'_> {
    Line::from(label_span(label, focused))
}

fn label_span(label: &str, focused: bool) -> Span<'_> {
    Span::styled(
        format!("{label}  "),
        if focused { theme::highlighted() } else { theme::dimmed() },
    )
}
