//! Contact book rendering.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use taskdeck_proto::contact::{Contact, ContactId};

use super::{centered_rect, theme};
use crate::app::App;
use crate::format::{initials, truncate_name};
use crate::views::contacts::{ContactDialog, ContactForm, FormField};

/// Render the contact book: the list on the left, the detail panel on
/// the right, and the add/edit dialog when open.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    render_list(frame, chunks[0], app);
    render_detail(frame, chunks[1], app);

    match &app.contacts_view.dialog {
        ContactDialog::Adding(form) => render_form(frame, area, "Add contact", form),
        ContactDialog::Editing { form, .. } => render_form(frame, area, "Edit contact", form),
        ContactDialog::Closed | ContactDialog::Viewing(_) => {}
    }
}

fn render_list(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = matches!(app.contacts_view.dialog, ContactDialog::Closed);

    let items: Vec<ListItem> = app
        .contacts
        .iter()
        .enumerate()
        .map(|(idx, contact)| {
            let is_selected = idx == app.contacts_view.selected;
            let style = if is_selected && is_focused {
                theme::selected()
            } else if is_selected {
                theme::highlighted()
            } else {
                theme::normal()
            };
            ListItem::new(list_line(contact, app.name_width)).style(style)
        })
        .collect();

    let block = Block::default()
        .title(Span::styled(
            format!("Contacts ({})", app.contacts.len()),
            theme::panel_title(theme::HIGHLIGHT),
        ))
        .borders(Borders::ALL)
        .border_style(if is_focused {
            theme::highlighted()
        } else {
            theme::normal()
        });

    frame.render_widget(List::new(items).block(block), area);
}

fn render_detail(frame: &mut Frame, area: Rect, app: &App) {
    let shown: Option<&Contact> = match app.contacts_view.dialog {
        ContactDialog::Viewing(id) => contact_by_id(app, id),
        _ => app.contacts.get(app.contacts_view.selected),
    };

    let lines = shown.map_or_else(
        || vec![Line::from(Span::styled("No contact selected", theme::dimmed()))],
        |contact| {
            vec![
                Line::from(vec![
                    Span::styled(
                        format!("{} ", initials(&contact.name)),
                        theme::bold().fg(theme::hex_color(&contact.color)),
                    ),
                    Span::styled(contact.name.as_str(), theme::bold()),
                ]),
                Line::from(""),
                Line::from(vec![
                    Span::styled("Email  ", theme::dimmed()),
                    Span::raw(contact.email.as_str()),
                ]),
                Line::from(vec![
                    Span::styled("Phone  ", theme::dimmed()),
                    Span::raw(contact.phone.as_str()),
                ]),
            ]
        },
    );

    let block = Block::default()
        .title(Span::styled("Details", theme::panel_title(theme::BRAND)))
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn contact_by_id(app: &App, id: ContactId) -> Option<&Contact> {
    app.contacts.iter().find(|c| c.id == id)
}

/// One row of the contact list: colored initials badge, then the name
/// truncated to the configured width. The detail panel keeps the full
/// name.
fn list_line(contact: &Contact, name_width: usize) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{} ", initials(&contact.name)),
            theme::bold().fg(theme::hex_color(&contact.color)),
        ),
        Span::raw(truncate_name(&contact.name, name_width)),
    ])
}

fn render_form(frame: &mut Frame, area: Rect, title: &str, form: &ContactForm) {
    let lines = vec![
        form_line("Name ", &form.name, form.focus == FormField::Name),
        form_line("Email", &form.email, form.focus == FormField::Email),
        form_line("Phone", &form.phone, form.focus == FormField::Phone),
        Line::from(""),
        Line::from(Span::styled(
            "Tab: next field | Enter: save | Esc: cancel",
            theme::dimmed(),
        )),
    ];

    let popup = centered_rect(60, 50, area);
    let block = Block::default()
        .title(Span::styled(title, theme::panel_title(theme::HIGHLIGHT)))
        .borders(Borders::ALL)
        .border_style(theme::highlighted());

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn form_line<'a>(label: &'a str, value: &'a str, focused: bool) -> Line<'a> {
    let cursor = if focused { "_" } else { "" };
    Line::from(vec![
        Span::styled(
            format!("{label}  "),
            if focused { theme::highlighted() } else { theme::dimmed() },
        ),
        Span::raw(format!("{value}{cursor}")),
    ])
}
