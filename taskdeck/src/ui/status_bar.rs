//! Status bar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::{App, Screen};
use crate::views::contacts::ContactDialog;

/// Render the status bar at the bottom of the screen.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let help_text = help_for(app);

    let (dot_color, status_text) = if app.connected {
        (theme::SUCCESS, "Connected")
    } else {
        (theme::OFFLINE, "Disconnected")
    };

    let mut spans = vec![
        Span::styled("●", theme::normal().fg(dot_color)),
        Span::raw(format!(" {status_text}")),
        Span::raw(" | "),
    ];
    if let Some(notification) = &app.notification {
        spans.push(Span::styled(
            notification.text.clone(),
            theme::normal().fg(theme::WARNING),
        ));
    } else {
        spans.push(Span::styled(help_text, theme::dimmed()));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(theme::status_bar_bg());
    frame.render_widget(paragraph, area);
}

fn help_for(app: &App) -> &'static str {
    if app.menu_open {
        return "↑↓/jk: navigate | Enter: open | Esc: close menu";
    }
    match app.screen {
        Screen::Summary => "1-4: switch screen | m: menu | q: quit",
        Screen::Board => {
            if app.board.searching {
                "type to filter | Enter: keep filter | Esc: clear"
            } else if app.board.detail.is_some() {
                "↑↓/jk: subtask | Space: toggle | x: delete task | Esc: close"
            } else {
                "←→/hl: column | ↑↓/jk: task | Enter: open | </>: move | x: delete | /: search"
            }
        }
        Screen::AddTask => "Tab: next field | ←→: pick | Ctrl+S: create | Esc: back",
        Screen::Contacts => match app.contacts_view.dialog {
            ContactDialog::Closed => "↑↓/jk: select | Enter: open | a: add | e: edit | x: delete",
            ContactDialog::Viewing(_) => "↑↓/jk: next contact | e: edit | x: delete | Esc: close",
            ContactDialog::Adding(_) | ContactDialog::Editing { .. } => {
                "Tab: next field | Enter: save | Esc: cancel"
            }
        },
        Screen::Help | Screen::PrivacyPolicy | Screen::LegalNotice => "Esc: back | q: quit",
    }
}
