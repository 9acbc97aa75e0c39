//! Terminal UI rendering.

pub mod add_task;
pub mod board;
pub mod contacts;
pub mod header;
pub mod pages;
pub mod status_bar;
pub mod summary;
pub mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Clear, List, ListItem},
};

use crate::app::{App, MENU_ITEMS, Screen};

/// Main draw function for the entire UI.
pub fn draw(frame: &mut Frame, app: &App) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    header::render(frame, main_chunks[0], app);

    let content_area = main_chunks[1];
    match app.screen {
        Screen::Summary => summary::render(frame, content_area, app),
        Screen::Board => board::render(frame, content_area, app),
        Screen::AddTask => add_task::render(frame, content_area, app),
        Screen::Contacts => contacts::render(frame, content_area, app),
        Screen::Help => pages::render_help(frame, content_area),
        Screen::PrivacyPolicy => pages::render_privacy_policy(frame, content_area),
        Screen::LegalNotice => pages::render_legal_notice(frame, content_area),
    }

    status_bar::render(frame, main_chunks[2], app);

    if app.menu_open {
        render_menu(frame, app);
    }
}

/// Area of the overflow menu popup, anchored to the top-right corner.
///
/// The main loop passes this to mouse handling so clicks outside the
/// menu can close it.
#[must_use]
pub fn menu_area(area: Rect) -> Rect {
    let width = 20u16.min(area.width);
    let height = (MENU_ITEMS.len() as u16 + 2).min(area.height);
    Rect::new(area.width.saturating_sub(width), 3.min(area.height), width, height)
}

fn render_menu(frame: &mut Frame, app: &App) {
    let area = menu_area(frame.area());
    let items: Vec<ListItem> = MENU_ITEMS
        .iter()
        .enumerate()
        .map(|(idx, (label, _))| {
            let style = if idx == app.menu_selected {
                theme::selected()
            } else {
                theme::normal()
            };
            ListItem::new(*label).style(style)
        })
        .collect();

    let block = Block::default()
        .title("Menu")
        .borders(Borders::ALL)
        .border_style(theme::highlighted());

    frame.render_widget(Clear, area);
    frame.render_widget(List::new(items).block(block), area);
}

/// A centered popup area, sized as a fraction of the parent.
#[must_use]
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
