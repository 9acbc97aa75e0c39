//! Application state and event handling.
//!
//! [`App`] owns the screen state, the local snapshots of the two shared
//! collections, and every per-view state machine. Key events come in
//! from the terminal; commands for the sync layer come out as
//! [`StoreCommand`]s.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use taskdeck_proto::contact::Contact;
use taskdeck_proto::task::{FullTask, TaskCategory, TaskId, TaskPriority, TaskStatus};

use crate::config::ClientConfig;
use crate::net::{StoreCommand, StoreEvent};
use crate::views::add_task::{AddTaskField, AddTaskForm};
use crate::views::board::{BoardView, matches_search, next_status, prev_status};
use crate::views::contacts::{ContactDialog, ContactsView};

/// Which screen is currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Summary dashboard (default).
    Summary,
    /// Kanban board.
    Board,
    /// Add-task form.
    AddTask,
    /// Contact book.
    Contacts,
    /// Key binding help page.
    Help,
    /// Privacy policy page.
    PrivacyPolicy,
    /// Legal notice page.
    LegalNotice,
}

/// Entries of the overflow menu, in display order.
pub const MENU_ITEMS: [(&str, Screen); 3] = [
    ("Help", Screen::Help),
    ("Privacy Policy", Screen::PrivacyPolicy),
    ("Legal Notice", Screen::LegalNotice),
];

/// A transient status message shown in the footer.
#[derive(Debug, Clone)]
pub struct Notification {
    /// The message text.
    pub text: String,
    /// When the message disappears.
    pub expires_at: Instant,
}

/// How long notifications stay visible unless configured otherwise.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// Delay between a dialog exit trigger and the state change, unless
/// configured otherwise.
pub const EXIT_DELAY: Duration = Duration::from_millis(220);

/// Main application state.
pub struct App {
    /// Current screen.
    pub screen: Screen,
    /// Whether the overflow menu is open.
    pub menu_open: bool,
    /// Selected entry in the overflow menu.
    pub menu_selected: usize,
    /// Local snapshot of the contact collection, name-ordered.
    pub contacts: Vec<Contact>,
    /// Local snapshot of the task collection.
    pub tasks: Vec<FullTask>,
    /// Whether the hub connection is up.
    pub connected: bool,
    /// Board screen state.
    pub board: BoardView,
    /// Selected subtask row inside the board detail overlay.
    pub detail_subtask: usize,
    /// Contacts screen state.
    pub contacts_view: ContactsView,
    /// Add-task form state.
    pub add_task: AddTaskForm,
    /// Transient footer message, if any.
    pub notification: Option<Notification>,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Delay between a dialog exit trigger and the state change.
    pub exit_delay: Duration,
    /// How long footer notifications stay visible.
    pub notification_ttl: Duration,
    /// Width budget for names before truncation.
    pub name_width: usize,
}

impl App {
    /// Create a new application on the summary screen with default
    /// UI timings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            screen: Screen::Summary,
            menu_open: false,
            menu_selected: 0,
            contacts: Vec::new(),
            tasks: Vec::new(),
            connected: true,
            board: BoardView::new(),
            detail_subtask: 0,
            contacts_view: ContactsView::new(),
            add_task: AddTaskForm::default(),
            notification: None,
            should_quit: false,
            exit_delay: EXIT_DELAY,
            notification_ttl: NOTIFICATION_TTL,
            name_width: 14,
        }
    }

    /// Create an application taking its UI timings and display widths
    /// from the resolved configuration.
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            exit_delay: config.exit_delay,
            notification_ttl: config.notification_timeout,
            name_width: config.name_width,
            ..Self::new()
        }
    }

    /// Show a footer notification.
    pub fn notify(&mut self, text: impl Into<String>, now: Instant) {
        self.notification = Some(Notification {
            text: text.into(),
            expires_at: now + self.notification_ttl,
        });
    }

    /// Apply an event from the sync layer.
    pub fn apply_event(&mut self, event: StoreEvent, now: Instant) {
        match event {
            StoreEvent::ContactsUpdated(contacts) => {
                self.contacts = contacts;
                self.contacts_view.clamp_selection(self.contacts.len());
            }
            StoreEvent::TasksUpdated(tasks) => {
                self.tasks = tasks;
                let len = self.column_task_ids().len();
                self.board.clamp_selection(len);
            }
            StoreEvent::ConnectionStatus { connected } => {
                self.connected = connected;
                if !connected {
                    self.notify("Connection to hub lost", now);
                }
            }
            StoreEvent::Error(reason) => self.notify(reason, now),
        }
    }

    /// Advance time-driven state: pending dialog transitions and
    /// notification expiry.
    pub fn tick(&mut self, now: Instant) {
        self.contacts_view.tick(now);
        self.board.tick(now);
        if self
            .notification
            .as_ref()
            .is_some_and(|n| now >= n.expires_at)
        {
            self.notification = None;
        }
    }

    /// Handle a mouse event. A click outside the open menu closes it.
    pub fn handle_mouse(&mut self, event: &MouseEvent, menu_area: Rect) {
        if self.menu_open
            && matches!(event.kind, MouseEventKind::Down(MouseButton::Left))
            && !menu_area.contains(Position::new(event.column, event.row))
        {
            self.menu_open = false;
        }
    }

    /// Handle a key event, possibly producing a command for the sync
    /// layer.
    pub fn handle_key_event(&mut self, key: KeyEvent, now: Instant) -> Option<StoreCommand> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }

        if self.menu_open {
            self.handle_menu_key(key);
            return None;
        }

        match self.screen {
            Screen::Summary => {
                self.handle_nav_key(key);
                None
            }
            Screen::Help | Screen::PrivacyPolicy | Screen::LegalNotice => {
                if key.code == KeyCode::Esc {
                    self.screen = Screen::Summary;
                } else {
                    self.handle_nav_key(key);
                }
                None
            }
            Screen::Board => self.handle_board_key(key, now),
            Screen::Contacts => self.handle_contacts_key(key, now),
            Screen::AddTask => self.handle_add_task_key(key, now),
        }
    }

    /// Screen switching and menu shortcuts shared by non-input contexts.
    fn handle_nav_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('1') => self.screen = Screen::Summary,
            KeyCode::Char('2') => self.screen = Screen::Board,
            KeyCode::Char('3') => self.screen = Screen::AddTask,
            KeyCode::Char('4') => self.screen = Screen::Contacts,
            KeyCode::Char('m') => {
                self.menu_open = true;
                self.menu_selected = 0;
            }
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                if self.menu_selected > 0 {
                    self.menu_selected -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.menu_selected + 1 < MENU_ITEMS.len() {
                    self.menu_selected += 1;
                }
            }
            KeyCode::Enter => {
                self.screen = MENU_ITEMS[self.menu_selected].1;
                self.menu_open = false;
            }
            KeyCode::Esc | KeyCode::Char('m') => self.menu_open = false,
            _ => {}
        }
    }

    /// Ids of the tasks visible in the focused board column, after the
    /// search filter.
    #[must_use]
    pub fn column_task_ids(&self) -> Vec<TaskId> {
        self.tasks
            .iter()
            .filter(|t| t.task.status == self.board.column)
            .filter(|t| matches_search(t, &self.board.search))
            .map(|t| t.task.id)
            .collect()
    }

    /// The task selected in the focused board column.
    #[must_use]
    pub fn selected_board_task(&self) -> Option<&FullTask> {
        let id = *self.column_task_ids().get(self.board.selected)?;
        self.tasks.iter().find(|t| t.task.id == id)
    }

    /// The task shown in the detail overlay.
    #[must_use]
    pub fn detail_task(&self) -> Option<&FullTask> {
        let id = self.board.detail?;
        self.tasks.iter().find(|t| t.task.id == id)
    }

    fn handle_board_key(&mut self, key: KeyEvent, now: Instant) -> Option<StoreCommand> {
        if self.board.searching {
            match key.code {
                KeyCode::Esc => {
                    self.board.searching = false;
                    self.board.search.clear();
                }
                KeyCode::Enter => self.board.searching = false,
                KeyCode::Char(c) => self.board.search.push(c),
                KeyCode::Backspace => {
                    self.board.search.pop();
                }
                _ => {}
            }
            self.board.clamp_selection(self.column_task_ids().len());
            return None;
        }

        if self.board.detail.is_some() {
            return self.handle_detail_key(key, now);
        }

        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.board.focus_left(),
            KeyCode::Right | KeyCode::Char('l') => self.board.focus_right(),
            KeyCode::Up | KeyCode::Char('k') => self.board.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => {
                let len = self.column_task_ids().len();
                self.board.select_next(len);
            }
            KeyCode::Enter => {
                if let Some(task) = self.selected_board_task() {
                    let id = task.task.id;
                    self.board.open_detail(id);
                    self.detail_subtask = 0;
                }
            }
            KeyCode::Char('>') => {
                let task = self.selected_board_task()?;
                let status = next_status(task.task.status)?;
                return Some(StoreCommand::MoveTask {
                    id: task.task.id,
                    status,
                });
            }
            KeyCode::Char('<') => {
                let task = self.selected_board_task()?;
                let status = prev_status(task.task.status)?;
                return Some(StoreCommand::MoveTask {
                    id: task.task.id,
                    status,
                });
            }
            KeyCode::Char('x') => {
                let task = self.selected_board_task()?;
                return Some(StoreCommand::DeleteTask(task.task.id));
            }
            KeyCode::Char('/') => {
                self.board.searching = true;
                self.board.search.clear();
            }
            _ => self.handle_nav_key(key),
        }
        None
    }

    fn handle_detail_key(&mut self, key: KeyEvent, now: Instant) -> Option<StoreCommand> {
        match key.code {
            KeyCode::Esc => self.board.schedule_close(now, self.exit_delay),
            KeyCode::Up | KeyCode::Char('k') => {
                if self.detail_subtask > 0 {
                    self.detail_subtask -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let len = self.detail_task().map_or(0, |t| t.subtasks.len());
                if self.detail_subtask + 1 < len {
                    self.detail_subtask += 1;
                }
            }
            KeyCode::Char(' ') => {
                let task = self.detail_task()?;
                let subtask = task.subtasks.get(self.detail_subtask)?;
                return Some(StoreCommand::ToggleSubtask {
                    id: subtask.id,
                    is_done: !subtask.is_done,
                });
            }
            KeyCode::Char('x') => {
                let id = self.board.detail?;
                self.board.schedule_close(now, self.exit_delay);
                return Some(StoreCommand::DeleteTask(id));
            }
            _ => {}
        }
        None
    }

    fn handle_contacts_key(&mut self, key: KeyEvent, now: Instant) -> Option<StoreCommand> {
        match &mut self.contacts_view.dialog {
            ContactDialog::Closed => self.handle_contact_list_key(key),
            ContactDialog::Viewing(id) => {
                let id = *id;
                match key.code {
                    KeyCode::Esc => self.contacts_view.schedule_close(now, self.exit_delay),
                    KeyCode::Up | KeyCode::Char('k') => {
                        self.contacts_view.select_prev();
                        self.schedule_view_of_selected(now);
                    }
                    KeyCode::Down | KeyCode::Char('j') => {
                        self.contacts_view.select_next(self.contacts.len());
                        self.schedule_view_of_selected(now);
                    }
                    KeyCode::Char('e') => {
                        if let Some(contact) =
                            self.contacts.iter().find(|c| c.id == id).cloned()
                        {
                            self.contacts_view.open_edit(&contact);
                        }
                    }
                    KeyCode::Char('x') => {
                        self.contacts_view.schedule_close(now, self.exit_delay);
                        return Some(StoreCommand::DeleteContact(id));
                    }
                    _ => {}
                }
                None
            }
            ContactDialog::Adding(form) => match key.code {
                KeyCode::Esc => {
                    self.contacts_view.schedule_close(now, self.exit_delay);
                    None
                }
                KeyCode::Tab => {
                    form.focus_next();
                    None
                }
                KeyCode::Char(c) => {
                    form.focused_text().push(c);
                    None
                }
                KeyCode::Backspace => {
                    form.focused_text().pop();
                    None
                }
                KeyCode::Enter => match form.to_new_contact() {
                    Ok(contact) => {
                        self.contacts_view.schedule_close(now, self.exit_delay);
                        self.notify("Contact created", now);
                        Some(StoreCommand::CreateContact(contact))
                    }
                    Err(errors) => {
                        self.notify(errors[0].to_string(), now);
                        None
                    }
                },
                _ => None,
            },
            ContactDialog::Editing { id, form } => {
                let id = *id;
                match key.code {
                    KeyCode::Esc => {
                        self.contacts_view.schedule_close(now, self.exit_delay);
                        None
                    }
                    KeyCode::Tab => {
                        form.focus_next();
                        None
                    }
                    KeyCode::Char(c) => {
                        form.focused_text().push(c);
                        None
                    }
                    KeyCode::Backspace => {
                        form.focused_text().pop();
                        None
                    }
                    KeyCode::Enter => match form.to_patch() {
                        Ok(patch) => {
                            self.contacts_view.schedule_close(now, self.exit_delay);
                            self.notify("Contact saved", now);
                            Some(StoreCommand::UpdateContact { id, patch })
                        }
                        Err(errors) => {
                            self.notify(errors[0].to_string(), now);
                            None
                        }
                    },
                    _ => None,
                }
            }
        }
    }

    /// Schedule the detail panel to swap to the selected contact after
    /// the exit delay. Stepping again before it fires retargets the
    /// swap instead of queuing one per step.
    fn schedule_view_of_selected(&mut self, now: Instant) {
        if let Some(contact) = self.contacts.get(self.contacts_view.selected) {
            let next = ContactDialog::Viewing(contact.id);
            self.contacts_view.schedule(next, now, self.exit_delay);
        }
    }

    fn handle_contact_list_key(&mut self, key: KeyEvent) -> Option<StoreCommand> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.contacts_view.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => {
                self.contacts_view.select_next(self.contacts.len());
            }
            KeyCode::Enter => {
                if let Some(contact) = self.contacts.get(self.contacts_view.selected) {
                    let id = contact.id;
                    self.contacts_view.open_view(id);
                }
            }
            KeyCode::Char('a') => self.contacts_view.open_add(),
            KeyCode::Char('e') => {
                if let Some(contact) = self.contacts.get(self.contacts_view.selected).cloned() {
                    self.contacts_view.open_edit(&contact);
                }
            }
            KeyCode::Char('x') => {
                let contact = self.contacts.get(self.contacts_view.selected)?;
                return Some(StoreCommand::DeleteContact(contact.id));
            }
            _ => self.handle_nav_key(key),
        }
        None
    }

    fn handle_add_task_key(&mut self, key: KeyEvent, now: Instant) -> Option<StoreCommand> {
        if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return self.submit_add_task(now);
        }
        match key.code {
            KeyCode::Esc => self.screen = Screen::Board,
            KeyCode::Tab => self.add_task.focus_next(),
            _ => match self.add_task.focus {
                AddTaskField::Title => Self::edit_text(&mut self.add_task.title, key),
                AddTaskField::Description => Self::edit_text(&mut self.add_task.description, key),
                AddTaskField::DueDate => Self::edit_text(&mut self.add_task.due_date, key),
                AddTaskField::Priority => {
                    if let KeyCode::Left | KeyCode::Right = key.code {
                        self.add_task.priority = Some(cycle_priority(
                            self.add_task.priority(),
                            key.code == KeyCode::Right,
                        ));
                    }
                }
                AddTaskField::Category => {
                    if let KeyCode::Left | KeyCode::Right = key.code {
                        self.add_task.category = Some(match self.add_task.category {
                            Some(TaskCategory::TechnicalTask) => TaskCategory::UserStory,
                            _ => TaskCategory::TechnicalTask,
                        });
                    }
                }
                AddTaskField::Assignees => match key.code {
                    KeyCode::Up | KeyCode::Char('k') => {
                        if self.add_task.assignee_cursor > 0 {
                            self.add_task.assignee_cursor -= 1;
                        }
                    }
                    KeyCode::Down | KeyCode::Char('j') => {
                        if self.add_task.assignee_cursor + 1 < self.contacts.len() {
                            self.add_task.assignee_cursor += 1;
                        }
                    }
                    KeyCode::Char(' ') => {
                        if let Some(contact) = self.contacts.get(self.add_task.assignee_cursor) {
                            let id = contact.id;
                            self.add_task.toggle_assignee(id);
                        }
                    }
                    _ => {}
                },
                AddTaskField::Subtasks => match key.code {
                    KeyCode::Enter => self.add_task.commit_subtask(),
                    KeyCode::Char(c) => self.add_task.subtask_input.push(c),
                    KeyCode::Backspace => {
                        self.add_task.subtask_input.pop();
                    }
                    _ => {}
                },
            },
        }
        None
    }

    fn submit_add_task(&mut self, now: Instant) -> Option<StoreCommand> {
        let today = chrono::Local::now().date_naive();
        match self.add_task.validate(today) {
            Ok(draft) => {
                self.add_task.clear();
                self.screen = Screen::Board;
                self.notify("Task added to board", now);
                Some(StoreCommand::CreateTask(draft))
            }
            Err(errors) => {
                self.notify(errors[0].to_string(), now);
                None
            }
        }
    }

    fn edit_text(text: &mut String, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => text.push(c),
            KeyCode::Backspace => {
                text.pop();
            }
            _ => {}
        }
    }
}

/// The next priority when cycling with the arrow keys.
const fn cycle_priority(current: TaskPriority, forward: bool) -> TaskPriority {
    match (current, forward) {
        (TaskPriority::Urgent, true) | (TaskPriority::Low, false) => TaskPriority::Medium,
        (TaskPriority::Medium, true) | (TaskPriority::Urgent, false) => TaskPriority::Low,
        (TaskPriority::Low, true) | (TaskPriority::Medium, false) => TaskPriority::Urgent,
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
