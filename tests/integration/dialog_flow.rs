//! Full user flows: key events drive the [`App`], the commands it emits
//! run against a live hub through the store, and the resulting snapshots
//! feed back in as store events.

use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use taskdeck::app::{App, EXIT_DELAY, Screen};
use taskdeck::backend::hub::HubBackend;
use taskdeck::net::{StoreCommand, StoreEvent};
use taskdeck::store::SyncStore;
use taskdeck::views::contacts::ContactDialog;
use taskdeck_proto::task::TaskStatus;

async fn store_on_fresh_hub() -> (SyncStore<HubBackend>, tokio::task::JoinHandle<()>) {
    let (addr, handle) = taskdeck_hub::hub::start_server("127.0.0.1:0")
        .await
        .expect("failed to start test hub");
    let url = format!("ws://{addr}/ws");
    let backend = HubBackend::connect(&url).await.expect("connect failed");
    (SyncStore::new(Arc::new(backend)), handle)
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

fn type_text(app: &mut App, text: &str, now: Instant) {
    for c in text.chars() {
        app.handle_key_event(key(KeyCode::Char(c)), now);
    }
}

/// Run one store command the way the sync layer would, then push the
/// fresh snapshots back into the app.
async fn run_command(app: &mut App, store: &SyncStore<HubBackend>, cmd: StoreCommand, now: Instant) {
    let result = match cmd {
        StoreCommand::CreateContact(contact) => store.create_contact(contact).await,
        StoreCommand::UpdateContact { id, patch } => store.update_contact(id, patch).await,
        StoreCommand::DeleteContact(id) => store.delete_contact(id).await,
        StoreCommand::CreateTask(draft) => store.create_task(draft).await,
        StoreCommand::MoveTask { id, status } => store.move_task(id, status).await,
        StoreCommand::DeleteTask(id) => store.delete_task(id).await,
        StoreCommand::ToggleSubtask { id, is_done } => store.toggle_subtask(id, is_done).await,
        StoreCommand::Refresh => store.refresh_all().await,
        StoreCommand::Shutdown => return,
    };
    result.expect("command failed against live hub");
    app.apply_event(StoreEvent::ContactsUpdated(store.contacts_snapshot()), now);
    app.apply_event(StoreEvent::TasksUpdated(store.tasks_snapshot()), now);
}

#[tokio::test]
async fn add_contact_flow() {
    let (store, _hub) = store_on_fresh_hub().await;
    let mut app = App::new();
    app.screen = Screen::Contacts;
    let now = Instant::now();

    app.handle_key_event(key(KeyCode::Char('a')), now);
    type_text(&mut app, "Amy Pond", now);
    app.handle_key_event(key(KeyCode::Tab), now);
    type_text(&mut app, "amy@tardis.example", now);
    app.handle_key_event(key(KeyCode::Tab), now);
    type_text(&mut app, "555 0100", now);

    let cmd = app.handle_key_event(key(KeyCode::Enter), now).expect("no command");
    run_command(&mut app, &store, cmd, now).await;

    assert_eq!(app.contacts.len(), 1);
    assert_eq!(app.contacts[0].name, "Amy Pond");

    // The dialog lingers until the exit delay elapses.
    assert!(matches!(app.contacts_view.dialog, ContactDialog::Adding(_)));
    app.tick(now + EXIT_DELAY);
    assert_eq!(app.contacts_view.dialog, ContactDialog::Closed);
}

#[tokio::test]
async fn edit_contact_flow() {
    let (store, _hub) = store_on_fresh_hub().await;
    let mut app = App::new();
    app.screen = Screen::Contacts;
    let now = Instant::now();

    app.handle_key_event(key(KeyCode::Char('a')), now);
    type_text(&mut app, "Amy Pond", now);
    app.handle_key_event(key(KeyCode::Tab), now);
    type_text(&mut app, "amy@example.com", now);
    app.handle_key_event(key(KeyCode::Tab), now);
    type_text(&mut app, "555 0100", now);
    let cmd = app.handle_key_event(key(KeyCode::Enter), now).expect("no command");
    run_command(&mut app, &store, cmd, now).await;
    app.tick(now + EXIT_DELAY);

    // Open, edit the phone, save.
    app.handle_key_event(key(KeyCode::Enter), now);
    app.handle_key_event(key(KeyCode::Char('e')), now);
    app.handle_key_event(key(KeyCode::Tab), now);
    app.handle_key_event(key(KeyCode::Tab), now);
    for _ in 0..8 {
        app.handle_key_event(key(KeyCode::Backspace), now);
    }
    type_text(&mut app, "555 0199", now);

    let cmd = app.handle_key_event(key(KeyCode::Enter), now).expect("no command");
    run_command(&mut app, &store, cmd, now).await;

    assert_eq!(app.contacts[0].phone, "555 0199");
    assert_eq!(app.contacts[0].name, "Amy Pond");
    app.tick(now + EXIT_DELAY);
    assert_eq!(app.contacts_view.dialog, ContactDialog::Closed);
}

#[tokio::test]
async fn delete_contact_from_viewing_dialog() {
    let (store, _hub) = store_on_fresh_hub().await;
    let mut app = App::new();
    app.screen = Screen::Contacts;
    let now = Instant::now();

    app.handle_key_event(key(KeyCode::Char('a')), now);
    type_text(&mut app, "Amy Pond", now);
    app.handle_key_event(key(KeyCode::Tab), now);
    type_text(&mut app, "amy@example.com", now);
    app.handle_key_event(key(KeyCode::Tab), now);
    type_text(&mut app, "555 0100", now);
    let cmd = app.handle_key_event(key(KeyCode::Enter), now).expect("no command");
    run_command(&mut app, &store, cmd, now).await;
    app.tick(now + EXIT_DELAY);

    app.handle_key_event(key(KeyCode::Enter), now);
    assert!(matches!(app.contacts_view.dialog, ContactDialog::Viewing(_)));

    let cmd = app.handle_key_event(key(KeyCode::Char('x')), now).expect("no command");
    run_command(&mut app, &store, cmd, now).await;

    assert!(app.contacts.is_empty());
    app.tick(now + EXIT_DELAY);
    assert_eq!(app.contacts_view.dialog, ContactDialog::Closed);
}

#[tokio::test]
async fn reopening_cancels_a_pending_close() {
    let (store, _hub) = store_on_fresh_hub().await;
    let mut app = App::new();
    app.screen = Screen::Contacts;
    let now = Instant::now();

    app.handle_key_event(key(KeyCode::Char('a')), now);
    type_text(&mut app, "Amy Pond", now);
    app.handle_key_event(key(KeyCode::Tab), now);
    type_text(&mut app, "amy@example.com", now);
    app.handle_key_event(key(KeyCode::Tab), now);
    type_text(&mut app, "555 0100", now);
    let cmd = app.handle_key_event(key(KeyCode::Enter), now).expect("no command");
    run_command(&mut app, &store, cmd, now).await;
    app.tick(now + EXIT_DELAY);

    // Schedule a close from the viewing dialog, then switch to editing
    // before the delay elapses. The close must not fire.
    app.handle_key_event(key(KeyCode::Enter), now);
    app.handle_key_event(key(KeyCode::Esc), now);
    app.handle_key_event(key(KeyCode::Char('e')), now);
    app.tick(now + EXIT_DELAY + EXIT_DELAY);

    assert!(matches!(
        app.contacts_view.dialog,
        ContactDialog::Editing { .. }
    ));
}

#[tokio::test]
async fn add_task_flow_lands_on_the_board() {
    let (store, _hub) = store_on_fresh_hub().await;
    let mut app = App::new();
    let now = Instant::now();

    // Seed a contact to assign.
    store
        .create_contact(taskdeck_proto::contact::NewContact {
            name: "Amy Pond".to_string(),
            email: "amy@example.com".to_string(),
            phone: "555 0100".to_string(),
            color: "#29abe2".to_string(),
        })
        .await
        .unwrap();
    app.apply_event(StoreEvent::ContactsUpdated(store.contacts_snapshot()), now);

    app.screen = Screen::AddTask;
    type_text(&mut app, "Ship onboarding", now);
    app.handle_key_event(key(KeyCode::Tab), now);
    type_text(&mut app, "walk new users through the board", now);
    app.handle_key_event(key(KeyCode::Tab), now);
    type_text(&mut app, "2099-01-01", now);
    app.handle_key_event(key(KeyCode::Tab), now);
    app.handle_key_event(key(KeyCode::Right), now); // priority
    app.handle_key_event(key(KeyCode::Tab), now);
    app.handle_key_event(key(KeyCode::Right), now); // category
    app.handle_key_event(key(KeyCode::Tab), now);
    app.handle_key_event(key(KeyCode::Char(' ')), now); // assign Amy
    app.handle_key_event(key(KeyCode::Tab), now);
    type_text(&mut app, "write the copy", now);
    app.handle_key_event(key(KeyCode::Enter), now);

    let cmd = app.handle_key_event(ctrl('s'), now).expect("no command");
    run_command(&mut app, &store, cmd, now).await;

    assert_eq!(app.screen, Screen::Board);
    assert_eq!(app.tasks.len(), 1);
    let task = &app.tasks[0];
    assert_eq!(task.task.title, "Ship onboarding");
    assert_eq!(task.task.status, TaskStatus::ToDo);
    assert_eq!(task.subtasks.len(), 1);
    assert_eq!(task.assignees.len(), 1);
    assert_eq!(task.assignees[0].name, "Amy Pond");
}

#[tokio::test]
async fn board_detail_subtask_toggle_flow() {
    let (store, _hub) = store_on_fresh_hub().await;
    let mut app = App::new();
    let now = Instant::now();

    app.screen = Screen::AddTask;
    type_text(&mut app, "Checklist", now);
    app.handle_key_event(key(KeyCode::Tab), now);
    app.handle_key_event(key(KeyCode::Tab), now);
    type_text(&mut app, "2099-01-01", now);
    app.handle_key_event(key(KeyCode::Tab), now);
    app.handle_key_event(key(KeyCode::Tab), now);
    app.handle_key_event(key(KeyCode::Right), now); // category
    app.handle_key_event(key(KeyCode::Tab), now);
    app.handle_key_event(key(KeyCode::Tab), now);
    type_text(&mut app, "first step", now);
    app.handle_key_event(key(KeyCode::Enter), now);
    let cmd = app.handle_key_event(ctrl('s'), now).expect("no command");
    run_command(&mut app, &store, cmd, now).await;

    // Open the detail overlay and tick the subtask off.
    app.handle_key_event(key(KeyCode::Enter), now);
    assert!(app.board.detail.is_some());

    let cmd = app
        .handle_key_event(key(KeyCode::Char(' ')), now)
        .expect("no command");
    run_command(&mut app, &store, cmd, now).await;
    assert!(app.tasks[0].subtasks[0].is_done);

    // Esc closes the overlay after the exit delay.
    app.handle_key_event(key(KeyCode::Esc), now);
    assert!(app.board.detail.is_some());
    app.tick(now + EXIT_DELAY);
    assert!(app.board.detail.is_none());
}

#[tokio::test]
async fn board_move_flow_changes_columns() {
    let (store, _hub) = store_on_fresh_hub().await;
    let mut app = App::new();
    let now = Instant::now();

    app.screen = Screen::AddTask;
    type_text(&mut app, "Promote me", now);
    app.handle_key_event(key(KeyCode::Tab), now);
    app.handle_key_event(key(KeyCode::Tab), now);
    type_text(&mut app, "2099-01-01", now);
    app.handle_key_event(key(KeyCode::Tab), now);
    app.handle_key_event(key(KeyCode::Tab), now);
    app.handle_key_event(key(KeyCode::Right), now); // category
    let cmd = app.handle_key_event(ctrl('s'), now).expect("no command");
    run_command(&mut app, &store, cmd, now).await;

    let cmd = app
        .handle_key_event(key(KeyCode::Char('>')), now)
        .expect("no command");
    run_command(&mut app, &store, cmd, now).await;

    assert_eq!(app.tasks[0].task.status, TaskStatus::InProgress);
    // The focused column (To Do) is now empty.
    assert!(app.column_task_ids().is_empty());
}
