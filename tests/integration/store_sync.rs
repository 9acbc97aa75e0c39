//! Tests of the reactive store against a live hub: every mutation is
//! followed by a fresh fetch of the affected collection, and the watch
//! channels always carry the server's current view.

use std::sync::Arc;

use chrono::NaiveDate;
use taskdeck::backend::hub::HubBackend;
use taskdeck::store::SyncStore;
use taskdeck_proto::contact::{ContactId, ContactPatch, NewContact};
use taskdeck_proto::task::{TaskCategory, TaskDraft, TaskPriority, TaskStatus};

async fn store_on_fresh_hub() -> (SyncStore<HubBackend>, tokio::task::JoinHandle<()>) {
    let (addr, handle) = taskdeck_hub::hub::start_server("127.0.0.1:0")
        .await
        .expect("failed to start test hub");
    let url = format!("ws://{addr}/ws");
    let backend = HubBackend::connect(&url).await.expect("connect failed");
    (SyncStore::new(Arc::new(backend)), handle)
}

fn contact(name: &str) -> NewContact {
    NewContact {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        phone: "555 0100".to_string(),
        color: "#29abe2".to_string(),
    }
}

fn draft(title: &str) -> TaskDraft {
    TaskDraft {
        title: title.to_string(),
        description: None,
        due_date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
        priority: TaskPriority::Low,
        category: TaskCategory::TechnicalTask,
        assigned_contact_ids: vec![],
        subtask_titles: vec![],
    }
}

#[tokio::test]
async fn create_contact_updates_the_snapshot() {
    let (store, _hub) = store_on_fresh_hub().await;

    assert!(store.contacts_snapshot().is_empty());
    store.create_contact(contact("Amy Pond")).await.unwrap();

    let contacts = store.contacts_snapshot();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].name, "Amy Pond");
}

#[tokio::test]
async fn watchers_see_every_mutation() {
    let (store, _hub) = store_on_fresh_hub().await;
    let mut rx = store.contacts();

    store.create_contact(contact("Amy Pond")).await.unwrap();
    rx.changed().await.unwrap();
    let id = rx.borrow_and_update()[0].id;

    store
        .update_contact(
            id,
            ContactPatch {
                name: Some("Amelia Pond".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update()[0].name, "Amelia Pond");

    store.delete_contact(id).await.unwrap();
    rx.changed().await.unwrap();
    assert!(rx.borrow_and_update().is_empty());
}

#[tokio::test]
async fn contact_by_id_always_fetches_fresh() {
    let (store, _hub) = store_on_fresh_hub().await;

    store.create_contact(contact("Amy Pond")).await.unwrap();
    let id = store.contacts_snapshot()[0].id;

    // Delete through the backend directly, bypassing the store's refetch.
    use taskdeck::backend::Backend;
    store.backend().delete_contact(id).await.unwrap();

    // The stale snapshot still has the row, the lookup does not.
    assert_eq!(store.contacts_snapshot().len(), 1);
    assert!(store.contact_by_id(id).await.is_none());
}

#[tokio::test]
async fn contact_by_id_unknown_is_none() {
    let (store, _hub) = store_on_fresh_hub().await;
    assert!(store.contact_by_id(ContactId(42)).await.is_none());
}

#[tokio::test]
async fn task_mutations_flow_into_the_board() {
    let (store, _hub) = store_on_fresh_hub().await;

    store.create_task(draft("Ship it")).await.unwrap();
    let board = store.board();
    assert_eq!(board.column(TaskStatus::ToDo).len(), 1);
    assert!(board.column(TaskStatus::Done).is_empty());

    let id = store.tasks_snapshot()[0].task.id;
    store.move_task(id, TaskStatus::Done).await.unwrap();
    let board = store.board();
    assert!(board.column(TaskStatus::ToDo).is_empty());
    assert_eq!(board.column(TaskStatus::Done).len(), 1);

    store.delete_task(id).await.unwrap();
    assert!(store.tasks_snapshot().is_empty());
}

#[tokio::test]
async fn toggle_subtask_refetches_tasks() {
    let (store, _hub) = store_on_fresh_hub().await;

    let mut task = draft("Checklist");
    task.subtask_titles = vec!["one".to_string(), "two".to_string()];
    store.create_task(task).await.unwrap();

    let snapshot = store.tasks_snapshot();
    let subtask = snapshot[0].subtasks[0].id;
    store.toggle_subtask(subtask, true).await.unwrap();

    assert_eq!(store.tasks_snapshot()[0].done_subtasks(), 1);
}

#[tokio::test]
async fn refresh_all_pulls_rows_written_elsewhere() {
    let (addr, _hub) = taskdeck_hub::hub::start_server("127.0.0.1:0")
        .await
        .expect("failed to start test hub");
    let url = format!("ws://{addr}/ws");

    let writer = HubBackend::connect(&url).await.unwrap();
    let store = SyncStore::new(Arc::new(HubBackend::connect(&url).await.unwrap()));

    use taskdeck::backend::Backend;
    writer.insert_contact(contact("Amy Pond")).await.unwrap();
    writer.insert_task(draft("Ship it")).await.unwrap();

    assert!(store.contacts_snapshot().is_empty());
    store.refresh_all().await.unwrap();
    assert_eq!(store.contacts_snapshot().len(), 1);
    assert_eq!(store.tasks_snapshot().len(), 1);
}

#[tokio::test]
async fn failed_mutation_leaves_snapshots_untouched() {
    let (store, _hub) = store_on_fresh_hub().await;

    store.create_contact(contact("Amy Pond")).await.unwrap();
    let before = store.contacts_snapshot();

    let mut task = draft("Bad assignee");
    task.assigned_contact_ids = vec![ContactId(9999)];
    assert!(store.create_task(task).await.is_err());

    assert_eq!(store.contacts_snapshot(), before);
    assert!(store.tasks_snapshot().is_empty());
}
