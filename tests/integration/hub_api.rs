//! End-to-end tests of the hub's CRUD semantics through the WebSocket
//! client: row id assignment, ordering, joins, and cascading deletes.

use std::time::Duration;

use chrono::NaiveDate;
use taskdeck::backend::hub::HubBackend;
use taskdeck::backend::{Backend, BackendError};
use taskdeck_proto::contact::{ContactId, ContactPatch, NewContact};
use taskdeck_proto::task::{TaskCategory, TaskDraft, TaskPriority, TaskStatus};

async fn start_hub() -> (String, tokio::task::JoinHandle<()>) {
    let (addr, handle) = taskdeck_hub::hub::start_server("127.0.0.1:0")
        .await
        .expect("failed to start test hub");
    (format!("ws://{addr}/ws"), handle)
}

fn contact(name: &str) -> NewContact {
    NewContact {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        phone: "123456".to_string(),
        color: "#ff7a00".to_string(),
    }
}

fn draft(title: &str) -> TaskDraft {
    TaskDraft {
        title: title.to_string(),
        description: Some("details".to_string()),
        due_date: NaiveDate::from_ymd_opt(2026, 9, 15).unwrap(),
        priority: TaskPriority::Medium,
        category: TaskCategory::UserStory,
        assigned_contact_ids: vec![],
        subtask_titles: vec![],
    }
}

#[tokio::test]
async fn contacts_are_ordered_by_name_case_insensitive() {
    let (url, _hub) = start_hub().await;
    let backend = HubBackend::connect(&url).await.unwrap();

    backend.insert_contact(contact("zoe Adams")).await.unwrap();
    backend.insert_contact(contact("Amy Pond")).await.unwrap();
    backend.insert_contact(contact("bella Swan")).await.unwrap();

    let names: Vec<String> = backend
        .list_contacts()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Amy Pond", "bella Swan", "zoe Adams"]);
}

#[tokio::test]
async fn new_tasks_start_in_to_do() {
    let (url, _hub) = start_hub().await;
    let backend = HubBackend::connect(&url).await.unwrap();

    backend.insert_task(draft("First")).await.unwrap();
    let tasks = backend.list_tasks().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].task.status, TaskStatus::ToDo);
}

#[tokio::test]
async fn task_lifecycle_with_subtasks_and_assignees() {
    let (url, _hub) = start_hub().await;
    let backend = HubBackend::connect(&url).await.unwrap();

    backend.insert_contact(contact("Amy Pond")).await.unwrap();
    let amy = backend.list_contacts().await.unwrap()[0].id;

    let mut task = draft("Fix login");
    task.assigned_contact_ids = vec![amy];
    task.subtask_titles = vec!["Reproduce".to_string(), "Write test".to_string()];
    backend.insert_task(task).await.unwrap();

    let tasks = backend.list_tasks().await.unwrap();
    assert_eq!(tasks.len(), 1);
    let full = &tasks[0];
    assert_eq!(full.subtasks.len(), 2);
    assert!(full.subtasks.iter().all(|s| !s.is_done));
    assert_eq!(full.assignees.len(), 1);
    assert_eq!(full.assignees[0].name, "Amy Pond");

    // Move across the board.
    backend
        .update_task_status(full.task.id, TaskStatus::InProgress)
        .await
        .unwrap();
    let tasks = backend.list_tasks().await.unwrap();
    assert_eq!(tasks[0].task.status, TaskStatus::InProgress);

    // Tick off a subtask.
    let subtask = tasks[0].subtasks[0].id;
    backend.set_subtask_done(subtask, true).await.unwrap();
    let tasks = backend.list_tasks().await.unwrap();
    assert_eq!(tasks[0].done_subtasks(), 1);

    // Delete cascades to subtasks and assignments.
    backend.delete_task(tasks[0].task.id).await.unwrap();
    assert!(backend.list_tasks().await.unwrap().is_empty());
}

#[tokio::test]
async fn insert_task_with_unknown_assignee_is_rejected_wholesale() {
    let (url, _hub) = start_hub().await;
    let backend = HubBackend::connect(&url).await.unwrap();

    let mut task = draft("Ghost assignment");
    task.assigned_contact_ids = vec![ContactId(999)];
    let result = backend.insert_task(task).await;
    assert!(matches!(result, Err(BackendError::Rejected(_))));

    // Nothing was inserted.
    assert!(backend.list_tasks().await.unwrap().is_empty());
}

#[tokio::test]
async fn deleting_a_contact_removes_their_assignments() {
    let (url, _hub) = start_hub().await;
    let backend = HubBackend::connect(&url).await.unwrap();

    backend.insert_contact(contact("Amy Pond")).await.unwrap();
    let amy = backend.list_contacts().await.unwrap()[0].id;

    let mut task = draft("Shared work");
    task.assigned_contact_ids = vec![amy];
    backend.insert_task(task).await.unwrap();
    assert_eq!(backend.list_tasks().await.unwrap()[0].assignees.len(), 1);

    backend.delete_contact(amy).await.unwrap();

    // The task survives, the assignment does not.
    let tasks = backend.list_tasks().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert!(tasks[0].assignees.is_empty());
}

#[tokio::test]
async fn partial_contact_update_keeps_other_fields() {
    let (url, _hub) = start_hub().await;
    let backend = HubBackend::connect(&url).await.unwrap();

    backend.insert_contact(contact("Amy Pond")).await.unwrap();
    let amy = backend.list_contacts().await.unwrap()[0].id;

    backend
        .update_contact(
            amy,
            ContactPatch {
                email: Some("amy@tardis.example".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let updated = backend.get_contact(amy).await.unwrap().unwrap();
    assert_eq!(updated.email, "amy@tardis.example");
    assert_eq!(updated.name, "Amy Pond");
    assert_eq!(updated.phone, "123456");
}

#[tokio::test]
async fn row_ids_are_unique_across_tables() {
    let (url, _hub) = start_hub().await;
    let backend = HubBackend::connect(&url).await.unwrap();

    backend.insert_contact(contact("Amy Pond")).await.unwrap();
    let mut task = draft("Fix login");
    task.subtask_titles = vec!["step".to_string()];
    backend.insert_task(task).await.unwrap();

    let contact_id = backend.list_contacts().await.unwrap()[0].id.0;
    let tasks = backend.list_tasks().await.unwrap();
    let task_id = tasks[0].task.id.0;
    let subtask_id = tasks[0].subtasks[0].id.0;

    let mut ids = vec![contact_id, task_id, subtask_id];
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 3, "ids must not collide across tables");
}

#[tokio::test]
async fn state_is_shared_across_connections() {
    let (url, _hub) = start_hub().await;
    let writer = HubBackend::connect(&url).await.unwrap();
    let reader = HubBackend::connect(&url).await.unwrap();

    writer.insert_contact(contact("Amy Pond")).await.unwrap();

    let contacts = reader.list_contacts().await.unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].name, "Amy Pond");
}

#[tokio::test]
async fn requests_have_no_response_deadline() {
    let (url, _hub) = start_hub().await;
    let backend = HubBackend::connect(&url).await.unwrap();

    // A healthy hub answers well within this window; the point is that
    // the call resolves by answer, not by an internal timeout.
    let result = tokio::time::timeout(Duration::from_secs(5), backend.list_contacts()).await;
    assert!(result.is_ok());
}
