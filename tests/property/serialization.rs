//! Property-based serialization round-trip tests.
//!
//! Uses proptest to verify:
//! 1. Any valid contact or task record survives encode → decode.
//! 2. Any valid client or server frame survives encode → decode.
//! 3. Random bytes never cause a panic in decode (returns `Err` gracefully).

use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;

use taskdeck_proto::api::{
    ApiRequest, ApiResponse, ChangeEvent, ChangeOp, ClientFrame, RequestId, ServerFrame, Table,
    decode_client, decode_server, encode_client, encode_server,
};
use taskdeck_proto::codec;
use taskdeck_proto::contact::{Contact, ContactId, ContactPatch, NewContact};
use taskdeck_proto::task::{
    AssignedContact, FullTask, Subtask, SubtaskId, Task, TaskCategory, TaskDraft, TaskId,
    TaskPriority, TaskStatus,
};

// --- Strategies for protocol types ---

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).expect("valid date"))
}

fn arb_timestamp() -> impl Strategy<Value = chrono::DateTime<Utc>> {
    (0i64..4_000_000_000).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

fn arb_priority() -> impl Strategy<Value = TaskPriority> {
    prop_oneof![
        Just(TaskPriority::Urgent),
        Just(TaskPriority::Medium),
        Just(TaskPriority::Low),
    ]
}

fn arb_category() -> impl Strategy<Value = TaskCategory> {
    prop_oneof![Just(TaskCategory::TechnicalTask), Just(TaskCategory::UserStory)]
}

fn arb_status() -> impl Strategy<Value = TaskStatus> {
    prop_oneof![
        Just(TaskStatus::ToDo),
        Just(TaskStatus::InProgress),
        Just(TaskStatus::AwaitingFeedback),
        Just(TaskStatus::Done),
    ]
}

fn arb_contact() -> impl Strategy<Value = Contact> {
    (
        any::<i64>(),
        ".{0,64}",
        ".{0,64}",
        ".{0,32}",
        "#[0-9a-f]{6}",
        arb_timestamp(),
    )
        .prop_map(|(id, name, email, phone, color, created_at)| Contact {
            id: ContactId(id),
            name,
            email,
            phone,
            color,
            created_at,
        })
}

fn arb_contact_patch() -> impl Strategy<Value = ContactPatch> {
    (
        prop::option::of(".{0,64}"),
        prop::option::of(".{0,64}"),
        prop::option::of(".{0,32}"),
        prop::option::of("#[0-9a-f]{6}"),
    )
        .prop_map(|(name, email, phone, color)| ContactPatch {
            name,
            email,
            phone,
            color,
        })
}

fn arb_task() -> impl Strategy<Value = Task> {
    (
        any::<i64>(),
        ".{1,80}",
        prop::option::of(".{0,256}"),
        arb_date(),
        arb_priority(),
        arb_category(),
        arb_status(),
        arb_timestamp(),
    )
        .prop_map(
            |(id, title, description, due_date, priority, category, status, created_at)| Task {
                id: TaskId(id),
                title,
                description,
                due_date,
                priority,
                category,
                status,
                created_at,
            },
        )
}

fn arb_subtask() -> impl Strategy<Value = Subtask> {
    (any::<i64>(), any::<i64>(), ".{1,80}", any::<bool>()).prop_map(
        |(id, task_id, title, is_done)| Subtask {
            id: SubtaskId(id),
            task_id: TaskId(task_id),
            title,
            is_done,
        },
    )
}

fn arb_assigned_contact() -> impl Strategy<Value = AssignedContact> {
    (any::<i64>(), ".{0,64}", "#[0-9a-f]{6}", ".{0,64}").prop_map(
        |(id, name, color, email)| AssignedContact {
            id: ContactId(id),
            name,
            color,
            email,
        },
    )
}

fn arb_full_task() -> impl Strategy<Value = FullTask> {
    (
        arb_task(),
        prop::collection::vec(arb_subtask(), 0..6),
        prop::collection::vec(arb_assigned_contact(), 0..4),
    )
        .prop_map(|(task, subtasks, assignees)| FullTask {
            task,
            subtasks,
            assignees,
        })
}

fn arb_task_draft() -> impl Strategy<Value = TaskDraft> {
    (
        ".{1,80}",
        prop::option::of(".{0,256}"),
        arb_date(),
        arb_priority(),
        arb_category(),
        prop::collection::vec(any::<i64>().prop_map(ContactId), 0..6),
        prop::collection::vec(".{1,80}", 0..6),
    )
        .prop_map(
            |(title, description, due_date, priority, category, assigned, subtasks)| TaskDraft {
                title,
                description,
                due_date,
                priority,
                category,
                assigned_contact_ids: assigned,
                subtask_titles: subtasks,
            },
        )
}

fn arb_change_event() -> impl Strategy<Value = ChangeEvent> {
    (
        prop_oneof![
            Just(Table::Contacts),
            Just(Table::Tasks),
            Just(Table::Subtasks),
            Just(Table::TaskAssignments),
        ],
        prop_oneof![
            Just(ChangeOp::Insert),
            Just(ChangeOp::Update),
            Just(ChangeOp::Delete),
        ],
    )
        .prop_map(|(table, op)| ChangeEvent { table, op })
}

fn arb_api_request() -> impl Strategy<Value = ApiRequest> {
    prop_oneof![
        Just(ApiRequest::ListContacts),
        any::<i64>().prop_map(|id| ApiRequest::GetContact { id: ContactId(id) }),
        (any::<i64>(), arb_contact_patch()).prop_map(|(id, patch)| ApiRequest::UpdateContact {
            id: ContactId(id),
            patch,
        }),
        any::<i64>().prop_map(|id| ApiRequest::DeleteContact { id: ContactId(id) }),
        Just(ApiRequest::ListTasks),
        arb_task_draft().prop_map(|draft| ApiRequest::InsertTask { draft }),
        (any::<i64>(), arb_status()).prop_map(|(id, status)| ApiRequest::UpdateTaskStatus {
            id: TaskId(id),
            status,
        }),
        (any::<i64>(), any::<bool>()).prop_map(|(id, is_done)| ApiRequest::SetSubtaskDone {
            id: SubtaskId(id),
            is_done,
        }),
    ]
}

// --- Property tests ---

proptest! {
    /// Any valid contact survives an encode → decode round-trip.
    #[test]
    fn contact_round_trip(contact in arb_contact()) {
        let bytes = codec::encode(&contact).expect("encode should succeed");
        let decoded: Contact = codec::decode(&bytes).expect("decode should succeed");
        prop_assert_eq!(contact, decoded);
    }

    /// Any valid joined task survives an encode → decode round-trip.
    #[test]
    fn full_task_round_trip(task in arb_full_task()) {
        let bytes = codec::encode(&task).expect("encode should succeed");
        let decoded: FullTask = codec::decode(&bytes).expect("decode should succeed");
        prop_assert_eq!(task, decoded);
    }

    /// Any valid request frame survives an encode → decode round-trip,
    /// with the correlation id intact.
    #[test]
    fn client_frame_round_trip(request in arb_api_request()) {
        let frame = ClientFrame::Request {
            id: RequestId::new(),
            request,
        };
        let bytes = encode_client(&frame).expect("encode should succeed");
        let decoded = decode_client(&bytes).expect("decode should succeed");
        prop_assert_eq!(frame, decoded);
    }

    /// Any change notification survives an encode → decode round-trip.
    #[test]
    fn change_frame_round_trip(event in arb_change_event()) {
        let frame = ServerFrame::Change(event);
        let bytes = encode_server(&frame).expect("encode should succeed");
        let decoded = decode_server(&bytes).expect("decode should succeed");
        prop_assert_eq!(frame, decoded);
    }

    /// Any contact listing response survives an encode → decode round-trip.
    #[test]
    fn contacts_response_round_trip(contacts in prop::collection::vec(arb_contact(), 0..8)) {
        let frame = ServerFrame::Response {
            id: RequestId::new(),
            response: ApiResponse::Contacts(contacts),
        };
        let bytes = encode_server(&frame).expect("encode should succeed");
        let decoded = decode_server(&bytes).expect("decode should succeed");
        prop_assert_eq!(frame, decoded);
    }

    /// Random bytes never panic the decoder; they decode or fail cleanly.
    #[test]
    fn random_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = decode_client(&bytes);
        let _ = decode_server(&bytes);
    }
}
