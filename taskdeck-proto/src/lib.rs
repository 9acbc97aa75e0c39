//! Shared protocol definitions for the `TaskDeck` wire format.

pub mod api;
pub mod codec;
pub mod contact;
pub mod task;
