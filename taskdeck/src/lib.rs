//! `TaskDeck` client library.
//!
//! A terminal kanban board with a contact book, kept in sync with a hosted
//! data hub over WebSocket. The [`store::SyncStore`] holds reactive
//! collections that views observe; every mutation goes to the hub and the
//! affected collections are refetched wholesale.

pub mod app;
pub mod backend;
pub mod config;
pub mod format;
pub mod net;
pub mod store;
pub mod ui;
pub mod views;
