//! `TaskDeck` data hub library.
//!
//! Hosts the contact and task tables behind a WebSocket CRUD API and
//! broadcasts row-change notifications to subscribed clients.

pub mod config;
pub mod hub;
pub mod tables;
