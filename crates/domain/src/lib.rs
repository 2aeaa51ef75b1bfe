//! Shared types for the TutorBot crates: the error type, configuration,
//! and the conversation data model.

pub mod chat;
pub mod config;
pub mod error;
pub mod trace;
