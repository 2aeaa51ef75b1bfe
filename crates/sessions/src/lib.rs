//! Session management for TutorBot.
//!
//! Maps an opaque session id to a bounded, oldest-first transcript. State
//! lives behind the [`TranscriptBackend`] trait; the in-process
//! [`MemoryBackend`] is the only backend and lasts for the process lifetime.

pub mod backend;
pub mod store;

pub use backend::{MemoryBackend, TranscriptBackend};
pub use store::SessionStore;
