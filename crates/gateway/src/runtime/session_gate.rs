//! Per-session turn serialization.
//!
//! A turn holds its session's gate from the transcript snapshot until the
//! exchange is stored or dropped, so a second message for the same session
//! always prompts with the first exchange already in its history. Clearing
//! a session passes through the same gate.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One async mutex per session id, created on first use and kept for the
/// process lifetime (sessions are never destroyed either).
#[derive(Default)]
pub struct SessionGates {
    gates: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

/// Exclusive access to one session. Released on drop.
pub struct SessionGuard {
    session_id: String,
    _held: OwnedMutexGuard<()>,
}

impl SessionGuard {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

impl SessionGates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other turn or clear is running on `session_id`.
    pub async fn enter(&self, session_id: &str) -> SessionGuard {
        let gate = self
            .gates
            .lock()
            .entry(session_id.to_owned())
            .or_default()
            .clone();

        let started = Instant::now();
        let held = gate.lock_owned().await;
        let waited_ms = started.elapsed().as_millis() as u64;
        if waited_ms > 0 {
            tracing::debug!(session_id, waited_ms, "waited for in-flight turn");
        }

        SessionGuard {
            session_id: session_id.to_owned(),
            _held: held,
        }
    }

    /// Number of session ids that have ever been gated.
    pub fn tracked(&self) -> usize {
        self.gates.lock().len()
    }
}
