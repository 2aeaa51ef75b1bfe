//! Key-value storage for transcripts.

use std::collections::HashMap;

use parking_lot::RwLock;
use tb_domain::chat::Transcript;

/// Storage for session transcripts, keyed by session id.
///
/// Implementations must apply [`TranscriptBackend::update`] atomically with
/// respect to other calls on the same key. Operations are infallible: an
/// absent key reads as `None` and never errors.
pub trait TranscriptBackend: Send + Sync {
    /// Return a copy of the stored transcript, if the key exists.
    fn load(&self, session_id: &str) -> Option<Transcript>;

    /// Insert or overwrite the transcript for a key.
    fn store(&self, session_id: &str, transcript: Transcript);

    /// Run `f` against the transcript for `session_id`, creating an empty
    /// one first when the key is new. Returns `true` if the key was created.
    fn update(&self, session_id: &str, f: &mut dyn FnMut(&mut Transcript)) -> bool;

    /// Number of distinct keys held.
    fn session_count(&self) -> usize;
}

/// In-process backend. Lost on restart.
#[derive(Default)]
pub struct MemoryBackend {
    sessions: RwLock<HashMap<String, Transcript>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TranscriptBackend for MemoryBackend {
    fn load(&self, session_id: &str) -> Option<Transcript> {
        self.sessions.read().get(session_id).cloned()
    }

    fn store(&self, session_id: &str, transcript: Transcript) {
        self.sessions
            .write()
            .insert(session_id.to_owned(), transcript);
    }

    fn update(&self, session_id: &str, f: &mut dyn FnMut(&mut Transcript)) -> bool {
        let mut sessions = self.sessions.write();
        let created = !sessions.contains_key(session_id);
        let transcript = sessions.entry(session_id.to_owned()).or_default();
        f(transcript);
        created
    }

    fn session_count(&self) -> usize {
        self.sessions.read().len()
    }
}
