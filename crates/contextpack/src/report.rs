use serde::{Deserialize, Serialize};

/// Summary of one prompt assembly, logged at debug level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptReport {
    pub system_chars: usize,
    pub history_turns: usize,
    pub history_chars: usize,
    pub message_chars: usize,
    pub total_chars: usize,
}
