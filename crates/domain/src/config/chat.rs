use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Chat behaviour
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Maximum turns retained per session (user + assistant each count one).
    #[serde(default = "d_20")]
    pub max_turns: usize,
    /// Session id used when a request omits one.
    #[serde(default = "d_default_session")]
    pub default_session_id: String,
    /// What `POST /api/chat` does when the model call fails.
    #[serde(default)]
    pub upstream_failure: UpstreamFailurePolicy,
    /// Inline system prompt. `None` uses the bundled tutoring prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_turns: d_20(),
            default_session_id: d_default_session(),
            upstream_failure: UpstreamFailurePolicy::Mask,
            system_prompt: None,
        }
    }
}

/// Handling of a failed model call at the HTTP boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpstreamFailurePolicy {
    /// Reply 200 with an apology text that embeds the failure detail, and
    /// record it in the transcript like any other reply.
    #[default]
    Mask,
    /// Reply 502 with the failure detail and leave the transcript alone.
    Surface,
}

fn d_20() -> usize {
    20
}
fn d_default_session() -> String {
    "default".into()
}
