use tb_domain::chat::Transcript;
use tb_domain::trace::TraceEvent;

use crate::injection;
use crate::report::PromptReport;

/// Tutoring instruction block used when config does not override it.
pub const DEFAULT_SYSTEM_PROMPT: &str = include_str!("../prompts/system.md");

/// Deterministic prompt builder.
///
/// Pure formatting: no length caps, no sanitization. Message content is
/// passed through verbatim, so a user can write text that looks like a
/// speaker label to the model.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    system_prompt: String,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PROMPT)
    }
}

impl PromptBuilder {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
        }
    }

    /// Use `override_prompt` when given, otherwise the bundled prompt.
    pub fn from_override(override_prompt: Option<&str>) -> Self {
        match override_prompt {
            Some(p) => Self::new(p),
            None => Self::default(),
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Assemble the prompt.
    ///
    /// Layout:
    /// ```text
    /// <system>\n\nConversation History:\n<turns>\nUser: <message>\nAI:
    /// ```
    pub fn build(&self, transcript: &Transcript, message: &str) -> (String, PromptReport) {
        let history: String = transcript.turns().iter().map(injection::format_turn).collect();

        let mut prompt = String::with_capacity(
            self.system_prompt.len() + history.len() + message.len() + 64,
        );
        prompt.push_str(&self.system_prompt);
        prompt.push_str("\n\n");
        prompt.push_str(injection::HISTORY_HEADER);
        prompt.push('\n');
        prompt.push_str(&history);
        prompt.push('\n');
        prompt.push_str(&injection::format_user_cue(message));

        let report = PromptReport {
            system_chars: self.system_prompt.len(),
            history_turns: transcript.len(),
            history_chars: history.len(),
            message_chars: message.len(),
            total_chars: prompt.len(),
        };

        TraceEvent::PromptBuilt {
            history_turns: report.history_turns,
            total_chars: report.total_chars,
        }
        .emit();

        (prompt, report)
    }
}

/// Free-function form of [`PromptBuilder::build`].
pub fn build(system_prompt: &str, transcript: &Transcript, message: &str) -> String {
    PromptBuilder::new(system_prompt).build(transcript, message).0
}
