use tb_domain::error::Result;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request / Response types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A single-prompt completion request.
#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    /// The fully assembled prompt text.
    pub prompt: String,
    /// Model identifier override. When `None`, the provider uses its default.
    pub model: Option<String>,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: None,
        }
    }
}

/// Token accounting reported by the provider, when available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A successful completion.
#[derive(Debug, Clone)]
pub struct Completion {
    /// Generated text.
    pub text: String,
    /// The model that produced the text.
    pub model: String,
    /// Why generation stopped (e.g. "stop", "length").
    pub finish_reason: Option<String>,
    pub usage: Option<Usage>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Core provider trait
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Trait that every LLM adapter must implement.
///
/// Adapters return the failure as an `Err`; whether it is shown to the end
/// user as reply text or as an HTTP error is decided by the caller.
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send one prompt and wait for the full response. No retries.
    async fn complete(&self, req: &CompletionRequest) -> Result<Completion>;

    /// A unique identifier for this provider instance.
    fn provider_id(&self) -> &str;

    /// Model used when a request does not name one.
    fn default_model(&self) -> &str;
}

/// The reply text substituted for a failed completion.
pub fn apology_text(detail: impl std::fmt::Display) -> String {
    format!("I apologize, but I encountered an error: {detail}")
}
