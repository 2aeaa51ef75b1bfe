//! Google Gemini adapter.
//!
//! Implements the Gemini `generateContent` API with the whole prompt sent as
//! one user part. Auth is via an API key passed as a query parameter
//! (`key={api_key}`).

use std::time::{Duration, Instant};

use serde_json::Value;
use tb_domain::config::LlmConfig;
use tb_domain::error::{Error, Result};
use tb_domain::trace::TraceEvent;

use crate::traits::{Completion, CompletionRequest, LlmProvider, Usage};
use crate::util::{from_reqwest, redact_url_key};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Adapter struct
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// An LLM provider adapter for the Google Gemini API.
pub struct GoogleProvider {
    id: String,
    base_url: String,
    api_key: String,
    default_model: String,
    client: reqwest::Client,
}

impl GoogleProvider {
    /// Create a new provider from the LLM config and an already-resolved key.
    pub fn from_config(cfg: &LlmConfig, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(from_reqwest)?;

        Ok(Self {
            id: "google".into(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key,
            default_model: cfg.model.clone(),
            client,
        })
    }

    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        )
    }
}

/// Request body for a single text prompt.
pub(crate) fn build_body(prompt: &str) -> Value {
    serde_json::json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": prompt }],
        }],
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Response deserialization
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub(crate) fn parse_gemini_response(body: &Value, model: &str) -> Result<Completion> {
    if let Some(reason) = body
        .get("promptFeedback")
        .and_then(|f| f.get("blockReason"))
        .and_then(|r| r.as_str())
    {
        return Err(Error::Provider {
            provider: "google".into(),
            message: format!("prompt blocked: {reason}"),
        });
    }

    let candidate = body
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|a| a.first())
        .ok_or_else(|| Error::Provider {
            provider: "google".into(),
            message: "no candidates in response".into(),
        })?;

    let text: String = candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(|v| v.as_str()))
                .collect()
        })
        .unwrap_or_default();

    let finish_reason = candidate
        .get("finishReason")
        .and_then(|v| v.as_str())
        .map(|s| match s {
            "STOP" => "stop".to_string(),
            "MAX_TOKENS" => "length".to_string(),
            other => other.to_lowercase(),
        });

    let usage = body.get("usageMetadata").and_then(parse_gemini_usage);

    Ok(Completion {
        text,
        model: model.to_string(),
        finish_reason,
        usage,
    })
}

fn parse_gemini_usage(v: &Value) -> Option<Usage> {
    let count = |key: &str| v.get(key).and_then(Value::as_u64).map(clamp_u32);
    let prompt = count("promptTokenCount")?;
    let completion = count("candidatesTokenCount").unwrap_or(0);
    let total = count("totalTokenCount").unwrap_or(prompt.saturating_add(completion));
    Some(Usage {
        prompt_tokens: prompt,
        completion_tokens: completion,
        total_tokens: total,
    })
}

fn clamp_u32(n: u64) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

impl GoogleProvider {
    async fn send(&self, model: &str, prompt: &str) -> Result<Completion> {
        let url = self.generate_url(model);
        tracing::debug!(provider = %self.id, url = %redact_url_key(&url), "google generate request");

        let resp = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&build_body(prompt))
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = resp.status();
        let resp_text = resp.text().await.map_err(from_reqwest)?;

        if !status.is_success() {
            return Err(Error::Provider {
                provider: self.id.clone(),
                message: format!("HTTP {} - {}", status.as_u16(), resp_text),
            });
        }

        let resp_json: Value = serde_json::from_str(&resp_text)?;
        parse_gemini_response(&resp_json, model)
    }
}

#[async_trait::async_trait]
impl LlmProvider for GoogleProvider {
    async fn complete(&self, req: &CompletionRequest) -> Result<Completion> {
        let model = req.model.as_deref().unwrap_or(&self.default_model);
        let started = Instant::now();

        let result = self.send(model, &req.prompt).await;

        let usage = result.as_ref().ok().and_then(|c| c.usage);
        TraceEvent::LlmRequest {
            provider: self.id.clone(),
            model: model.to_string(),
            duration_ms: started.elapsed().as_millis() as u64,
            ok: result.is_ok(),
            prompt_tokens: usage.map(|u| u.prompt_tokens),
            completion_tokens: usage.map(|u| u.completion_tokens),
        }
        .emit();

        result
    }

    fn provider_id(&self) -> &str {
        &self.id
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_wraps_prompt_in_single_user_part() {
        let body = build_body("hello");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["contents"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn parses_text_finish_reason_and_usage() {
        let body = serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Hello " }, { "text": "there" }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": {
                "promptTokenCount": 12,
                "candidatesTokenCount": 3,
                "totalTokenCount": 15
            }
        });
        let c = parse_gemini_response(&body, "gemini-2.5-flash-lite").unwrap();
        assert_eq!(c.text, "Hello there");
        assert_eq!(c.finish_reason.as_deref(), Some("stop"));
        assert_eq!(c.model, "gemini-2.5-flash-lite");
        assert_eq!(
            c.usage,
            Some(Usage {
                prompt_tokens: 12,
                completion_tokens: 3,
                total_tokens: 15
            })
        );
    }

    #[test]
    fn max_tokens_maps_to_length() {
        let body = serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "cut" }] }, "finishReason": "MAX_TOKENS" }]
        });
        let c = parse_gemini_response(&body, "m").unwrap();
        assert_eq!(c.finish_reason.as_deref(), Some("length"));
        assert!(c.usage.is_none());
    }

    #[test]
    fn missing_candidates_is_provider_error() {
        let err = parse_gemini_response(&serde_json::json!({}), "m").unwrap_err();
        assert!(err.to_string().contains("no candidates"));
    }

    #[test]
    fn blocked_prompt_is_provider_error() {
        let body = serde_json::json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        let err = parse_gemini_response(&body, "m").unwrap_err();
        assert_eq!(err.to_string(), "provider google: prompt blocked: SAFETY");
    }

    #[test]
    fn candidate_without_parts_yields_empty_text() {
        let body = serde_json::json!({ "candidates": [{ "finishReason": "SAFETY" }] });
        let c = parse_gemini_response(&body, "m").unwrap();
        assert_eq!(c.text, "");
        assert_eq!(c.finish_reason.as_deref(), Some("safety"));
    }

    #[test]
    fn url_uses_trimmed_base_and_model() {
        let cfg = LlmConfig {
            base_url: "http://localhost:9/".into(),
            ..LlmConfig::default()
        };
        let p = GoogleProvider::from_config(&cfg, "k".into()).unwrap();
        assert_eq!(
            p.generate_url("gemini-2.5-flash-lite"),
            "http://localhost:9/v1beta/models/gemini-2.5-flash-lite:generateContent?key=k"
        );
        assert_eq!(p.default_model(), "gemini-2.5-flash-lite");
    }

    #[test]
    fn usage_total_saturates_when_missing() {
        let body = serde_json::json!({
            "promptTokenCount": u32::MAX,
            "candidatesTokenCount": 10_000_000_000u64,
        });
        let usage = parse_gemini_usage(&body).unwrap();
        assert_eq!(usage.prompt_tokens, u32::MAX);
        assert_eq!(usage.completion_tokens, u32::MAX);
        assert_eq!(usage.total_tokens, u32::MAX);

        let body = serde_json::json!({ "promptTokenCount": 7, "candidatesTokenCount": 5 });
        assert_eq!(parse_gemini_usage(&body).unwrap().total_tokens, 12);
    }
}
