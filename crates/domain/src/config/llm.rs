use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LLM provider
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: ProviderKind,
    /// API root, without the `/v1beta/...` path.
    #[serde(default = "d_base_url")]
    pub base_url: String,
    #[serde(default = "d_model")]
    pub model: String,
    /// Environment variable holding the API key. The server refuses to
    /// start when it is unset or empty.
    #[serde(default = "d_api_key_env")]
    pub api_key_env: String,
    /// Whole-request HTTP timeout for a single completion.
    #[serde(default = "d_120000u")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Google,
            base_url: d_base_url(),
            model: d_model(),
            api_key_env: d_api_key_env(),
            timeout_ms: d_120000u(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Google Gemini `generateContent`.
    #[default]
    Google,
}

fn d_base_url() -> String {
    "https://generativelanguage.googleapis.com".into()
}
fn d_model() -> String {
    "gemini-2.5-flash-lite".into()
}
fn d_api_key_env() -> String {
    "GEMINI_API_KEY".into()
}
fn d_120000u() -> u64 {
    120_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_gemini_flash_lite() {
        let cfg: LlmConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.provider, ProviderKind::Google);
        assert_eq!(cfg.model, "gemini-2.5-flash-lite");
        assert_eq!(cfg.api_key_env, "GEMINI_API_KEY");
        assert_eq!(cfg.timeout_ms, 120_000);
    }

    #[test]
    fn overrides_parse() {
        let toml_str = r#"
            provider = "google"
            base_url = "http://127.0.0.1:9999"
            model = "gemini-2.0-flash"
            api_key_env = "MY_KEY"
            timeout_ms = 5000
        "#;
        let cfg: LlmConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.base_url, "http://127.0.0.1:9999");
        assert_eq!(cfg.model, "gemini-2.0-flash");
        assert_eq!(cfg.api_key_env, "MY_KEY");
        assert_eq!(cfg.timeout_ms, 5000);
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let res: Result<LlmConfig, _> = toml::from_str(r#"provider = "bedrock""#);
        assert!(res.is_err());
    }
}
