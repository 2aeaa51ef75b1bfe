//! Provider construction.
//!
//! Reads the [`LlmConfig`], resolves the API key from the environment, and
//! instantiates the adapter for the configured provider kind.

use std::sync::Arc;

use tb_domain::config::{LlmConfig, ProviderKind};
use tb_domain::error::Result;

use crate::google::GoogleProvider;
use crate::traits::LlmProvider;
use crate::util::resolve_api_key;

/// Build the configured provider. Fails when the credential is missing.
pub fn build_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>> {
    let api_key = resolve_api_key(&config.api_key_env)?;

    let provider: Arc<dyn LlmProvider> = match config.provider {
        ProviderKind::Google => Arc::new(GoogleProvider::from_config(config, api_key)?),
    };

    tracing::info!(
        provider_id = %provider.provider_id(),
        model = %provider.default_model(),
        "registered LLM provider"
    );

    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_fails_construction() {
        let cfg = LlmConfig {
            api_key_env: "TB_TEST_REGISTRY_UNSET_4242".into(),
            ..LlmConfig::default()
        };
        let err = build_provider(&cfg).err().expect("should fail");
        assert!(err.to_string().starts_with("auth: "));
    }

    #[test]
    fn present_key_builds_google() {
        let var = "TB_TEST_REGISTRY_SET_4243";
        std::env::set_var(var, "abc");
        let cfg = LlmConfig {
            api_key_env: var.into(),
            ..LlmConfig::default()
        };
        let p = build_provider(&cfg).unwrap();
        assert_eq!(p.provider_id(), "google");
        assert_eq!(p.default_model(), "gemini-2.5-flash-lite");
        std::env::remove_var(var);
    }
}
