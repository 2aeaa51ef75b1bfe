//! AppState construction shared by the `serve` and `ask` commands.

use std::sync::Arc;

use anyhow::Context;

use tb_contextpack::PromptBuilder;
use tb_domain::config::{Config, ConfigSeverity};
use tb_providers::LlmProvider;
use tb_sessions::SessionStore;

use crate::runtime::session_gate::SessionGates;
use crate::state::AppState;

/// Validate config, resolve the model credential and return a fully-wired
/// [`AppState`].
///
/// Fails when the config has errors or the API key variable is unset, so
/// the server never starts in a state where every chat call would fail.
pub fn build_app_state(config: Arc<Config>) -> anyhow::Result<AppState> {
    check_config(&config)?;

    let llm = tb_providers::build_provider(&config.llm).with_context(|| {
        format!(
            "initializing LLM provider (is {} set?)",
            config.llm.api_key_env
        )
    })?;

    Ok(with_provider(config, llm))
}

/// Wire an [`AppState`] around an already-built provider.
pub fn with_provider(config: Arc<Config>, llm: Arc<dyn LlmProvider>) -> AppState {
    let sessions = Arc::new(SessionStore::in_memory(config.chat.max_turns));
    tracing::info!(
        max_turns = sessions.max_turns(),
        default_session_id = %config.chat.default_session_id,
        "session store ready (in-memory)"
    );

    let prompt = Arc::new(PromptBuilder::from_override(
        config.chat.system_prompt.as_deref(),
    ));
    tracing::info!(
        system_prompt_chars = prompt.system_prompt().len(),
        custom = config.chat.system_prompt.is_some(),
        "prompt builder ready"
    );

    AppState {
        config,
        llm,
        prompt,
        sessions,
        session_gates: Arc::new(SessionGates::new()),
    }
}

fn check_config(config: &Config) -> anyhow::Result<()> {
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            ConfigSeverity::Warning => tracing::warn!("config: {issue}"),
            ConfigSeverity::Error => tracing::error!("config: {issue}"),
        }
    }
    let errors = issues
        .iter()
        .filter(|i| i.severity == ConfigSeverity::Error)
        .count();
    if errors > 0 {
        anyhow::bail!("config validation failed with {errors} error(s)");
    }
    Ok(())
}
