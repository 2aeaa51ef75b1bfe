//! `tutorbot ask`: run one turn from the terminal and print the reply.

use std::sync::Arc;

use tb_domain::config::Config;

use crate::api::chat::resolve_session_id;
use crate::bootstrap;
use crate::runtime::{run_turn, settle, TurnInput, TurnReply};

/// Execute a single turn and print the reply to stdout.
///
/// The session only lives for this process, so `--session` matters only in
/// that it selects the id recorded in logs.
pub async fn run(config: Arc<Config>, message: String, session: Option<String>) -> anyhow::Result<()> {
    if message.is_empty() {
        anyhow::bail!("Message is required");
    }

    let state = bootstrap::build_app_state(config.clone())?;
    let session_id = resolve_session_id(session, &config.chat.default_session_id);

    let (pending, result) = run_turn(
        &state,
        TurnInput {
            session_id,
            message,
        },
    )
    .await;

    match settle(config.chat.upstream_failure, pending, result) {
        TurnReply::Reply(text) => {
            println!("{text}");
            Ok(())
        }
        TurnReply::Failed { detail } => Err(anyhow::anyhow!("model call failed: {detail}")),
    }
}
