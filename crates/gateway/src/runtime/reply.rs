use tb_domain::config::UpstreamFailurePolicy;
use tb_domain::error::Result;
use tb_providers::{apology_text, Completion};

use super::turn::PendingTurn;

/// What a finished turn produced for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnReply {
    /// Reply text, already stored in the transcript.
    Reply(String),
    /// The model call failed and the turn was dropped without storing.
    Failed { detail: String },
}

/// Apply the upstream failure policy to a turn outcome.
///
/// Success always commits. Under [`UpstreamFailurePolicy::Mask`] a failure
/// commits an apology text carrying the error detail, so the caller always
/// has a reply. Under [`UpstreamFailurePolicy::Surface`] the turn is dropped.
pub fn settle(
    policy: UpstreamFailurePolicy,
    pending: PendingTurn,
    result: Result<Completion>,
) -> TurnReply {
    match result {
        Ok(completion) => {
            pending.commit(completion.text.as_str());
            TurnReply::Reply(completion.text)
        }
        Err(e) => match policy {
            UpstreamFailurePolicy::Mask => {
                let text = apology_text(&e);
                pending.commit(text.as_str());
                TurnReply::Reply(text)
            }
            UpstreamFailurePolicy::Surface => {
                tracing::info!(
                    session_id = %pending.session_id(),
                    "dropping turn after upstream failure"
                );
                TurnReply::Failed {
                    detail: e.to_string(),
                }
            }
        },
    }
}
