//! Chat API endpoints.
//!
//! - `POST /api/chat`          run one turn, return the reply
//! - `POST /api/chat/clear`    empty a session's transcript
//! - `GET  /api/chat/history`  read a session's transcript

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

use tb_domain::chat::Turn;

use crate::runtime::{run_turn, settle, TurnInput, TurnReply};
use crate::state::AppState;

use super::api_error;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request / response shapes
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Default, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub message: String,
    pub session_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClearRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClearResponse {
    pub message: String,
    pub session_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub history: Vec<Turn>,
    pub session_id: String,
}

const MESSAGE_REQUIRED: &str = "Message is required";

/// Resolve the session id once at the boundary. Absent, null and empty
/// values all map to the configured default.
pub fn resolve_session_id(raw: Option<String>, default: &str) -> String {
    match raw {
        Some(id) if !id.is_empty() => id,
        _ => default.to_owned(),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /api/chat
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn send_message(
    State(state): State<AppState>,
    body: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Response {
    let body = match body {
        Ok(Json(b)) => b,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejecting unreadable chat body");
            return api_error(StatusCode::BAD_REQUEST, MESSAGE_REQUIRED);
        }
    };

    let message = match body.message {
        Some(m) if !m.is_empty() => m,
        _ => return api_error(StatusCode::BAD_REQUEST, MESSAGE_REQUIRED),
    };
    let session_id = resolve_session_id(body.session_id, &state.config.chat.default_session_id);

    let (pending, result) = run_turn(
        &state,
        TurnInput {
            session_id: session_id.clone(),
            message,
        },
    )
    .await;

    match settle(state.config.chat.upstream_failure, pending, result) {
        TurnReply::Reply(message) => Json(SendMessageResponse {
            message,
            session_id,
        })
        .into_response(),
        TurnReply::Failed { detail } => (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({
                "error": detail,
                "session_id": session_id,
            })),
        )
            .into_response(),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /api/chat/clear
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// An empty body clears the default session. The body is read as JSON
/// whatever its content type; a body that names no usable session is a 400
/// rather than a fall back to the default.
pub async fn clear(State(state): State<AppState>, body: Bytes) -> Response {
    let requested = match parse_clear_body(&body) {
        Ok(id) => id,
        Err(e) => {
            tracing::debug!(error = %e, "rejecting unreadable clear body");
            return api_error(StatusCode::BAD_REQUEST, format!("Invalid request body: {e}"));
        }
    };
    let session_id = resolve_session_id(requested, &state.config.chat.default_session_id);

    let _guard = state.session_gates.enter(&session_id).await;
    let dropped = state.sessions.clear(&session_id);
    tracing::info!(session_id = %session_id, dropped, "chat history cleared");

    Json(ClearResponse {
        message: "Chat history cleared".into(),
        session_id,
    })
    .into_response()
}

fn parse_clear_body(body: &[u8]) -> Result<Option<String>, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice::<ClearRequest>(body).map(|req| req.session_id)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /api/chat/history
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Never rejects: an unparseable query string reads as no query, and a
/// repeated `session_id` uses its first value.
pub async fn history(
    State(state): State<AppState>,
    query: Option<Query<Vec<(String, String)>>>,
) -> impl IntoResponse {
    let requested = query.and_then(|Query(pairs)| first_value(pairs, "session_id"));
    let session_id = resolve_session_id(requested, &state.config.chat.default_session_id);
    let history = state.sessions.get(&session_id).into_turns();

    Json(HistoryResponse {
        history,
        session_id,
    })
}

fn first_value(pairs: Vec<(String, String)>, key: &str) -> Option<String> {
    pairs.into_iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_defaults_when_absent_or_empty() {
        assert_eq!(resolve_session_id(None, "default"), "default");
        assert_eq!(resolve_session_id(Some(String::new()), "default"), "default");
        assert_eq!(resolve_session_id(Some("s1".into()), "default"), "s1");
    }

    #[test]
    fn whitespace_session_id_is_kept_verbatim() {
        assert_eq!(resolve_session_id(Some(" ".into()), "default"), " ");
    }

    #[test]
    fn send_request_tolerates_missing_fields() {
        let req: SendMessageRequest = serde_json::from_str("{}").unwrap();
        assert!(req.message.is_none());
        assert!(req.session_id.is_none());
        let req: SendMessageRequest =
            serde_json::from_str(r#"{"message": null, "session_id": "s"}"#).unwrap();
        assert!(req.message.is_none());
        assert_eq!(req.session_id.as_deref(), Some("s"));
    }

    #[test]
    fn clear_body_accepts_empty_and_null() {
        assert_eq!(parse_clear_body(b"").unwrap(), None);
        assert_eq!(parse_clear_body(b"  \n").unwrap(), None);
        assert_eq!(parse_clear_body(b"{}").unwrap(), None);
        assert_eq!(parse_clear_body(br#"{"session_id": null}"#).unwrap(), None);
        assert_eq!(
            parse_clear_body(br#"{"session_id": "s1"}"#).unwrap().as_deref(),
            Some("s1")
        );
    }

    #[test]
    fn clear_body_rejects_wrong_type_and_garbage() {
        assert!(parse_clear_body(br#"{"session_id": 5}"#).is_err());
        assert!(parse_clear_body(b"{not json").is_err());
    }

    #[test]
    fn first_value_wins_on_repeated_key() {
        let pairs = vec![
            ("other".to_string(), "x".to_string()),
            ("session_id".to_string(), "a".to_string()),
            ("session_id".to_string(), "b".to_string()),
        ];
        assert_eq!(first_value(pairs, "session_id").as_deref(), Some("a"));
        assert_eq!(first_value(Vec::new(), "session_id"), None);
    }
}
