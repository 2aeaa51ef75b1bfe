//! `GET /api/health`: liveness probe.
//!
//! Confirms the handler layer is reachable. It does not contact the model
//! provider, so it stays green while the upstream API is down.

use axum::extract::State;
use axum::response::{IntoResponse, Json};

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    tracing::debug!(
        sessions = state.sessions.session_count(),
        gated_sessions = state.session_gates.tracked(),
        "health check"
    );
    Json(serde_json::json!({
        "status": "ok",
        "message": "API is running",
    }))
}
