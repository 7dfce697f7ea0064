use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::get_session_assignments;

/// Nested under /api/sessions/{session_id}/assignments
/// Routes: GET /
pub fn init_session_assignments_router() -> Router<AppState> {
    Router::new().route("/", get(get_session_assignments))
}
