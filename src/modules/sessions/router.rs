use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{get_session_by_id, get_sessions};

/// Routes: GET /, GET /{session_id}
///
/// The segment name must stay in sync with the nested assignments router.
pub fn init_sessions_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_sessions))
        .route("/{session_id}", get(get_session_by_id))
}
