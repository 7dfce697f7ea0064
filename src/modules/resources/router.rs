use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{get_resource_by_id, get_resources};

/// Routes: GET /, GET /{id}
pub fn init_resources_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_resources))
        .route("/{id}", get(get_resource_by_id))
}
