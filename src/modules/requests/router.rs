use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    approve_request, confirm_swap, decline_swap, get_my_requests, get_request_by_id, get_requests,
    reject_request, submit_request,
};

/// Routes: POST /, GET /, GET /mine, GET /{id},
/// POST /{id}/approve, POST /{id}/reject, POST /{id}/confirm, POST /{id}/decline
pub fn init_requests_router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_request).get(get_requests))
        .route("/mine", get(get_my_requests))
        .route("/{id}", get(get_request_by_id))
        .route("/{id}/approve", post(approve_request))
        .route("/{id}/reject", post(reject_request))
        .route("/{id}/confirm", post(confirm_swap))
        .route("/{id}/decline", post(decline_swap))
}
