use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{check_availability, get_occupancy};

/// Routes: GET /check, GET /occupancy
pub fn init_availability_router() -> Router<AppState> {
    Router::new()
        .route("/check", get(check_availability))
        .route("/occupancy", get(get_occupancy))
}
