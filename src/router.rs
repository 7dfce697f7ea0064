use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::{init_metrics_router, metrics_middleware};
use crate::modules::assignments::router::init_session_assignments_router;
use crate::modules::availability::router::init_availability_router;
use crate::modules::requests::router::init_requests_router;
use crate::modules::resources::router::init_resources_router;
use crate::modules::sessions::router::init_sessions_router;
use crate::state::AppState;
use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

pub fn init_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .nest("/requests", init_requests_router())
                .nest(
                    "/sessions",
                    init_sessions_router()
                        .nest("/{session_id}/assignments", init_session_assignments_router()),
                )
                .nest("/availability", init_availability_router())
                .nest("/resources", init_resources_router()),
        )
        .with_state(state.clone())
        .merge(init_metrics_router(metrics_handle))
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
}
