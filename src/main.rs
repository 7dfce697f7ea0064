use dotenvy::dotenv;

use praxeum::config::database::run_migrations;
use praxeum::logging::init_tracing;
use praxeum::metrics::init_metrics;
use praxeum::router::init_router;
use praxeum::state::init_app_state;

#[tokio::main]
async fn main() {
    dotenv().ok();

    init_tracing();
    let metrics_handle = init_metrics();

    let state = init_app_state().await;
    run_migrations(&state.db).await;

    let app = init_router(state, metrics_handle);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    println!("🚀 Server running on http://localhost:3000");
    println!("📚 Swagger UI available at http://localhost:3000/swagger-ui");
    println!("📖 Scalar UI available at http://localhost:3000/scalar");
    axum::serve(listener, app).await.unwrap();
}
