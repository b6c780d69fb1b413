pub mod error;
pub mod routes;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};
use state::AppState;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::trace::TraceLayer;

/// `max_instances` caps trigger requests processed at the same time; excess
/// requests wait for a free slot.
pub fn build_router(state: AppState, max_instances: usize) -> Router {
    let trigger_routes = Router::new().route(
        "/trigger",
        post(routes::trigger::handle).layer(ConcurrencyLimitLayer::new(max_instances.max(1))),
    );

    let health = Router::new().route("/health", get(health_check));

    Router::new()
        .merge(trigger_routes)
        .merge(health)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
