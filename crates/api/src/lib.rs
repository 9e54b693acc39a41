pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::{
    Json, Router,
    extract::State,
    http::HeaderValue,
    routing::{get, post},
};
use state::AppState;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.settings.app.cors_origins);

    let invitation_routes = Router::new()
        .route(
            "/",
            get(routes::invitation::list).post(routes::invitation::create),
        )
        .route("/{invite_id}", get(routes::invitation::get))
        .route("/{invite_id}/respond", post(routes::invitation::respond));

    Router::new()
        .nest("/invitations", invitation_routes)
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let database = match state.db.run_command(mongodb::bson::doc! { "ping": 1 }).await {
        Ok(_) => "up",
        Err(_) => "down",
    };

    Json(serde_json::json!({
        "status": "ok",
        "database": database,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
