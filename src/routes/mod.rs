use crate::config::Config;
use crate::room_registry::actor_client::RoomRegistryClient;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

mod health;
mod metrics;
mod ws;

pub fn create_router(config: Config) -> Router<Arc<RoomRegistryClient>> {
    Router::new()
        .route("/health", get(health::get))
        .route("/metrics", get(metrics::metrics_handler))
        .route("/ws", get(ws::connect_to_websocket))
        .layer(if config.allow_cors {
            log::info!("CorsLayer Permissive");
            CorsLayer::permissive()
        } else {
            CorsLayer::default()
        })
}
