use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::Config;
use crate::room_registry::actor::RoomRegistryActor;
use crate::routes;

pub async fn create_web_server(config: Config, listener: TcpListener) -> std::io::Result<()> {
    let registry = Arc::new(RoomRegistryActor::spawn(config.room.clone()));

    let router = routes::create_router(config).with_state(registry);

    log::info!(
        "Listening on {}",
        listener
            .local_addr()
            .map(|address| address.to_string())
            .unwrap_or_else(|_| "<unknown address>".to_string())
    );
    axum::serve(listener, router).await
}
