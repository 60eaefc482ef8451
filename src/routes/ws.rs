use std::sync::Arc;

use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;

use crate::player::actor::PlayerActor;
use crate::room_registry::actor_client::RoomRegistryClient;

pub async fn connect_to_websocket(
    State(registry): State<Arc<RoomRegistryClient>>,
    websocket_upgrade: WebSocketUpgrade,
) -> Response {
    websocket_upgrade.on_upgrade(move |websocket| PlayerActor::create(websocket, registry))
}
