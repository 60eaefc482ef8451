pub mod message;

use axum::extract::ws::{Message, WebSocket};
use serde::Serialize;

use crate::error::Error;
use message::WsMessageIn;

pub async fn close(websocket: WebSocket) {
    if let Err(error) = websocket.close().await {
        log::error!("Could not close the WebSocket. Error: '{error}'.");
    }
}

pub fn parse_message(message: &str) -> Result<WsMessageIn, Error> {
    serde_json::from_str(message)
        .map_err(|error| Error::UnprocessableMessage(error.to_string(), message.to_string()))
}

pub async fn send_message<T>(websocket: &mut WebSocket, value: &T) -> Result<(), Error>
where
    T: ?Sized + Serialize,
{
    let message = serde_json::to_string(value).map_err(|error| {
        Error::log_and_create_internal(&format!(
            "Could not serialize the message. Error: '{error}'."
        ))
    })?;

    websocket
        .send(Message::Text(message))
        .await
        .map_err(|error| Error::WebsocketClosed(error.to_string()))
}
