use tokio::sync::broadcast;
use tokio::sync::mpsc::Sender;
use tokio::sync::oneshot::{self, Receiver as OneshotReceiver, Sender as OneshotSender};

use crate::error::Error;
use crate::player::{Player, PlayerId};
use crate::room::actor::{RoomCommand, RoomEvent, RoomWideEvent};

#[derive(Clone, Debug)]
pub struct RoomClient {
    pub(super) room_tx: Sender<RoomCommand>,
}

impl RoomClient {
    pub async fn register(&self, player: Player) -> Result<RoomWideEventReceiver, Error> {
        let (tx, rx): (OneshotSender<RoomEvent>, OneshotReceiver<RoomEvent>) = oneshot::channel();
        let nickname = player.nickname.clone();

        self.room_tx
            .send(RoomCommand::Register {
                player,
                response_tx: tx,
            })
            .await
            // The room can stop between the registry lookup and this send,
            // its expiry runs concurrently with joins
            .map_err(|error| {
                Error::log_and_create_internal(&format!(
                    "The Room is not alive. Can't register Player '{nickname}'. Error: '{error}'"
                ))
            })?;

        match rx.await {
            Ok(RoomEvent::Registered { broadcast_rx }) => {
                Ok(RoomWideEventReceiver { broadcast_rx })
            }
            Err(_) => Err(Error::log_and_create_internal(
                "Player sent a RoomCommand::Register to the Room, but the Room channel died.",
            )),
        }
    }

    pub async fn unregister(&self, player_id: PlayerId) -> Result<(), Error> {
        self.room_tx
            .send(RoomCommand::Unregister { player_id })
            .await
            .map_err(|error| Error::log_and_create_internal(&format!("Tried to send RoomCommand::Unregister but the RoomActor is not listening. Error: '{error}'.")))
    }

    pub async fn start_turn(&self, requester: PlayerId) -> Result<(), Error> {
        self.room_tx
            .send(RoomCommand::StartTurn { requester })
            .await
            .map_err(|error| Error::log_and_create_internal(&format!("Tried to send RoomCommand::StartTurn but the RoomActor is not listening. Error: '{error}'.")))
    }

    pub async fn submit_guess(&self, player_id: PlayerId, content: &str) -> Result<(), Error> {
        self.room_tx
            .send(RoomCommand::SubmitGuess {
                player_id,
                content: content.to_string(),
            })
            .await
            .map_err(|error| Error::log_and_create_internal(&format!("Tried to send RoomCommand::SubmitGuess but the RoomActor is not listening. Error: '{error}'.")))
    }

    pub async fn relay_drawing(&self, player_id: PlayerId, content: &str) -> Result<(), Error> {
        self.room_tx
            .send(RoomCommand::RelayDrawing {
                player_id,
                content: content.to_string(),
            })
            .await
            .map_err(|error| Error::log_and_create_internal(&format!("Tried to send RoomCommand::RelayDrawing but the RoomActor is not listening. Error: '{error}'.")))
    }
}

pub struct RoomWideEventReceiver {
    broadcast_rx: broadcast::Receiver<RoomWideEvent>,
}

impl RoomWideEventReceiver {
    pub(crate) fn new(broadcast_rx: broadcast::Receiver<RoomWideEvent>) -> Self {
        RoomWideEventReceiver { broadcast_rx }
    }

    /// Fails when the room is gone or this receiver lagged too far behind
    /// the broadcast, both end the member's connection.
    pub async fn next(&mut self) -> Result<RoomWideEvent, Error> {
        self.broadcast_rx.recv().await.map_err(|error| {
            Error::log_and_create_internal(&format!(
                "The broadcast channel with the Room is not readable. Error: {error}."
            ))
        })
    }
}
