use tokio::sync::mpsc::Sender;
use tokio::sync::oneshot::error::RecvError;
use tokio::sync::oneshot::{self, Receiver as OneshotReceiver, Sender as OneshotSender};

use crate::error::Error;
use crate::player::Player;
use crate::room::actor_client::{RoomClient, RoomWideEventReceiver};
use crate::room_registry::actor::{RoomRegistryCommand, RoomRegistryResponse};

pub struct RoomRegistryClient {
    pub(super) registry_tx: Sender<RoomRegistryCommand>,
}

/// Everything a freshly created room hands back to its creator.
pub struct CreatedRoom {
    pub room_id: String,
    pub room: RoomClient,
    pub events: RoomWideEventReceiver,
}

impl RoomRegistryClient {
    pub async fn create_room(&self, creator: Player) -> Result<CreatedRoom, Error> {
        let (response_tx, response_rx): (
            OneshotSender<RoomRegistryResponse>,
            OneshotReceiver<RoomRegistryResponse>,
        ) = oneshot::channel();

        self.send_command(
            RoomRegistryCommand::CreateRoom {
                creator,
                response_channel: response_tx,
            },
            "Can't create a Room",
        )
        .await?;

        match response_rx.await {
            Ok(RoomRegistryResponse::RoomCreated {
                room_id,
                room,
                broadcast_rx,
            }) => Ok(CreatedRoom {
                room_id,
                room,
                events: RoomWideEventReceiver::new(broadcast_rx),
            }),
            response => Err(RoomRegistryClient::handle_unexpected_response(response)),
        }
    }

    pub async fn get_room(&self, room_id: &str) -> Result<RoomClient, Error> {
        let (response_tx, response_rx): (
            OneshotSender<RoomRegistryResponse>,
            OneshotReceiver<RoomRegistryResponse>,
        ) = oneshot::channel();

        self.send_command(
            RoomRegistryCommand::GetRoom {
                room_id: room_id.to_string(),
                response_channel: response_tx,
            },
            "Can't get a Room",
        )
        .await?;

        match response_rx.await {
            Ok(RoomRegistryResponse::RoomActor { room }) => Ok(room),
            response => Err(RoomRegistryClient::handle_unexpected_response(response)),
        }
    }

    pub async fn remove_room(&self, room_id: &str) -> Result<(), Error> {
        self.send_command(
            RoomRegistryCommand::RemoveRoom {
                room_id: room_id.to_string(),
            },
            "Can't remove a Room",
        )
        .await
    }

    async fn send_command(
        &self,
        command: RoomRegistryCommand,
        error_message: &str,
    ) -> Result<(), Error> {
        self.registry_tx.send(command).await.map_err(|error| {
            Error::log_and_create_internal(&format!(
                "The RoomRegistry channel is closed. {error_message}. Error: '{error}'."
            ))
        })
    }

    fn handle_unexpected_response(response: Result<RoomRegistryResponse, RecvError>) -> Error {
        match response {
            // The registry answered with a domain error, pass it on untouched
            Ok(RoomRegistryResponse::Error { error }) => error,
            Ok(unexpected_response) => Error::log_and_create_internal(&format!(
                "Received an unexpected RoomRegistryResponse. RoomRegistryResponse: '{unexpected_response}'."
            )),
            Err(error) => Error::log_and_create_internal(&format!(
                "The RoomRegistry response channel is closed. Error: '{error}'."
            )),
        }
    }
}
