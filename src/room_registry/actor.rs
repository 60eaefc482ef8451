use std::fmt::{Display, Formatter};
use tokio::sync::broadcast;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::sync::oneshot::Sender as OneshotSender;

use crate::config::RoomSettings;
use crate::error::Error;
use crate::player::Player;
use crate::room::actor::RoomWideEvent;
use crate::room::actor_client::RoomClient;
use crate::room_registry::actor_client::RoomRegistryClient;
use crate::room_registry::RoomRegistry;

pub struct RoomRegistryActor {
    registry: RoomRegistry,
    registry_rx: Receiver<RoomRegistryCommand>,
    registry_tx: Sender<RoomRegistryCommand>,
}

impl RoomRegistryActor {
    /// Runs the RoomRegistry actor in background and returns a client to communicate with it.
    pub fn spawn(room_settings: RoomSettings) -> RoomRegistryClient {
        let registry = RoomRegistry::new(room_settings);
        let (registry_tx, registry_rx): (
            Sender<RoomRegistryCommand>,
            Receiver<RoomRegistryCommand>,
        ) = mpsc::channel(512);

        tokio::spawn(
            RoomRegistryActor {
                registry,
                registry_rx,
                registry_tx: registry_tx.clone(),
            }
            .start(),
        );

        RoomRegistryClient { registry_tx }
    }

    async fn start(mut self) {
        while let Some(command) = self.registry_rx.recv().await {
            let response: Option<(
                Result<RoomRegistryResponse, Error>,
                OneshotSender<RoomRegistryResponse>,
            )> = match command {
                RoomRegistryCommand::CreateRoom {
                    creator,
                    response_channel,
                } => {
                    // Rooms get their own registry handle so they can deregister on expiry
                    let self_client = RoomRegistryClient {
                        registry_tx: self.registry_tx.clone(),
                    };
                    let (room_id, room, broadcast_rx) =
                        self.registry.create_room(creator, self_client);
                    Some((
                        Ok(RoomRegistryResponse::RoomCreated {
                            room_id,
                            room,
                            broadcast_rx,
                        }),
                        response_channel,
                    ))
                }
                RoomRegistryCommand::GetRoom {
                    room_id,
                    response_channel,
                } => {
                    let result = self
                        .registry
                        .get_room(&room_id)
                        .map(|room| RoomRegistryResponse::RoomActor { room: room.clone() });
                    Some((result, response_channel))
                }
                RoomRegistryCommand::RemoveRoom { room_id } => {
                    self.registry.remove_room(&room_id);
                    None
                }
            };

            if let Some((result, response_channel)) = response {
                let response = match result {
                    Ok(response) => response,
                    Err(error) => RoomRegistryResponse::Error { error },
                };
                if let Err(response) = response_channel.send(response) {
                    log::error!("Sent a RoomRegistryResponse but the response channel is closed. RoomRegistryResponse: '{response}'.");
                }
            }
        }
    }
}

#[derive(Debug)]
pub(crate) enum RoomRegistryCommand {
    CreateRoom {
        creator: Player,
        response_channel: OneshotSender<RoomRegistryResponse>,
    },
    GetRoom {
        room_id: String,
        response_channel: OneshotSender<RoomRegistryResponse>,
    },
    RemoveRoom {
        room_id: String,
    },
}

#[derive(Debug)]
pub(crate) enum RoomRegistryResponse {
    RoomCreated {
        room_id: String,
        room: RoomClient,
        broadcast_rx: broadcast::Receiver<RoomWideEvent>,
    },
    RoomActor {
        room: RoomClient,
    },
    Error {
        error: Error,
    },
}

impl Display for RoomRegistryResponse {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}",
            match self {
                RoomRegistryResponse::RoomCreated { room_id, .. } =>
                    format!("RoomCreated(room_id: {room_id})"),
                RoomRegistryResponse::RoomActor { room: _ } => "RoomActor".to_string(),
                RoomRegistryResponse::Error { error } => format!("Error '{error}'"),
            }
        )
    }
}
