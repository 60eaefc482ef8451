use std::fmt::{Display, Formatter};
use std::time::Duration;
use tokio::sync::oneshot::Sender as OneshotSender;
use tokio::sync::{
    broadcast, mpsc,
    mpsc::{Receiver, Sender},
};
use tokio::time;

use crate::config::RoomSettings;
use crate::metrics::ACTIVE_ROOMS;
use crate::player::{Player, PlayerId};
use crate::room::actor_client::RoomClient;
use crate::room::{GuessOutcome, Room, RosterEntry};
use crate::room_registry::actor_client::RoomRegistryClient;

pub struct RoomActor {
    room: Room,
    room_rx: Receiver<RoomCommand>,
    broadcast_tx: broadcast::Sender<RoomWideEvent>,
    registry: RoomRegistryClient,
    inactivity_timeout: Duration,
}

impl RoomActor {
    /// Runs the Room actor in background. The creator is the sole initial
    /// member and their broadcast subscription is taken before the actor
    /// starts, so the first roster broadcast cannot be missed.
    pub fn spawn(
        id: &str,
        settings: RoomSettings,
        words: Vec<String>,
        creator: Player,
        registry: RoomRegistryClient,
    ) -> (RoomClient, broadcast::Receiver<RoomWideEvent>) {
        let room = Room::new(id, words, creator);
        let (room_tx, room_rx): (Sender<RoomCommand>, Receiver<RoomCommand>) = mpsc::channel(128);
        let (broadcast_tx, creator_rx): (
            broadcast::Sender<RoomWideEvent>,
            broadcast::Receiver<RoomWideEvent>,
        ) = broadcast::channel(32);

        tokio::spawn(
            RoomActor {
                room,
                room_rx,
                broadcast_tx,
                registry,
                inactivity_timeout: settings.inactivity_timeout(),
            }
            .start(),
        );

        (RoomClient { room_tx }, creator_rx)
    }

    async fn start(mut self) {
        ACTIVE_ROOMS.inc();
        self.send_roster();

        loop {
            match time::timeout(self.inactivity_timeout, self.room_rx.recv()).await {
                Err(_) => {
                    if self.room.is_empty() {
                        log::info!(
                            "No members in room {} after {} seconds. Stopping room actor.",
                            self.room.id(),
                            self.inactivity_timeout.as_secs()
                        );
                        break;
                    }
                }
                Ok(None) => {
                    log::info!("Room channel has been dropped. Stopping room actor.");
                    break;
                }
                Ok(Some(command)) => match command {
                    RoomCommand::Register {
                        player,
                        response_tx,
                    } => {
                        let player_id = player.id;
                        let nickname = player.nickname.clone();
                        self.room.register(player);
                        let response = RoomEvent::Registered {
                            broadcast_rx: self.broadcast_tx.subscribe(),
                        };
                        if let Err(error) = response_tx.send(response) {
                            log::error!("Sent RoomEvent to Player {nickname} but the response channel is closed. Removing the member. Error: '{error}'.");
                            let _ = self.room.unregister(player_id);
                        }
                        self.send_roster();
                    }
                    RoomCommand::Unregister { player_id } => {
                        if self.room.unregister(player_id).is_some() {
                            self.send_roster();
                        }
                    }
                    RoomCommand::StartTurn { requester } => {
                        match self.room.start_turn(requester) {
                            Ok(turn) => {
                                self.broadcast(RoomWideEvent::GameStarted);
                                self.broadcast(RoomWideEvent::TurnStarted {
                                    drawer_id: turn.drawer_id,
                                    drawer: turn.drawer,
                                    word: turn.word,
                                });
                            }
                            Err(error) => log::info!(
                                "Rejected start_game in room {} ({}). Error: '{}'.",
                                self.room.id(),
                                self.room.state(),
                                error
                            ),
                        }
                    }
                    RoomCommand::SubmitGuess { player_id, content } => {
                        match self.room.submit_guess(player_id, &content) {
                            GuessOutcome::Suppressed => {}
                            GuessOutcome::Correct { nickname, won } => {
                                self.broadcast(RoomWideEvent::CorrectGuess {
                                    nickname: nickname.clone(),
                                });
                                if won {
                                    self.broadcast(RoomWideEvent::GameWon { nickname });
                                }
                                self.send_roster();
                            }
                            GuessOutcome::Relay { nickname } => {
                                self.broadcast(RoomWideEvent::ChatMessage {
                                    sender: nickname,
                                    content,
                                });
                            }
                        }
                    }
                    RoomCommand::RelayDrawing { player_id, content } => {
                        if let Some(nickname) = self.room.member_nickname(player_id) {
                            let sender = nickname.to_string();
                            self.broadcast(RoomWideEvent::Drawing { sender, content });
                        }
                    }
                },
            }
        }

        self.stop_room().await;
        ACTIVE_ROOMS.dec();
    }

    fn broadcast(&self, event: RoomWideEvent) {
        if let Err(error) = self.broadcast_tx.send(event) {
            log::error!("Error when sending RoomWideEvent broadcast: {error}.");
        }
    }

    fn send_roster(&self) {
        // Nobody listening is normal right after the last member left
        let _ = self.broadcast_tx.send(RoomWideEvent::PlayerList {
            players: self.room.roster(),
        });
    }

    async fn stop_room(self) {
        let room_id = self.room.id();
        if let Err(error) = self.registry.remove_room(room_id).await {
            log::error!("The RoomRegistry channel is closed, can't remove the Room. RoomId: '{room_id}', Error: '{error}'.");
        }
    }
}

pub(crate) enum RoomCommand {
    Register {
        player: Player,
        response_tx: OneshotSender<RoomEvent>,
    },
    Unregister {
        player_id: PlayerId,
    },
    StartTurn {
        requester: PlayerId,
    },
    SubmitGuess {
        player_id: PlayerId,
        content: String,
    },
    RelayDrawing {
        player_id: PlayerId,
        content: String,
    },
}

#[derive(Debug)]
pub(crate) enum RoomEvent {
    Registered {
        broadcast_rx: broadcast::Receiver<RoomWideEvent>,
    },
}

impl Display for RoomEvent {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}",
            match self {
                RoomEvent::Registered { .. } => "RoomEvent::Registered",
            }
        )
    }
}

#[derive(Clone, Debug)]
pub enum RoomWideEvent {
    PlayerList {
        players: Vec<RosterEntry>,
    },
    GameStarted,
    TurnStarted {
        drawer_id: PlayerId,
        drawer: String,
        word: String,
    },
    CorrectGuess {
        nickname: String,
    },
    GameWon {
        nickname: String,
    },
    ChatMessage {
        sender: String,
        content: String,
    },
    Drawing {
        sender: String,
        content: String,
    },
}
