use axum::extract::ws::{Message, WebSocket};
use std::sync::Arc;
use tokio::select;

use crate::error::Error;
use crate::metrics::CONNECTED_PLAYERS;
use crate::player::Player;
use crate::player::PlayerId;
use crate::room::actor::RoomWideEvent;
use crate::room::actor_client::RoomClient;
use crate::room::actor_client::RoomWideEventReceiver;
use crate::room_registry::actor_client::RoomRegistryClient;
use crate::websocket::close;
use crate::websocket::message::roster_to_message;
use crate::websocket::message::WsMessageIn;
use crate::websocket::message::WsMessageOut;
use crate::websocket::message::SYSTEM_USER;
use crate::websocket::parse_message;
use crate::websocket::send_message;

pub struct PlayerActor {
    websocket: WebSocket,
    registry: Arc<RoomRegistryClient>,
}

/// Everything the connection holds while it is attached to a room.
struct RoomSession {
    room_id: String,
    player_id: PlayerId,
    nickname: String,
    room: RoomClient,
    events: RoomWideEventReceiver,
}

/// A command that moves the connection into a room.
enum LobbyAction {
    Create { nickname: String },
    Join { nickname: String, room_id: String },
}

enum SessionEnd {
    /// The browser asked for another room while attached to one.
    Rejoin(LobbyAction),
    Closed,
}

enum RoomFlow {
    Continue,
    Leave(LobbyAction),
}

impl PlayerActor {
    pub async fn create(websocket: WebSocket, registry: Arc<RoomRegistryClient>) {
        PlayerActor {
            websocket,
            registry,
        }
        .start()
        .await;
    }

    async fn start(mut self) {
        CONNECTED_PLAYERS.inc();

        let mut pending_action: Option<LobbyAction> = None;
        loop {
            let action = match pending_action.take() {
                Some(action) => action,
                None => match self.next_lobby_action().await {
                    Ok(action) => action,
                    // Frame errors in the lobby are always fatal, there is no
                    // room state to preserve
                    Err(error) => {
                        log::info!("Connection closed while in the lobby due to: {error}. Stopping player actor.");
                        break;
                    }
                },
            };

            match self.attach(action).await {
                Ok(Some(session)) => match self.run_session(session).await {
                    SessionEnd::Rejoin(action) => pending_action = Some(action),
                    SessionEnd::Closed => break,
                },
                Ok(None) => {}
                Err(error) => {
                    log::info!("Connection closed while entering a room due to: {error}. Stopping player actor.");
                    break;
                }
            }
        }

        close(self.websocket).await;
        CONNECTED_PLAYERS.dec();
    }

    /// Reads frames until the browser asks to create or join a room. Room
    /// commands sent while unattached are dropped.
    async fn next_lobby_action(&mut self) -> Result<LobbyAction, Error> {
        loop {
            let websocket_message = self.websocket.recv().await;
            match interpret_message(websocket_message)? {
                Some(WsMessageIn::CreateRoom { user }) => {
                    return Ok(LobbyAction::Create { nickname: user })
                }
                Some(WsMessageIn::JoinRoom { user, room_id }) => {
                    return Ok(LobbyAction::Join {
                        nickname: user,
                        room_id,
                    })
                }
                _ => {}
            }
        }
    }

    /// Creates or joins the requested room. `Ok(None)` means the room does not
    /// exist and the browser silently stays in the lobby.
    async fn attach(&mut self, action: LobbyAction) -> Result<Option<RoomSession>, Error> {
        let (session, announcement) = match action {
            LobbyAction::Create { nickname } => {
                let player = Player::new(&nickname);
                let player_id = player.id;
                let created = self.registry.create_room(player).await?;
                let announcement = WsMessageOut::RoomCreated {
                    room_id: created.room_id.clone(),
                };
                (
                    RoomSession {
                        room_id: created.room_id,
                        player_id,
                        nickname,
                        room: created.room,
                        events: created.events,
                    },
                    announcement,
                )
            }
            LobbyAction::Join { nickname, room_id } => {
                let room = match self.registry.get_room(&room_id).await {
                    Ok(room) => room,
                    Err(error) if !PlayerActor::should_close_websocket(&error) => {
                        log::info!(
                            "Player '{nickname}' could not join the room '{room_id}'. Reason: '{error}'."
                        );
                        return Ok(None);
                    }
                    Err(error) => return Err(error),
                };
                let player = Player::new(&nickname);
                let player_id = player.id;
                let events = room.register(player).await?;
                let announcement = WsMessageOut::RoomJoined {
                    room_id: room_id.clone(),
                };
                (
                    RoomSession {
                        room_id,
                        player_id,
                        nickname,
                        room,
                        events,
                    },
                    announcement,
                )
            }
        };

        // The announcement must reach the browser before any room-wide event
        // does, it carries the room id the browser replies with
        if let Err(error) = send_message(&mut self.websocket, &announcement).await {
            self.detach(&session).await;
            return Err(error);
        }

        Ok(Some(session))
    }

    async fn run_session(&mut self, mut session: RoomSession) -> SessionEnd {
        loop {
            let flow = select! {
                room_wide_event = session.events.next() => {
                    self.receive_room_wide_event(&session, room_wide_event)
                        .await
                        .map(|()| RoomFlow::Continue)
                },
                websocket_message = self.websocket.recv() => {
                    self.receive_websocket_message(&mut session, websocket_message).await
                },
            };

            match flow {
                Ok(RoomFlow::Continue) => {}
                Ok(RoomFlow::Leave(action)) => {
                    self.detach(&session).await;
                    return SessionEnd::Rejoin(action);
                }
                Err(error) if PlayerActor::should_close_websocket(&error) => {
                    log::info!(
                        "Connection with player {} lost due to: {error}. Stopping player actor.",
                        session.nickname
                    );
                    self.detach(&session).await;
                    return SessionEnd::Closed;
                }
                Err(_) => {}
            }
        }
    }

    async fn detach(&mut self, session: &RoomSession) {
        if let Err(error) = session.room.unregister(session.player_id).await {
            log::error!(
                "Could not unregister player '{}' from room '{}'. Error: '{error}'.",
                session.nickname,
                session.room_id
            );
        }
    }

    fn should_close_websocket(error: &Error) -> bool {
        match error {
            Error::Internal(_) => true,
            Error::WebsocketClosed(_) => true,
            Error::UnprocessableMessage(_, _) => true,
            Error::CommandNotAllowed(_, _) => false,
            Error::RoomDoesNotExist(_) => false,
        }
    }

    async fn receive_room_wide_event(
        &mut self,
        session: &RoomSession,
        room_wide_event: Result<RoomWideEvent, Error>,
    ) -> Result<(), Error> {
        match room_wide_event {
            Ok(RoomWideEvent::PlayerList { players }) => {
                let message = roster_to_message(players)?;
                send_message(&mut self.websocket, &message).await
            }
            Ok(RoomWideEvent::GameStarted) => {
                send_message(
                    &mut self.websocket,
                    &WsMessageOut::GameStarted {
                        content: "La partie commence !".to_string(),
                    },
                )
                .await
            }
            Ok(RoomWideEvent::TurnStarted {
                drawer_id,
                drawer,
                word,
            }) => {
                send_message(
                    &mut self.websocket,
                    &WsMessageOut::DrawTurn {
                        user: drawer.clone(),
                    },
                )
                .await?;
                // Only the drawer learns the word
                if drawer_id == session.player_id {
                    send_message(
                        &mut self.websocket,
                        &WsMessageOut::WordToDraw {
                            content: word,
                            user: drawer,
                        },
                    )
                    .await?;
                }
                Ok(())
            }
            Ok(RoomWideEvent::CorrectGuess { nickname }) => {
                send_message(
                    &mut self.websocket,
                    &WsMessageOut::Chat {
                        content: format!("{nickname} a deviné le mot !"),
                        user: SYSTEM_USER.to_string(),
                    },
                )
                .await
            }
            Ok(RoomWideEvent::GameWon { nickname }) => {
                send_message(
                    &mut self.websocket,
                    &WsMessageOut::GameWon {
                        content: format!("{nickname} a gagné avec 1000 points !"),
                        user: SYSTEM_USER.to_string(),
                    },
                )
                .await
            }
            Ok(RoomWideEvent::ChatMessage { sender, content }) => {
                send_message(
                    &mut self.websocket,
                    &WsMessageOut::Chat {
                        content,
                        user: sender,
                    },
                )
                .await
            }
            Ok(RoomWideEvent::Drawing { sender, content }) => {
                send_message(
                    &mut self.websocket,
                    &WsMessageOut::Draw {
                        content,
                        user: sender,
                    },
                )
                .await
            }
            Err(error) => Err(error),
        }
    }

    async fn receive_websocket_message(
        &mut self,
        session: &mut RoomSession,
        websocket_message: Option<Result<Message, axum::Error>>,
    ) -> Result<RoomFlow, Error> {
        let message = match interpret_message(websocket_message)? {
            Some(message) => message,
            None => return Ok(RoomFlow::Continue),
        };

        match message {
            WsMessageIn::CreateRoom { user } => {
                Ok(RoomFlow::Leave(LobbyAction::Create { nickname: user }))
            }
            WsMessageIn::JoinRoom { user, room_id } => Ok(RoomFlow::Leave(LobbyAction::Join {
                nickname: user,
                room_id,
            })),
            // Commands carrying another room's id are dropped
            WsMessageIn::StartGame { room_id } => {
                if room_id == session.room_id {
                    session.room.start_turn(session.player_id).await?;
                }
                Ok(RoomFlow::Continue)
            }
            WsMessageIn::Chat { content, room_id } => {
                if room_id == session.room_id {
                    session
                        .room
                        .submit_guess(session.player_id, &content)
                        .await?;
                }
                Ok(RoomFlow::Continue)
            }
            WsMessageIn::Draw { content, room_id } => {
                if room_id == session.room_id {
                    session
                        .room
                        .relay_drawing(session.player_id, &content)
                        .await?;
                }
                Ok(RoomFlow::Continue)
            }
            WsMessageIn::Unknown => Ok(RoomFlow::Continue),
        }
    }
}

fn interpret_message(
    websocket_message: Option<Result<Message, axum::Error>>,
) -> Result<Option<WsMessageIn>, Error> {
    match websocket_message {
        Some(Ok(Message::Text(txt))) => parse_message(&txt).map(Some),
        // browser said "close"
        Some(Ok(Message::Close(_))) => Err(Error::WebsocketClosed(
            "browser sent 'Close' websocket frame".to_string(),
        )),
        // axum answers pings on its own
        Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => Ok(None),
        Some(Ok(Message::Binary(_))) => Err(Error::UnprocessableMessage(
            "Unsupported message type".to_string(),
            "Unsupported message type".to_string(),
        )),
        Some(Err(error)) => Err(Error::WebsocketClosed(error.to_string())),
        // websocket was closed
        None => Err(Error::WebsocketClosed(
            "other end of websocket was closed abruptly".to_string(),
        )),
    }
}
