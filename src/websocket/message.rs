use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::room::RosterEntry;

/// Sender name attached to server-generated chat and win announcements. The
/// frontend styles messages from this user differently.
pub const SYSTEM_USER: &str = "System";

#[derive(Deserialize, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsMessageIn {
    CreateRoom {
        user: String,
    },
    #[serde(rename_all = "camelCase")]
    JoinRoom {
        user: String,
        room_id: String,
    },
    #[serde(rename_all = "camelCase")]
    StartGame {
        room_id: String,
    },
    #[serde(rename_all = "camelCase")]
    Chat {
        content: String,
        room_id: String,
    },
    #[serde(rename_all = "camelCase")]
    Draw {
        content: String,
        room_id: String,
    },
    // Messages with an unrecognized type tag are dropped without an error
    #[serde(other)]
    Unknown,
}

#[derive(Serialize, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsMessageOut {
    #[serde(rename_all = "camelCase")]
    RoomCreated {
        room_id: String,
    },
    #[serde(rename_all = "camelCase")]
    RoomJoined {
        room_id: String,
    },
    PlayerList {
        content: String,
    },
    GameStarted {
        content: String,
    },
    DrawTurn {
        user: String,
    },
    WordToDraw {
        content: String,
        user: String,
    },
    GameWon {
        content: String,
        user: String,
    },
    Chat {
        content: String,
        user: String,
    },
    Draw {
        content: String,
        user: String,
    },
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDto {
    nickname: String,
    points: u32,
    is_creator: bool,
}

impl From<RosterEntry> for PlayerDto {
    fn from(entry: RosterEntry) -> Self {
        PlayerDto {
            nickname: entry.nickname,
            points: entry.points,
            is_creator: entry.is_creator,
        }
    }
}

/// The roster travels as a JSON array encoded into the `content` string, the
/// format the original frontend parses with a second `JSON.parse`.
pub fn roster_to_message(players: Vec<RosterEntry>) -> Result<WsMessageOut, Error> {
    let players: Vec<PlayerDto> = players.into_iter().map(PlayerDto::from).collect();
    let content = serde_json::to_string(&players).map_err(|error| {
        Error::log_and_create_internal(&format!(
            "Could not serialize the player list. Error: '{error}'."
        ))
    })?;
    Ok(WsMessageOut::PlayerList { content })
}
