pub mod actor;

use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_PLAYER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one accepted connection. Two members of a room may share a
/// nickname, so membership and the creator role are tracked by id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlayerId(u64);

impl PlayerId {
    fn next() -> Self {
        PlayerId(NEXT_PLAYER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl Display for PlayerId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    pub id: PlayerId,
    pub nickname: String,
    pub points: u32,
    pub has_guessed: bool,
}

impl Player {
    pub fn new(nickname: &str) -> Self {
        Player {
            id: PlayerId::next(),
            nickname: nickname.to_string(),
            points: 0,
            has_guessed: false,
        }
    }
}
