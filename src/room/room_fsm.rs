use std::fmt;

use rust_fsm::state_machine;

// A turn can be started again while one is running, there is no way back to
// the lobby.
state_machine! {
    derive(Debug, Clone, PartialEq)
    pub RoomFsm(Lobby)

    Lobby => {
        StartTurn => Drawing
    },
    Drawing => {
        StartTurn => Drawing
    }
}

impl fmt::Display for RoomFsmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
