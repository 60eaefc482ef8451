pub mod actor;
pub mod actor_client;
pub mod room_fsm;

use rand::seq::SliceRandom;
use rand::thread_rng;
use rust_fsm::StateMachine;

use crate::error::Error;
use crate::player::{Player, PlayerId};
use crate::room::room_fsm::{RoomFsm, RoomFsmInput, RoomFsmState};

pub struct Room {
    id: String,
    words: Vec<String>,
    fsm: StateMachine<RoomFsm>,
    // Kept in join order, the drawer rotation walks this list
    members: Vec<Player>,
    creator: PlayerId,
    current_word: Option<String>,
    next_drawer: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RosterEntry {
    pub nickname: String,
    pub points: u32,
    pub is_creator: bool,
}

#[derive(Clone, Debug)]
pub struct TurnStarted {
    pub drawer_id: PlayerId,
    pub drawer: String,
    pub word: String,
}

#[derive(Debug, PartialEq)]
pub enum GuessOutcome {
    /// The sender already guessed this round or is not a member, the chat is
    /// dropped for everyone.
    Suppressed,
    Correct { nickname: String, won: bool },
    Relay { nickname: String },
}

impl Room {
    const POINTS_PER_GUESS: u32 = 100;
    const POINTS_TO_WIN: u32 = 1000;

    pub fn new(id: &str, words: Vec<String>, creator: Player) -> Self {
        let creator_id = creator.id;
        Self {
            id: id.to_string(),
            words,
            fsm: StateMachine::default(),
            members: vec![creator],
            creator: creator_id,
            current_word: None,
            next_drawer: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> &RoomFsmState {
        self.fsm.state()
    }

    pub fn members(&self) -> &[Player] {
        &self.members
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_round_active(&self) -> bool {
        self.current_word.is_some()
    }

    pub fn current_word(&self) -> Option<&str> {
        self.current_word.as_deref()
    }

    pub fn register(&mut self, player: Player) {
        self.members.push(player);
    }

    pub fn unregister(&mut self, player_id: PlayerId) -> Option<Player> {
        let position = self
            .members
            .iter()
            .position(|member| member.id == player_id)?;
        Some(self.members.remove(position))
    }

    /// Recomputed from the member list on every call so the broadcast always
    /// reflects the membership at that instant. Once the creator has left no
    /// entry carries the creator mark again.
    pub fn roster(&self) -> Vec<RosterEntry> {
        self.members
            .iter()
            .map(|member| RosterEntry {
                nickname: member.nickname.clone(),
                points: member.points,
                is_creator: member.id == self.creator,
            })
            .collect()
    }

    pub fn start_turn(&mut self, requester: PlayerId) -> Result<TurnStarted, Error> {
        if requester != self.creator || self.get_member(requester).is_none() {
            return Err(Error::CommandNotAllowed(
                self.describe_member(requester),
                "start_game".to_string(),
            ));
        }

        // A failed word choice must leave the fsm and the rotation untouched
        let word = self.choose_word()?;
        self.process_event(&RoomFsmInput::StartTurn)?;

        for member in self.members.iter_mut() {
            member.has_guessed = false;
        }

        let index = self.next_drawer % self.members.len();
        self.next_drawer += 1;
        let drawer_id = self.members[index].id;
        let drawer = self.members[index].nickname.clone();

        self.current_word = Some(word.clone());

        Ok(TurnStarted {
            drawer_id,
            drawer,
            word,
        })
    }

    /// Guesses only count while a round is running, lobby chat is relayed as
    /// is. Matching is an exact comparison against the current word.
    pub fn submit_guess(&mut self, player_id: PlayerId, content: &str) -> GuessOutcome {
        let is_winning_guess =
            self.is_round_active() && self.current_word.as_deref() == Some(content);

        let member = match self
            .members
            .iter_mut()
            .find(|member| member.id == player_id)
        {
            Some(member) => member,
            None => return GuessOutcome::Suppressed,
        };

        if member.has_guessed {
            return GuessOutcome::Suppressed;
        }

        if is_winning_guess {
            member.points += Room::POINTS_PER_GUESS;
            member.has_guessed = true;
            GuessOutcome::Correct {
                nickname: member.nickname.clone(),
                won: member.points >= Room::POINTS_TO_WIN,
            }
        } else {
            GuessOutcome::Relay {
                nickname: member.nickname.clone(),
            }
        }
    }

    pub fn member_nickname(&self, player_id: PlayerId) -> Option<&str> {
        self.get_member(player_id)
            .map(|member| member.nickname.as_str())
    }

    fn get_member(&self, player_id: PlayerId) -> Option<&Player> {
        self.members.iter().find(|member| member.id == player_id)
    }

    fn describe_member(&self, player_id: PlayerId) -> String {
        self.get_member(player_id)
            .map(|member| member.nickname.clone())
            .unwrap_or_else(|| player_id.to_string())
    }

    fn choose_word(&self) -> Result<String, Error> {
        self.words.choose(&mut thread_rng()).cloned().ok_or_else(|| {
            Error::log_and_create_internal(&format!(
                "The room '{}' has an empty word list.",
                self.id
            ))
        })
    }

    fn process_event(&mut self, event: &RoomFsmInput) -> Result<(), Error> {
        match self.fsm.consume(event) {
            Ok(_) => Ok(()),
            Err(error) => Err(Error::log_and_create_internal(&format!(
                "The fsm in state {:?} can't transition with an event {:?}. Error: '{error}'.",
                self.fsm.state(),
                event
            ))),
        }
    }
}
