pub mod actor;
pub mod actor_client;

use rand::distributions::{Alphanumeric, DistString};
use std::collections::HashMap;
use tokio::sync::broadcast;

use crate::config::RoomSettings;
use crate::error::Error;
use crate::player::Player;
use crate::room::actor::{RoomActor, RoomWideEvent};
use crate::room::actor_client::RoomClient;
use crate::room_registry::actor_client::RoomRegistryClient;

pub struct RoomRegistry {
    room_channels: HashMap<String, RoomClient>,
    room_settings: RoomSettings,
    words: Vec<String>,
}

impl RoomRegistry {
    const ROOM_ID_LENGTH: usize = 6;

    pub fn new(room_settings: RoomSettings) -> Self {
        RoomRegistry {
            room_channels: HashMap::default(),
            room_settings,
            words: RoomRegistry::word_list(),
        }
    }

    // The fixed vocabulary every room draws from
    fn word_list() -> Vec<String> {
        [
            "chat",
            "maison",
            "voiture",
            "ordinateur",
            "arbre",
            "soleil",
            "montagne",
            "pomme",
        ]
        .iter()
        .map(|word| word.to_string())
        .collect()
    }

    pub fn create_room(
        &mut self,
        creator: Player,
        registry: RoomRegistryClient,
    ) -> (String, RoomClient, broadcast::Receiver<RoomWideEvent>) {
        let id = self.create_unique_room_id();
        let (room, broadcast_rx) = RoomActor::spawn(
            &id,
            self.room_settings.clone(),
            self.words.clone(),
            creator,
            registry,
        );
        self.room_channels.insert(id.clone(), room.clone());

        (id, room, broadcast_rx)
    }

    pub fn remove_room(&mut self, room_id: &str) -> Option<RoomClient> {
        self.room_channels.remove(room_id)
    }

    pub fn get_room(&self, room_id: &str) -> Result<&RoomClient, Error> {
        match self.room_channels.get(room_id) {
            Some(room) => Ok(room),
            None => Err(Error::RoomDoesNotExist(room_id.to_string())),
        }
    }

    fn create_unique_room_id(&self) -> String {
        loop {
            let id =
                Alphanumeric.sample_string(&mut rand::thread_rng(), RoomRegistry::ROOM_ID_LENGTH);
            if !self.room_channels.contains_key(&id) {
                return id;
            }
        }
    }
}
