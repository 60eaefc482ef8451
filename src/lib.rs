#[macro_use]
extern crate lazy_static;

pub mod config;
pub mod error;
pub mod metrics;
pub mod player;
pub mod room;
pub mod room_registry;
pub mod routes;
pub mod startup;
pub mod websocket;
