use prometheus::{IntGauge, Registry};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref ACTIVE_ROOMS: IntGauge =
        IntGauge::new("croquis_active_rooms", "Active rooms").expect("metric cannot be created");
    pub static ref CONNECTED_PLAYERS: IntGauge =
        IntGauge::new("croquis_connected_players", "Amount of players connected")
            .expect("metric cannot be created");
}

pub fn register_metrics() {
    REGISTRY
        .register(Box::new(ACTIVE_ROOMS.clone()))
        .expect("collector cannot be registered");

    REGISTRY
        .register(Box::new(CONNECTED_PLAYERS.clone()))
        .expect("collector cannot be registered");
}
