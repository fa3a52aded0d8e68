use std::time::Duration;

use crate::core::FleetModel;
use crate::player::{Endpoint, PLAYER_1, PLAYER_2};

pub const DEFAULT_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 61888;
pub const DEFAULT_PHASE_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_MAX_PREPARE_ATTEMPTS: u32 = 120;

/// Which end of the connection this process is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Server,
    Client,
}

/// Everything needed to set up one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Registry key of the player in seat 0.
    pub player_1: String,
    /// Registry key of the player in seat 1.
    pub player_2: String,
    pub role: Role,
    pub address: String,
    pub port: u16,
    /// Pause between two phases.
    pub phase_delay: Duration,
    /// Ticks spent in PREPARE before giving up; `None` retries forever.
    pub max_prepare_attempts: Option<u32>,
    /// Base seed for the players' random generators.
    pub seed: Option<u64>,
    /// Seat that shoots first each round.
    pub first_player: usize,
    /// Fleet placed by hand for the interactive player; placed at random
    /// when `None`.
    pub fleet: Option<FleetModel>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::solo()
    }
}

impl GameConfig {
    /// A person against the automaton on this machine.
    pub fn solo() -> Self {
        Self {
            player_1: "interactive".to_string(),
            player_2: "automaton".to_string(),
            role: Role::Server,
            address: DEFAULT_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            phase_delay: DEFAULT_PHASE_DELAY,
            max_prepare_attempts: Some(DEFAULT_MAX_PREPARE_ATTEMPTS),
            seed: None,
            first_player: PLAYER_1,
            fleet: None,
        }
    }

    /// A person against a peer over the network. The client lets the server
    /// shoot first, so its remote seat leads each round.
    pub fn multiplayer(role: Role) -> Self {
        Self {
            player_2: "remote".to_string(),
            role,
            first_player: match role {
                Role::Server => PLAYER_1,
                Role::Client => PLAYER_2,
            },
            ..Self::solo()
        }
    }

    /// `address:port` as a socket address string.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }

    /// How a remote player reaches its peer under this configuration.
    pub fn endpoint(&self) -> Endpoint {
        match self.role {
            Role::Server => Endpoint::Listen(self.socket_addr()),
            Role::Client => Endpoint::Connect(self.socket_addr()),
        }
    }

    /// Seed for the player in `seat`, derived from the base seed.
    pub fn seed_for(&self, seat: usize) -> Option<u64> {
        self.seed.map(|s| s.wrapping_add(seat as u64))
    }
}
