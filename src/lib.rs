//! Two-player naval battle game.
//!
//! [`core`] holds the board model, [`player`] the three kinds of player and
//! [`game`] the phase machine that drives a game between two of them, local
//! or over the network.

pub mod config;
pub mod core;
pub mod game;
mod logging;
pub mod player;
pub mod protocol;
pub mod setup;
pub mod transport;

pub use config::{GameConfig, Role};
pub use crate::core::{Cell, Direction, FleetError, FleetModel, ShipType, ShotOutcome};
pub use game::{GamePhase, PhaseMachine, Step, TurnContext};
pub use logging::init_logging;
pub use player::{
    AutomatonPlayer, Endpoint, InteractivePlayer, Player, PlayerEvent, PlayerLink, PlayerRegistry,
    RemotePlayer, TargetInput,
};
pub use protocol::Message;
pub use setup::{FleetSetup, SetupCommand};
pub use transport::{InMemoryTransport, TcpTransport, Transport};
