//! Core game model: cells, ships, fleets and targeting.
//!
//! Nothing in here performs I/O; the players and the phase machine build on
//! top of it.

pub mod cell;
pub mod common;
pub mod config;
pub mod fleet;
pub mod ship;
pub mod strategy;

pub use cell::{Cell, CellSet};
pub use common::{FleetError, ShotOutcome};
pub use config::*;
pub use fleet::{FleetModel, Placement};
pub use ship::{covered_cells, Axis, Direction, Sense, ShipType};
pub use strategy::Targeting;
