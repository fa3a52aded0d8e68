//! Player trait and implementations
//!
//! The phase machine drives two `Player`s through the same calls whatever
//! they are backed by:
//! - AutomatonPlayer: hunt-and-destroy targeting against a random fleet
//! - InteractivePlayer: waits for targets injected from a front end
//! - RemotePlayer: forwards every call to a peer over a socket
//!
//! Players report back to the phase machine through their `PlayerLink`.

use std::collections::BTreeMap;

use log::{debug, warn};
use tokio::sync::mpsc;

use crate::core::{Cell, CellSet, ShotOutcome};

/// Seat of the first player.
pub const PLAYER_1: usize = 0;
/// Seat of the second player.
pub const PLAYER_2: usize = 1;

/// Seat facing `seat`.
pub const fn opponent(seat: usize) -> usize {
    (seat + 1) % 2
}

/// Notification sent from a player up to the phase machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    /// The player at `seat` fired at `cell`.
    Fired { seat: usize, cell: Cell },
    /// The player at `seat` resolved a shot against its own fleet.
    Hit {
        seat: usize,
        cell: Cell,
        outcome: ShotOutcome,
    },
    /// The player at `seat` cannot continue the game.
    Failed { seat: usize, reason: String },
}

pub type EventSender = mpsc::UnboundedSender<PlayerEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<PlayerEvent>;

/// Channel carrying player events to the phase machine.
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// A player's handle on the phase machine.
///
/// Owns the cells this player has fired at, which is what makes `fire`
/// reject a repeated target.
#[derive(Debug)]
pub struct PlayerLink {
    seat: usize,
    events: EventSender,
    fired: CellSet,
    moves: BTreeMap<Cell, ShotOutcome>,
}

impl PlayerLink {
    pub fn new(seat: usize, events: EventSender) -> Self {
        Self {
            seat,
            events,
            fired: CellSet::new(),
            moves: BTreeMap::new(),
        }
    }

    pub fn seat(&self) -> usize {
        self.seat
    }

    /// Fire at `cell`. Returns `false`, without notifying anyone, when this
    /// player already fired there this game.
    pub fn fire(&mut self, cell: Cell) -> bool {
        if !self.fired.insert(cell) {
            debug!("player {} already fired at {}", self.seat, cell);
            return false;
        }
        self.send(PlayerEvent::Fired {
            seat: self.seat,
            cell,
        });
        true
    }

    /// Report the outcome of a shot against this player's fleet.
    pub fn hit(&self, cell: Cell, outcome: ShotOutcome) {
        self.send(PlayerEvent::Hit {
            seat: self.seat,
            cell,
            outcome,
        });
    }

    /// Report that this player cannot go on.
    pub fn fail(&self, reason: impl Into<String>) {
        self.send(PlayerEvent::Failed {
            seat: self.seat,
            reason: reason.into(),
        });
    }

    pub fn has_fired(&self, cell: Cell) -> bool {
        self.fired.contains(cell)
    }

    /// Number of accepted shots this game.
    pub fn shots_fired(&self) -> usize {
        self.fired.len()
    }

    /// Remember the outcome of one of this player's shots.
    pub fn record_move(&mut self, cell: Cell, outcome: ShotOutcome) {
        self.moves.insert(cell, outcome);
    }

    /// Outcomes of this player's shots so far.
    pub fn moves(&self) -> &BTreeMap<Cell, ShotOutcome> {
        &self.moves
    }

    fn send(&self, event: PlayerEvent) {
        if self.events.send(event).is_err() {
            warn!("player {}: phase machine is gone, event dropped", self.seat);
        }
    }
}

/// Interface implemented by every kind of player.
///
/// Calls arrive from the phase machine on a single thread and must not
/// block. A player answers `request_shot` with `fire` and `request_hit` with
/// `hit`, either straight away or from a later `tick`.
pub trait Player: Send {
    /// Get ready to play. Returns `false` to be asked again on the next tick.
    fn pre_game_prepare(&mut self) -> bool {
        true
    }

    /// Called once, on the first turn of the game.
    fn start_game(&mut self);

    fn start_turn(&mut self) {}

    fn end_turn(&mut self) {}

    /// It is this player's turn to choose a target.
    fn request_shot(&mut self);

    /// The opponent fired at `at`; resolve it against this player's fleet.
    fn request_hit(&mut self, at: Cell);

    /// Outcome of this player's last shot.
    fn show_hit(&mut self, at: Cell, outcome: ShotOutcome);

    /// The opponent is about to take its shot.
    fn await_opponent_shot(&mut self) {}

    /// Called on every advance of the phase machine, before it looks for
    /// events.
    fn tick(&mut self) {}

    fn link(&self) -> &PlayerLink;

    fn link_mut(&mut self) -> &mut PlayerLink;

    /// Fire at `at`; `false` if this player already fired there.
    fn fire(&mut self, at: Cell) -> bool {
        self.link_mut().fire(at)
    }

    /// Report the outcome of a shot against this player's fleet.
    fn hit(&mut self, at: Cell, outcome: ShotOutcome) {
        self.link().hit(at, outcome)
    }

    /// Outcomes of this player's shots so far, by target cell.
    fn moves(&self) -> &BTreeMap<Cell, ShotOutcome> {
        self.link().moves()
    }

    /// `true` for players driven by a person.
    fn is_interactive(&self) -> bool {
        false
    }

    /// Handle for injecting targets, for players that take them from outside.
    fn target_input(&self) -> Option<TargetInput> {
        None
    }
}

pub mod automaton;
pub mod interactive;
pub mod registry;
pub mod remote;

pub use automaton::AutomatonPlayer;
pub use interactive::{parse_cell, InteractivePlayer, TargetInput};
pub use registry::{PlayerFactory, PlayerRegistry};
pub use remote::{Endpoint, RemotePlayer};
