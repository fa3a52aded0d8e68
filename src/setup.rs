//! Placing a fleet by hand before the game starts.
//!
//! One line of text is one [`SetupCommand`]:
//!
//! - `carrier A1 east` places a ship, or re-places it when it is already on
//!   the board
//! - `move carrier B3` moves a placed ship and keeps its direction
//! - `rotate carrier` turns a placed ship a quarter turn about its origin
//! - `random` places every ship still missing
//! - `done` ends setup once the fleet is full
//!
//! Every change is checked against the fleet before it is applied, so a
//! rejected command leaves the fleet as it was.

use std::str::FromStr;

use log::debug;
use rand::Rng;

use crate::core::{Cell, Direction, FleetError, FleetModel, ShipType};
use crate::player::parse_cell;

/// Short help printed by front ends.
pub const SETUP_HELP: &str = "Commands: <ship> <cell> <east|north|west|south>, \
move <ship> <cell>, rotate <ship>, random, done";

/// Parse a ship by name (`carrier`, `patrol`, `patrolboat`) or by its drawing
/// letter (`A`, `B`, `C`, `S`, `P`).
pub fn parse_ship(word: &str) -> Result<ShipType, String> {
    let word = word.to_ascii_lowercase();
    if word == "patrol" {
        return Ok(ShipType::PatrolBoat);
    }
    ShipType::ALL
        .into_iter()
        .find(|ty| {
            let name = ty.name().to_ascii_lowercase().replace(' ', "");
            let symbol = ty.symbol().to_ascii_lowercase().to_string();
            word == name || word == symbol
        })
        .ok_or_else(|| format!("Unknown ship '{}'", word))
}

/// Parse a compass direction. `h` and `v` stand for east and south.
pub fn parse_direction(word: &str) -> Result<Direction, String> {
    match word.to_ascii_lowercase().as_str() {
        "e" | "east" | "h" | "horizontal" => Ok(Direction::EAST),
        "n" | "north" => Ok(Direction::NORTH),
        "w" | "west" => Ok(Direction::WEST),
        "s" | "south" | "v" | "vertical" => Ok(Direction::SOUTH),
        other => Err(format!(
            "Unknown direction '{}' - use east, north, west or south",
            other
        )),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupCommand {
    Place {
        ship: ShipType,
        cell: Cell,
        direction: Direction,
    },
    Move {
        ship: ShipType,
        cell: Cell,
    },
    Rotate {
        ship: ShipType,
    },
    Random,
    Done,
}

/// Split a leading ship name off `words`, accepting `patrol boat` as two
/// words.
fn take_ship<'a, 'b>(words: &'a [&'b str]) -> Result<(ShipType, &'a [&'b str]), String> {
    match words {
        ["patrol", "boat", rest @ ..] => Ok((ShipType::PatrolBoat, rest)),
        [word, rest @ ..] => parse_ship(word).map(|ty| (ty, rest)),
        [] => Err("Missing ship name".to_string()),
    }
}

impl FromStr for SetupCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let lowered = line.trim().to_ascii_lowercase();
        let words: Vec<&str> = lowered.split_whitespace().collect();
        match words.as_slice() {
            [] => Err("Empty command".to_string()),
            ["random"] => Ok(SetupCommand::Random),
            ["done"] => Ok(SetupCommand::Done),
            ["rotate", rest @ ..] => match take_ship(rest)? {
                (ship, []) => Ok(SetupCommand::Rotate { ship }),
                _ => Err("Usage: rotate <ship>".to_string()),
            },
            ["move", rest @ ..] => match take_ship(rest)? {
                (ship, [cell]) => Ok(SetupCommand::Move {
                    ship,
                    cell: parse_cell(cell)?,
                }),
                _ => Err("Usage: move <ship> <cell>".to_string()),
            },
            _ => match take_ship(words.as_slice())? {
                (ship, [cell, direction]) => Ok(SetupCommand::Place {
                    ship,
                    cell: parse_cell(cell)?,
                    direction: parse_direction(direction)?,
                }),
                _ => Err("Usage: <ship> <cell> <direction>".to_string()),
            },
        }
    }
}

/// Where a setup session stands after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupProgress {
    Placing,
    Finished,
}

/// A fleet being placed one command at a time.
#[derive(Debug, Clone, Default)]
pub struct FleetSetup {
    fleet: FleetModel,
}

impl FleetSetup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fleet(&self) -> &FleetModel {
        &self.fleet
    }

    /// First ship, in fleet order, that is not on the board yet.
    pub fn next_missing(&self) -> Option<ShipType> {
        ShipType::ALL.into_iter().find(|ty| !self.fleet.has(*ty))
    }

    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        command: SetupCommand,
        rng: &mut R,
    ) -> Result<SetupProgress, FleetError> {
        match command {
            SetupCommand::Place {
                ship,
                cell,
                direction,
            } => {
                self.fleet.check_placement(ship, cell, direction)?;
                if self.fleet.has(ship) {
                    self.fleet.update_boat(ship, cell, Some(direction))?;
                } else {
                    self.fleet.add_boat(ship, cell, direction)?;
                }
            }
            SetupCommand::Move { ship, cell } => {
                let placement = self.fleet.placement(ship).ok_or(FleetError::NotPlaced(ship))?;
                self.fleet.check_placement(ship, cell, placement.direction())?;
                self.fleet.update_boat(ship, cell, None)?;
            }
            SetupCommand::Rotate { ship } => {
                let placement = *self.fleet.placement(ship).ok_or(FleetError::NotPlaced(ship))?;
                let turned = placement.direction().rotated();
                self.fleet.check_placement(ship, placement.origin(), turned)?;
                self.fleet.update_boat(ship, placement.origin(), Some(turned))?;
            }
            SetupCommand::Random => {
                while let Some(ship) = self.next_missing() {
                    let (cell, direction) = self.fleet.random_placement(rng, ship)?;
                    self.fleet.add_boat(ship, cell, direction)?;
                }
                debug!("remaining ships placed at random");
            }
            SetupCommand::Done => {
                if let Some(ship) = self.next_missing() {
                    return Err(FleetError::NotPlaced(ship));
                }
                return Ok(SetupProgress::Finished);
            }
        }
        Ok(SetupProgress::Placing)
    }

    /// The placed fleet, once every ship is on the board.
    pub fn finish(self) -> Result<FleetModel, FleetError> {
        match self.next_missing() {
            Some(ship) => Err(FleetError::NotPlaced(ship)),
            None => Ok(self.fleet),
        }
    }
}
