//! Shot outcomes and fleet errors.

use std::fmt;

use super::ship::ShipType;

/// Result of a single shot, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShotOutcome {
    /// The shot hit water.
    Miss,
    /// The shot hit a ship that is still afloat.
    Hit,
    /// The shot sank a ship while others remain.
    HitAndSunk,
    /// The shot sank the last ship of the fleet.
    GameOver,
}

impl ShotOutcome {
    /// Integer code carried on the wire.
    pub const fn code(self) -> i64 {
        match self {
            ShotOutcome::Miss => 0,
            ShotOutcome::Hit => 1,
            ShotOutcome::HitAndSunk => 2,
            ShotOutcome::GameOver => 3,
        }
    }

    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(ShotOutcome::Miss),
            1 => Some(ShotOutcome::Hit),
            2 => Some(ShotOutcome::HitAndSunk),
            3 => Some(ShotOutcome::GameOver),
            _ => None,
        }
    }

    /// `true` for every outcome except `Miss`.
    pub const fn is_hit(self) -> bool {
        !matches!(self, ShotOutcome::Miss)
    }

    /// `true` when a ship went down with this shot.
    pub const fn is_sinking(self) -> bool {
        matches!(self, ShotOutcome::HitAndSunk | ShotOutcome::GameOver)
    }
}

impl fmt::Display for ShotOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShotOutcome::Miss => write!(f, "miss"),
            ShotOutcome::Hit => write!(f, "hit"),
            ShotOutcome::HitAndSunk => write!(f, "hit and sunk"),
            ShotOutcome::GameOver => write!(f, "game over"),
        }
    }
}

/// Errors returned by `FleetModel` operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FleetError {
    /// Part of the ship would lie outside the board.
    OutOfBounds(ShipType),
    /// The ship would share a cell with another ship.
    Overlaps(ShipType),
    /// The ship type is already in the fleet.
    AlreadyPlaced(ShipType),
    /// The ship type has not been placed yet.
    NotPlaced(ShipType),
    /// Damage applied to a ship with no hit points left.
    NoHitPointsLeft(ShipType),
    /// Random placement gave up on this ship.
    UnableToPlace(ShipType),
}

impl fmt::Display for FleetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FleetError::OutOfBounds(t) => write!(f, "{} placement is out of bounds", t.name()),
            FleetError::Overlaps(t) => write!(f, "{} placement overlaps another ship", t.name()),
            FleetError::AlreadyPlaced(t) => write!(f, "{} is already placed", t.name()),
            FleetError::NotPlaced(t) => write!(f, "{} has not been placed", t.name()),
            FleetError::NoHitPointsLeft(t) => {
                write!(f, "{} has no hit points left to lose", t.name())
            }
            FleetError::UnableToPlace(t) => write!(f, "unable to find room for the {}", t.name()),
        }
    }
}

impl std::error::Error for FleetError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_roundtrip_and_order() {
        for code in 0..4 {
            assert_eq!(ShotOutcome::from_code(code).map(ShotOutcome::code), Some(code));
        }
        assert_eq!(ShotOutcome::from_code(4), None);
        assert!(ShotOutcome::GameOver > ShotOutcome::HitAndSunk);
        assert!(ShotOutcome::HitAndSunk > ShotOutcome::Hit);
        assert!(ShotOutcome::Hit > ShotOutcome::Miss);
    }
}
