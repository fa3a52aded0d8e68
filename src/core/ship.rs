//! Ship kinds and the direction a ship is laid in.

use super::cell::{Cell, CellSet};

/// The five kinds of ship in a fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShipType {
    Carrier,
    Battleship,
    Cruiser,
    Submarine,
    PatrolBoat,
}

impl ShipType {
    /// All ship types, in fleet order.
    pub const ALL: [ShipType; 5] = [
        ShipType::Carrier,
        ShipType::Battleship,
        ShipType::Cruiser,
        ShipType::Submarine,
        ShipType::PatrolBoat,
    ];

    pub const fn length(self) -> u8 {
        match self {
            ShipType::Carrier => 5,
            ShipType::Battleship => 4,
            ShipType::Cruiser | ShipType::Submarine => 3,
            ShipType::PatrolBoat => 2,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ShipType::Carrier => "Carrier",
            ShipType::Battleship => "Battleship",
            ShipType::Cruiser => "Cruiser",
            ShipType::Submarine => "Submarine",
            ShipType::PatrolBoat => "Patrol Boat",
        }
    }

    /// Single-letter marker used when drawing a fleet.
    pub const fn symbol(self) -> char {
        match self {
            ShipType::Carrier => 'A',
            ShipType::Battleship => 'B',
            ShipType::Cruiser => 'C',
            ShipType::Submarine => 'S',
            ShipType::PatrolBoat => 'P',
        }
    }

    /// Position in [`ShipType::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Axis a ship lies along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Whether the bow points toward increasing or decreasing indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sense {
    Increasing,
    Decreasing,
}

/// Orientation of a ship: an axis plus a sense.
///
/// Occupancy only ever looks at the axis. The sense is kept so a front end
/// can draw the ship facing the way the player turned it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Direction {
    pub axis: Axis,
    pub sense: Sense,
}

impl Direction {
    pub const EAST: Direction = Direction::new(Axis::Horizontal, Sense::Increasing);
    pub const NORTH: Direction = Direction::new(Axis::Vertical, Sense::Decreasing);
    pub const WEST: Direction = Direction::new(Axis::Horizontal, Sense::Decreasing);
    pub const SOUTH: Direction = Direction::new(Axis::Vertical, Sense::Increasing);

    /// Quarter-turn order used by [`Direction::rotated`].
    pub const COMPASS: [Direction; 4] = [
        Direction::EAST,
        Direction::NORTH,
        Direction::WEST,
        Direction::SOUTH,
    ];

    pub const fn new(axis: Axis, sense: Sense) -> Self {
        Direction { axis, sense }
    }

    /// Horizontal, increasing sense.
    pub const fn horizontal() -> Self {
        Direction::EAST
    }

    /// Vertical, increasing sense.
    pub const fn vertical() -> Self {
        Direction::SOUTH
    }

    /// Two-bit encoding: bit 0 is the axis (1 = vertical), bit 1 the sense
    /// (1 = decreasing).
    pub const fn bits(self) -> u8 {
        let axis = match self.axis {
            Axis::Horizontal => 0,
            Axis::Vertical => 1,
        };
        let sense = match self.sense {
            Sense::Increasing => 0,
            Sense::Decreasing => 2,
        };
        axis | sense
    }

    /// Inverse of [`Direction::bits`]; only the low two bits are read.
    pub const fn from_bits(bits: u8) -> Self {
        let axis = if bits & 1 == 0 {
            Axis::Horizontal
        } else {
            Axis::Vertical
        };
        let sense = if bits & 2 == 0 {
            Sense::Increasing
        } else {
            Sense::Decreasing
        };
        Direction { axis, sense }
    }

    /// Next direction a quarter turn counter-clockwise (E → N → W → S → E).
    pub fn rotated(self) -> Self {
        let at = Self::COMPASS.iter().position(|d| *d == self).unwrap_or(0);
        Self::COMPASS[(at + 1) % Self::COMPASS.len()]
    }

    /// Per-segment step along the axis. Segments always grow toward
    /// increasing indices from the origin.
    pub const fn unit_step(self) -> (i8, i8) {
        match self.axis {
            Axis::Horizontal => (1, 0),
            Axis::Vertical => (0, 1),
        }
    }

    /// Step pointing the way the sense says, used when probing outward from a
    /// cell in all four directions.
    pub const fn heading(self) -> (i8, i8) {
        let (dx, dy) = self.unit_step();
        match self.sense {
            Sense::Increasing => (dx, dy),
            Sense::Decreasing => (-dx, -dy),
        }
    }

    pub const fn opposite(self) -> Self {
        let sense = match self.sense {
            Sense::Increasing => Sense::Decreasing,
            Sense::Decreasing => Sense::Increasing,
        };
        Direction {
            axis: self.axis,
            sense,
        }
    }
}

/// Cells covered by a ship or shot of `length` starting at `origin`, or
/// `None` when any of them falls off the board.
pub fn covered_cells(origin: Cell, length: u8, direction: Direction) -> Option<CellSet> {
    let (dx, dy) = direction.unit_step();
    let mut cells = CellSet::new();
    for i in 0..length as i8 {
        cells.insert(origin.offset(dx * i, dy * i)?);
    }
    Some(cells)
}

/// Like [`covered_cells`], but silently drops cells past the board edge.
pub fn covered_cells_clipped(origin: Cell, length: u8, direction: Direction) -> CellSet {
    let (dx, dy) = direction.unit_step();
    (0..length as i8)
        .map_while(|i| origin.offset(dx * i, dy * i))
        .collect()
}
