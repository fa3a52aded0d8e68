//! Per-player ship placement, occupancy and damage.

use std::fmt;

use log::debug;
use rand::Rng;

use super::cell::{Cell, CellSet};
use super::common::{FleetError, ShotOutcome};
use super::config::{BOARD_CELLS, BOARD_SIZE, NUM_SHIP_TYPES};
use super::ship::{covered_cells, covered_cells_clipped, Axis, Direction, ShipType};

/// Attempts made by [`FleetModel::random_placement`] before giving up.
const RANDOM_PLACEMENT_ATTEMPTS: usize = 200;

/// Where a ship sits and which cells it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    origin: Cell,
    direction: Direction,
    cells: CellSet,
}

impl Placement {
    pub fn origin(&self) -> Cell {
        self.origin
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn cells(&self) -> CellSet {
        self.cells
    }
}

/// One player's fleet.
///
/// Hit points start at each ship's length whether or not it is placed, so a
/// fleet that is not full is never sunk.
#[derive(Clone, PartialEq, Eq)]
pub struct FleetModel {
    placements: [Option<Placement>; NUM_SHIP_TYPES],
    hit_points: [u8; NUM_SHIP_TYPES],
}

impl Default for FleetModel {
    fn default() -> Self {
        Self::new()
    }
}

impl FleetModel {
    /// Empty fleet with full hit points.
    pub fn new() -> Self {
        FleetModel {
            placements: [None; NUM_SHIP_TYPES],
            hit_points: ShipType::ALL.map(ShipType::length),
        }
    }

    /// A full fleet placed at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Result<Self, FleetError> {
        let mut fleet = FleetModel::new();
        for ty in ShipType::ALL {
            let (cell, direction) = fleet.random_placement(rng, ty)?;
            fleet.add_boat(ty, cell, direction)?;
        }
        Ok(fleet)
    }

    /// A full fleet where every ship shares `direction` and sits at the
    /// first flattened index where it fits.
    pub fn dummy(direction: Direction) -> Result<Self, FleetError> {
        let mut fleet = FleetModel::new();
        let mut next = 0usize;
        for ty in ShipType::ALL {
            loop {
                let cell = Cell::from_index(next).ok_or(FleetError::UnableToPlace(ty))?;
                if fleet.can_place(ty, cell, direction) {
                    fleet.add_boat(ty, cell, direction)?;
                    break;
                }
                next += 1;
            }
        }
        Ok(fleet)
    }

    /// Returns a random legal `(origin, direction)` for `ty`.
    pub fn random_placement<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        ty: ShipType,
    ) -> Result<(Cell, Direction), FleetError> {
        let reach = BOARD_SIZE - ty.length();
        for _ in 0..RANDOM_PLACEMENT_ATTEMPTS {
            let direction = Direction::from_bits(rng.random_range(0..4));
            let (max_x, max_y) = match direction.axis {
                Axis::Horizontal => (reach, BOARD_SIZE - 1),
                Axis::Vertical => (BOARD_SIZE - 1, reach),
            };
            let x = rng.random_range(0..=max_x);
            let y = rng.random_range(0..=max_y);
            if let Some(cell) = Cell::new(x, y) {
                if self.can_place(ty, cell, direction) {
                    return Ok((cell, direction));
                }
            }
        }
        Err(FleetError::UnableToPlace(ty))
    }

    /// `true` if `ty` has been placed.
    pub fn has(&self, ty: ShipType) -> bool {
        self.placements[ty.index()].is_some()
    }

    /// `true` once every ship type has been placed.
    pub fn is_full(&self) -> bool {
        self.placements.iter().all(Option::is_some)
    }

    pub fn placement(&self, ty: ShipType) -> Option<&Placement> {
        self.placements[ty.index()].as_ref()
    }

    /// Cells occupied by `ty`; empty when it is not placed.
    pub fn occupied_cells(&self, ty: ShipType) -> CellSet {
        self.placement(ty).map(Placement::cells).unwrap_or_default()
    }

    /// Union of every placed ship's cells.
    pub fn occupied(&self) -> CellSet {
        self.placements
            .iter()
            .flatten()
            .fold(CellSet::new(), |acc, p| acc | p.cells)
    }

    pub fn hit_points(&self, ty: ShipType) -> u8 {
        self.hit_points[ty.index()]
    }

    /// Sum of hit points across the fleet.
    pub fn total_hit_points(&self) -> u32 {
        self.hit_points.iter().map(|&hp| hp as u32).sum()
    }

    /// Checks that `ty` would fit on the board at `cell` without touching any
    /// other placed ship. A ship already placed as `ty` is ignored, so the
    /// check also answers for re-placement.
    pub fn can_place(&self, ty: ShipType, cell: Cell, direction: Direction) -> bool {
        self.check_placement(ty, cell, direction).is_ok()
    }

    /// Like [`FleetModel::can_place`], but says why a placement is refused
    /// and returns the covered cells otherwise.
    pub fn check_placement(
        &self,
        ty: ShipType,
        cell: Cell,
        direction: Direction,
    ) -> Result<CellSet, FleetError> {
        let cells = covered_cells(cell, ty.length(), direction).ok_or(FleetError::OutOfBounds(ty))?;
        let clash = ShipType::ALL
            .iter()
            .filter(|other| **other != ty)
            .any(|other| self.occupied_cells(*other).intersects(&cells));
        if clash {
            return Err(FleetError::Overlaps(ty));
        }
        Ok(cells)
    }

    /// Place a new ship. Callers are expected to have checked
    /// [`FleetModel::can_place`] first.
    pub fn add_boat(
        &mut self,
        ty: ShipType,
        cell: Cell,
        direction: Direction,
    ) -> Result<(), FleetError> {
        if self.has(ty) {
            return Err(FleetError::AlreadyPlaced(ty));
        }
        let cells = self.check_placement(ty, cell, direction)?;
        self.placements[ty.index()] = Some(Placement {
            origin: cell,
            direction,
            cells,
        });
        debug!("placed {} at {} facing {:?}", ty.name(), cell, direction);
        Ok(())
    }

    /// Move an already placed ship, keeping its direction when `direction`
    /// is `None`.
    pub fn update_boat(
        &mut self,
        ty: ShipType,
        cell: Cell,
        direction: Option<Direction>,
    ) -> Result<(), FleetError> {
        let current = self.placement(ty).copied().ok_or(FleetError::NotPlaced(ty))?;
        let direction = direction.unwrap_or(current.direction);
        let cells = self.check_placement(ty, cell, direction)?;
        self.placements[ty.index()] = Some(Placement {
            origin: cell,
            direction,
            cells,
        });
        debug!("moved {} to {} facing {:?}", ty.name(), cell, direction);
        Ok(())
    }

    /// First ship, in fleet order, whose cells intersect the `length` cells
    /// starting at `cell` along `direction`.
    pub fn collision_check(&self, cell: Cell, length: u8, direction: Direction) -> Option<ShipType> {
        let covered = covered_cells_clipped(cell, length, direction);
        ShipType::ALL
            .iter()
            .copied()
            .find(|ty| self.occupied_cells(*ty).intersects(&covered))
    }

    /// Remove one hit point from `ty`.
    pub fn damage(&mut self, ty: ShipType) -> Result<(), FleetError> {
        let hp = &mut self.hit_points[ty.index()];
        if *hp == 0 {
            return Err(FleetError::NoHitPointsLeft(ty));
        }
        *hp -= 1;
        Ok(())
    }

    pub fn is_ship_sunk(&self, ty: ShipType) -> bool {
        self.hit_points[ty.index()] == 0
    }

    /// `true` when the whole fleet is out of hit points.
    pub fn is_sunk(&self) -> bool {
        self.total_hit_points() == 0
    }

    /// Resolve an incoming shot at `cell` against this fleet, applying damage.
    pub fn resolve_shot(&mut self, cell: Cell) -> Result<ShotOutcome, FleetError> {
        let Some(ty) = self.collision_check(cell, 1, Direction::horizontal()) else {
            return Ok(ShotOutcome::Miss);
        };
        self.damage(ty)?;
        let outcome = if !self.is_ship_sunk(ty) {
            ShotOutcome::Hit
        } else if self.is_sunk() {
            ShotOutcome::GameOver
        } else {
            ShotOutcome::HitAndSunk
        };
        debug!("shot at {} on {}: {}", cell, ty.name(), outcome);
        Ok(outcome)
    }
}

impl fmt::Display for FleetModel {
    /// Draws the grid with one letter per ship and `~` for water.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut grid = ['~'; BOARD_CELLS];
        for ty in ShipType::ALL {
            for cell in self.occupied_cells(ty) {
                grid[cell.index()] = ty.symbol();
            }
        }
        for row in grid.chunks(BOARD_SIZE as usize) {
            let line: Vec<String> = row.iter().map(char::to_string).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

impl fmt::Debug for FleetModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FleetModel")
            .field("placements", &self.placements)
            .field("hit_points", &self.hit_points)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    fn at(x: u8, y: u8) -> Cell {
        Cell::new(x, y).unwrap()
    }

    #[test]
    fn rejects_out_of_bounds_and_overlap() {
        let mut fleet = FleetModel::new();
        assert!(!fleet.can_place(ShipType::Carrier, at(6, 0), Direction::EAST));
        assert_eq!(
            fleet.add_boat(ShipType::Carrier, at(6, 0), Direction::EAST),
            Err(FleetError::OutOfBounds(ShipType::Carrier))
        );
        fleet.add_boat(ShipType::Carrier, at(0, 0), Direction::EAST).unwrap();
        assert!(!fleet.can_place(ShipType::Cruiser, at(2, 0), Direction::SOUTH));
        assert_eq!(
            fleet.add_boat(ShipType::Cruiser, at(2, 0), Direction::SOUTH),
            Err(FleetError::Overlaps(ShipType::Cruiser))
        );
        assert_eq!(
            fleet.add_boat(ShipType::Carrier, at(0, 5), Direction::EAST),
            Err(FleetError::AlreadyPlaced(ShipType::Carrier))
        );
    }

    #[test]
    fn update_keeps_direction_and_ignores_own_cells() {
        let mut fleet = FleetModel::new();
        fleet.add_boat(ShipType::Cruiser, at(0, 0), Direction::SOUTH).unwrap();
        // overlapping its own previous position is allowed
        fleet.update_boat(ShipType::Cruiser, at(0, 1), None).unwrap();
        let placement = fleet.placement(ShipType::Cruiser).unwrap();
        assert_eq!(placement.direction(), Direction::SOUTH);
        assert_eq!(placement.origin(), at(0, 1));
        assert!(fleet.occupied_cells(ShipType::Cruiser).contains(at(0, 3)));
        assert!(!fleet.occupied_cells(ShipType::Cruiser).contains(at(0, 0)));
        assert_eq!(
            fleet.update_boat(ShipType::Submarine, at(5, 5), None),
            Err(FleetError::NotPlaced(ShipType::Submarine))
        );
    }

    #[test]
    fn damage_never_goes_negative() {
        let mut fleet = FleetModel::new();
        fleet.damage(ShipType::PatrolBoat).unwrap();
        fleet.damage(ShipType::PatrolBoat).unwrap();
        assert!(fleet.is_ship_sunk(ShipType::PatrolBoat));
        assert_eq!(
            fleet.damage(ShipType::PatrolBoat),
            Err(FleetError::NoHitPointsLeft(ShipType::PatrolBoat))
        );
        assert!(!fleet.is_sunk());
    }

    #[test]
    fn random_and_dummy_fleets_are_full() {
        let mut rng = SmallRng::seed_from_u64(7);
        let fleet = FleetModel::random(&mut rng).unwrap();
        assert!(fleet.is_full());
        assert_eq!(fleet.occupied().len(), 17);

        let dummy = FleetModel::dummy(Direction::EAST).unwrap();
        assert!(dummy.is_full());
        assert_eq!(dummy.placement(ShipType::Carrier).unwrap().origin(), at(0, 0));
        assert_eq!(dummy.placement(ShipType::Battleship).unwrap().origin(), at(5, 0));
    }

    #[test]
    fn display_draws_ships() {
        let mut fleet = FleetModel::new();
        fleet.add_boat(ShipType::PatrolBoat, at(0, 0), Direction::EAST).unwrap();
        let drawn = fleet.to_string();
        assert!(drawn.starts_with("P P ~"));
        assert_eq!(drawn.lines().count(), 10);
    }
}
