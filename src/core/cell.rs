//! Board coordinates and a fixed-size set of cells.
//!
//! A `CellSet` packs the 10×10 board into a single `u128`, using the
//! flattened `y * 10 + x` index of each cell as its bit position.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use super::config::{BOARD_CELLS, BOARD_SIZE};

/// A coordinate on the board, both components in `[0, BOARD_SIZE)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    x: u8,
    y: u8,
}

impl Cell {
    /// Returns `None` when the coordinate lies outside the board.
    pub const fn new(x: u8, y: u8) -> Option<Self> {
        if x < BOARD_SIZE && y < BOARD_SIZE {
            Some(Cell { x, y })
        } else {
            None
        }
    }

    /// Checked conversion from signed coordinates, e.g. values read off the wire.
    pub fn from_signed(x: i64, y: i64) -> Option<Self> {
        let x = u8::try_from(x).ok()?;
        let y = u8::try_from(y).ok()?;
        Self::new(x, y)
    }

    /// Cell at a flattened `y * 10 + x` index.
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= BOARD_CELLS {
            return None;
        }
        let size = BOARD_SIZE as usize;
        Self::new((index % size) as u8, (index / size) as u8)
    }

    pub fn x(&self) -> u8 {
        self.x
    }

    pub fn y(&self) -> u8 {
        self.y
    }

    /// Flattened `y * 10 + x` index.
    pub fn index(&self) -> usize {
        self.y as usize * BOARD_SIZE as usize + self.x as usize
    }

    /// Move by `(dx, dy)` steps, `None` when the result leaves the board.
    pub fn offset(&self, dx: i8, dy: i8) -> Option<Self> {
        let x = self.x as i16 + dx as i16;
        let y = self.y as i16 + dy as i16;
        if x < 0 || y < 0 {
            return None;
        }
        Self::new(x as u8, y as u8)
    }

    /// Every cell of the board in flattened index order.
    pub fn all() -> impl Iterator<Item = Cell> {
        (0..BOARD_CELLS).filter_map(Cell::from_index)
    }
}

impl fmt::Display for Cell {
    /// Renders as a column letter and a 1-based row, e.g. `(0, 4)` is `A5`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'A' + self.x) as char, self.y + 1)
    }
}

/// Set of board cells stored as a bitset.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CellSet {
    bits: u128,
}

impl CellSet {
    pub const fn new() -> Self {
        CellSet { bits: 0 }
    }

    #[inline]
    fn bit(cell: Cell) -> u128 {
        1u128 << cell.index()
    }

    /// Adds `cell`, returning `true` if it was not already present.
    pub fn insert(&mut self, cell: Cell) -> bool {
        let fresh = !self.contains(cell);
        self.bits |= Self::bit(cell);
        fresh
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.bits & Self::bit(cell) != 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Returns `true` if the two sets share at least one cell.
    pub fn intersects(&self, other: &CellSet) -> bool {
        self.bits & other.bits != 0
    }

    /// Cells in flattened index order.
    pub fn iter(&self) -> Cells {
        Cells {
            bits: self.bits,
        }
    }
}

impl FromIterator<Cell> for CellSet {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        let mut set = CellSet::new();
        for cell in iter {
            set.insert(cell);
        }
        set
    }
}

impl BitAnd for CellSet {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        CellSet {
            bits: self.bits & rhs.bits,
        }
    }
}

impl BitOr for CellSet {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        CellSet {
            bits: self.bits | rhs.bits,
        }
    }
}

impl BitOrAssign for CellSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits |= rhs.bits;
    }
}

impl fmt::Debug for CellSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Iterator over the cells of a `CellSet`.
#[derive(Clone, Copy)]
pub struct Cells {
    bits: u128,
}

impl Iterator for Cells {
    type Item = Cell;

    fn next(&mut self) -> Option<Cell> {
        if self.bits == 0 {
            return None;
        }
        let index = self.bits.trailing_zeros() as usize;
        self.bits &= self.bits - 1;
        Cell::from_index(index)
    }
}

impl IntoIterator for CellSet {
    type Item = Cell;
    type IntoIter = Cells;

    fn into_iter(self) -> Cells {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_roundtrip_and_display() {
        let cell = Cell::new(3, 4).unwrap();
        assert_eq!(cell.index(), 43);
        assert_eq!(Cell::from_index(43), Some(cell));
        assert_eq!(cell.to_string(), "D5");
        assert!(Cell::new(10, 0).is_none());
        assert!(Cell::from_signed(-1, 2).is_none());
    }

    #[test]
    fn offset_stays_on_board() {
        let corner = Cell::new(9, 9).unwrap();
        assert!(corner.offset(1, 0).is_none());
        assert_eq!(corner.offset(-2, 0), Cell::new(7, 9));
        assert!(Cell::new(0, 0).unwrap().offset(0, -1).is_none());
    }

    #[test]
    fn set_operations() {
        let a: CellSet = [Cell::new(0, 0), Cell::new(1, 0)].into_iter().flatten().collect();
        let b: CellSet = [Cell::new(1, 0), Cell::new(9, 9)].into_iter().flatten().collect();
        assert!(a.intersects(&b));
        assert_eq!((a & b).len(), 1);
        assert_eq!((a | b).len(), 3);
        let cells: Vec<Cell> = (a | b).iter().collect();
        assert_eq!(cells.last(), Cell::new(9, 9).as_ref());
    }
}
