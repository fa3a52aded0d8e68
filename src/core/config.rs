/// Width and height of a board.
pub const BOARD_SIZE: u8 = 10;
/// Number of cells on a board.
pub const BOARD_CELLS: usize = BOARD_SIZE as usize * BOARD_SIZE as usize;
pub const NUM_SHIP_TYPES: usize = 5;

/// Total number of ship segments in a full fleet.
pub const TOTAL_SHIP_CELLS: u32 = 5 + 4 + 3 + 3 + 2;

/// Longest ship in the fleet; bounds how far the automaton probes from a hit.
pub const MAX_SHIP_LENGTH: u8 = 5;

