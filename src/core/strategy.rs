//! Hunt-and-destroy targeting for the automaton player.
//!
//! While nothing is confirmed hit the automaton sweeps a checkerboard: every
//! ship is at least two cells long, so every ship covers at least one cell of
//! either colour. After a hit it probes outward from that cell one direction
//! at a time until the ship goes down.

use std::collections::VecDeque;

use log::debug;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;

use super::cell::{Cell, CellSet};
use super::common::ShotOutcome;
use super::config::MAX_SHIP_LENGTH;
use super::ship::Direction;

/// Outward run of candidate cells in one direction from the probe centre.
#[derive(Debug, Clone)]
struct Lane {
    direction: Direction,
    candidates: VecDeque<Cell>,
    hits: u8,
}

/// Probe state anchored on the first hit of a ship not yet sunk.
#[derive(Debug, Clone)]
struct Probe {
    center: Cell,
    lanes: Vec<Lane>,
    active: usize,
}

impl Probe {
    fn new(center: Cell) -> Self {
        let lanes = Direction::COMPASS
            .iter()
            .map(|&direction| {
                let (dx, dy) = direction.heading();
                let candidates = (1..MAX_SHIP_LENGTH as i8)
                    .map_while(|n| center.offset(dx * n, dy * n))
                    .collect();
                Lane {
                    direction,
                    candidates,
                    hits: 0,
                }
            })
            .collect();
        Probe {
            center,
            lanes,
            active: 0,
        }
    }

    /// Drop lanes whose next candidate is off the board or already tried.
    fn prune(&mut self, tried: &CellSet) {
        let active = self.lanes.get(self.active).map(|l| l.direction);
        self.lanes.retain(|lane| {
            lane.candidates
                .front()
                .is_some_and(|cell| !tried.contains(*cell))
        });
        self.active = active
            .and_then(|d| self.lanes.iter().position(|l| l.direction == d))
            .unwrap_or(usize::MAX);
    }

    fn pick_random(&mut self, rng: &mut SmallRng) {
        self.active = if self.lanes.is_empty() {
            usize::MAX
        } else {
            rng.random_range(0..self.lanes.len())
        };
    }
}

/// Target selection state for one game.
#[derive(Debug, Clone)]
pub struct Targeting {
    rng: SmallRng,
    tried: CellSet,
    sweep: Vec<Cell>,
    probe: Option<Probe>,
}

impl Targeting {
    /// Build the sweep over the "white" squares of the checkerboard, those with
    /// odd `x + y`. When `shuffle` is false the sweep runs in flattened index
    /// order.
    pub fn new(mut rng: SmallRng, shuffle: bool) -> Self {
        let mut sweep: Vec<Cell> = Cell::all()
            .filter(|c| (c.x() + c.y()) % 2 == 1)
            .collect();
        if shuffle {
            sweep.shuffle(&mut rng);
        } else {
            // popped from the back
            sweep.reverse();
        }
        Targeting {
            rng,
            tried: CellSet::new(),
            sweep,
            probe: None,
        }
    }

    /// `true` while probing around a confirmed hit.
    pub fn is_probing(&self) -> bool {
        self.probe.is_some()
    }

    /// Choose the next cell to fire at, or `None` once the board is exhausted.
    pub fn next_target(&mut self) -> Option<Cell> {
        if let Some(cell) = self.next_probe_target() {
            return Some(cell);
        }
        while let Some(cell) = self.sweep.pop() {
            if !self.tried.contains(cell) {
                return Some(cell);
            }
        }
        Cell::all().find(|c| !self.tried.contains(*c))
    }

    fn next_probe_target(&mut self) -> Option<Cell> {
        let probe = self.probe.as_mut()?;
        probe.prune(&self.tried);
        if probe.lanes.is_empty() {
            debug!("probe around {} exhausted, back to sweeping", probe.center);
            self.probe = None;
            return None;
        }
        if probe.active >= probe.lanes.len() {
            probe.pick_random(&mut self.rng);
        }
        probe.lanes[probe.active].candidates.front().copied()
    }

    /// Feed back the outcome of a shot this player fired.
    pub fn record(&mut self, cell: Cell, outcome: ShotOutcome) {
        self.tried.insert(cell);

        if let Some(probe) = self.probe.as_mut() {
            let Some(lane) = probe.lanes.get_mut(probe.active) else {
                return;
            };
            if lane.candidates.front() != Some(&cell) {
                // a shot outside the active lane says nothing about it
                return;
            }
            lane.candidates.pop_front();
            match outcome {
                ShotOutcome::HitAndSunk | ShotOutcome::GameOver => {
                    self.probe = None;
                }
                ShotOutcome::Hit => {
                    lane.hits += 1;
                }
                ShotOutcome::Miss => {
                    // the far end of this lane is water; if it produced hits
                    // the rest of the ship lies the other way
                    let reverse = lane.direction.opposite();
                    let productive = lane.hits > 0;
                    probe.lanes.remove(probe.active);
                    probe.active = if productive {
                        probe
                            .lanes
                            .iter()
                            .position(|l| l.direction == reverse)
                            .unwrap_or(usize::MAX)
                    } else {
                        usize::MAX
                    };
                }
            }
            return;
        }

        if outcome == ShotOutcome::Hit {
            let mut probe = Probe::new(cell);
            probe.prune(&self.tried);
            probe.pick_random(&mut self.rng);
            debug!(
                "hit at {}, probing {:?}",
                cell,
                probe.lanes.get(probe.active).map(|l| l.direction)
            );
            self.probe = Some(probe);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn at(x: u8, y: u8) -> Cell {
        Cell::new(x, y).unwrap()
    }

    #[test]
    fn unshuffled_sweep_follows_checkerboard() {
        let mut t = Targeting::new(SmallRng::seed_from_u64(1), false);
        assert_eq!(t.next_target(), Some(at(1, 0)));
        t.record(at(1, 0), ShotOutcome::Miss);
        assert_eq!(t.next_target(), Some(at(3, 0)));
    }

    #[test]
    fn hit_switches_to_probe_next_to_it() {
        let mut t = Targeting::new(SmallRng::seed_from_u64(2), true);
        let center = at(5, 5);
        t.record(center, ShotOutcome::Hit);
        assert!(t.is_probing());
        let next = t.next_target().unwrap();
        let dist = (next.x() as i16 - 5).abs() + (next.y() as i16 - 5).abs();
        assert_eq!(dist, 1);
    }

    #[test]
    fn miss_after_hits_reverses_direction() {
        let mut t = Targeting::new(SmallRng::seed_from_u64(3), true);
        t.record(at(5, 5), ShotOutcome::Hit);
        let first = t.next_target().unwrap();
        let (dx, dy) = (first.x() as i8 - 5, first.y() as i8 - 5);
        t.record(first, ShotOutcome::Hit);
        let second = t.next_target().unwrap();
        assert_eq!(second, at(5, 5).offset(2 * dx, 2 * dy).unwrap());
        t.record(second, ShotOutcome::Miss);
        let third = t.next_target().unwrap();
        assert_eq!(third, at(5, 5).offset(-dx, -dy).unwrap());
    }

    #[test]
    fn sinking_ends_the_probe() {
        let mut t = Targeting::new(SmallRng::seed_from_u64(4), true);
        t.record(at(0, 0), ShotOutcome::Hit);
        let next = t.next_target().unwrap();
        t.record(next, ShotOutcome::HitAndSunk);
        assert!(!t.is_probing());
    }

    #[test]
    fn never_repeats_a_cell() {
        let mut t = Targeting::new(SmallRng::seed_from_u64(5), true);
        let mut seen = CellSet::new();
        while let Some(cell) = t.next_target() {
            assert!(seen.insert(cell), "{} targeted twice", cell);
            let outcome = if (cell.x() + cell.y()) % 3 == 0 {
                ShotOutcome::Hit
            } else {
                ShotOutcome::Miss
            };
            t.record(cell, outcome);
        }
        assert_eq!(seen.len(), 100);
    }
}
