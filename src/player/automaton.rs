use log::{debug, info};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::core::{Cell, FleetModel, ShotOutcome, Targeting};

use super::{Player, PlayerLink};

/// Computer opponent with a hidden random fleet and hunt-and-destroy
/// targeting.
pub struct AutomatonPlayer {
    link: PlayerLink,
    rng: SmallRng,
    fleet: FleetModel,
    targeting: Targeting,
    shuffle: bool,
}

impl AutomatonPlayer {
    /// New automaton whose fleet and targeting derive from `seed`.
    pub fn new(link: PlayerLink, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let targeting = Targeting::new(SmallRng::from_rng(&mut rng), true);
        Self {
            link,
            rng,
            fleet: FleetModel::new(),
            targeting,
            shuffle: true,
        }
    }

    /// Use `fleet` instead of generating one when the game starts.
    pub fn with_fleet(mut self, fleet: FleetModel) -> Self {
        self.fleet = fleet;
        self
    }

    /// Sweep the checkerboard in index order instead of a shuffled one.
    pub fn unshuffled(mut self) -> Self {
        self.shuffle = false;
        self
    }

    pub fn fleet(&self) -> &FleetModel {
        &self.fleet
    }
}

impl Player for AutomatonPlayer {
    fn start_game(&mut self) {
        if !self.fleet.is_full() {
            match FleetModel::random(&mut self.rng) {
                Ok(fleet) => self.fleet = fleet,
                Err(e) => {
                    self.link.fail(format!("automaton could not place its fleet: {}", e));
                    return;
                }
            }
        }
        debug!("automaton {} fleet:\n{}", self.link.seat(), self.fleet);
        self.targeting = Targeting::new(SmallRng::from_rng(&mut self.rng), self.shuffle);
    }

    fn request_shot(&mut self) {
        loop {
            let Some(cell) = self.targeting.next_target() else {
                self.link.fail("automaton has no cell left to fire at");
                return;
            };
            if self.fire(cell) {
                return;
            }
            // the link rejected it, so treat it as tried and pick again
            self.targeting.record(cell, ShotOutcome::Miss);
        }
    }

    fn request_hit(&mut self, at: Cell) {
        match self.fleet.resolve_shot(at) {
            Ok(outcome) => self.hit(at, outcome),
            Err(e) => self.link.fail(format!("fleet bookkeeping broke: {}", e)),
        }
    }

    fn show_hit(&mut self, at: Cell, outcome: ShotOutcome) {
        if outcome.is_sinking() {
            info!("automaton {} sank a ship at {}", self.link.seat(), at);
        }
        self.targeting.record(at, outcome);
    }

    fn link(&self) -> &PlayerLink {
        &self.link
    }

    fn link_mut(&mut self) -> &mut PlayerLink {
        &mut self.link
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{event_channel, PlayerEvent};

    #[test]
    fn fires_once_per_request() {
        let (tx, mut rx) = event_channel();
        let mut player = AutomatonPlayer::new(PlayerLink::new(0, tx), 9).unshuffled();
        player.start_game();
        player.request_shot();
        let first = match rx.try_recv().unwrap() {
            PlayerEvent::Fired { cell, .. } => cell,
            other => panic!("unexpected event {:?}", other),
        };
        assert!(rx.try_recv().is_err());
        player.show_hit(first, ShotOutcome::Miss);
        player.request_shot();
        match rx.try_recv().unwrap() {
            PlayerEvent::Fired { cell, .. } => assert_ne!(cell, first),
            other => panic!("unexpected event {:?}", other),
        }
    }
}
