use std::collections::BTreeMap;

use anyhow::{anyhow, bail};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::config::GameConfig;
use crate::core::FleetModel;

use super::{AutomatonPlayer, InteractivePlayer, Player, PlayerLink, RemotePlayer};

/// Builds a player for the seat held by `link`.
pub type PlayerFactory = fn(PlayerLink, &GameConfig) -> anyhow::Result<Box<dyn Player>>;

/// Player kinds by configuration key.
#[derive(Clone)]
pub struct PlayerRegistry {
    factories: BTreeMap<String, PlayerFactory>,
}

impl Default for PlayerRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl PlayerRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Registry with `automaton`, `interactive` and `remote`.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register("automaton", build_automaton);
        registry.register("interactive", build_interactive);
        registry.register("remote", build_remote);
        registry
    }

    /// Add or replace the factory for `key`.
    pub fn register(&mut self, key: impl Into<String>, factory: PlayerFactory) {
        self.factories.insert(key.into(), factory);
    }

    pub fn build(
        &self,
        key: &str,
        link: PlayerLink,
        config: &GameConfig,
    ) -> anyhow::Result<Box<dyn Player>> {
        let factory = self.factories.get(key).ok_or_else(|| {
            anyhow!(
                "unknown player kind '{}' (known: {})",
                key,
                self.keys().collect::<Vec<_>>().join(", ")
            )
        })?;
        factory(link, config)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

fn seeded_rng(config: &GameConfig, seat: usize) -> SmallRng {
    match config.seed_for(seat) {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_rng(&mut rand::rng()),
    }
}

fn build_automaton(link: PlayerLink, config: &GameConfig) -> anyhow::Result<Box<dyn Player>> {
    let seed = config
        .seed_for(link.seat())
        .unwrap_or_else(rand::random);
    Ok(Box::new(AutomatonPlayer::new(link, seed)))
}

fn build_interactive(link: PlayerLink, config: &GameConfig) -> anyhow::Result<Box<dyn Player>> {
    let fleet = match &config.fleet {
        Some(fleet) if fleet.is_full() => fleet.clone(),
        Some(_) => bail!("the fleet set up for player {} is missing ships", link.seat()),
        None => {
            let mut rng = seeded_rng(config, link.seat());
            FleetModel::random(&mut rng).map_err(|e| anyhow!("placing fleet: {}", e))?
        }
    };
    Ok(Box::new(InteractivePlayer::new(link, fleet)))
}

fn build_remote(link: PlayerLink, config: &GameConfig) -> anyhow::Result<Box<dyn Player>> {
    Ok(Box::new(RemotePlayer::new(link, config.endpoint())))
}
