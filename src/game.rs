//! Turn orchestration.
//!
//! [`PhaseMachine`] owns both players and walks them through the phase
//! cycle, one phase per call to [`PhaseMachine::advance`]. Players answer
//! through their [`PlayerLink`](crate::player::PlayerLink); those events are
//! drained at the start of every advance, and the `Fire` and `Hit` phases
//! wait until the expected one arrives.

use std::time::Duration;

use anyhow::{anyhow, bail};
use log::{debug, error, info};
use tokio::time::{interval, MissedTickBehavior};

use crate::config::{GameConfig, DEFAULT_MAX_PREPARE_ATTEMPTS, DEFAULT_PHASE_DELAY};
use crate::core::{Cell, ShotOutcome};
use crate::player::{
    event_channel, opponent, EventReceiver, Player, PlayerEvent, PlayerLink, PlayerRegistry,
    PLAYER_1, PLAYER_2,
};

/// Phases of a game, in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamePhase {
    /// Both players get ready; retried until both are.
    Prepare,
    StartTurn,
    /// The current player is asked for a target.
    RequestShot,
    /// Waiting for the current player to fire.
    Fire,
    /// The other player is asked to resolve the shot.
    RequestHit,
    /// Waiting for the other player's outcome.
    Hit,
    ShowHit,
    AwaitOpponentShot,
    EndTurn,
    /// No further phase runs.
    Over,
}

/// State of the shot in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnContext {
    /// Seat of the shooting player.
    pub current: usize,
    pub target: Option<Cell>,
    pub outcome: Option<ShotOutcome>,
}

/// Result of one [`PhaseMachine::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A phase ran; the machine is now in the given phase.
    Advanced(GamePhase),
    /// Still waiting on a player in the given phase.
    Waiting(GamePhase),
    /// The game is over.
    Finished { winner: usize },
}

pub struct PhaseMachine {
    players: [Box<dyn Player>; 2],
    events: EventReceiver,
    phase: GamePhase,
    context: TurnContext,
    first_player: usize,
    fired_this_round: u8,
    game_started: bool,
    turn: u32,
    prepare_attempts: u32,
    max_prepare_attempts: Option<u32>,
    delay: Duration,
    accepted_shots: usize,
    winner: Option<usize>,
}

impl PhaseMachine {
    /// Machine over two players whose links send into `events`. Seat 0 is
    /// `players[0]`.
    pub fn new(players: [Box<dyn Player>; 2], events: EventReceiver) -> Self {
        Self {
            players,
            events,
            phase: GamePhase::Prepare,
            context: TurnContext {
                current: PLAYER_1,
                target: None,
                outcome: None,
            },
            first_player: PLAYER_1,
            fired_this_round: 0,
            game_started: false,
            turn: 0,
            prepare_attempts: 0,
            max_prepare_attempts: Some(DEFAULT_MAX_PREPARE_ATTEMPTS),
            delay: DEFAULT_PHASE_DELAY,
            accepted_shots: 0,
            winner: None,
        }
    }

    /// Build both players from `config` through the standard registry.
    pub fn from_config(config: &GameConfig) -> anyhow::Result<Self> {
        Self::from_registry(&PlayerRegistry::standard(), config)
    }

    pub fn from_registry(registry: &PlayerRegistry, config: &GameConfig) -> anyhow::Result<Self> {
        if config.first_player > PLAYER_2 {
            bail!("first player must be seat 0 or 1, got {}", config.first_player);
        }
        let (tx, rx) = event_channel();
        let p1 = registry.build(&config.player_1, PlayerLink::new(PLAYER_1, tx.clone()), config)?;
        let p2 = registry.build(&config.player_2, PlayerLink::new(PLAYER_2, tx), config)?;
        Ok(Self::new([p1, p2], rx)
            .with_first_player(config.first_player)
            .with_delay(config.phase_delay)
            .with_max_prepare_attempts(config.max_prepare_attempts))
    }

    /// Seat that shoots first in every round.
    pub fn with_first_player(mut self, seat: usize) -> Self {
        self.first_player = seat % 2;
        self.context.current = self.first_player;
        self
    }

    /// Pause between phases when driven by [`run`](Self::run).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Give up after this many PREPARE attempts; `None` never gives up.
    pub fn with_max_prepare_attempts(mut self, max: Option<u32>) -> Self {
        self.max_prepare_attempts = max;
        self
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn current_player_index(&self) -> usize {
        self.context.current
    }

    pub fn context(&self) -> &TurnContext {
        &self.context
    }

    /// Rounds started so far.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    /// Shots accepted from either player since the game began.
    pub fn accepted_shots(&self) -> usize {
        self.accepted_shots
    }

    pub fn prepare_attempts(&self) -> u32 {
        self.prepare_attempts
    }

    pub fn player(&self, seat: usize) -> &dyn Player {
        &*self.players[seat % 2]
    }

    pub fn player_mut(&mut self, seat: usize) -> &mut dyn Player {
        &mut *self.players[seat % 2]
    }

    /// Run one tick: let the players poll, take their events, then execute
    /// the current phase.
    ///
    /// Any error ends the game without a winner; later calls fail too.
    pub fn advance(&mut self) -> anyhow::Result<Step> {
        if self.phase == GamePhase::Over {
            return match self.winner {
                Some(winner) => Ok(Step::Finished { winner }),
                None => Err(anyhow!("game already aborted")),
            };
        }
        match self.step() {
            Ok(step) => Ok(step),
            Err(e) => {
                error!("game aborted in {:?}: {:#}", self.phase, e);
                self.phase = GamePhase::Over;
                self.winner = None;
                Err(e)
            }
        }
    }

    /// Advance once per `delay` until the game ends; returns the winner's
    /// seat.
    pub async fn run(&mut self) -> anyhow::Result<usize> {
        let mut ticker = if self.delay.is_zero() {
            None
        } else {
            let mut ticker = interval(self.delay);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            Some(ticker)
        };
        loop {
            match ticker.as_mut() {
                Some(ticker) => {
                    ticker.tick().await;
                }
                None => tokio::task::yield_now().await,
            }
            if let Step::Finished { winner } = self.advance()? {
                return Ok(winner);
            }
        }
    }

    fn step(&mut self) -> anyhow::Result<Step> {
        for player in self.players.iter_mut() {
            player.tick();
        }
        self.drain_events()?;

        let current = self.context.current;
        match self.phase {
            GamePhase::Prepare => {
                self.prepare_attempts += 1;
                // both are asked every time so each can make progress
                let ready_1 = self.players[PLAYER_1].pre_game_prepare();
                let ready_2 = self.players[PLAYER_2].pre_game_prepare();
                if ready_1 && ready_2 {
                    info!("players ready after {} attempt(s)", self.prepare_attempts);
                    self.phase = GamePhase::StartTurn;
                } else {
                    if let Some(max) = self.max_prepare_attempts {
                        if self.prepare_attempts >= max {
                            bail!("players still not ready after {} attempts", max);
                        }
                    }
                    return Ok(Step::Waiting(GamePhase::Prepare));
                }
            }
            GamePhase::StartTurn => {
                if !self.game_started {
                    self.game_started = true;
                    info!("game started, player {} opens", self.first_player);
                    for player in self.players.iter_mut() {
                        player.start_game();
                    }
                }
                self.turn += 1;
                debug!("turn {}", self.turn);
                for player in self.players.iter_mut() {
                    player.start_turn();
                }
                self.fired_this_round = 0;
                self.context.current = self.first_player;
                self.phase = GamePhase::RequestShot;
            }
            GamePhase::RequestShot => {
                self.context.target = None;
                self.context.outcome = None;
                self.phase = GamePhase::Fire;
                self.players[current].request_shot();
            }
            GamePhase::Fire | GamePhase::Hit => return Ok(Step::Waiting(self.phase)),
            GamePhase::RequestHit => {
                let target = self
                    .context
                    .target
                    .ok_or_else(|| anyhow!("no target to resolve"))?;
                self.phase = GamePhase::Hit;
                self.players[opponent(current)].request_hit(target);
            }
            GamePhase::ShowHit => {
                let (target, outcome) = self.shot_result()?;
                let shooter = &mut self.players[current];
                shooter.link_mut().record_move(target, outcome);
                shooter.show_hit(target, outcome);
                self.phase = GamePhase::AwaitOpponentShot;
            }
            GamePhase::AwaitOpponentShot => {
                let (_, outcome) = self.shot_result()?;
                if outcome == ShotOutcome::GameOver {
                    info!("player {} sank the last ship and wins", current);
                    self.winner = Some(current);
                    self.phase = GamePhase::Over;
                    return Ok(Step::Finished { winner: current });
                }
                self.players[current].await_opponent_shot();
                self.fired_this_round += 1;
                if self.fired_this_round >= 2 {
                    self.phase = GamePhase::EndTurn;
                } else {
                    self.context.current = opponent(current);
                    self.phase = GamePhase::RequestShot;
                }
            }
            GamePhase::EndTurn => {
                for player in self.players.iter_mut() {
                    player.end_turn();
                }
                self.context.current = self.first_player;
                self.phase = GamePhase::StartTurn;
            }
            GamePhase::Over => bail!("game is over"),
        }
        debug!("-> {:?}", self.phase);
        Ok(Step::Advanced(self.phase))
    }

    fn shot_result(&self) -> anyhow::Result<(Cell, ShotOutcome)> {
        match (self.context.target, self.context.outcome) {
            (Some(target), Some(outcome)) => Ok((target, outcome)),
            _ => Err(anyhow!("no resolved shot in {:?}", self.phase)),
        }
    }

    fn drain_events(&mut self) -> anyhow::Result<()> {
        while let Ok(event) = self.events.try_recv() {
            let current = self.context.current;
            match event {
                PlayerEvent::Fired { seat, cell } => {
                    if self.phase != GamePhase::Fire || seat != current {
                        bail!(
                            "player {} fired at {} out of turn ({:?}, player {} to shoot)",
                            seat,
                            cell,
                            self.phase,
                            current
                        );
                    }
                    debug!("player {} fires at {}", seat, cell);
                    self.context.target = Some(cell);
                    self.accepted_shots += 1;
                    self.phase = GamePhase::RequestHit;
                }
                PlayerEvent::Hit {
                    seat,
                    cell,
                    outcome,
                } => {
                    if self.phase != GamePhase::Hit || seat != opponent(current) {
                        bail!(
                            "player {} reported a hit at {} out of turn ({:?})",
                            seat,
                            cell,
                            self.phase
                        );
                    }
                    if self.context.target != Some(cell) {
                        bail!(
                            "player {} resolved {} but the shot was at {:?}",
                            seat,
                            cell,
                            self.context.target
                        );
                    }
                    debug!("shot at {}: {}", cell, outcome);
                    self.context.outcome = Some(outcome);
                    self.phase = GamePhase::ShowHit;
                }
                PlayerEvent::Failed { seat, reason } => {
                    bail!("player {} failed: {}", seat, reason);
                }
            }
        }
        Ok(())
    }
}
