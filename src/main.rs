use std::io::{BufRead, Write};
use std::time::Duration;

use anyhow::bail;
use clap::{Args, Parser};
use naval_duel::config::{
    DEFAULT_ADDRESS, DEFAULT_MAX_PREPARE_ATTEMPTS, DEFAULT_PHASE_DELAY, DEFAULT_PORT,
};
use naval_duel::player::{parse_cell, PLAYER_1, PLAYER_2};
use naval_duel::setup::{SetupProgress, SETUP_HELP};
use naval_duel::{
    init_logging, FleetModel, FleetSetup, GameConfig, PhaseMachine, Role, SetupCommand,
    TargetInput,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Debug)]
struct GameArgs {
    /// Kind of player sitting at this machine (interactive, automaton).
    #[arg(long, default_value = "interactive")]
    player: String,
    #[arg(long, default_value = DEFAULT_ADDRESS)]
    address: String,
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,
    /// Pause between two phases, in milliseconds.
    #[arg(long, default_value_t = DEFAULT_PHASE_DELAY.as_millis() as u64)]
    delay_ms: u64,
    /// Phases spent waiting for both players before giving up (0 waits forever).
    #[arg(long, default_value_t = DEFAULT_MAX_PREPARE_ATTEMPTS)]
    max_prepare_attempts: u32,
    #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
    seed: Option<u64>,
    /// Place your ships by hand before the game instead of at random.
    #[arg(long)]
    place: bool,
}

#[derive(Parser)]
enum Commands {
    /// Play against the automaton on the local machine.
    Local {
        #[command(flatten)]
        game: GameArgs,
    },
    /// Host a networked game and wait for a client to connect.
    Server {
        #[command(flatten)]
        game: GameArgs,
    },
    /// Connect to a networked game hosted by a server.
    Client {
        #[command(flatten)]
        game: GameArgs,
    },
}

impl Commands {
    fn game(&self) -> &GameArgs {
        match self {
            Commands::Local { game } | Commands::Server { game } | Commands::Client { game } => {
                game
            }
        }
    }

    fn config(&self) -> GameConfig {
        let game = self.game();
        let mut config = match self {
            Commands::Local { .. } => GameConfig::solo(),
            Commands::Server { .. } => GameConfig::multiplayer(Role::Server),
            Commands::Client { .. } => GameConfig::multiplayer(Role::Client),
        };
        config.player_1 = game.player.clone();
        config.address = game.address.clone();
        config.port = game.port;
        config.phase_delay = Duration::from_millis(game.delay_ms);
        config.max_prepare_attempts = match game.max_prepare_attempts {
            0 => None,
            n => Some(n),
        };
        config.seed = game.seed;
        config
    }
}

/// Read setup commands from stdin until the fleet is complete.
fn place_fleet(seed: Option<u64>) -> anyhow::Result<FleetModel> {
    let mut rng = match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_rng(&mut rand::rng()),
    };
    let mut setup = FleetSetup::new();
    println!("Place your ships (e.g. Carrier A1 east).");
    println!("{}", SETUP_HELP);
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        println!("{}", setup.fleet());
        match setup.next_missing() {
            Some(ship) => print!("Place the {} (length {}): ", ship.name(), ship.length()),
            None => print!("Fleet complete, type done or keep adjusting: "),
        }
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            bail!("stdin closed during fleet setup");
        };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<SetupCommand>() {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        match setup.apply(command, &mut rng) {
            Ok(SetupProgress::Finished) => break,
            Ok(SetupProgress::Placing) => {}
            Err(e) => println!("Error: {}", e),
        }
    }
    Ok(setup.finish()?)
}

/// Feed targets typed on stdin to an interactive player.
fn spawn_stdin_reader(input: TargetInput) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match parse_cell(&line) {
                Ok(cell) => {
                    if !input.select(cell) {
                        break;
                    }
                }
                Err(e) => println!("{}", e),
            }
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let mut config = cli.command.config();
    if cli.command.game().place {
        if config.player_1 != "interactive" {
            bail!("--place needs an interactive player");
        }
        let seed = config.seed_for(PLAYER_1);
        config.fleet = Some(tokio::task::spawn_blocking(move || place_fleet(seed)).await??);
    }

    match config.role {
        Role::Server if config.player_2 == "remote" => {
            println!("Waiting for a client on {}...", config.socket_addr())
        }
        Role::Client => println!("Connecting to {}...", config.socket_addr()),
        _ => {}
    }
    if let Some(s) = config.seed {
        println!("Using fixed seed: {} (game will be reproducible)", s);
    }

    let mut machine = PhaseMachine::from_config(&config)?;
    let mut local_seat = PLAYER_1;
    for seat in [PLAYER_1, PLAYER_2] {
        if let Some(input) = machine.player(seat).target_input() {
            spawn_stdin_reader(input);
            local_seat = seat;
        }
    }

    let winner = machine.run().await?;
    if winner == local_seat {
        println!("You won !");
    } else {
        println!("You lost ...");
    }
    println!(
        "{} turn(s), {} shot(s) fired",
        machine.turn(),
        machine.accepted_shots()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_library() {
        let cli = Cli::try_parse_from(["naval-duel", "local"]).unwrap();
        let config = cli.command.config();
        assert_eq!(config.phase_delay, DEFAULT_PHASE_DELAY);
        assert_eq!(config.max_prepare_attempts, Some(DEFAULT_MAX_PREPARE_ATTEMPTS));
        assert!(!cli.command.game().place);
    }

    #[test]
    fn options_reach_the_config() {
        let cli = Cli::try_parse_from([
            "naval-duel",
            "client",
            "--delay-ms",
            "250",
            "--max-prepare-attempts",
            "0",
            "--place",
        ])
        .unwrap();
        let config = cli.command.config();
        assert_eq!(config.role, Role::Client);
        assert_eq!(config.phase_delay, Duration::from_millis(250));
        assert_eq!(config.max_prepare_attempts, None);
        assert!(cli.command.game().place);
    }
}
