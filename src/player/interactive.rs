use log::{debug, warn};
use tokio::sync::mpsc;

use crate::core::{Cell, CellSet, FleetModel, ShotOutcome, BOARD_SIZE};

use super::{Player, PlayerLink};

/// Parse a coordinate such as `A5` or `j10`: a column letter followed by a
/// 1-based row number.
pub fn parse_cell(input: &str) -> Result<Cell, String> {
    let input = input.trim();
    if input.len() < 2 {
        return Err("Too short - need column letter and row number (e.g., A5)".to_string());
    }
    let mut chars = input.chars();
    let col_ch = chars.next().ok_or("No column letter")?.to_ascii_uppercase();
    if !col_ch.is_ascii_alphabetic() {
        return Err(format!("Invalid column '{}' - must be a letter A-J", col_ch));
    }
    let x = (col_ch as u8).wrapping_sub(b'A');
    if x >= BOARD_SIZE {
        return Err(format!("Column '{}' out of bounds - must be A-J", col_ch));
    }
    let row_str: String = chars.collect();
    let row: u8 = row_str
        .parse()
        .map_err(|_| format!("Invalid row '{}' - must be a number 1-10", row_str))?;
    if row == 0 || row > BOARD_SIZE {
        return Err(format!("Row {} out of bounds - must be 1-10", row));
    }
    Cell::new(x, row - 1).ok_or_else(|| format!("{} is not on the board", input))
}

/// Sending side of an interactive player's target queue.
#[derive(Debug, Clone)]
pub struct TargetInput {
    tx: mpsc::UnboundedSender<Cell>,
}

impl TargetInput {
    /// Deliver "the user selected `cell`". Returns `false` once the player is
    /// gone.
    pub fn select(&self, cell: Cell) -> bool {
        self.tx.send(cell).is_ok()
    }
}

/// Player driven by a person through injected targets.
///
/// Targets delivered while no shot is requested are discarded. Incoming
/// shots are resolved against the fleet the player set up before the game.
pub struct InteractivePlayer {
    link: PlayerLink,
    fleet: FleetModel,
    incoming: CellSet,
    input_tx: mpsc::UnboundedSender<Cell>,
    input_rx: mpsc::UnboundedReceiver<Cell>,
    awaiting_shot: bool,
    echo: bool,
}

impl InteractivePlayer {
    pub fn new(link: PlayerLink, fleet: FleetModel) -> Self {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        Self {
            link,
            fleet,
            incoming: CellSet::new(),
            input_tx,
            input_rx,
            awaiting_shot: false,
            echo: true,
        }
    }

    /// Stop printing game messages to stdout.
    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }

    pub fn fleet(&self) -> &FleetModel {
        &self.fleet
    }

    /// `true` between `request_shot` and an accepted target.
    pub fn is_awaiting_shot(&self) -> bool {
        self.awaiting_shot
    }

    fn say(&self, text: &str) {
        if self.echo {
            println!("{}", text);
        }
    }

    /// Our fleet beside our shots, `X` for a hit and `o` for a miss.
    fn boards(&self) -> String {
        let occupied = self.fleet.occupied();
        let mut out = String::from("   A B C D E F G H I J     A B C D E F G H I J\n");
        for y in 0..BOARD_SIZE {
            out.push_str(&format!("{:2}", y + 1));
            for x in 0..BOARD_SIZE {
                let Some(cell) = Cell::new(x, y) else { continue };
                let mark = match (occupied.contains(cell), self.incoming.contains(cell)) {
                    (true, true) => 'X',
                    (true, false) => '#',
                    (false, true) => 'o',
                    (false, false) => '~',
                };
                out.push(' ');
                out.push(mark);
            }
            out.push_str(&format!("  {:2}", y + 1));
            for x in 0..BOARD_SIZE {
                let mark = Cell::new(x, y)
                    .and_then(|c| self.moves().get(&c))
                    .map(|o| if o.is_hit() { 'X' } else { 'o' })
                    .unwrap_or('.');
                out.push(' ');
                out.push(mark);
            }
            out.push('\n');
        }
        out
    }
}

impl Player for InteractivePlayer {
    fn start_game(&mut self) {
        self.say("Starting a new game !");
        self.say(&format!("Your fleet:\n{}", self.fleet));
    }

    fn start_turn(&mut self) {
        self.say("Starting a new turn");
    }

    fn end_turn(&mut self) {
        self.say("Turn over.");
    }

    fn request_shot(&mut self) {
        self.awaiting_shot = true;
        self.say(&self.boards());
        self.say("Please, select where to shoot.");
    }

    fn request_hit(&mut self, at: Cell) {
        self.say("UNDER FIRE !");
        self.incoming.insert(at);
        match self.fleet.resolve_shot(at) {
            Ok(outcome) => {
                self.say(match outcome {
                    ShotOutcome::Miss => "They missed",
                    ShotOutcome::Hit => "We are hit !",
                    ShotOutcome::HitAndSunk | ShotOutcome::GameOver => "We are going down !!!",
                });
                self.hit(at, outcome);
            }
            Err(e) => self.link.fail(format!("fleet bookkeeping broke: {}", e)),
        }
    }

    fn show_hit(&mut self, _at: Cell, outcome: ShotOutcome) {
        self.say(match outcome {
            ShotOutcome::Miss => "We missed",
            ShotOutcome::Hit => "That's a hit !",
            ShotOutcome::HitAndSunk | ShotOutcome::GameOver => "It is going down !!!",
        });
    }

    fn await_opponent_shot(&mut self) {
        self.say("The enemy is going to fire, get ready !");
    }

    fn tick(&mut self) {
        while let Ok(cell) = self.input_rx.try_recv() {
            if !self.awaiting_shot {
                debug!("ignoring target {} selected out of turn", cell);
                continue;
            }
            if self.fire(cell) {
                self.awaiting_shot = false;
                self.say("FIRE !");
                while let Ok(extra) = self.input_rx.try_recv() {
                    debug!("ignoring target {} selected after firing", extra);
                }
                return;
            }
            warn!("already fired at {}, pick another cell", cell);
            self.say(&format!("You already fired at {}. Pick another cell.", cell));
        }
    }

    fn link(&self) -> &PlayerLink {
        &self.link
    }

    fn link_mut(&mut self) -> &mut PlayerLink {
        &mut self.link
    }

    fn is_interactive(&self) -> bool {
        true
    }

    fn target_input(&self) -> Option<TargetInput> {
        Some(TargetInput {
            tx: self.input_tx.clone(),
        })
    }
}
