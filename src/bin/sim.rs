use naval_duel::player::{event_channel, PLAYER_1, PLAYER_2};
use naval_duel::{AutomatonPlayer, PhaseMachine, PlayerLink, Step};
use serde_json::json;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <seed1> <seed2>", args[0]);
        std::process::exit(1);
    }
    let seed1: u64 = args[1].parse()?;
    let seed2: u64 = args[2].parse()?;

    let (tx, rx) = event_channel();
    let p1 = AutomatonPlayer::new(PlayerLink::new(PLAYER_1, tx.clone()), seed1);
    let p2 = AutomatonPlayer::new(PlayerLink::new(PLAYER_2, tx), seed2);
    let mut machine = PhaseMachine::new([Box::new(p1), Box::new(p2)], rx);

    let winner = loop {
        if let Step::Finished { winner } = machine.advance()? {
            break winner;
        }
    };

    let shots: Vec<_> = [PLAYER_1, PLAYER_2]
        .iter()
        .map(|&seat| {
            let player = machine.player(seat);
            let hits = player.moves().values().filter(|o| o.is_hit()).count();
            json!({"player": seat + 1, "fired": player.moves().len(), "hits": hits})
        })
        .collect();

    let result = json!({
        "winner": format!("player{}", winner + 1),
        "turns": machine.turn(),
        "shots": shots,
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
