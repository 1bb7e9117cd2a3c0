//! Command-line front end: load a position, apply moves, print the result.

use anyhow::Context;
use basilisk::{board::Board, cli};

fn main() -> anyhow::Result<()> {
    #[cfg(debug_assertions)]
    unsafe {
        std::env::set_var("RUST_BACKTRACE", "1");
    }

    let cli = <cli::Cli as clap::Parser>::parse();

    let notation = cli.position.as_deref().unwrap_or(Board::START_POSITION);
    let mut board = Board::from_notation(notation)
        .with_context(|| format!("failed to load position {notation:?}"))?;

    if cli.roundtrip {
        let reserialized = board.fen();
        anyhow::ensure!(
            reserialized == notation,
            "round-trip mismatch:\n  in:  {notation}\n  out: {reserialized}"
        );
        println!("round-trip ok");
    }

    if let Some(moves) = &cli.moves {
        for token in moves.split_whitespace() {
            let m = board
                .parse_move(token)
                .with_context(|| format!("cannot read move {token:?}"))?;
            board.make_move(m, true);
        }
    }

    if cli.diagram {
        println!("{board}");
    } else {
        println!("{}", board.fen());
    }

    Ok(())
}
