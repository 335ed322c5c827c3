use anyhow::Error as Anyhow;
use clap::Parser;
use lib::chess::{Board, Color};
use lib::rules::{perft, validate_position};
use std::time::Instant;
use tracing::{info, instrument};

/// Counts the positions reachable in a number of plies.
#[derive(Debug, Parser)]
#[clap(disable_help_flag = true, disable_version_flag = true)]
pub struct Perft {
    /// How many plies deep to count.
    #[clap(default_value_t = 4)]
    depth: u8,

    /// The piece placement in FEN notation.
    #[clap(short, long)]
    placement: Option<Board>,

    /// The side to move.
    #[clap(short, long, default_value_t = Color::White)]
    side: Color,
}

impl Perft {
    #[instrument(level = "trace", skip(self), err)]
    pub fn execute(self) -> Result<(), Anyhow> {
        let board = self.placement.unwrap_or_default();
        validate_position(&board, self.side)?;

        let timer = Instant::now();
        let nodes = perft(&board, self.side, self.depth);
        let elapsed = timer.elapsed();

        info!(depth = self.depth, nodes, ?elapsed, "perft");
        println!("{nodes}");

        Ok(())
    }
}
