use anyhow::Error as Anyhow;
use clap::Parser;
use lib::chess::{GameState, Transcript};
use std::{fs, path::PathBuf};
use tracing::{info, instrument, warn};

/// Replays a game recorded in standard algebraic notation.
#[derive(Debug, Parser)]
#[clap(disable_help_flag = true, disable_version_flag = true)]
pub struct Replay {
    /// The starting position in FEN notation, the standard arrangement if omitted.
    #[clap(short, long)]
    fen: Option<GameState>,

    /// How many moves to take back after replaying.
    #[clap(short, long, default_value_t = 0)]
    undo: usize,

    /// The file holding the moves to replay.
    file: PathBuf,
}

impl Replay {
    #[instrument(level = "trace", skip(self), err)]
    pub fn execute(self) -> Result<(), Anyhow> {
        let transcript: Transcript = fs::read_to_string(&self.file)?.parse()?;
        info!(moves = transcript.len(), file = %self.file.display());

        let mut game = self.fen.unwrap_or_default();
        game.replay(&transcript)?;

        for _ in 0..self.undo {
            if !game.undo_move() {
                warn!("no more moves to take back");
                break;
            }
        }

        print!("{}", game.transcript());
        println!();
        println!("{}", game.board());
        println!("{} to move", game.turn());

        if let Some(outcome) = game.outcome() {
            println!("{outcome}");
        }

        Ok(())
    }
}
