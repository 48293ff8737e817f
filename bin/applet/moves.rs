use anyhow::Error as Anyhow;
use clap::Parser;
use lib::chess::{GameState, Promotion, San};
use lib::util::Enum;
use tracing::{info, instrument};

/// Lists the legal moves of a position in standard algebraic notation.
#[derive(Debug, Parser)]
#[clap(disable_help_flag = true, disable_version_flag = true)]
pub struct Moves {
    /// The position in FEN notation, the standard arrangement if omitted.
    fen: Option<GameState>,
}

impl Moves {
    #[instrument(level = "trace", skip(self), err)]
    pub fn execute(self) -> Result<(), Anyhow> {
        let game = self.fen.unwrap_or_default();
        let mut sans = Vec::new();

        for m in game.moves() {
            match m.is_promotion() {
                false => sans.push(San::encode(&game, &m)),
                true => {
                    for p in Promotion::iter() {
                        sans.push(San::encode(&game, &game.promote(m, p)?));
                    }
                }
            }
        }

        info!(turn = %game.turn(), moves = sans.len());

        for san in sans {
            println!("{san}");
        }

        Ok(())
    }
}
