use anyhow::Error as Anyhow;
use clap::Subcommand;
use derive_more::From;

mod moves;
mod replay;

#[derive(From, Subcommand)]
pub enum Applet {
    Moves(moves::Moves),
    Replay(replay::Replay),
}

impl Applet {
    pub fn execute(self) -> Result<(), Anyhow> {
        match self {
            Applet::Moves(a) => Ok(a.execute()?),
            Applet::Replay(a) => Ok(a.execute()?),
        }
    }
}
