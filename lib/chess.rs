mod bitboard;
mod board;
mod color;
mod file;
mod game;
mod history;
mod r#move;
mod movement;
mod outcome;
mod piece;
mod promotion;
mod rank;
mod role;
mod san;
mod setup;
mod square;
mod transcript;

pub use bitboard::*;
pub use board::*;
pub use color::*;
pub use file::*;
pub use game::*;
pub use history::*;
pub use movement::Moves;
pub use outcome::*;
pub use piece::*;
pub use promotion::*;
pub use r#move::*;
pub use rank::*;
pub use role::*;
pub use san::*;
pub use setup::*;
pub use square::*;
pub use transcript::*;
