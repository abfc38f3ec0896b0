pub mod engine;
pub mod utils;

pub use engine::{GameEngine, GameStatus, IllegalMove, PlacedPiece, Player};
