mod ai;
mod rules;
mod types;

pub use ai::{GreedyMover, Mover};
pub use rules::MoveResult;
pub use types::{Board, BoardCodecError, Cell, Coord, Scores, Tile};
