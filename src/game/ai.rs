//! Computer opponent: corner-preferring, one-ply greedy move selection.

use super::types::{Board, Coord, Tile};
use anyhow::Result;
use rand::seq::SliceRandom;
use std::time::Duration;
use tracing::debug;

/// Trait for anything that can supply the next placement for a side.
#[async_trait::async_trait]
pub trait Mover: Send {
    /// Picks a move for `tile` on `board`.
    ///
    /// Callers must only ask when `tile` has at least one legal move;
    /// a moveless position is reported as an error rather than a pass.
    async fn choose_move(&mut self, board: &Board, tile: Tile) -> Result<Coord>;

    /// Display name for this mover.
    fn name(&self) -> &str;
}

/// The built-in computer opponent.
///
/// Always takes a corner when one is available; otherwise simulates every
/// legal move on a board copy and keeps the one with the strictly greatest
/// own disc count. Intentionally not game-theoretically optimal.
pub struct GreedyMover {
    name: String,
    think_delay: Duration,
}

const CORNERS: [(usize, usize); 4] = [(0, 0), (0, 7), (7, 0), (7, 7)];

impl GreedyMover {
    /// Creates a mover with the default one-second presentation delay.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_think_delay(name, Duration::from_secs(1))
    }

    /// Creates a mover with a custom presentation delay. The delay is purely
    /// cosmetic; tests use zero.
    pub fn with_think_delay(name: impl Into<String>, think_delay: Duration) -> Self {
        Self {
            name: name.into(),
            think_delay,
        }
    }
}

#[async_trait::async_trait]
impl Mover for GreedyMover {
    async fn choose_move(&mut self, board: &Board, tile: Tile) -> Result<Coord> {
        // Pretend to think before answering.
        tokio::time::sleep(self.think_delay).await;

        let mut moves = board.legal_moves(tile);
        if moves.is_empty() {
            anyhow::bail!("no legal moves available for {:?}", tile);
        }
        moves.shuffle(&mut rand::rng());

        if let Some(corner) = moves
            .iter()
            .copied()
            .find(|coord| CORNERS.contains(&(coord.x, coord.y)))
        {
            debug!(mover = %self.name, ?corner, "taking a corner");
            return Ok(corner);
        }

        let mut best_move = moves[0];
        let mut best_count = 0;
        for candidate in moves {
            let mut preview = board.clone();
            preview.apply_move(tile, candidate);
            let count = preview.score().for_tile(tile);
            if count > best_count {
                best_move = candidate;
                best_count = count;
            }
        }

        debug!(mover = %self.name, chosen = ?best_move, count = best_count, "greedy pick");
        Ok(best_move)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
