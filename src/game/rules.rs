//! Move legality, disc flipping, scoring, and terminal detection.

use super::types::{BOARD_SIZE, Board, Cell, Coord, Scores, Tile};
use tracing::{debug, instrument};

/// Outcome of testing a placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveResult {
    /// The placement is illegal; nothing changes.
    Rejected,
    /// The placement is legal and flips these cells, in discovery order.
    Accepted(Vec<Coord>),
}

impl MoveResult {
    /// True when the placement is legal.
    pub fn is_accepted(&self) -> bool {
        matches!(self, MoveResult::Accepted(_))
    }
}

// Ray directions scanned from a candidate cell, in fixed order:
// E, SE, S, SW, W, NW, N, NE. The flip list order depends on it.
const DIRECTIONS: [(i32, i32); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

fn on_board(x: i32, y: i32) -> bool {
    (0..BOARD_SIZE as i32).contains(&x) && (0..BOARD_SIZE as i32).contains(&y)
}

impl Board {
    fn cell_at(&self, x: i32, y: i32) -> Option<Cell> {
        if on_board(x, y) {
            self.get(Coord::new(x as usize, y as usize))
        } else {
            None
        }
    }

    /// Tests whether `tile` may be placed at `coord`.
    ///
    /// A placement is legal on an empty in-bounds cell when at least one of
    /// the eight rays from it crosses one or more opposing discs and ends on
    /// an own disc. Accepted results carry every crossed disc, rays in
    /// E, SE, S, SW, W, NW, N, NE order and each ray from the placed cell
    /// outward, so the sequence is reproducible for the same board and move.
    pub fn is_legal_move(&self, tile: Tile, coord: Coord) -> MoveResult {
        if self.get(coord) != Some(Cell::Empty) {
            return MoveResult::Rejected;
        }

        let other = tile.opponent();
        let mut flips = Vec::new();

        for (dx, dy) in DIRECTIONS {
            let mut x = coord.x as i32 + dx;
            let mut y = coord.y as i32 + dy;
            let mut line = Vec::new();

            while self.cell_at(x, y) == Some(Cell::Taken(other)) {
                line.push(Coord::new(x as usize, y as usize));
                x += dx;
                y += dy;
            }

            // A ray counts only if it crossed discs and ended on our own;
            // running off the board or onto an empty cell captures nothing.
            if !line.is_empty() && self.cell_at(x, y) == Some(Cell::Taken(tile)) {
                flips.extend(line);
            }
        }

        if flips.is_empty() {
            MoveResult::Rejected
        } else {
            MoveResult::Accepted(flips)
        }
    }

    /// Places `tile` at `coord` and flips every captured disc in place.
    ///
    /// Returns the flipped cells, or an empty list if the move turned out to
    /// be illegal (the legality re-check keeps this total; callers are still
    /// expected to test [`Board::is_legal_move`] first).
    #[instrument(skip(self), level = "debug")]
    pub fn apply_move(&mut self, tile: Tile, coord: Coord) -> Vec<Coord> {
        match self.is_legal_move(tile, coord) {
            MoveResult::Rejected => {
                debug!(?tile, ?coord, "rejected placement left board untouched");
                Vec::new()
            }
            MoveResult::Accepted(flips) => {
                self.set(coord, Cell::Taken(tile));
                for flipped in &flips {
                    self.set(*flipped, Cell::Taken(tile));
                }
                flips
            }
        }
    }

    /// Every coordinate where `tile` may legally move, in row-major order.
    pub fn legal_moves(&self, tile: Tile) -> Vec<Coord> {
        let mut moves = Vec::new();
        for x in 0..BOARD_SIZE {
            for y in 0..BOARD_SIZE {
                let coord = Coord::new(x, y);
                if self.is_legal_move(tile, coord).is_accepted() {
                    moves.push(coord);
                }
            }
        }
        moves
    }

    /// Counts the discs of each side.
    pub fn score(&self) -> Scores {
        let mut dark = 0;
        let mut light = 0;
        for x in 0..BOARD_SIZE {
            for y in 0..BOARD_SIZE {
                match self.get(Coord::new(x, y)) {
                    Some(Cell::Taken(Tile::Dark)) => dark += 1,
                    Some(Cell::Taken(Tile::Light)) => light += 1,
                    _ => {}
                }
            }
        }
        Scores::count(dark, light)
    }

    /// True when neither side has a legal move.
    ///
    /// One side running out while the other can still move is a pass, which
    /// is the turn controllers' business, not the engine's.
    pub fn is_terminal(&self) -> bool {
        self.legal_moves(Tile::Dark).is_empty() && self.legal_moves(Tile::Light).is_empty()
    }
}
