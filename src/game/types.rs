//! Core domain types for the Othello board.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_new::new;
use serde::{Deserialize, Serialize};

/// Board side length. Othello is always played on an 8x8 grid.
pub(crate) const BOARD_SIZE: usize = 8;

/// Disc color of one of the two sides.
///
/// Dark moves first in a fresh game. On the wire the colors keep the
/// classic glyphs: `"X"` for Dark and `"O"` for Light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// The dark side, shown as black discs.
    #[serde(rename = "X")]
    Dark,
    /// The light side, shown as white discs.
    #[serde(rename = "O")]
    Light,
}

impl Tile {
    /// Returns the opposing side.
    pub fn opponent(self) -> Self {
        match self {
            Tile::Dark => Tile::Light,
            Tile::Light => Tile::Dark,
        }
    }

    /// Single-character wire glyph for this side.
    pub fn glyph(self) -> &'static str {
        match self {
            Tile::Dark => "X",
            Tile::Light => "O",
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// No disc placed here yet.
    Empty,
    /// A disc of the given side.
    Taken(Tile),
}

/// A board coordinate; `x` is the row and `y` the column, both in `0..8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, new)]
pub struct Coord {
    /// Row, counted from the top.
    pub x: usize,
    /// Column, counted from the left.
    pub y: usize,
}

/// Error decoding the flat wire form of a board.
#[derive(Debug, Clone, Display, Error)]
pub enum BoardCodecError {
    /// The flat sequence did not have exactly 64 cells.
    #[display("flat board has {len} cells, expected 64")]
    Length {
        /// Number of cells received.
        len: usize,
    },
    /// A cell held something other than `" "`, `"X"` or `"O"`.
    #[display("unknown cell glyph {glyph:?} at index {index}")]
    Glyph {
        /// The offending cell content.
        glyph: String,
        /// Flat index (`row*8+col`) of the offending cell.
        index: usize,
    },
}

/// The 8x8 Othello board.
///
/// Cells are only ever mutated through the move application in the rules
/// engine; callers that need a prior snapshot clone the board first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Creates a board holding the canonical opening position:
    /// Light at (3,3) and (4,4), Dark at (3,4) and (4,3).
    pub fn new() -> Self {
        let mut cells = [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE];
        cells[3][3] = Cell::Taken(Tile::Light);
        cells[4][4] = Cell::Taken(Tile::Light);
        cells[3][4] = Cell::Taken(Tile::Dark);
        cells[4][3] = Cell::Taken(Tile::Dark);
        Self { cells }
    }

    /// Gets the cell at the given coordinate, or `None` when out of bounds.
    pub fn get(&self, coord: Coord) -> Option<Cell> {
        self.cells.get(coord.x)?.get(coord.y).copied()
    }

    /// Sets a cell. Out-of-bounds coordinates are ignored; only the rules
    /// engine writes through this.
    pub(crate) fn set(&mut self, coord: Coord, cell: Cell) {
        if coord.x < BOARD_SIZE && coord.y < BOARD_SIZE {
            self.cells[coord.x][coord.y] = cell;
        }
    }

    /// Number of occupied cells.
    pub fn filled(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| **cell != Cell::Empty)
            .count()
    }

    /// Serializes the board to its flat wire form: 64 one-character strings
    /// indexed `row*8+col`, each `" "`, `"X"` or `"O"`.
    pub fn to_flat(&self) -> Vec<String> {
        self.cells
            .iter()
            .flatten()
            .map(|cell| match cell {
                Cell::Empty => " ".to_string(),
                Cell::Taken(tile) => tile.glyph().to_string(),
            })
            .collect()
    }

    /// Decodes a board from its flat wire form.
    ///
    /// # Errors
    ///
    /// Returns [`BoardCodecError`] when the sequence is not 64 cells long or
    /// a cell holds an unknown glyph.
    pub fn from_flat(flat: &[String]) -> Result<Self, BoardCodecError> {
        if flat.len() != BOARD_SIZE * BOARD_SIZE {
            return Err(BoardCodecError::Length { len: flat.len() });
        }

        let mut cells = [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE];
        for (index, glyph) in flat.iter().enumerate() {
            let cell = match glyph.as_str() {
                " " => Cell::Empty,
                "X" => Cell::Taken(Tile::Dark),
                "O" => Cell::Taken(Tile::Light),
                _ => {
                    return Err(BoardCodecError::Glyph {
                        glyph: glyph.clone(),
                        index,
                    });
                }
            };
            cells[index / BOARD_SIZE][index % BOARD_SIZE] = cell;
        }

        Ok(Self { cells })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.cells {
            for cell in row {
                let glyph = match cell {
                    Cell::Empty => ".",
                    Cell::Taken(tile) => tile.glyph(),
                };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Disc counts per side. Equal counts are an explicit tie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct Scores {
    /// Number of dark discs on the board.
    dark: u32,
    /// Number of light discs on the board.
    light: u32,
}

impl Scores {
    pub(crate) fn count(dark: u32, light: u32) -> Self {
        Self { dark, light }
    }

    /// Disc count for the given side.
    pub fn for_tile(&self, tile: Tile) -> u32 {
        match tile {
            Tile::Dark => self.dark,
            Tile::Light => self.light,
        }
    }
}
