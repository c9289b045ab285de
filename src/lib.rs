//! Othello with a local single-player mode and a networked two-player mode.
//!
//! # Architecture
//!
//! - **Game**: the 8x8 board, the move-legality and disc-flipping rules
//!   engine, and the corner-preferring greedy computer opponent
//! - **Solo**: the single-player turn controller (human against computer)
//! - **Session**: the shared record a networked match lives in, plus the
//!   abstract keyed store that holds it
//! - **Sync**: the per-client synchronizer projecting the shared record into
//!   a local view and writing legality-checked moves back
//! - **Directory**: identity resolution, win/loss/draw statistics and the
//!   leaderboard
//!
//! # Example
//!
//! ```no_run
//! use othello::{Coord, SoloGame};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut game = SoloGame::new();
//! game.start().await?;
//! game.play(Coord::new(2, 3)).await?;
//! println!("{}", game.state().message());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod directory;
mod game;
mod session;
mod solo;
mod store;
mod sync;

// Crate-level exports - Identity and statistics
pub use directory::{
    DirectoryError, MatchOutcome, MemoryDirectory, PlayerDirectory, PlayerProfile,
};

// Crate-level exports - Game types and rules engine
pub use game::{Board, BoardCodecError, Cell, Coord, GreedyMover, MoveResult, Mover, Scores, Tile};

// Crate-level exports - Session record
pub use session::{PlayerId, SessionId, SessionRecord, SessionStatus, SessionSummary, TurnOwner};

// Crate-level exports - Single-player controller
pub use solo::{SoloGame, SoloState, SoloTurn};

// Crate-level exports - Record store
pub use store::{MemoryStore, SessionStore, StoreError};

// Crate-level exports - Networked synchronizer
pub use sync::{MatchView, SessionSynchronizer, project};
