//! Shared session record for networked two-player matches.

use crate::game::{Board, Coord, Tile};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// Unique identifier for a game session.
pub type SessionId = String;

/// Unique identifier for a player.
pub type PlayerId = String;

/// Lifecycle status of a networked match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SessionStatus {
    /// Created by the host; no opponent yet.
    Waiting,
    /// Both seats taken, game in progress.
    Playing,
    /// Game over, whether played out or forfeited. Final.
    Finished,
}

/// Which seat is currently entitled to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TurnOwner {
    /// The player who created the session.
    Host,
    /// The player who joined it.
    Opponent,
}

impl TurnOwner {
    /// Returns the other seat.
    pub fn other(self) -> Self {
        match self {
            TurnOwner::Host => TurnOwner::Opponent,
            TurnOwner::Opponent => TurnOwner::Host,
        }
    }
}

/// Authoritative state of one networked match, as held in the shared store.
///
/// Created by the host, mutated by whichever seat is entitled to move (or by
/// either seat on a quit), finished exactly once. Clients never merge into
/// it; they re-derive their whole local view from each change notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Store key of this session.
    pub session_id: SessionId,
    /// Identity of the creating player.
    pub host_id: PlayerId,
    /// Display name of the creating player.
    pub host_name: String,
    /// Identity of the joining player; `None` until someone joins.
    pub opponent_id: Option<PlayerId>,
    /// Display name of the joining player; `None` until someone joins.
    pub opponent_name: Option<String>,
    /// Lifecycle status.
    pub status: SessionStatus,
    /// Winner of a finished game; `None` while open, and on a draw.
    pub winner_id: Option<PlayerId>,
    /// Flat 64-cell board, indexed `row*8+col`.
    pub board: Vec<String>,
    /// Seat entitled to move next.
    pub current_turn: TurnOwner,
    /// The host's disc color. Hosts conventionally play Dark.
    pub host_tile: Tile,
    /// The opponent's disc color; always the other color.
    pub opponent_tile: Tile,
    /// Cells flipped by the most recent move, kept for cross-client
    /// animation.
    pub flipped_tiles: Vec<Coord>,
}

impl SessionRecord {
    /// Builds a fresh waiting session: opening board, host to move, host on
    /// Dark. The store assigns `session_id` on create.
    pub fn new_waiting(host_id: PlayerId, host_name: String) -> Self {
        Self {
            session_id: SessionId::new(),
            host_id,
            host_name,
            opponent_id: None,
            opponent_name: None,
            status: SessionStatus::Waiting,
            winner_id: None,
            board: Board::new().to_flat(),
            current_turn: TurnOwner::Host,
            host_tile: Tile::Dark,
            opponent_tile: Tile::Light,
            flipped_tiles: Vec::new(),
        }
    }

    /// Decodes the flat board field.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BoardCodecError`] on a malformed board field.
    pub fn decode_board(&self) -> Result<Board, crate::game::BoardCodecError> {
        Board::from_flat(&self.board)
    }

    /// Disc color of the given seat.
    pub fn tile_of(&self, seat: TurnOwner) -> Tile {
        match seat {
            TurnOwner::Host => self.host_tile,
            TurnOwner::Opponent => self.opponent_tile,
        }
    }

    /// Seat of the given player, or `None` for a stranger to this session.
    pub fn seat_of(&self, player_id: &str) -> Option<TurnOwner> {
        if self.host_id == player_id {
            Some(TurnOwner::Host)
        } else if self.opponent_id.as_deref() == Some(player_id) {
            Some(TurnOwner::Opponent)
        } else {
            None
        }
    }
}

/// Lobby row describing one joinable session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new, Getters)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// Store key of the session.
    session_id: SessionId,
    /// Display name of the waiting host.
    host_name: String,
}
