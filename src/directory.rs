//! Player identity resolution, match statistics, and the leaderboard.

use crate::session::PlayerId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_more::{Display, Error};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Identity lookup failure, distinct from store failures so callers can
/// tell "no such player" apart from "could not talk to the store".
#[derive(Debug, Clone, Display, Error)]
#[display("directory error: {} at {}:{}", message, file, line)]
pub struct DirectoryError {
    /// Error message.
    pub message: String,
    /// Line number where the error occurred.
    pub line: u32,
    /// Source file where the error occurred.
    pub file: &'static str,
}

impl DirectoryError {
    /// Creates a new directory error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Outcome of a finished match from one player's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum MatchOutcome {
    /// The player won.
    Win,
    /// The player lost.
    Loss,
    /// The match was drawn.
    Draw,
}

/// A resolved player identity with lifetime statistics.
#[derive(Debug, Clone, Getters)]
pub struct PlayerProfile {
    /// Stable player identity.
    id: PlayerId,
    /// External handle the player signs in with (an email-like string).
    handle: String,
    /// Display name.
    name: String,
    /// Matches won.
    wins: u32,
    /// Matches lost.
    losses: u32,
    /// Matches drawn.
    draws: u32,
    /// When the player was last seen.
    last_seen: DateTime<Utc>,
}

impl PlayerProfile {
    /// Win rate as a percentage of all recorded matches.
    pub fn win_rate(&self) -> f64 {
        let total = self.wins + self.losses + self.draws;
        if total == 0 {
            0.0
        } else {
            (self.wins as f64 / total as f64) * 100.0
        }
    }
}

/// Identity resolution and per-player statistics.
#[async_trait]
pub trait PlayerDirectory: Send + Sync {
    /// Resolves an external handle to a player profile.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] for an unknown handle; no state changes.
    async fn resolve(&self, handle: &str) -> Result<PlayerProfile, DirectoryError>;

    /// Records one finished match for the player, bumping exactly one of
    /// the win/loss/draw counters.
    async fn record_outcome(
        &self,
        player_id: &str,
        outcome: MatchOutcome,
    ) -> Result<(), DirectoryError>;

    /// Every profile, ordered by wins with the highest first.
    async fn leaderboard(&self) -> Result<Vec<PlayerProfile>, DirectoryError>;
}

/// In-memory [`PlayerDirectory`], seeded through [`MemoryDirectory::register`].
#[derive(Debug, Clone, Default)]
pub struct MemoryDirectory {
    players: Arc<Mutex<HashMap<PlayerId, PlayerProfile>>>,
}

impl MemoryDirectory {
    /// Creates an empty directory.
    #[instrument]
    pub fn new() -> Self {
        info!("creating in-memory player directory");
        Self::default()
    }

    /// Registers a player under `handle` and returns the fresh profile with
    /// zeroed statistics.
    #[instrument(skip_all)]
    pub fn register(&self, handle: impl Into<String>, name: impl Into<String>) -> PlayerProfile {
        let profile = PlayerProfile {
            id: Uuid::new_v4().to_string(),
            handle: handle.into(),
            name: name.into(),
            wins: 0,
            losses: 0,
            draws: 0,
            last_seen: Utc::now(),
        };

        let mut players = self.players.lock().unwrap();
        players.insert(profile.id.clone(), profile.clone());
        info!(player_id = %profile.id, name = %profile.name, "player registered");
        profile
    }
}

#[async_trait]
impl PlayerDirectory for MemoryDirectory {
    #[instrument(skip(self))]
    async fn resolve(&self, handle: &str) -> Result<PlayerProfile, DirectoryError> {
        let players = self.players.lock().unwrap();
        players
            .values()
            .find(|profile| profile.handle == handle)
            .cloned()
            .ok_or_else(|| {
                debug!(handle, "handle not found");
                DirectoryError::new(format!("no player with handle '{handle}'"))
            })
    }

    #[instrument(skip(self))]
    async fn record_outcome(
        &self,
        player_id: &str,
        outcome: MatchOutcome,
    ) -> Result<(), DirectoryError> {
        let mut players = self.players.lock().unwrap();
        let profile = players.get_mut(player_id).ok_or_else(|| {
            warn!(player_id, "outcome for unknown player");
            DirectoryError::new(format!("no player with id '{player_id}'"))
        })?;

        match outcome {
            MatchOutcome::Win => profile.wins += 1,
            MatchOutcome::Loss => profile.losses += 1,
            MatchOutcome::Draw => profile.draws += 1,
        }

        info!(player_id, %outcome, "match outcome recorded");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn leaderboard(&self) -> Result<Vec<PlayerProfile>, DirectoryError> {
        let players = self.players.lock().unwrap();
        let mut rows: Vec<_> = players.values().cloned().collect();
        rows.sort_by(|a, b| b.wins.cmp(&a.wins));

        debug!(count = rows.len(), "leaderboard computed");
        Ok(rows)
    }
}
