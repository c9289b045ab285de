//! Networked match synchronizer.
//!
//! Each participant runs one of these against the shared session record: it
//! projects every change notification into a freshly derived local view,
//! writes legality-checked moves back, and finalizes the record when the
//! game ends naturally or by forfeit. The record in the store is always
//! authoritative; nothing here trusts its own optimistic writes.

use crate::directory::{MatchOutcome, PlayerDirectory};
use crate::game::{Board, Coord, Tile};
use crate::session::{PlayerId, SessionId, SessionRecord, SessionStatus, TurnOwner};
use crate::store::SessionStore;
use anyhow::Result;
use derive_getters::Getters;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Locally derived view of a networked match.
///
/// Recomputed in full from the authoritative record on every change
/// notification; never patched incrementally.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct MatchView {
    /// Decoded board position.
    board: Board,
    /// Session lifecycle status.
    status: SessionStatus,
    /// The local player's seat.
    seat: TurnOwner,
    /// The local player's disc color.
    local_tile: Tile,
    /// The remote player's disc color.
    remote_tile: Tile,
    /// True when the local player is entitled to move.
    your_turn: bool,
    /// Legal placements for the local player; empty unless it is their turn
    /// and the game is in progress.
    valid_moves: Vec<Coord>,
    /// True once the session is finished.
    game_over: bool,
    /// Status line for the current turn.
    turn_message: String,
    /// Summary for a finished game; empty while the game is open.
    game_over_message: String,
    /// Set only when the remote player forfeited; empty otherwise.
    opponent_quit_message: String,
    /// Cells flipped by the most recent move, for animation.
    flipped_tiles: Vec<Coord>,
}

/// Projects the raw session record into the local player's view.
///
/// Pure: no subscription or store access, so it is directly testable. The
/// local player is the host exactly when `host_id` matches; everything else
/// derives from that and the record.
pub fn project(record: &SessionRecord, local_player_id: &str) -> MatchView {
    let seat = if record.host_id == local_player_id {
        TurnOwner::Host
    } else {
        TurnOwner::Opponent
    };
    let local_tile = record.tile_of(seat);
    let remote_tile = local_tile.opponent();
    let your_turn = record.current_turn == seat;

    let board = record.decode_board().unwrap_or_else(|error| {
        warn!(%error, "malformed board in session record, showing opening");
        Board::new()
    });

    let valid_moves = if your_turn && record.status == SessionStatus::Playing {
        board.legal_moves(local_tile)
    } else {
        Vec::new()
    };

    let remote_name = match seat {
        TurnOwner::Host => record.opponent_name.clone(),
        TurnOwner::Opponent => Some(record.host_name.clone()),
    }
    .unwrap_or_else(|| "Opponent".to_string());

    let mut turn_message = match record.status {
        SessionStatus::Waiting => "Waiting for opponent to join...".to_string(),
        SessionStatus::Playing if your_turn => "Your turn!".to_string(),
        SessionStatus::Playing => "Opponent's turn".to_string(),
        SessionStatus::Finished => "Game over".to_string(),
    };
    let mut game_over_message = String::new();
    let mut opponent_quit_message = String::new();

    if record.status == SessionStatus::Finished {
        if record.opponent_id.is_none() {
            // The host closed the session before anyone joined.
            turn_message = "Session closed".to_string();
            game_over_message = "Session closed".to_string();
        } else if record.winner_id.is_some() && !board.is_terminal() {
            // A winner on a board that is not played out means a forfeit,
            // not a scored finish.
            if record.winner_id.as_deref() == Some(local_player_id) {
                opponent_quit_message = format!("{remote_name} quit. You win!");
            } else {
                game_over_message = format!("You forfeited. {remote_name} wins.");
            }
        } else {
            let scores = board.score();
            let local = scores.for_tile(local_tile);
            let remote = scores.for_tile(remote_tile);
            game_over_message = if local > remote {
                format!("You win! {local} to {remote}")
            } else if local < remote {
                format!("You lose! {local} to {remote}")
            } else {
                format!("It's a tie! {local} to {remote}")
            };
        }
    }

    MatchView {
        board,
        status: record.status,
        seat,
        local_tile,
        remote_tile,
        your_turn,
        valid_moves,
        game_over: record.status == SessionStatus::Finished,
        turn_message,
        game_over_message,
        opponent_quit_message,
        flipped_tiles: record.flipped_tiles.clone(),
    }
}

/// One participant's actor over a shared session record.
pub struct SessionSynchronizer {
    store: Arc<dyn SessionStore>,
    directory: Arc<dyn PlayerDirectory>,
    session_id: SessionId,
    local_player_id: PlayerId,
    record_rx: watch::Receiver<SessionRecord>,
    listener: Option<JoinHandle<()>>,
}

impl SessionSynchronizer {
    /// Creates a fresh waiting session hosted by the identity behind
    /// `host_handle` and attaches to it.
    ///
    /// # Errors
    ///
    /// Fails when the handle does not resolve or the store rejects the
    /// create; no session exists afterwards in either case.
    #[instrument(skip(store, directory))]
    pub async fn create(
        store: Arc<dyn SessionStore>,
        directory: Arc<dyn PlayerDirectory>,
        host_handle: &str,
    ) -> Result<Self> {
        let host = directory.resolve(host_handle).await?;
        let record = SessionRecord::new_waiting(host.id().clone(), host.name().clone());
        let session_id = store.create(record).await?;
        let record_rx = store.subscribe(&session_id).await?;

        info!(%session_id, host_id = %host.id(), "session created");
        Ok(Self {
            store,
            directory,
            session_id,
            local_player_id: host.id().clone(),
            record_rx,
            listener: None,
        })
    }

    /// Joins an existing waiting session as the identity behind `handle`.
    ///
    /// No lock is taken: with at most two participants, a racing second
    /// joiner simply overwrites and both clients converge on the same final
    /// record.
    ///
    /// # Errors
    ///
    /// Fails when the handle does not resolve or the session is unknown.
    #[instrument(skip(store, directory))]
    pub async fn join(
        store: Arc<dyn SessionStore>,
        directory: Arc<dyn PlayerDirectory>,
        session_id: &str,
        handle: &str,
    ) -> Result<Self> {
        let player = directory.resolve(handle).await?;
        let mut record = store.read(session_id).await?;

        if record.opponent_id.is_some() {
            warn!(%session_id, "joining a session that already has an opponent");
        }
        record.opponent_id = Some(player.id().clone());
        record.opponent_name = Some(player.name().clone());
        record.status = SessionStatus::Playing;
        store.write(record).await?;

        let record_rx = store.subscribe(session_id).await?;
        info!(%session_id, player_id = %player.id(), "joined session");
        Ok(Self {
            store,
            directory,
            session_id: session_id.to_string(),
            local_player_id: player.id().clone(),
            record_rx,
            listener: None,
        })
    }

    /// Store key of the attached session.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Identity of the local participant.
    pub fn local_player_id(&self) -> &str {
        &self.local_player_id
    }

    /// The view derived from the latest known record.
    pub fn view(&self) -> MatchView {
        let record = self.record_rx.borrow().clone();
        project(&record, &self.local_player_id)
    }

    /// Starts pushing a freshly projected view on every record change.
    ///
    /// Replaces any previous watcher. The forwarding stops when this
    /// synchronizer is dropped, [`SessionSynchronizer::leave`] is called, or
    /// every returned receiver is dropped.
    pub fn watch_view(&mut self) -> watch::Receiver<MatchView> {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }

        let (view_tx, view_rx) = watch::channel(self.view());
        let mut record_rx = self.record_rx.clone();
        let local_player_id = self.local_player_id.clone();

        self.listener = Some(tokio::spawn(async move {
            while record_rx.changed().await.is_ok() {
                let record = record_rx.borrow().clone();
                let view = project(&record, &local_player_id);
                if view_tx.send(view).is_err() {
                    break;
                }
            }
        }));

        view_rx
    }

    /// Detaches from the session: no further view callbacks after this.
    pub fn leave(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
            debug!(session_id = %self.session_id, "view watcher stopped");
        }
    }

    /// Attempts the local player's move at `(x, y)`.
    ///
    /// A no-op when it is not the local player's turn, the game is not in
    /// progress, or the placement is illegal. On success the updated board,
    /// next turn owner and flip list are written back; the next turn owner
    /// is computed locally, including the pass-back rule, because either
    /// client may be the one making the terminating move. A failed write is
    /// logged and dropped: local state is never authoritative, the next
    /// change notification is the real signal.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub async fn make_move(&self, x: usize, y: usize) -> Result<()> {
        let record = self.record_rx.borrow().clone();
        if record.status != SessionStatus::Playing {
            debug!(status = %record.status, "move ignored, game not in progress");
            return Ok(());
        }

        let seat = if record.host_id == self.local_player_id {
            TurnOwner::Host
        } else {
            TurnOwner::Opponent
        };
        if record.current_turn != seat {
            debug!("move ignored, not the local player's turn");
            return Ok(());
        }

        let tile = record.tile_of(seat);
        let mut board = record.decode_board()?;
        let flipped = board.apply_move(tile, Coord::new(x, y));
        if flipped.is_empty() {
            debug!(x, y, "illegal move ignored");
            return Ok(());
        }

        // Work out the next turn owner before writing: if the other side has
        // no answer but we still do, the turn stays here; if neither side
        // can move, the owner stays advanced and we finalize.
        let mut next_turn = seat.other();
        if board.legal_moves(tile.opponent()).is_empty() && !board.legal_moves(tile).is_empty() {
            next_turn = seat;
            info!("opponent has no reply, turn stays with the mover");
        }

        let mut updated = record;
        updated.board = board.to_flat();
        updated.current_turn = next_turn;
        updated.flipped_tiles = flipped;

        if let Err(error) = self.store.write(updated.clone()).await {
            warn!(%error, "move write failed");
            return Ok(());
        }

        self.finalize_if_terminal(&updated, &board).await;
        Ok(())
    }

    /// Clears the flip list once the local animation has played out.
    pub async fn clear_flipped_tiles(&self) {
        let mut record = self.record_rx.borrow().clone();
        if record.flipped_tiles.is_empty() {
            return;
        }
        record.flipped_tiles.clear();
        if let Err(error) = self.store.write(record).await {
            warn!(%error, "flip list clear failed");
        }
    }

    /// Finishes the game when neither side has a legal move left: scores the
    /// board, writes the winner (none on a tie) and pushes one statistics
    /// update per participant.
    async fn finalize_if_terminal(&self, record: &SessionRecord, board: &Board) {
        if !board.is_terminal() {
            return;
        }

        let scores = board.score();
        let host_count = scores.for_tile(record.host_tile);
        let opponent_count = scores.for_tile(record.opponent_tile);
        let winner_id = if host_count > opponent_count {
            Some(record.host_id.clone())
        } else if opponent_count > host_count {
            record.opponent_id.clone()
        } else {
            None
        };

        let mut finished = record.clone();
        finished.status = SessionStatus::Finished;
        finished.winner_id = winner_id.clone();

        info!(host_count, opponent_count, winner = ?winner_id, "game complete");
        if let Err(error) = self.store.write(finished).await {
            warn!(%error, "finalize write failed");
        }

        self.push_outcomes(record, winner_id.as_deref()).await;
    }

    /// Abandons the game: the other participant wins unconditionally,
    /// whatever the score. A quit before anyone joined just closes the
    /// session.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub async fn quit(&mut self) -> Result<()> {
        let record = self.record_rx.borrow().clone();
        if record.status == SessionStatus::Finished {
            debug!("quit ignored, session already finished");
            self.leave();
            return Ok(());
        }

        let winner_id = if record.host_id == self.local_player_id {
            record.opponent_id.clone()
        } else {
            Some(record.host_id.clone())
        };

        let mut finished = record.clone();
        finished.status = SessionStatus::Finished;
        finished.winner_id = winner_id.clone();

        info!(winner = ?winner_id, "player quit, forfeiting");
        if let Err(error) = self.store.write(finished).await {
            warn!(%error, "quit write failed");
        }

        if record.opponent_id.is_some() {
            self.push_outcomes(&record, winner_id.as_deref()).await;
        }
        self.leave();
        Ok(())
    }

    /// Records the finished game once for each participant: the winner gets
    /// a win and the loser a loss, or both get a draw.
    async fn push_outcomes(&self, record: &SessionRecord, winner_id: Option<&str>) {
        let Some(opponent_id) = record.opponent_id.as_deref() else {
            return;
        };

        for player_id in [record.host_id.as_str(), opponent_id] {
            let outcome = match winner_id {
                None => MatchOutcome::Draw,
                Some(winner) if winner == player_id => MatchOutcome::Win,
                Some(_) => MatchOutcome::Loss,
            };
            if let Err(error) = self.directory.record_outcome(player_id, outcome).await {
                warn!(%error, player_id, "statistics update failed");
            }
        }
    }
}

impl Drop for SessionSynchronizer {
    fn drop(&mut self) {
        self.leave();
    }
}
