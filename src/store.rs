//! Abstract keyed session store with change subscriptions.
//!
//! The concrete backing store is irrelevant to the game design; anything
//! that can hold a keyed record, replace it wholesale, and notify watchers
//! qualifies. [`MemoryStore`] is the in-process implementation used by tests
//! and local play.

use crate::session::{SessionId, SessionRecord, SessionStatus, SessionSummary};
use async_trait::async_trait;
use derive_more::{Display, Error};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Store error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("store error: {} at {}:{}", message, file, line)]
pub struct StoreError {
    /// Error message.
    pub message: String,
    /// Line number where the error occurred.
    pub line: u32,
    /// Source file where the error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
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

/// Keyed store of session records with subscribable change notifications.
///
/// Writes are last-write-wins; there is no server-side mutual exclusion.
/// Turn alternation serializes the two participants' writes in practice,
/// and a simultaneous double-write from stale turn belief is an accepted
/// limitation of the design rather than something the store resolves.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores `record` under a fresh id and returns that id.
    async fn create(&self, record: SessionRecord) -> Result<SessionId, StoreError>;

    /// Reads the current record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] for an unknown session.
    async fn read(&self, id: &str) -> Result<SessionRecord, StoreError>;

    /// Replaces the stored record and notifies every subscriber.
    async fn write(&self, record: SessionRecord) -> Result<(), StoreError>;

    /// Subscribes to a session. The receiver holds the latest record and
    /// yields every subsequent write; dropping it cancels the subscription.
    async fn subscribe(&self, id: &str) -> Result<watch::Receiver<SessionRecord>, StoreError>;

    /// Lobby query: every session still waiting for an opponent.
    async fn list_waiting(&self) -> Result<Vec<SessionSummary>, StoreError>;
}

/// In-memory [`SessionStore`] backed by one watch channel per session.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    sessions: Arc<Mutex<HashMap<SessionId, watch::Sender<SessionRecord>>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("creating in-memory session store");
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    #[instrument(skip(self, record))]
    async fn create(&self, mut record: SessionRecord) -> Result<SessionId, StoreError> {
        let id = Uuid::new_v4().to_string();
        record.session_id = id.clone();

        let mut sessions = self.sessions.lock().unwrap();
        let (tx, _rx) = watch::channel(record);
        sessions.insert(id.clone(), tx);

        info!(session_id = %id, "session created");
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn read(&self, id: &str) -> Result<SessionRecord, StoreError> {
        let sessions = self.sessions.lock().unwrap();
        let tx = sessions
            .get(id)
            .ok_or_else(|| StoreError::new(format!("session '{id}' not found")))?;
        Ok(tx.borrow().clone())
    }

    #[instrument(skip(self, record), fields(session_id = %record.session_id))]
    async fn write(&self, record: SessionRecord) -> Result<(), StoreError> {
        let sessions = self.sessions.lock().unwrap();
        let tx = sessions.get(&record.session_id).ok_or_else(|| {
            warn!(session_id = %record.session_id, "write to unknown session");
            StoreError::new(format!("session '{}' not found", record.session_id))
        })?;

        // Last write wins, whether or not anyone is listening.
        tx.send_replace(record);
        debug!("session record replaced");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn subscribe(&self, id: &str) -> Result<watch::Receiver<SessionRecord>, StoreError> {
        let sessions = self.sessions.lock().unwrap();
        let tx = sessions
            .get(id)
            .ok_or_else(|| StoreError::new(format!("session '{id}' not found")))?;
        debug!(session_id = %id, "subscriber attached");
        Ok(tx.subscribe())
    }

    #[instrument(skip(self))]
    async fn list_waiting(&self) -> Result<Vec<SessionSummary>, StoreError> {
        let sessions = self.sessions.lock().unwrap();
        let waiting: Vec<_> = sessions
            .values()
            .map(|tx| tx.borrow().clone())
            .filter(|record| record.status == SessionStatus::Waiting)
            .map(|record| SessionSummary::new(record.session_id, record.host_name))
            .collect();

        info!(count = waiting.len(), "listed waiting sessions");
        Ok(waiting)
    }
}
