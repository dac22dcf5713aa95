//! History store port
//!
//! Cross-run memory injected into the coordinator: a mapping from session id
//! to that session's context log.

use async_trait::async_trait;
use roundtable_domain::{ContextLog, SessionId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid session id: {0}")]
    InvalidId(String),
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Load a stored log, `None` if the session is unknown
    async fn load(&self, session_id: &SessionId) -> Result<Option<ContextLog>, HistoryError>;

    /// Store (or replace) the log of its session
    async fn save(&self, log: &ContextLog) -> Result<(), HistoryError>;

    /// All stored session ids, sorted
    async fn list(&self) -> Result<Vec<SessionId>, HistoryError>;
}

/// Store that keeps nothing, for runs without persistence
pub struct NoHistory;

#[async_trait]
impl HistoryStore for NoHistory {
    async fn load(&self, _session_id: &SessionId) -> Result<Option<ContextLog>, HistoryError> {
        Ok(None)
    }

    async fn save(&self, _log: &ContextLog) -> Result<(), HistoryError> {
        Ok(())
    }

    async fn list(&self) -> Result<Vec<SessionId>, HistoryError> {
        Ok(Vec::new())
    }
}
