use async_trait::async_trait;
use roundtable_application::ports::history_store::{HistoryError, HistoryStore};
use roundtable_domain::{ContextLog, SessionId};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// History kept for the lifetime of the process
#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    logs: RwLock<BTreeMap<SessionId, ContextLog>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn load(&self, session_id: &SessionId) -> Result<Option<ContextLog>, HistoryError> {
        Ok(self.logs.read().await.get(session_id).cloned())
    }

    async fn save(&self, log: &ContextLog) -> Result<(), HistoryError> {
        self.logs
            .write()
            .await
            .insert(log.session_id().clone(), log.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<SessionId>, HistoryError> {
        Ok(self.logs.read().await.keys().cloned().collect())
    }
}
