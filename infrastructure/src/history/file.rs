use async_trait::async_trait;
use roundtable_application::ports::history_store::{HistoryError, HistoryStore};
use roundtable_domain::{ContextLog, SessionId};
use std::path::{Path, PathBuf};
use tracing::debug;

const EXTENSION: &str = "json";

/// One pretty-printed JSON file per session under a directory
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash mid-save never leaves a truncated log behind.
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    dir: PathBuf,
}

impl FileHistoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<data dir>/roundtable/sessions`, when the platform has one.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("roundtable").join("sessions"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &SessionId) -> Result<PathBuf, HistoryError> {
        let raw = id.as_str();
        let valid = !raw.is_empty()
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(HistoryError::InvalidId(raw.to_string()));
        }
        Ok(self.dir.join(format!("{}.{}", raw, EXTENSION)))
    }
}

fn io_error(path: &Path, e: std::io::Error) -> HistoryError {
    HistoryError::Io(format!("{}: {}", path.display(), e))
}

#[async_trait]
impl HistoryStore for FileHistoryStore {
    async fn load(&self, session_id: &SessionId) -> Result<Option<ContextLog>, HistoryError> {
        let path = self.path_for(session_id)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(&path, e)),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| HistoryError::Serialization(e.to_string()))
    }

    async fn save(&self, log: &ContextLog) -> Result<(), HistoryError> {
        let path = self.path_for(log.session_id())?;
        let json = serde_json::to_vec_pretty(log)
            .map_err(|e| HistoryError::Serialization(e.to_string()))?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error(&self.dir, e))?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| io_error(&tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| io_error(&path, e))?;

        debug!(session = %log.session_id(), entries = log.len(), "Saved session history");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<SessionId>, HistoryError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(e) => e,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(&self.dir, e)),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_error(&self.dir, e))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some(EXTENSION)
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                ids.push(SessionId::new(stem));
            }
        }
        ids.sort();
        Ok(ids)
    }
}
