//! Cross-run session memory.
//!
//! Two [`HistoryStore`](roundtable_application::HistoryStore) adapters:
//! [`InMemoryHistoryStore`] for single-process runs and tests, and
//! [`FileHistoryStore`] keeping one JSON document per session on disk.

mod file;
mod memory;

pub use file::FileHistoryStore;
pub use memory::InMemoryHistoryStore;
