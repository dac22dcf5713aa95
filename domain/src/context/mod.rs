//! Shared context log: the coordinator's append-only session record.

pub mod log;

pub use log::{ContextLog, LogEntry, PublicUtterance};
