//! Machine-readable session transcripts.
//!
//! [`JsonlConversationLogger`] implements the application's
//! [`ConversationLogger`](roundtable_application::ConversationLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlConversationLogger;
