//! Prompt domain
//!
//! Every system and user prompt sent to a participant, the referee, or the
//! pipeline roles.

mod template;

pub use template::{DEFAULT_SUCCESS_CRITERION, PromptTemplate};
