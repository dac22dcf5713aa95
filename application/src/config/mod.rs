//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`ExecutionParams`]: actor tool loop control (tool turns, call timeout)
//! - [`GameParams`]: coordinator control (retries, vote rule, termination, deadlines)

pub mod execution_params;
pub mod game_params;

pub use execution_params::ExecutionParams;
pub use game_params::GameParams;
