//! Orchestration vocabulary shared by the coordinator and its observers.

pub mod phase;

pub use phase::Phase;
