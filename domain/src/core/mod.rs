//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: hosted models (DeepSeek, GPT, Gemini, Sonar, ...)
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
