//! Central error type for caller-facing operations.
//!
//! Module-level errors stay in their modules; this aggregate exists so
//! the lifecycle service (and the embedding shell) handle one type.

use thiserror::Error;

use crate::completion::CompletionError;
use crate::config::ConfigError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Event {0} has no plan to enhance. Generate a plan first")]
    NoPlan(String),
}
