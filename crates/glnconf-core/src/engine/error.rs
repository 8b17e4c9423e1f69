use super::config::ConfigError;
use crate::core::error::{InputError, UnsupportedStateError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    #[error(transparent)]
    UnsupportedState(#[from] UnsupportedStateError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
