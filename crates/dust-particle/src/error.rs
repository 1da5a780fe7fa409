//! Error types for dust-particle.

use dust_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DustError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Particle produced unexpected state size: expected {expected} but given {found}")]
    StateSizeMismatch { expected: usize, found: usize },

    #[error(transparent)]
    ModelUpdateFailure(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, DustError>;
