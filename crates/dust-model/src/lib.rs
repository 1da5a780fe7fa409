//! Model contract and supporting types for dust particle simulations.
//!
//! `Model` is the plug-in interface: a model is built once from parameters
//! and then used read-only to compute initial conditions and advance state
//! vectors one step at a time. The state itself lives in the particles.
//! `Random` is the replayable draw stream handed to every update.

pub mod info;
pub mod model;
pub mod pars;
pub mod random;
pub mod walk;

pub use info::{ModelInfo, VariableInfo, combinations, variable_names};
pub use model::Model;
pub use pars::{InternalStorage, InternalValue, Pars, set_par_scalar};
pub use random::{Random, RandomCheckpoint};
pub use walk::Walk;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("Expected a value for '{0}'")]
    MissingParameter(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
