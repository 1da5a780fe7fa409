//! The model plug-in trait.

use crate::{InternalStorage, ModelInfo, Pars, Random, Result};

/// A discrete-time stochastic model.
///
/// One instance is constructed per parameter set and shared, read-only, by
/// every particle of an ensemble. Implementations must keep all per-particle
/// state in the vectors passed to [`Model::update`]; the instance itself is
/// configuration.
pub trait Model {
    /// Build the model from user parameters, validating them eagerly.
    fn new(pars: &Pars) -> Result<Self>
    where
        Self: Sized;

    /// Length of the state vector.
    fn size(&self) -> usize;

    /// Initial conditions at `step`, of length [`Model::size`].
    fn initial(&self, step: usize) -> Vec<f64>;

    /// Advance from `y` at `step` into `y_next`.
    ///
    /// `y_next` holds stale data from an earlier step and must only be
    /// written to.
    fn update(&self, step: usize, y: &[f64], y_next: &mut [f64], rng: &mut Random);

    /// How variables are packed into the state vector.
    fn info(&self) -> ModelInfo;

    /// Snapshot of internal storage, used for debugging and parity tests.
    fn internal(&self) -> InternalStorage;
}
