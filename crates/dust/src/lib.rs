//! dust: stochastic discrete-time simulation with particle ensembles.
//!
//! Umbrella crate re-exporting the model contract, state tensors, particle
//! ensembles and filter, and the replicate-run glue, plus `ModelWrapper`
//! for driving a single model instance directly.

pub use dust_model::{
    self, InternalStorage, InternalValue, Model, ModelError, ModelInfo, Pars, Random,
    RandomCheckpoint, VariableInfo, Walk, combinations, set_par_scalar, variable_names,
};
pub use dust_particle::{
    self, Dust, DustError, FilterData, FilterDataElement, Particle, ParticleFilter,
    effective_sample_size, resample, scale_log_weights,
};
pub use dust_state::{self, State, StateTime, VectorView, VectorViewMut};
pub use dust_wodin::{
    self, Batch, BatchPars, DiscreteRun, DiscreteSeriesSet, SummaryRule, Times, WodinError,
    run_model_discrete, tidy_discrete_solution, wodin_run_discrete,
};

pub mod pkg;

pub use pkg::{Metadata, ModelWrapper};
