//! Replicate runs of discrete-time models, summarised for plotting.
//!
//! A model is run for a number of particles (independent replicates) over a
//! grid of steps. Each state element becomes either a single deterministic
//! trace, when every replicate agrees, or the individual traces plus
//! summaries such as the mean. Batches repeat this over values of one
//! parameter and collect per-value summaries and extremes.

pub mod batch;
pub mod discrete;
pub mod util;

pub use batch::{Batch, BatchError, BatchPars, ExtremeKind, Extremes, SeriesSet, SeriesSetValues};
pub use discrete::{
    DiscreteRun, DiscreteSeriesSet, DiscreteSeriesValues, DiscreteSolution,
    FilteredDiscreteSolution, SeriesMode, SummaryRule, Times, filter_index, filter_solution,
    filter_to_central_only, run_model_discrete, tidy_discrete_solution, wodin_run_discrete,
};

use dust_particle::DustError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WodinError {
    #[error(transparent)]
    Dust(#[from] DustError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("All solutions failed; first error: {0}")]
    AllRunsFailed(String),
}

pub type Result<T> = std::result::Result<T, WodinError>;
