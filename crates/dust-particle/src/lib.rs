//! Particle ensembles for sequential Monte Carlo over discrete-time models.
//!
//! Provides:
//! - `Particle`: one replicate with a double-buffered state vector
//! - `Dust`: an ensemble sharing one model instance and one draw stream
//! - Systematic resampling and weight helpers
//! - A bootstrap particle filter driving a `Dust` against observations

pub mod ensemble;
pub mod error;
pub mod filter;
pub mod particle;
pub mod resample;

pub use ensemble::Dust;
pub use error::{DustError, Result};
pub use filter::{FilterData, FilterDataElement, ParticleFilter};
pub use particle::Particle;
pub use resample::{effective_sample_size, resample, scale_log_weights};
