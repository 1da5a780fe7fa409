//! Observed data and a bootstrap particle filter.

use dust_model::Model;
use dust_state::VectorView;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Dust, DustError, Result, scale_log_weights};

/// One observation, taken at the end of `step`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDataElement<D> {
    pub step: usize,
    pub data: D,
}

/// A series of observations following a starting step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterData<D> {
    pub step_start: usize,
    pub data: Vec<FilterDataElement<D>>,
}

impl<D> FilterData<D> {
    /// Check that observation steps are strictly increasing and all come
    /// after `step_start`.
    pub fn validate(&self) -> Result<()> {
        let mut prev = self.step_start;
        for el in &self.data {
            if el.step <= prev {
                return Err(DustError::InvalidArgument(
                    "Expected times to be strictly increasing".to_string(),
                ));
            }
            prev = el.step;
        }
        Ok(())
    }
}

/// Bootstrap particle filter.
///
/// `compare` scores one particle's state against an observation, returning
/// a log-likelihood: finite, or `-inf` for an impossible state. `+inf` is
/// rejected when the filter runs.
pub struct ParticleFilter<D, F> {
    data: FilterData<D>,
    compare: F,
}

impl<D, F> ParticleFilter<D, F>
where
    F: FnMut(VectorView<'_>, &D) -> f64,
{
    pub fn new(data: FilterData<D>, compare: F) -> Result<Self> {
        data.validate()?;
        Ok(Self { data, compare })
    }

    pub fn data(&self) -> &FilterData<D> {
        &self.data
    }

    /// Run the filter over `dust`, returning the log marginal likelihood.
    ///
    /// The ensemble is moved to the starting step (its state is left as is,
    /// so set it first if needed). At each observation the particles are
    /// run forward, weighted with `compare` and resampled. Stops early and
    /// returns `-inf` once no particle is consistent with the data. Fails
    /// with `InvalidArgument` if `compare` returns `+inf`.
    pub fn run<M: Model>(&mut self, dust: &mut Dust<M>) -> Result<f64> {
        dust.set_step(self.data.step_start);
        let n_particles = dust.n_particles();
        let mut log_likelihood = 0.0;
        let mut log_weights = vec![0.0; n_particles];

        for el in &self.data.data {
            dust.run(el.step);
            for (i, w) in log_weights.iter_mut().enumerate() {
                let state = VectorView::from(dust.particle(i).state());
                *w = (self.compare)(state, &el.data);
                if *w == f64::INFINITY {
                    return Err(DustError::InvalidArgument(format!(
                        "Expected a finite log-likelihood for particle {i} at step {}",
                        el.step
                    )));
                }
            }
            let (weights, log_mean) = scale_log_weights(&log_weights);
            log_likelihood += log_mean;
            debug!(step = el.step, log_likelihood, "filter step");
            if log_likelihood == f64::NEG_INFINITY {
                break;
            }
            dust.resample(&weights)?;
        }

        Ok(log_likelihood)
    }
}
