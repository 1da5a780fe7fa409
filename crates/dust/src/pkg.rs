//! Direct access to one model instance, outside any ensemble.

use dust_model::{InternalStorage, Model, ModelInfo, Pars, Random, variable_names};
use dust_particle::{Dust, DustError, Result};
use serde::{Deserialize, Serialize};

/// Variable layout of a model's state vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub info: ModelInfo,
    /// One name per state element, e.g. `x[1]`.
    pub names: Vec<String>,
    pub size: usize,
}

/// A single built model plus its parameters and draw stream.
///
/// Useful for checking a model against an independent implementation:
/// `update` and `run` expose exactly what a particle would compute.
#[derive(Debug)]
pub struct ModelWrapper<M> {
    model: M,
    pars: Pars,
    rng: Random,
}

impl<M: Model> ModelWrapper<M> {
    pub fn new(pars: &Pars, rng: Random) -> Result<Self> {
        Ok(Self {
            model: M::new(pars)?,
            pars: pars.clone(),
            rng,
        })
    }

    /// Rebuild the model from new parameters. On error nothing changes.
    pub fn set_pars(&mut self, pars: &Pars) -> Result<()> {
        self.model = M::new(pars)?;
        self.pars = pars.clone();
        Ok(())
    }

    pub fn initial(&self, step: usize) -> Vec<f64> {
        self.model.initial(step)
    }

    /// One step from `y`, drawing from the wrapper's stream.
    pub fn update(&mut self, step: usize, y: &[f64]) -> Result<Vec<f64>> {
        self.check_state(y)?;
        let mut y_next = vec![0.0; self.model.size()];
        self.model.update(step, y, &mut y_next, &mut self.rng);
        Ok(y_next)
    }

    pub fn internal(&self) -> InternalStorage {
        self.model.internal()
    }

    pub fn metadata(&self) -> Metadata {
        let info = self.model.info();
        Metadata {
            names: variable_names(&info),
            size: self.model.size(),
            info,
        }
    }

    /// Simulate one particle from `steps[0]`, recording state at each step.
    ///
    /// Starts from `y` if given, otherwise from the model's initial
    /// conditions. Output is flat with the state index fastest. The wrapper's
    /// stream continues from where the run left it.
    pub fn run(&mut self, steps: &[usize], y: Option<&[f64]>) -> Result<Vec<f64>> {
        let Some(&step_start) = steps.first() else {
            return Err(DustError::InvalidArgument(
                "Expected at least one step".to_string(),
            ));
        };
        if let Some(y) = y {
            self.check_state(y)?;
        }
        let mut dust = Dust::<M>::new(&self.pars, 1, step_start, self.rng.clone())?;
        if let Some(y) = y {
            dust.set_state(&[y.to_vec()])?;
        }
        let state = dust.simulate(steps, None)?;
        self.rng = dust.rng().clone();
        Ok(state.into_vec())
    }

    fn check_state(&self, y: &[f64]) -> Result<()> {
        if y.len() != self.model.size() {
            return Err(DustError::InvalidArgument(format!(
                "Invalid length state, expected {} but given {}",
                self.model.size(),
                y.len()
            )));
        }
        Ok(())
    }
}
