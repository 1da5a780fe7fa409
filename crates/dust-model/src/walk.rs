//! Gaussian random walk, the smallest useful stochastic model.

use crate::{
    InternalStorage, InternalValue, Model, ModelError, ModelInfo, Pars, Random, Result,
    VariableInfo, set_par_scalar,
};

/// `n` independent random walks with normally distributed increments.
///
/// Parameters: `n` (number of walkers, default 1) and `sd` (standard
/// deviation of each increment, default 1). Every walker starts at the
/// value of the initial step.
#[derive(Debug, Clone)]
pub struct Walk {
    n: usize,
    sd: f64,
    internal: InternalStorage,
}

impl Walk {
    pub fn sd(&self) -> f64 {
        self.sd
    }
}

fn scalar(internal: &InternalStorage, name: &str) -> Result<f64> {
    internal
        .get(name)
        .and_then(InternalValue::as_scalar)
        .ok_or_else(|| ModelError::MissingParameter(name.to_string()))
}

impl Model for Walk {
    fn new(pars: &Pars) -> Result<Self> {
        let mut internal = InternalStorage::new();
        set_par_scalar(pars, "n", &mut internal, Some(1.0))?;
        set_par_scalar(pars, "sd", &mut internal, Some(1.0))?;

        let n = scalar(&internal, "n")?;
        if n < 1.0 || n.fract() != 0.0 {
            return Err(ModelError::InvalidParameter(format!(
                "'n' must be a positive integer, but was {n}"
            )));
        }
        let sd = scalar(&internal, "sd")?;
        if !sd.is_finite() || sd < 0.0 {
            return Err(ModelError::InvalidParameter(format!(
                "'sd' must be non-negative, but was {sd}"
            )));
        }

        Ok(Self {
            n: n as usize,
            sd,
            internal,
        })
    }

    fn size(&self) -> usize {
        self.n
    }

    fn initial(&self, step: usize) -> Vec<f64> {
        vec![step as f64; self.n]
    }

    fn update(&self, _step: usize, y: &[f64], y_next: &mut [f64], rng: &mut Random) {
        for (next, &current) in y_next.iter_mut().zip(y) {
            *next = rng.normal(current, self.sd);
        }
    }

    fn info(&self) -> ModelInfo {
        vec![VariableInfo::array("x", &[self.n])]
    }

    fn internal(&self) -> InternalStorage {
        self.internal.clone()
    }
}
