//! A single replicate of a model.

use std::sync::Arc;

use dust_model::{Model, ModelInfo, Random};
use dust_state::VectorViewMut;

use crate::{DustError, Result};

/// One particle: a step counter plus current and next state buffers.
///
/// The model handle is shared with every other particle of the ensemble.
/// Each step the model writes into the next buffer and the two buffers are
/// swapped, so no state is copied while running.
#[derive(Debug)]
pub struct Particle<M> {
    /// The step the particle is currently at.
    pub step: usize,
    size: usize,
    model: Arc<M>,
    y: Vec<f64>,
    y_next: Vec<f64>,
}

impl<M: Model> Particle<M> {
    /// Create a particle at `step`.
    ///
    /// Without an explicit `state` the initial conditions come from
    /// [`Model::initial`]. Fails if the state does not have the length the
    /// model reports.
    pub fn new(model: Arc<M>, step: usize, state: Option<&[f64]>) -> Result<Self> {
        let size = model.size();
        let y = match state {
            Some(state) => state.to_vec(),
            None => model.initial(step),
        };
        if y.len() != size {
            return Err(DustError::StateSizeMismatch {
                expected: size,
                found: y.len(),
            });
        }
        Ok(Self {
            step,
            size,
            model,
            y,
            y_next: vec![0.0; size],
        })
    }

    /// Length of the state vector; fixed for the particle's lifetime.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn info(&self) -> ModelInfo {
        self.model.info()
    }

    pub fn model(&self) -> &Arc<M> {
        &self.model
    }

    /// Run up to `step_end`, one model update per step in ascending order.
    ///
    /// Does nothing if the particle is already at or past `step_end`.
    pub fn run(&mut self, step_end: usize, rng: &mut Random) {
        while self.step < step_end {
            self.model.update(self.step, &self.y, &mut self.y_next, rng);
            self.step += 1;
            self.swap();
        }
    }

    /// Current state.
    pub fn state(&self) -> &[f64] {
        &self.y
    }

    /// Copy the current state into `dest`.
    ///
    /// With an `index`, element `i` of `dest` receives state element
    /// `index[i]`; indices may repeat or be in any order. Indices must be
    /// within `size`.
    pub fn copy_state(&self, dest: &mut VectorViewMut<'_>, index: Option<&[usize]>) {
        match index {
            Some(index) => {
                for (d, &i) in dest.iter_mut().zip(index) {
                    *d = self.y[i];
                }
            }
            None => {
                for (d, &x) in dest.iter_mut().zip(&self.y) {
                    *d = x;
                }
            }
        }
    }

    /// Overwrite the current state.
    pub fn set_state(&mut self, state: &[f64]) -> Result<()> {
        self.check_length(state)?;
        self.y.copy_from_slice(state);
        Ok(())
    }

    /// Overwrite the next-state buffer, to be made current by [`Particle::swap`].
    pub fn set_next_state(&mut self, state: &[f64]) -> Result<()> {
        self.check_length(state)?;
        self.y_next.copy_from_slice(state);
        Ok(())
    }

    /// Exchange the current and next buffers without copying.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.y, &mut self.y_next);
    }

    pub(crate) fn next_state_mut(&mut self) -> &mut Vec<f64> {
        &mut self.y_next
    }

    fn check_length(&self, state: &[f64]) -> Result<()> {
        if state.len() != self.size {
            return Err(DustError::InvalidArgument(format!(
                "Invalid length state, expected {} but given {}",
                self.size,
                state.len()
            )));
        }
        Ok(())
    }
}
