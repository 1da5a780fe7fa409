//! Multi-particle ensembles sharing one model and one draw stream.

use std::sync::Arc;

use dust_model::{InternalStorage, Model, ModelInfo, Pars, Random};
use dust_state::{State, StateTime};
use tracing::{debug, trace};

use crate::{DustError, Particle, Result, resample};

/// An ensemble of particles advanced together.
///
/// The model is built once and shared by every particle. Particles are
/// always stepped in index order against the same [`Random`] stream, so a
/// replayed stream reproduces a run exactly.
#[derive(Debug)]
pub struct Dust<M> {
    model: Arc<M>,
    particles: Vec<Particle<M>>,
    rng: Random,
}

impl<M: Model> Dust<M> {
    /// Build the model from `pars` and create `n_particles` particles at
    /// `step`, each starting from the model's initial conditions.
    pub fn new(pars: &Pars, n_particles: usize, step: usize, rng: Random) -> Result<Self> {
        if n_particles == 0 {
            return Err(DustError::InvalidArgument(
                "Expected at least one particle".to_string(),
            ));
        }
        let model = Arc::new(M::new(pars)?);
        let particles = (0..n_particles)
            .map(|_| Particle::new(Arc::clone(&model), step, None))
            .collect::<Result<Vec<_>>>()?;
        debug!(n_particles, n_state = model.size(), step, "ensemble created");
        Ok(Self {
            model,
            particles,
            rng,
        })
    }

    /// Number of state elements per particle.
    pub fn n_state(&self) -> usize {
        self.particles[0].size()
    }

    pub fn n_particles(&self) -> usize {
        self.particles.len()
    }

    /// The current step, common to all particles.
    pub fn step(&self) -> usize {
        self.particles[0].step
    }

    /// How variables are packed into each particle's state.
    pub fn info(&self) -> ModelInfo {
        self.model.info()
    }

    /// The shared model's internal storage.
    pub fn internal(&self) -> InternalStorage {
        self.model.internal()
    }

    pub fn particle(&self, i: usize) -> &Particle<M> {
        &self.particles[i]
    }

    pub fn rng(&self) -> &Random {
        &self.rng
    }

    pub fn rng_mut(&mut self) -> &mut Random {
        &mut self.rng
    }

    /// Replace the model with one built from new parameters.
    ///
    /// Each particle keeps its state unless `set_initial_state` is true, in
    /// which case it restarts from the new model's initial conditions at the
    /// current step. The new model must have the same state size. On error
    /// the ensemble is unchanged.
    pub fn set_pars(&mut self, pars: &Pars, set_initial_state: bool) -> Result<()> {
        let step = self.step();
        let model = Arc::new(M::new(pars)?);
        if model.size() != self.n_state() {
            return Err(DustError::StateSizeMismatch {
                expected: self.n_state(),
                found: model.size(),
            });
        }
        let particles = self
            .particles
            .iter()
            .map(|p| {
                let state = if set_initial_state { None } else { Some(p.state()) };
                Particle::new(Arc::clone(&model), step, state)
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(step, set_initial_state, "parameters replaced");
        self.model = model;
        self.particles = particles;
        Ok(())
    }

    /// Move every particle to `step` without touching its state.
    pub fn set_step(&mut self, step: usize) {
        for p in &mut self.particles {
            p.step = step;
        }
    }

    /// Replace every particle's state, one row per particle.
    ///
    /// All rows are validated before anything is written.
    pub fn set_state(&mut self, state: &[Vec<f64>]) -> Result<()> {
        self.check_state(state)?;
        for (p, s) in self.particles.iter_mut().zip(state) {
            p.set_state(s)?;
        }
        Ok(())
    }

    /// Run every particle up to `step_end`, particle 0 first.
    pub fn run(&mut self, step_end: usize) {
        trace!(from = self.step(), to = step_end, "run");
        for p in &mut self.particles {
            p.run(step_end, &mut self.rng);
        }
    }

    /// Run through each of `step_end` in turn, recording state after each.
    ///
    /// `step_end` must be strictly increasing and start at or after the
    /// current step. With an `index`, only those state elements are
    /// recorded, in that order.
    pub fn simulate(&mut self, step_end: &[usize], index: Option<&[usize]>) -> Result<StateTime> {
        if let Some(&first) = step_end.first() {
            if first < self.step() {
                return Err(DustError::InvalidArgument(format!(
                    "Expected first step_end ({first}) to be at least the current step ({})",
                    self.step()
                )));
            }
        }
        if step_end.windows(2).any(|w| w[1] <= w[0]) {
            return Err(DustError::InvalidArgument(
                "Expected step_end to be strictly increasing".to_string(),
            ));
        }
        let n_state = self.check_index(index)?;

        let mut state = StateTime::new(n_state, self.n_particles(), step_end.len());
        for (i_time, &step) in step_end.iter().enumerate() {
            self.run(step);
            for (i_particle, p) in self.particles.iter().enumerate() {
                let mut view = state.view_particle_mut(i_particle, i_time);
                p.copy_state(&mut view, index);
            }
        }
        Ok(state)
    }

    /// Copy out the current state of every particle.
    ///
    /// With an `index`, element `i` of each particle's row is state element
    /// `index[i]`; elements may be repeated or reordered.
    pub fn state(&self, index: Option<&[usize]>) -> Result<State> {
        let n_state = self.check_index(index)?;
        let mut state = State::new(n_state, self.n_particles());
        for (i_particle, p) in self.particles.iter().enumerate() {
            let mut view = state.view_particle_mut(i_particle);
            p.copy_state(&mut view, index);
        }
        Ok(state)
    }

    /// Shuffle particle state so that particle `i` takes the state of
    /// particle `index[i]`.
    ///
    /// Sources may repeat. All copies go into each particle's next buffer,
    /// reading only current buffers, and the buffers are swapped once every
    /// copy is done, so no source is overwritten before it has been read.
    pub fn reorder(&mut self, index: &[usize]) -> Result<()> {
        let n = self.n_particles();
        if index.len() != n {
            return Err(DustError::InvalidArgument(format!(
                "Invalid index length, expected {n} but given {}",
                index.len()
            )));
        }
        if let Some(&bad) = index.iter().find(|&&i| i >= n) {
            return Err(DustError::InvalidArgument(format!(
                "Invalid index entry {bad}, expected values in [0, {n})"
            )));
        }

        for (dest, &src) in index.iter().enumerate() {
            let mut next = std::mem::take(self.particles[dest].next_state_mut());
            next.copy_from_slice(self.particles[src].state());
            *self.particles[dest].next_state_mut() = next;
        }
        for p in &mut self.particles {
            p.swap();
        }
        trace!(n_particles = n, "particles reordered");
        Ok(())
    }

    /// Systematically resample particles in proportion to `weights`.
    ///
    /// Takes one uniform draw from the ensemble's stream and returns the
    /// index that was applied with [`Dust::reorder`].
    pub fn resample(&mut self, weights: &[f64]) -> Result<Vec<usize>> {
        if weights.len() != self.n_particles() {
            return Err(DustError::InvalidArgument(format!(
                "Invalid weights length, expected {} but given {}",
                self.n_particles(),
                weights.len()
            )));
        }
        let u = self.rng.random();
        let index = resample(weights, u);
        self.reorder(&index)?;
        Ok(index)
    }

    fn check_state(&self, state: &[Vec<f64>]) -> Result<()> {
        if state.len() != self.n_particles() {
            return Err(DustError::InvalidArgument(format!(
                "Invalid length state, expected {} but given {}",
                self.n_particles(),
                state.len()
            )));
        }
        for (i, s) in state.iter().enumerate() {
            if s.len() != self.n_state() {
                return Err(DustError::InvalidArgument(format!(
                    "Invalid length state for particle {i}, expected {} but given {}",
                    self.n_state(),
                    s.len()
                )));
            }
        }
        Ok(())
    }

    /// Validate an optional state index, returning the number of elements
    /// it selects.
    fn check_index(&self, index: Option<&[usize]>) -> Result<usize> {
        let Some(index) = index else {
            return Ok(self.n_state());
        };
        if let Some(&bad) = index.iter().find(|&&i| i >= self.n_state()) {
            return Err(DustError::InvalidArgument(format!(
                "Invalid state index {bad}, expected values in [0, {})",
                self.n_state()
            )));
        }
        Ok(index.len())
    }
}
