//! Ensemble state collected over a series of time points.

use ndarray::{Array3, ArrayView3, Axis, s};

use crate::{StateBase, StateView, StateViewMut, VectorView, VectorViewMut};

/// `[time, particle, state]` storage in one contiguous buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct StateTime {
    data: Array3<f64>,
}

impl StateTime {
    /// Allocate zeroed storage.
    pub fn new(n_state: usize, n_particles: usize, n_time: usize) -> Self {
        Self {
            data: Array3::zeros((n_time, n_particles, n_state)),
        }
    }

    pub fn n_state(&self) -> usize {
        self.data.shape()[2]
    }

    pub fn n_particles(&self) -> usize {
        self.data.shape()[1]
    }

    pub fn n_time(&self) -> usize {
        self.data.shape()[0]
    }

    /// All particles at time index `i_time`.
    pub fn view_time(&self, i_time: usize) -> StateView<'_> {
        StateBase::from_array(self.data.index_axis(Axis(0), i_time))
    }

    /// Writable slice of all particles at time index `i_time`.
    pub fn view_time_mut(&mut self, i_time: usize) -> StateViewMut<'_> {
        StateBase::from_array(self.data.index_axis_mut(Axis(0), i_time))
    }

    /// State vector of one particle at one time, of length `n_state`.
    pub fn view_particle(&self, i_particle: usize, i_time: usize) -> VectorView<'_> {
        self.data.slice(s![i_time, i_particle, ..])
    }

    pub fn view_particle_mut(&mut self, i_particle: usize, i_time: usize) -> VectorViewMut<'_> {
        self.data.slice_mut(s![i_time, i_particle, ..])
    }

    /// One state element across particles at one time, of length `n_particles`.
    pub fn view_state(&self, i_state: usize, i_time: usize) -> VectorView<'_> {
        self.data.slice(s![i_time, .., i_state])
    }

    pub fn view_state_mut(&mut self, i_state: usize, i_time: usize) -> VectorViewMut<'_> {
        self.data.slice_mut(s![i_time, .., i_state])
    }

    /// Time series of one state element for one particle, of length `n_time`.
    pub fn view_trace(&self, i_state: usize, i_particle: usize) -> VectorView<'_> {
        self.data.slice(s![.., i_particle, i_state])
    }

    pub fn view_trace_mut(&mut self, i_state: usize, i_particle: usize) -> VectorViewMut<'_> {
        self.data.slice_mut(s![.., i_particle, i_state])
    }

    pub fn get_particle(&self, i_particle: usize, i_time: usize) -> Vec<f64> {
        self.view_particle(i_particle, i_time).to_vec()
    }

    pub fn get_state(&self, i_state: usize, i_time: usize) -> Vec<f64> {
        self.view_state(i_state, i_time).to_vec()
    }

    pub fn get_trace(&self, i_state: usize, i_particle: usize) -> Vec<f64> {
        self.view_trace(i_state, i_particle).to_vec()
    }

    /// The underlying `[time, particle, state]` array.
    pub fn as_array(&self) -> ArrayView3<'_, f64> {
        self.data.view()
    }

    /// Consume the tensor, returning the flat buffer in time-major order.
    pub fn into_vec(self) -> Vec<f64> {
        self.data.into_raw_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const N_STATE: usize = 5;
    const N_PARTICLES: usize = 7;
    const N_TIME: usize = 11;

    fn filled_state_time() -> StateTime {
        let mut state = StateTime::new(N_STATE, N_PARTICLES, N_TIME);
        for (i, x) in state.data.iter_mut().enumerate() {
            *x = i as f64;
        }
        state
    }

    #[test]
    fn test_construction() {
        let state = StateTime::new(N_STATE, N_PARTICLES, N_TIME);
        assert_eq!(state.n_state(), N_STATE);
        assert_eq!(state.n_particles(), N_PARTICLES);
        assert_eq!(state.n_time(), N_TIME);
    }

    #[test]
    fn test_view_lengths() {
        let state = filled_state_time();
        assert_eq!(state.view_particle(0, 0).len(), N_STATE);
        assert_eq!(state.view_state(0, 0).len(), N_PARTICLES);
        assert_eq!(state.view_trace(0, 0).len(), N_TIME);
    }

    #[test]
    fn test_stride_order() {
        let state = filled_state_time();
        let per_time = (N_STATE * N_PARTICLES) as f64;
        assert_eq!(
            state.get_particle(2, 1)[3],
            per_time + 2.0 * N_STATE as f64 + 3.0
        );
        let expected: Vec<f64> = (0..N_PARTICLES).map(|i| (i * N_STATE + 1) as f64).collect();
        assert_eq!(state.get_state(1, 0), expected);
        let trace = state.get_trace(4, 6);
        assert_eq!(trace[0], 34.0);
        assert_eq!(trace[1] - trace[0], per_time);
    }

    #[test]
    fn test_view_time_matches_direct_views() {
        let state = filled_state_time();
        let slice = state.view_time(3);
        assert_eq!(slice.n_state(), N_STATE);
        assert_eq!(slice.n_particles(), N_PARTICLES);
        assert_eq!(slice.get_particle(4), state.get_particle(4, 3));
        assert_eq!(slice.get_state(2), state.get_state(2, 3));
    }

    #[test]
    fn test_write_through_state_view_seen_by_particle_view() {
        let mut state = filled_state_time();
        let mut column = state.view_state_mut(2, 5);
        column[4] = -1.0;
        assert_eq!(state.view_particle(4, 5)[2], -1.0);
        assert_eq!(state.view_trace(2, 4)[5], -1.0);
    }

    #[test]
    fn test_write_through_time_slice() {
        let mut state = filled_state_time();
        {
            let mut slice = state.view_time_mut(1);
            let mut p = slice.view_particle_mut(0);
            p[0] = 42.0;
        }
        assert_eq!(state.get_particle(0, 1)[0], 42.0);
        assert_eq!(state.get_trace(0, 0)[1], 42.0);
    }

    #[test]
    fn test_write_through_trace_view() {
        let mut state = StateTime::new(2, 3, 4);
        let mut trace = state.view_trace_mut(1, 2);
        for t in 0..4 {
            trace[t] = t as f64;
        }
        assert_eq!(state.get_state(1, 3), vec![0.0, 0.0, 3.0]);
    }

    #[test]
    fn test_into_vec_is_time_major() {
        let mut state = StateTime::new(1, 2, 2);
        let mut p = state.view_particle_mut(1, 1);
        p[0] = 9.0;
        assert_eq!(state.into_vec(), vec![0.0, 0.0, 0.0, 9.0]);
    }
}
