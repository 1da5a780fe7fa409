//! Ensemble state at a single time point.

use std::fmt;

use ndarray::{
    Array2, ArrayBase, ArrayView2, Data, DataMut, Ix2, OwnedRepr, RawData, RawDataClone,
    ShapeError, ViewRepr,
};

use crate::{VectorView, VectorViewMut};

/// Matrix-like `[particle, state]` storage, generic over ownership.
///
/// Use the aliases: [`State`] owns its buffer, while [`StateView`] and
/// [`StateViewMut`] borrow a time slice out of a
/// [`StateTime`](crate::StateTime).
pub struct StateBase<S>
where
    S: RawData<Elem = f64>,
{
    data: ArrayBase<S, Ix2>,
}

/// Owned state at one time point.
pub type State = StateBase<OwnedRepr<f64>>;

/// Borrowed, read-only state at one time point.
pub type StateView<'a> = StateBase<ViewRepr<&'a f64>>;

/// Borrowed, writable state at one time point.
pub type StateViewMut<'a> = StateBase<ViewRepr<&'a mut f64>>;

impl State {
    /// Allocate zeroed storage for `n_particles` particles of `n_state` elements.
    pub fn new(n_state: usize, n_particles: usize) -> Self {
        Self {
            data: Array2::zeros((n_particles, n_state)),
        }
    }

    /// Wrap a flat buffer laid out particle by particle.
    pub fn from_shape_vec(
        n_state: usize,
        n_particles: usize,
        data: Vec<f64>,
    ) -> Result<Self, ShapeError> {
        Ok(Self {
            data: Array2::from_shape_vec((n_particles, n_state), data)?,
        })
    }

    /// Consume the state, returning the flat buffer.
    pub fn into_vec(self) -> Vec<f64> {
        self.data.into_raw_vec()
    }
}

impl<S> StateBase<S>
where
    S: RawData<Elem = f64>,
{
    pub(crate) fn from_array(data: ArrayBase<S, Ix2>) -> Self {
        Self { data }
    }

    /// Number of state elements per particle.
    pub fn n_state(&self) -> usize {
        self.data.ncols()
    }

    /// Number of particles.
    pub fn n_particles(&self) -> usize {
        self.data.nrows()
    }
}

impl<S> StateBase<S>
where
    S: Data<Elem = f64>,
{
    /// The state vector of particle `i_particle`, of length `n_state`.
    pub fn view_particle(&self, i_particle: usize) -> VectorView<'_> {
        self.data.row(i_particle)
    }

    /// State element `i_state` across all particles, of length `n_particles`.
    pub fn view_state(&self, i_state: usize) -> VectorView<'_> {
        self.data.column(i_state)
    }

    pub fn get(&self, i_particle: usize, i_state: usize) -> f64 {
        self.data[[i_particle, i_state]]
    }

    /// Copy out the state of one particle.
    pub fn get_particle(&self, i_particle: usize) -> Vec<f64> {
        self.view_particle(i_particle).to_vec()
    }

    /// Copy out one state element across particles.
    pub fn get_state(&self, i_state: usize) -> Vec<f64> {
        self.view_state(i_state).to_vec()
    }

    /// Copy out every particle's state, one row per particle.
    pub fn as_matrix(&self) -> Vec<Vec<f64>> {
        self.data.rows().into_iter().map(|row| row.to_vec()).collect()
    }

    /// The underlying `[particle, state]` array.
    pub fn as_array(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    /// Borrow as a read-only view.
    pub fn view(&self) -> StateView<'_> {
        StateBase::from_array(self.data.view())
    }
}

impl<S> StateBase<S>
where
    S: DataMut<Elem = f64>,
{
    /// Writable state vector of particle `i_particle`.
    pub fn view_particle_mut(&mut self, i_particle: usize) -> VectorViewMut<'_> {
        self.data.row_mut(i_particle)
    }

    /// Writable state element `i_state` across all particles.
    pub fn view_state_mut(&mut self, i_state: usize) -> VectorViewMut<'_> {
        self.data.column_mut(i_state)
    }

    pub fn set(&mut self, i_particle: usize, i_state: usize, value: f64) {
        self.data[[i_particle, i_state]] = value;
    }

    /// Borrow as a writable view.
    pub fn view_mut(&mut self) -> StateViewMut<'_> {
        StateBase::from_array(self.data.view_mut())
    }
}

impl<S> Clone for StateBase<S>
where
    S: RawDataClone<Elem = f64>,
{
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
        }
    }
}

impl<S> fmt::Debug for StateBase<S>
where
    S: Data<Elem = f64>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("n_state", &self.n_state())
            .field("n_particles", &self.n_particles())
            .field("data", &self.data)
            .finish()
    }
}

impl<S, S2> PartialEq<StateBase<S2>> for StateBase<S>
where
    S: Data<Elem = f64>,
    S2: Data<Elem = f64>,
{
    fn eq(&self, other: &StateBase<S2>) -> bool {
        self.data == other.data
    }
}
