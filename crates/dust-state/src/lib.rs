//! State tensors for particle ensembles.
//!
//! `State` holds one time point as `[particle, state]`; `StateTime` holds a
//! series as `[time, particle, state]`. Both are a single contiguous buffer
//! in row-major order (state index fastest). Views are strided windows into
//! that buffer: they never allocate, and writes through one view are seen by
//! every other view over the same cells.

pub mod state;
pub mod state_time;

pub use state::{State, StateBase, StateView, StateViewMut};
pub use state_time::StateTime;

/// Read-only one-dimensional window over a state buffer.
pub type VectorView<'a> = ndarray::ArrayView1<'a, f64>;

/// Writable one-dimensional window over a state buffer.
pub type VectorViewMut<'a> = ndarray::ArrayViewMut1<'a, f64>;
