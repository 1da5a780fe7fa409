//! Repeated runs over the values of one parameter.

use std::cell::OnceCell;

use dust_model::{Model, Pars, Random};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::discrete::{DiscreteRun, DiscreteSeriesSet, filter_to_central_only, wodin_run_discrete};
use crate::util::{find_closest, which_max, which_min};
use crate::{Result, WodinError};

/// A base parameter set and the values one parameter takes across a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchPars {
    pub base: Pars,
    pub name: String,
    pub values: Vec<f64>,
}

impl BatchPars {
    /// `base` with `name` set to `value`.
    pub fn with_value(&self, value: f64) -> Pars {
        let mut pars = self.base.clone();
        pars.insert(self.name.clone(), value);
        pars
    }
}

/// A batch value whose run failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchError {
    pub value: f64,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSetValues {
    pub name: String,
    pub y: Vec<f64>,
}

/// Series over the batch parameter's values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSet {
    pub x: Vec<f64>,
    pub values: Vec<SeriesSetValues>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtremeKind {
    TMax,
    TMin,
    YMax,
    YMin,
}

/// Time and value of each series' maximum and minimum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extremes<T> {
    pub t_max: T,
    pub t_min: T,
    pub y_max: T,
    pub y_min: T,
}

impl<T> Extremes<T> {
    pub fn get(&self, kind: ExtremeKind) -> &T {
        match kind {
            ExtremeKind::TMax => &self.t_max,
            ExtremeKind::TMin => &self.t_min,
            ExtremeKind::YMax => &self.y_max,
            ExtremeKind::YMin => &self.y_min,
        }
    }
}

/// Extremes of `y` over time axis `t`; NaN when `y` has no finite entry.
fn find_extremes(t: &[f64], y: &[f64]) -> Extremes<f64> {
    let at = |i: Option<usize>, v: &[f64]| i.map_or(f64::NAN, |i| v[i]);
    let i_max = which_max(y);
    let i_min = which_min(y);
    Extremes {
        t_max: at(i_max, t),
        t_min: at(i_min, t),
        y_max: at(i_max, y),
        y_min: at(i_min, y),
    }
}

/// Central series for each successful value of the batch parameter.
///
/// Values whose run fails are recorded in `errors` and left out of `pars`
/// and `solutions`, which stay aligned.
#[derive(Debug)]
pub struct Batch {
    pub pars: BatchPars,
    pub solutions: Vec<DiscreteSeriesSet>,
    pub errors: Vec<BatchError>,
    extremes: OnceCell<Extremes<SeriesSet>>,
}

impl Batch {
    /// Run `M` once per value in `pars`.
    ///
    /// Run `i` draws from its own stream derived from `seed` and `i`, so
    /// results do not depend on which other values failed. Errors only when
    /// every run fails.
    pub fn run<M: Model>(pars: &BatchPars, run: &DiscreteRun, seed: u64) -> Result<Self> {
        let mut values = Vec::new();
        let mut solutions = Vec::new();
        let mut errors = Vec::new();
        for (i, &value) in pars.values.iter().enumerate() {
            let stream = (i as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15);
            let rng = Random::new(seed.wrapping_add(stream));
            match wodin_run_discrete::<M>(&pars.with_value(value), run, None, rng) {
                Ok(solution) => {
                    values.push(value);
                    solutions.push(filter_to_central_only(solution.full()));
                }
                Err(e) => {
                    warn!(name = %pars.name, value, error = %e, "batch run failed");
                    errors.push(BatchError {
                        value,
                        error: e.to_string(),
                    });
                }
            }
        }
        if solutions.is_empty() {
            let first = errors.first().map_or_else(
                || "no values given".to_string(),
                |e| e.error.clone(),
            );
            return Err(WodinError::AllRunsFailed(first));
        }
        debug!(
            name = %pars.name,
            n_ok = solutions.len(),
            n_failed = errors.len(),
            "batch complete"
        );
        Ok(Self {
            pars: BatchPars {
                base: pars.base.clone(),
                name: pars.name.clone(),
                values,
            },
            solutions,
            errors,
            extremes: OnceCell::new(),
        })
    }

    fn series_names(&self) -> Vec<String> {
        self.solutions[0]
            .values
            .iter()
            .map(|s| s.name.clone())
            .collect()
    }

    /// Each series' value at the output time closest to `time`, against the
    /// batch parameter.
    pub fn value_at_time(&self, time: f64) -> SeriesSet {
        let i_time = find_closest(time, &self.solutions[0].x);
        let values = self
            .series_names()
            .into_iter()
            .enumerate()
            .map(|(i_series, name)| SeriesSetValues {
                name,
                y: self
                    .solutions
                    .iter()
                    .map(|s| {
                        s.values
                            .get(i_series)
                            .and_then(|v| v.y.get(i_time))
                            .copied()
                            .unwrap_or(f64::NAN)
                    })
                    .collect(),
            })
            .collect();
        SeriesSet {
            x: self.pars.values.clone(),
            values,
        }
    }

    /// Extremes of every series for each batch value, computed once.
    pub fn extremes(&self) -> &Extremes<SeriesSet> {
        self.extremes.get_or_init(|| self.compute_extremes())
    }

    pub fn extreme(&self, kind: ExtremeKind) -> &SeriesSet {
        self.extremes().get(kind)
    }

    fn compute_extremes(&self) -> Extremes<SeriesSet> {
        let per_run: Vec<Vec<Extremes<f64>>> = self
            .solutions
            .iter()
            .map(|s| s.values.iter().map(|v| find_extremes(&s.x, &v.y)).collect())
            .collect();
        let names = self.series_names();
        let series = |kind: ExtremeKind| SeriesSet {
            x: self.pars.values.clone(),
            values: names
                .iter()
                .enumerate()
                .map(|(i_series, name)| SeriesSetValues {
                    name: name.clone(),
                    y: per_run
                        .iter()
                        .map(|run| run.get(i_series).map_or(f64::NAN, |e| *e.get(kind)))
                        .collect(),
                })
                .collect(),
        };
        Extremes {
            t_max: series(ExtremeKind::TMax),
            t_min: series(ExtremeKind::TMin),
            y_max: series(ExtremeKind::YMax),
            y_min: series(ExtremeKind::YMin),
        }
    }
}
