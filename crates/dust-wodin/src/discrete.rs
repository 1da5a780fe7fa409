//! Replicate runs of a discrete-time model, tidied into series.

use dust_model::{Model, ModelInfo, Pars, Random, variable_names};
use dust_particle::Dust;
use dust_state::StateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::util::{apply_array, find_closest, is_equal_array, mean, seq_by};
use crate::{Result, WodinError};

/// Time window, step size and replicate count for a discrete run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscreteRun {
    pub time_start: f64,
    pub time_end: f64,
    pub dt: f64,
    pub n_particles: usize,
}

impl Default for DiscreteRun {
    fn default() -> Self {
        Self {
            time_start: 0.0,
            time_end: 100.0,
            dt: 1.0,
            n_particles: 10,
        }
    }
}

impl DiscreteRun {
    pub fn validate(&self) -> Result<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(WodinError::InvalidArgument(format!(
                "Expected a positive dt, but given {}",
                self.dt
            )));
        }
        if !(self.time_start.is_finite() && self.time_start >= 0.0) {
            return Err(WodinError::InvalidArgument(format!(
                "Expected a non-negative time_start, but given {}",
                self.time_start
            )));
        }
        if !(self.time_end.is_finite() && self.time_end >= self.time_start) {
            return Err(WodinError::InvalidArgument(format!(
                "Expected time_end ({}) to be at least time_start ({})",
                self.time_end, self.time_start
            )));
        }
        Ok(())
    }

    /// First and last step covering the time window.
    pub fn step_range(&self) -> (usize, usize) {
        let step_start = (self.time_start / self.dt).floor() as usize;
        let step_end = (self.time_end / self.dt).ceil() as usize;
        (step_start, step_end)
    }
}

/// Full output of a discrete run: every state element of every particle at
/// every recorded step.
#[derive(Debug, Clone)]
pub struct DiscreteSolution {
    pub info: ModelInfo,
    pub state: StateTime,
    pub times: Vec<f64>,
}

/// Run `n_particles` replicates of `M` across the window in `run`.
///
/// Output is recorded at every step from `floor(time_start / dt)` to
/// `ceil(time_end / dt)` inclusive; the time of step `s` is `s * dt`.
pub fn run_model_discrete<M: Model>(
    pars: &Pars,
    run: &DiscreteRun,
    rng: Random,
) -> Result<DiscreteSolution> {
    run.validate()?;
    let (step_start, step_end) = run.step_range();
    let mut dust = Dust::<M>::new(pars, run.n_particles, step_start, rng)?;
    let steps: Vec<usize> = (step_start..=step_end).collect();
    let state = dust.simulate(&steps, None)?;
    let times = steps.iter().map(|&s| s as f64 * run.dt).collect();
    debug!(
        n_particles = run.n_particles,
        step_start, step_end, "discrete run complete"
    );
    Ok(DiscreteSolution {
        info: dust.info(),
        state,
        times,
    })
}

/// How a series was derived from the replicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesMode {
    /// One particle's trace.
    Individual,
    /// Every particle agreed, so a single trace stands for all.
    Deterministic,
    /// A statistic over particles at each time.
    Summary,
}

/// A per-time statistic computed across particles.
#[derive(Debug, Clone, Copy)]
pub struct SummaryRule {
    pub description: &'static str,
    pub summary: fn(&[f64]) -> f64,
}

impl SummaryRule {
    pub fn mean() -> Self {
        Self {
            description: "Mean",
            summary: mean,
        }
    }
}

impl Default for SummaryRule {
    fn default() -> Self {
        Self::mean()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscreteSeriesValues {
    pub mode: SeriesMode,
    pub description: String,
    pub name: String,
    pub y: Vec<f64>,
}

/// Series sharing one time axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscreteSeriesSet {
    pub x: Vec<f64>,
    pub values: Vec<DiscreteSeriesValues>,
}

impl DiscreteSeriesSet {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Turn a discrete solution into named series.
///
/// For each state element, if any particle's trace differs from particle
/// 0 the output holds every particle's trace followed by one series per
/// summary rule. Otherwise a single deterministic series is emitted.
pub fn tidy_discrete_solution(
    solution: &DiscreteSolution,
    summary: &[SummaryRule],
) -> DiscreteSeriesSet {
    let names = variable_names(&solution.info);
    let n_particles = solution.state.n_particles();
    let mut values = Vec::new();
    for (k, name) in names.iter().enumerate().take(solution.state.n_state()) {
        let traces: Vec<Vec<f64>> = (0..n_particles)
            .map(|i| solution.state.get_trace(k, i))
            .collect();
        let stochastic = traces.iter().skip(1).any(|y| !is_equal_array(y, &traces[0]));
        if stochastic {
            for y in &traces {
                values.push(DiscreteSeriesValues {
                    mode: SeriesMode::Individual,
                    description: "Individual".to_string(),
                    name: name.clone(),
                    y: y.clone(),
                });
            }
            for rule in summary {
                values.push(DiscreteSeriesValues {
                    mode: SeriesMode::Summary,
                    description: rule.description.to_string(),
                    name: name.clone(),
                    y: apply_array(&traces, rule.summary),
                });
            }
        } else {
            values.push(DiscreteSeriesValues {
                mode: SeriesMode::Deterministic,
                description: "Deterministic".to_string(),
                name: name.clone(),
                y: traces.into_iter().next().unwrap_or_default(),
            });
        }
    }
    DiscreteSeriesSet {
        x: solution.times.clone(),
        values,
    }
}

/// Which output times to keep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Times {
    /// Roughly `n_points` evenly spaced times between two bounds.
    Grid {
        t_start: f64,
        t_end: f64,
        n_points: usize,
    },
    /// The recorded times closest to each of these.
    Given { times: Vec<f64> },
}

/// Indices into the time axis `x` selected by `times`.
pub fn filter_index(x: &[f64], times: &Times) -> Vec<usize> {
    if x.is_empty() {
        return Vec::new();
    }
    match times {
        Times::Grid {
            t_start,
            t_end,
            n_points,
        } => {
            let i_from = find_closest(*t_start, x);
            let i_to = find_closest(*t_end, x);
            if i_to < i_from {
                return Vec::new();
            }
            let by = (i_to - i_from).div_ceil((*n_points).max(1)).max(1);
            seq_by(i_from, i_to, by)
        }
        Times::Given { times } => times.iter().map(|&t| find_closest(t, x)).collect(),
    }
}

/// A series set that can be sampled at requested times.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredDiscreteSolution {
    solution: DiscreteSeriesSet,
}

impl FilteredDiscreteSolution {
    pub fn new(solution: DiscreteSeriesSet) -> Self {
        Self { solution }
    }

    pub fn full(&self) -> &DiscreteSeriesSet {
        &self.solution
    }

    /// Every series restricted to the times selected by `times`.
    pub fn at(&self, times: &Times) -> DiscreteSeriesSet {
        let idx = filter_index(&self.solution.x, times);
        let pick = |v: &[f64]| idx.iter().map(|&i| v[i]).collect::<Vec<_>>();
        DiscreteSeriesSet {
            x: pick(&self.solution.x),
            values: self
                .solution
                .values
                .iter()
                .map(|s| DiscreteSeriesValues {
                    y: pick(&s.y),
                    ..s.clone()
                })
                .collect(),
        }
    }
}

pub fn filter_solution(solution: DiscreteSeriesSet) -> FilteredDiscreteSolution {
    FilteredDiscreteSolution::new(solution)
}

/// Drop individual particle traces, keeping summaries and deterministic
/// series.
pub fn filter_to_central_only(solution: &DiscreteSeriesSet) -> DiscreteSeriesSet {
    DiscreteSeriesSet {
        x: solution.x.clone(),
        values: solution
            .values
            .iter()
            .filter(|s| s.mode != SeriesMode::Individual)
            .cloned()
            .collect(),
    }
}

/// Run, tidy and wrap for time filtering in one call.
///
/// Without explicit rules the mean is the only summary.
pub fn wodin_run_discrete<M: Model>(
    pars: &Pars,
    run: &DiscreteRun,
    summary: Option<&[SummaryRule]>,
    rng: Random,
) -> Result<FilteredDiscreteSolution> {
    let solution = run_model_discrete::<M>(pars, run, rng)?;
    let tidy = match summary {
        Some(rules) => tidy_discrete_solution(&solution, rules),
        None => tidy_discrete_solution(&solution, &[SummaryRule::mean()]),
    };
    Ok(filter_solution(tidy))
}
