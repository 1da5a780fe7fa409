//! End-to-end behaviour of ensembles, resampling, views and the
//! replicate-run glue, driven through the umbrella crate.

use approx::assert_relative_eq;
use dust::{
    Dust, DustError, FilterData, FilterDataElement, InternalStorage, InternalValue, Model,
    ModelInfo, ModelWrapper, Pars, ParticleFilter, Random, StateTime, VariableInfo, VectorView,
    Walk, resample, set_par_scalar,
};
use dust::{Batch, BatchPars, DiscreteRun, Times, wodin_run_discrete};
use ndarray::{array, s};

fn walk_pars(n: f64, sd: f64) -> Pars {
    Pars::from([("n".to_string(), n), ("sd".to_string(), sd)])
}

/// Deterministic exponential growth: `y_next = r * y`, with `r` per step.
#[derive(Debug)]
struct Growth {
    r: f64,
    y0: f64,
    internal: InternalStorage,
}

impl Model for Growth {
    fn new(pars: &Pars) -> dust::dust_model::Result<Self> {
        let mut internal = InternalStorage::new();
        set_par_scalar(pars, "r", &mut internal, None)?;
        set_par_scalar(pars, "y0", &mut internal, Some(1.0))?;
        let get = |name: &str| internal.get(name).and_then(InternalValue::as_scalar);
        Ok(Self {
            r: get("r").unwrap_or(1.0),
            y0: get("y0").unwrap_or(1.0),
            internal,
        })
    }

    fn size(&self) -> usize {
        1
    }

    fn initial(&self, _step: usize) -> Vec<f64> {
        vec![self.y0]
    }

    fn update(&self, _step: usize, y: &[f64], y_next: &mut [f64], _rng: &mut Random) {
        y_next[0] = self.r * y[0];
    }

    fn info(&self) -> ModelInfo {
        vec![VariableInfo::scalar("y")]
    }

    fn internal(&self) -> InternalStorage {
        self.internal.clone()
    }
}

#[test]
fn test_new_ensemble_starts_at_initial_state() {
    for n in [1, 2, 7] {
        let dust = Dust::<Walk>::new(&walk_pars(3.0, 1.0), n, 5, Random::new(1)).unwrap();
        let state = dust.state(None).unwrap();
        assert_eq!(state.n_particles(), n);
        for i in 0..n {
            assert_eq!(state.get_particle(i), vec![5.0, 5.0, 5.0]);
        }
    }
}

#[test]
fn test_run_reaches_step_and_is_idempotent() {
    let mut dust = Dust::<Walk>::new(&walk_pars(1.0, 1.0), 4, 0, Random::new(2)).unwrap();
    dust.run(10);
    assert_eq!(dust.step(), 10);
    let before = dust.state(None).unwrap();
    let checkpoint = dust.rng().checkpoint();
    dust.run(10);
    dust.run(3);
    assert_eq!(dust.step(), 10);
    assert_eq!(dust.state(None).unwrap(), before);
    let mut replay = Random::replay(&checkpoint);
    assert_eq!(dust.rng_mut().random(), replay.random());
}

#[test]
fn test_ensemble_reproduces_with_same_stream() {
    let run = |seed| {
        let mut dust = Dust::<Walk>::new(&walk_pars(2.0, 1.0), 5, 0, Random::new(seed)).unwrap();
        dust.simulate(&[1, 4, 9], None).unwrap()
    };
    assert_eq!(run(11), run(11));
    assert_ne!(run(11), run(12));
}

#[test]
fn test_particles_consume_stream_in_order() {
    let mut dust = Dust::<Walk>::new(&walk_pars(1.0, 1.0), 3, 0, Random::new(8)).unwrap();
    dust.run(1);
    let mut rng = Random::new(8);
    for i in 0..3 {
        assert_eq!(dust.particle(i).state(), &[rng.normal(0.0, 1.0)]);
    }
}

#[test]
fn test_resample_all_mass_on_one_index() {
    for u in [0.01, 0.25, 0.5, 0.75, 0.99] {
        assert_eq!(resample(&[0.0, 0.0, 1.0, 0.0, 0.0], u), vec![2; 5]);
    }
}

#[test]
fn test_resample_fixture() {
    assert_eq!(
        resample(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 0.2),
        vec![0, 2, 3, 4, 4, 5]
    );
}

#[test]
fn test_reorder_with_repeats() {
    let mut dust = Dust::<Walk>::new(&walk_pars(2.0, 1.0), 4, 0, Random::new(3)).unwrap();
    dust.run(3);
    let before = dust.state(None).unwrap();
    let idx = [3, 3, 0, 1];
    dust.reorder(&idx).unwrap();
    let after = dust.state(None).unwrap();
    for (i, &src) in idx.iter().enumerate() {
        assert_eq!(after.get_particle(i), before.get_particle(src));
    }
}

#[test]
fn test_reorder_rejects_bad_index() {
    let mut dust = Dust::<Walk>::new(&walk_pars(1.0, 1.0), 3, 0, Random::new(3)).unwrap();
    let before = dust.state(None).unwrap();
    assert!(matches!(
        dust.reorder(&[0, 1]),
        Err(DustError::InvalidArgument(_))
    ));
    assert!(matches!(
        dust.reorder(&[0, 1, 3]),
        Err(DustError::InvalidArgument(_))
    ));
    assert_eq!(dust.state(None).unwrap(), before);
}

#[test]
fn test_set_pars_size_change_fails_and_preserves_state() {
    let mut dust = Dust::<Walk>::new(&walk_pars(2.0, 1.0), 3, 0, Random::new(4)).unwrap();
    dust.run(2);
    let before = dust.state(None).unwrap();
    for reset in [false, true] {
        let err = dust.set_pars(&walk_pars(3.0, 1.0), reset).unwrap_err();
        assert_eq!(
            err,
            DustError::StateSizeMismatch {
                expected: 2,
                found: 3
            }
        );
        assert_eq!(dust.state(None).unwrap(), before);
    }
}

#[test]
fn test_set_pars_keeps_or_resets_state() {
    let mut dust = Dust::<Walk>::new(&walk_pars(1.0, 1.0), 2, 0, Random::new(4)).unwrap();
    dust.run(2);
    let before = dust.state(None).unwrap();
    dust.set_pars(&walk_pars(1.0, 0.0), false).unwrap();
    assert_eq!(dust.state(None).unwrap(), before);
    dust.run(4);
    assert_eq!(dust.state(None).unwrap(), before);
    dust.set_pars(&walk_pars(1.0, 0.0), true).unwrap();
    assert_eq!(dust.state(None).unwrap().get_state(0), vec![4.0, 4.0]);
}

#[test]
fn test_model_failure_propagates() {
    let err = Dust::<Walk>::new(&walk_pars(1.0, -1.0), 2, 0, Random::new(1)).unwrap_err();
    assert!(matches!(err, DustError::ModelUpdateFailure(_)));
    let err = Dust::<Growth>::new(&Pars::new(), 2, 0, Random::new(1)).unwrap_err();
    assert_eq!(err.to_string(), "Expected a value for 'r'");
}

#[test]
fn test_state_view_aliases_particle_view() {
    let mut state = StateTime::new(3, 4, 2);
    {
        let mut view = state.view_state_mut(1, 1);
        view[2] = 9.5;
    }
    assert_eq!(state.view_particle(2, 1)[1], 9.5);
    assert_eq!(state.view_trace(1, 2)[1], 9.5);
    assert_eq!(state.view_time(1).get(2, 1), 9.5);
    assert_eq!(state.view_time(0).get(2, 1), 0.0);
}

#[test]
fn test_state_time_layout_is_time_particle_state() {
    let mut state = StateTime::new(2, 3, 2);
    {
        let mut view = state.view_particle_mut(1, 1);
        view.assign(&array![4.0, 5.0]);
    }
    assert_eq!(state.as_array().slice(s![1, .., 0]), array![0.0, 4.0, 0.0]);
    let flat = state.into_vec();
    assert_eq!(flat.len(), 12);
    assert_eq!(&flat[8..10], &[4.0, 5.0]);
}

#[test]
fn test_zero_noise_ensemble_is_deterministic() {
    let mut dust = Dust::<Walk>::new(&walk_pars(1.0, 0.0), 5, 0, Random::new(6)).unwrap();
    dust.run(2);
    let state = dust.state(None).unwrap();
    assert_eq!(state.get_state(0), vec![0.0; 5]);

    let pars = Pars::from([("r".to_string(), 1.5), ("y0".to_string(), 2.0)]);
    let mut dust = Dust::<Growth>::new(&pars, 5, 0, Random::new(6)).unwrap();
    dust.run(2);
    for y in dust.state(None).unwrap().get_state(0) {
        assert_relative_eq!(y, 2.0 * 1.5 * 1.5);
    }
}

#[test]
fn test_simulate_with_index() {
    let mut dust = Dust::<Walk>::new(&walk_pars(3.0, 1.0), 2, 0, Random::new(5)).unwrap();
    let full = {
        let mut copy = Dust::<Walk>::new(&walk_pars(3.0, 1.0), 2, 0, Random::new(5)).unwrap();
        copy.simulate(&[1, 2], None).unwrap()
    };
    let picked = dust.simulate(&[1, 2], Some(&[2, 0][..])).unwrap();
    assert_eq!(picked.n_state(), 2);
    for t in 0..2 {
        for i in 0..2 {
            let row = full.get_particle(i, t);
            assert_eq!(picked.get_particle(i, t), vec![row[2], row[0]]);
        }
    }
}

#[test]
fn test_simulate_rejects_unsorted_steps() {
    let mut dust = Dust::<Walk>::new(&walk_pars(1.0, 1.0), 2, 3, Random::new(5)).unwrap();
    assert!(dust.simulate(&[5, 4], None).is_err());
    assert!(dust.simulate(&[2, 4], None).is_err());
    assert_eq!(dust.step(), 3);
}

#[test]
fn test_particle_filter_on_walk() {
    fn compare(state: VectorView<'_>, observed: &f64) -> f64 {
        let z = state[0] - observed;
        -0.5 * z * z
    }
    let data = FilterData {
        step_start: 0,
        data: (1..=5)
            .map(|s| FilterDataElement {
                step: s,
                data: s as f64 * 0.1,
            })
            .collect(),
    };
    let mut filter = ParticleFilter::new(data, compare).unwrap();
    let mut dust = Dust::<Walk>::new(&walk_pars(1.0, 0.5), 50, 0, Random::new(17)).unwrap();
    let log_likelihood = filter.run(&mut dust).unwrap();
    assert!(log_likelihood.is_finite());
    assert!(log_likelihood < 0.0);
    assert_eq!(dust.step(), 5);
}

#[test]
fn test_wrapper_matches_single_particle_ensemble() {
    let pars = walk_pars(2.0, 1.0);
    let mut wrapper = ModelWrapper::<Walk>::new(&pars, Random::new(21)).unwrap();
    let flat = wrapper.run(&[0, 1, 2, 3], None).unwrap();
    let mut dust = Dust::<Walk>::new(&pars, 1, 0, Random::new(21)).unwrap();
    let state = dust.simulate(&[0, 1, 2, 3], None).unwrap();
    assert_eq!(flat, state.into_vec());
}

#[test]
fn test_discrete_run_series() {
    let run = DiscreteRun {
        time_start: 0.0,
        time_end: 10.0,
        dt: 0.5,
        n_particles: 4,
    };
    let solution = wodin_run_discrete::<Walk>(&walk_pars(1.0, 1.0), &run, None, Random::new(1))
        .unwrap();
    assert_eq!(solution.full().x.len(), 21);
    let at = solution.at(&Times::Grid {
        t_start: 0.0,
        t_end: 10.0,
        n_points: 5,
    });
    assert_eq!(at.x, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    assert_eq!(at.values.len(), 5);
}

#[test]
fn test_batch_over_growth_rate() {
    let pars = BatchPars {
        base: Pars::from([("y0".to_string(), 1.0)]),
        name: "r".to_string(),
        values: vec![0.5, 1.0, 2.0],
    };
    let run = DiscreteRun {
        time_start: 0.0,
        time_end: 3.0,
        dt: 1.0,
        n_particles: 2,
    };
    let batch = Batch::run::<Growth>(&pars, &run, 1).unwrap();
    let at = batch.value_at_time(3.0);
    assert_eq!(at.x, vec![0.5, 1.0, 2.0]);
    assert_eq!(at.values[0].name, "y");
    assert_relative_eq!(at.values[0].y[0], 0.125);
    assert_relative_eq!(at.values[0].y[2], 8.0);

    let extremes = batch.extremes();
    assert_eq!(extremes.t_max.values[0].y, vec![0.0, 0.0, 3.0]);
    assert_eq!(extremes.t_min.values[0].y, vec![3.0, 0.0, 0.0]);
    assert_eq!(extremes.y_max.values[0].y, vec![1.0, 1.0, 8.0]);
}
