//! Random-walk ensemble example.
//!
//! Runs replicate random walks, resamples them towards a target, and then
//! sweeps the step size in a batch. Set `RUST_LOG=debug` to see ensemble
//! events.

use dust::{
    Batch, BatchPars, DiscreteRun, Dust, Pars, Random, Times, Walk, effective_sample_size,
    wodin_run_discrete,
};
use tracing::info;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("Random-walk ensemble example");
    println!("============================\n");

    let pars = Pars::from([("n".to_string(), 1.0), ("sd".to_string(), 1.0)]);
    let mut dust = Dust::<Walk>::new(&pars, 8, 0, Random::new(42)).expect("valid parameters");
    dust.run(20);

    let state = dust.state(None).expect("full state");
    println!("After 20 steps:");
    for (i, y) in state.get_state(0).iter().enumerate() {
        println!("  particle {i}: {y:8.3}");
    }

    // Favour walkers ending near zero.
    let weights: Vec<f64> = state
        .get_state(0)
        .iter()
        .map(|y| (-0.5 * y * y / 4.0).exp())
        .collect();
    println!("\nEffective sample size: {:.2}", effective_sample_size(&weights));
    let idx = dust.resample(&weights).expect("one weight per particle");
    println!("Resample index: {idx:?}");
    info!(step = dust.step(), "ensemble resampled");

    let run = DiscreteRun {
        time_start: 0.0,
        time_end: 50.0,
        dt: 1.0,
        n_particles: 20,
    };
    let solution =
        wodin_run_discrete::<Walk>(&pars, &run, None, Random::new(7)).expect("discrete run");
    let coarse = solution.at(&Times::Grid {
        t_start: 0.0,
        t_end: 50.0,
        n_points: 5,
    });
    println!("\nMean trace at t = {:?}:", coarse.x);
    if let Some(mean) = coarse.values.iter().find(|s| s.description == "Mean") {
        println!("  {:?}", mean.y);
    }

    let batch = Batch::run::<Walk>(
        &BatchPars {
            base: pars.clone(),
            name: "sd".to_string(),
            values: vec![0.5, 1.0, 2.0, -1.0],
        },
        &run,
        7,
    )
    .expect("at least one run succeeds");
    println!("\nBatch over sd: {} ok, {} failed", batch.solutions.len(), batch.errors.len());
    for e in &batch.errors {
        println!("  sd = {}: {}", e.value, e.error);
    }
    let y_max = &batch.extremes().y_max;
    for (sd, y) in y_max.x.iter().zip(&y_max.values[0].y) {
        println!("  sd = {sd}: max mean {y:.3}");
    }
}
