//! Systematic resampling and importance-weight helpers.

/// Systematic resampling of particle indices.
///
/// `weights` are non-negative and in natural (not log) space; they need not
/// sum to one. `u` is a single uniform draw on [0, 1). Returns one source
/// index per destination particle: `n` evenly spaced probes offset by `u`
/// are swept against the cumulative weights in a single pass, each probe
/// taking the last index whose cumulative weight was still below it.
pub fn resample(weights: &[f64], u: f64) -> Vec<usize> {
    let n = weights.len();
    let total: f64 = weights.iter().sum();
    let u0 = total * u / n as f64;
    let du = total / n as f64;

    let mut cumulative = 0.0;
    let mut j = 0;
    let mut index = Vec::with_capacity(n);
    for i in 0..n {
        let probe = u0 + i as f64 * du;
        // j < n only matters when a probe sits within rounding error of the total
        while cumulative < probe && j < n {
            cumulative += weights[j];
            j += 1;
        }
        index.push(j.saturating_sub(1));
    }
    index
}

/// Effective sample size `(Σw)² / Σw²` of unnormalised weights.
pub fn effective_sample_size(weights: &[f64]) -> f64 {
    let sum: f64 = weights.iter().sum();
    let sum_sq: f64 = weights.iter().map(|w| w * w).sum();
    if sum_sq > 0.0 { sum * sum / sum_sq } else { 0.0 }
}

/// Move log weights into natural space without overflow.
///
/// Returns weights scaled so the largest is 1, and the log of the mean of
/// the unscaled weights (the log-likelihood increment in a particle filter).
/// NaN log weights are treated as impossible. If every weight is
/// impossible the weights are all zero and the mean is `-inf`.
pub fn scale_log_weights(log_weights: &[f64]) -> (Vec<f64>, f64) {
    let clean = |w: f64| if w.is_nan() { f64::NEG_INFINITY } else { w };
    let max = log_weights
        .iter()
        .copied()
        .map(clean)
        .fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return (vec![0.0; log_weights.len()], f64::NEG_INFINITY);
    }

    let weights: Vec<f64> = log_weights.iter().map(|&w| (clean(w) - max).exp()).collect();
    let mean = weights.iter().sum::<f64>() / weights.len() as f64;
    (weights, mean.ln() + max)
}
