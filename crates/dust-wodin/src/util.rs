//! Small numeric helpers shared by the summary and batch code.

/// Inclusive sequence `a, a + 1, ..., b`; empty when `b < a`.
pub fn seq(a: usize, b: usize) -> Vec<usize> {
    (a..=b).collect()
}

/// Sequence from `a` towards `b` (inclusive) in steps of `by`.
pub fn seq_by(a: usize, b: usize, by: usize) -> Vec<usize> {
    (a..=b).step_by(by.max(1)).collect()
}

pub fn rep<T: Clone>(x: T, n: usize) -> Vec<T> {
    vec![x; n]
}

/// Arithmetic mean; NaN for an empty slice.
pub fn mean(x: &[f64]) -> f64 {
    x.iter().sum::<f64>() / x.len() as f64
}

/// Apply `f` across rows, once per column.
///
/// `m` is a set of equal-length rows (for example one trace per particle);
/// the result has one entry per column.
pub fn apply_array<F>(m: &[Vec<f64>], f: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let Some(first) = m.first() else {
        return Vec::new();
    };
    let mut column = vec![0.0; m.len()];
    (0..first.len())
        .map(|j| {
            for (c, row) in column.iter_mut().zip(m) {
                *c = row[j];
            }
            f(&column)
        })
        .collect()
}

/// Column means of a set of rows.
pub fn mean_array(m: &[Vec<f64>]) -> Vec<f64> {
    apply_array(m, mean)
}

/// Exact element-wise equality.
pub fn is_equal_array(x: &[f64], y: &[f64]) -> bool {
    x == y
}

/// Index of the element of sorted `arr` closest to `x`.
///
/// Ties go to the later element. Values past the end map to the last
/// index. `arr` must not be empty.
pub fn find_closest(x: f64, arr: &[f64]) -> usize {
    let Some(i) = arr.iter().position(|&el| el >= x) else {
        return arr.len().saturating_sub(1);
    };
    if i == 0 || arr[i] == x {
        return i;
    }
    if x - arr[i - 1] < arr[i] - x { i - 1 } else { i }
}

/// Index of the smallest value, skipping NaN.
pub fn which_min(x: &[f64]) -> Option<usize> {
    let mut idx = None;
    let mut min = f64::INFINITY;
    for (i, &el) in x.iter().enumerate() {
        if el < min || (idx.is_none() && el == min) {
            idx = Some(i);
            min = el;
        }
    }
    idx
}

/// Index of the largest value, skipping NaN.
pub fn which_max(x: &[f64]) -> Option<usize> {
    let mut idx = None;
    let mut max = f64::NEG_INFINITY;
    for (i, &el) in x.iter().enumerate() {
        if el > max || (idx.is_none() && el == max) {
            idx = Some(i);
            max = el;
        }
    }
    idx
}
