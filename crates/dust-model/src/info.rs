//! Metadata describing how named variables are packed into a state vector.

use serde::{Deserialize, Serialize};

/// A single named variable within the state vector.
///
/// `dim` is empty for scalars, length 1 for vectors, length 2 for matrices
/// and so on. The product of `dim` (1 for an empty `dim`) always equals
/// `length`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableInfo {
    pub name: String,
    pub dim: Vec<usize>,
    pub length: usize,
}

/// Ordered variable metadata; lengths sum to the model size.
pub type ModelInfo = Vec<VariableInfo>;

impl VariableInfo {
    /// A scalar variable.
    pub fn scalar(name: &str) -> Self {
        Self {
            name: name.to_string(),
            dim: Vec::new(),
            length: 1,
        }
    }

    /// An array variable with the given dimensions.
    pub fn array(name: &str, dim: &[usize]) -> Self {
        Self {
            name: name.to_string(),
            dim: dim.to_vec(),
            length: dim.iter().product(),
        }
    }
}

/// All 1-based index tuples within `dim`, first index varying fastest.
pub fn combinations(dim: &[usize]) -> Vec<Vec<usize>> {
    let Some((&first, rest)) = dim.split_first() else {
        return Vec::new();
    };
    if rest.is_empty() {
        return (1..=first).map(|i| vec![i]).collect();
    }
    let mut ret = Vec::new();
    for tail in combinations(rest) {
        for i in 1..=first {
            let mut el = Vec::with_capacity(dim.len());
            el.push(i);
            el.extend_from_slice(&tail);
            ret.push(el);
        }
    }
    ret
}

/// Expand variable metadata into one name per state element.
///
/// Scalars keep their name; array elements become `name[i,j,...]`.
pub fn variable_names(info: &[VariableInfo]) -> Vec<String> {
    let mut ret = Vec::new();
    for el in info {
        if el.dim.is_empty() {
            ret.push(el.name.clone());
        } else {
            ret.extend(combinations(&el.dim).into_iter().map(|idx| {
                let idx: Vec<String> = idx.iter().map(|i| i.to_string()).collect();
                format!("{}[{}]", el.name, idx.join(","))
            }));
        }
    }
    ret
}
