//! User parameters and model internal storage.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{ModelError, Result};

/// Named numeric parameters supplied by the user.
pub type Pars = BTreeMap<String, f64>;

/// A value held in a model's internal storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InternalValue {
    Scalar(f64),
    Array(Vec<f64>),
}

impl InternalValue {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(x) => Some(*x),
            Self::Array(_) => None,
        }
    }
}

/// Model internal storage, keyed by name.
pub type InternalStorage = BTreeMap<String, InternalValue>;

/// Copy a scalar parameter from `pars` into `internal`.
///
/// A value in `pars` always wins. Without one, an existing internal value
/// is left alone, then `default` is used, and with neither the parameter is
/// reported missing.
pub fn set_par_scalar(
    pars: &Pars,
    name: &str,
    internal: &mut InternalStorage,
    default: Option<f64>,
) -> Result<()> {
    if let Some(&value) = pars.get(name) {
        internal.insert(name.to_string(), InternalValue::Scalar(value));
        return Ok(());
    }
    if internal.contains_key(name) {
        return Ok(());
    }
    match default {
        Some(value) => {
            internal.insert(name.to_string(), InternalValue::Scalar(value));
            Ok(())
        }
        None => Err(ModelError::MissingParameter(name.to_string())),
    }
}
