//! Tree entries.

use ark_bn254::Fr;
use ark_ff::Zero;
use serde::{Deserialize, Serialize};

use super::path::{key_to_path, Path};
use crate::error::SmtError;

/// One leaf of the tree, unique by key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    #[serde(with = "crate::field::serde_fr")]
    pub key: Fr,
    #[serde(with = "crate::field::serde_fr")]
    pub value: Fr,
}

impl Entry {
    pub fn new(key: Fr, value: Fr) -> Self {
        Self { key, value }
    }

    /// Reject the reserved zero key.
    pub fn validate(&self) -> Result<(), SmtError> {
        if self.key.is_zero() {
            return Err(SmtError::invalid("entry key must be non-zero"));
        }
        Ok(())
    }

    /// Branch decisions for this entry's key.
    pub fn path(&self) -> Path {
        key_to_path(self.key)
    }
}

impl From<(Fr, Fr)> for Entry {
    fn from((key, value): (Fr, Fr)) -> Self {
        Self::new(key, value)
    }
}
