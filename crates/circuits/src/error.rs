//! Error taxonomy shared by every native SMT operation.

use ark_bn254::Fr;
use thiserror::Error;

/// Errors raised by SMT verification and state transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SmtError {
    /// The root recomputed from the sibling path differs from the claimed root.
    #[error("root mismatch: expected {expected}, computed {computed}")]
    RootMismatch { expected: Fr, computed: Fr },
    /// The caller broke the input contract (zero key, non-canonical element, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl SmtError {
    /// Build a mismatch error, logging it on the way out.
    pub(crate) fn mismatch(expected: Fr, computed: Fr) -> Self {
        tracing::warn!(%expected, %computed, "recomputed root does not match claimed root");
        SmtError::RootMismatch { expected, computed }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        tracing::warn!(%reason, "rejected SMT input");
        SmtError::InvalidInput(reason)
    }
}

/// Compare a recomputed root against the claimed one.
pub(crate) fn ensure_root(expected: Fr, computed: Fr) -> Result<(), SmtError> {
    if expected == computed {
        Ok(())
    } else {
        Err(SmtError::mismatch(expected, computed))
    }
}
