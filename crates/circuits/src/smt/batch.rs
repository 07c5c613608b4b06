//! Verification of many independent proofs.
//!
//! Operations share no state, so proofs can be checked on any number of
//! threads. With the `parallel` feature the work is spread over rayon's pool.

use super::hasher::SmtHasher;
use super::ops::SmtEngine;
use super::proof::SmtProof;
use crate::error::SmtError;

/// Verify every proof, returning one result per proof in input order.
#[cfg(feature = "parallel")]
pub fn verify_batch<H: SmtHasher + Sync>(
    engine: &SmtEngine<H>,
    proofs: &[SmtProof],
) -> Vec<Result<(), SmtError>> {
    use rayon::prelude::*;

    proofs.par_iter().map(|proof| proof.verify_with(engine)).collect()
}

/// Verify every proof, returning one result per proof in input order.
#[cfg(not(feature = "parallel"))]
pub fn verify_batch<H: SmtHasher>(
    engine: &SmtEngine<H>,
    proofs: &[SmtProof],
) -> Vec<Result<(), SmtError>> {
    proofs.iter().map(|proof| proof.verify_with(engine)).collect()
}

/// Index and error of the first failing proof, if any.
pub fn first_failure(results: &[Result<(), SmtError>]) -> Option<(usize, &SmtError)> {
    results
        .iter()
        .enumerate()
        .find_map(|(index, result)| result.as_ref().err().map(|err| (index, err)))
}
