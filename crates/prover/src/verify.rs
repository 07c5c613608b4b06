//! Local proof verification for SMT circuits.

use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, Proof, VerifyingKey};
use ark_snark::SNARK;
use thiserror::Error;

/// Errors during verification
#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Verification failed: {0}")]
    Verification(String),
    #[error("Invalid public inputs")]
    InvalidInputs,
}

/// Verify a membership proof against `[root, key, value, is_non_membership]`
pub fn verify_membership(
    vk: &VerifyingKey<Bn254>,
    proof: &Proof<Bn254>,
    root: Fr,
    key: Fr,
    value: Fr,
    is_non_membership: bool,
) -> Result<bool, VerifyError> {
    let public_inputs = vec![root, key, value, Fr::from(is_non_membership as u64)];

    Groth16::<Bn254>::verify(vk, &public_inputs, proof)
        .map_err(|e| VerifyError::Verification(e.to_string()))
}

/// Verify a transition proof against `[old_root, new_root, key]`
///
/// The verifying key decides which operation is checked.
pub fn verify_transition(
    vk: &VerifyingKey<Bn254>,
    proof: &Proof<Bn254>,
    old_root: Fr,
    new_root: Fr,
    key: Fr,
) -> Result<bool, VerifyError> {
    let public_inputs = vec![old_root, new_root, key];

    Groth16::<Bn254>::verify(vk, &public_inputs, proof)
        .map_err(|e| VerifyError::Verification(e.to_string()))
}

/// Verify a proof against an already assembled public input vector
pub fn verify_with_inputs(
    vk: &VerifyingKey<Bn254>,
    proof: &Proof<Bn254>,
    public_inputs: &[Fr],
) -> Result<bool, VerifyError> {
    // gamma_abc_g1 has one entry for the constant plus one per public input
    if public_inputs.len() + 1 != vk.gamma_abc_g1.len() {
        return Err(VerifyError::InvalidInputs);
    }

    Groth16::<Bn254>::verify(vk, public_inputs, proof)
        .map_err(|e| VerifyError::Verification(e.to_string()))
}
