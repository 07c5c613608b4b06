//! Proof generation for SMT circuits.
//!
//! Every prover runs the native operation first. A claim the native engine
//! rejects never reaches Groth16 and surfaces as [`ProveError::InvalidState`].

use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, Proof, ProvingKey};
use ark_snark::SNARK;
use rand::{rngs::StdRng, SeedableRng};
use thiserror::Error;
use tracing::{debug, info};

use smt_circuits::{Entry, MembershipCircuit, SiblingPath, SmtError, SmtProof, TransitionCircuit};

/// Errors during proof generation
#[derive(Error, Debug)]
pub enum ProveError {
    #[error("Proof generation failed: {0}")]
    ProofGeneration(String),
    #[error("Invalid tree state: {0}")]
    InvalidState(#[from] SmtError),
}

/// A proof with its public inputs
#[derive(Clone)]
pub struct ProofWithInputs {
    pub proof: Proof<Bn254>,
    pub public_inputs: Vec<Fr>,
}

/// Result of proving a state transition
#[derive(Clone)]
pub struct TransitionResult {
    /// The proof with `[old_root, new_root, key]`
    pub proof: ProofWithInputs,
    /// Root after the transition
    pub new_root: Fr,
}

/// Generate proof for MembershipCircuit
pub fn prove_membership(
    pk: &ProvingKey<Bn254>,
    proof: &SmtProof,
) -> Result<ProofWithInputs, ProveError> {
    // Verify the claim is valid
    proof.verify()?;

    let public_inputs = MembershipCircuit::public_inputs(proof);
    let circuit = MembershipCircuit::new(proof.clone());

    let mut rng = StdRng::from_entropy();
    let groth_proof = Groth16::<Bn254>::prove(pk, circuit, &mut rng)
        .map_err(|e| ProveError::ProofGeneration(e.to_string()))?;

    debug!(
        key = %proof.entry.key,
        membership = proof.is_membership(),
        "generated membership proof"
    );
    Ok(ProofWithInputs {
        proof: groth_proof,
        public_inputs,
    })
}

/// Generate proof for inserting `new_entry` under `old_root`
pub fn prove_add(
    pk: &ProvingKey<Bn254>,
    new_entry: Entry,
    old_root: Fr,
    siblings: SiblingPath,
) -> Result<TransitionResult, ProveError> {
    let circuit = TransitionCircuit::add(new_entry, old_root, siblings)?;
    prove_transition(pk, circuit)
}

/// Generate proof for removing `entry` from the tree under `old_root`
pub fn prove_delete(
    pk: &ProvingKey<Bn254>,
    entry: Entry,
    old_root: Fr,
    siblings: SiblingPath,
) -> Result<TransitionResult, ProveError> {
    let circuit = TransitionCircuit::delete(entry, old_root, siblings)?;
    prove_transition(pk, circuit)
}

/// Generate proof for changing the value of `old_entry` to `new_value`
pub fn prove_update(
    pk: &ProvingKey<Bn254>,
    new_value: Fr,
    old_entry: Entry,
    old_root: Fr,
    siblings: SiblingPath,
) -> Result<TransitionResult, ProveError> {
    let circuit = TransitionCircuit::update(new_value, old_entry, old_root, siblings)?;
    prove_transition(pk, circuit)
}

fn prove_transition(
    pk: &ProvingKey<Bn254>,
    circuit: TransitionCircuit,
) -> Result<TransitionResult, ProveError> {
    let op = circuit.op;
    let public_inputs = circuit.public_inputs().ok_or_else(|| {
        ProveError::ProofGeneration("transition circuit is missing public inputs".into())
    })?;
    let new_root = public_inputs[1];

    let mut rng = StdRng::from_entropy();
    let proof = Groth16::<Bn254>::prove(pk, circuit, &mut rng)
        .map_err(|e| ProveError::ProofGeneration(e.to_string()))?;

    info!(%op, %new_root, "generated transition proof");
    Ok(TransitionResult {
        proof: ProofWithInputs {
            proof,
            public_inputs,
        },
        new_root,
    })
}
