//! Membership circuit for the SMT.
//!
//! Proves that an entry is in the tree under a root, or that its key is
//! absent (witnessed by the entry occupying the key's position).
//!
//! Public inputs: `[root, key, value, is_non_membership]`
//!
//! Witnesses: matching entry, sibling path

use ark_bn254::Fr;
use ark_ff::Zero;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

use crate::smt::{
    empty_siblings, verify_var, Entry, EntryVar, MatchingEntryVar, SiblingPathVar, SmtProof,
};

/// Membership / non-membership circuit.
#[derive(Clone)]
pub struct MembershipCircuit {
    /// Proof bundle carrying every public input and witness
    pub proof: Option<SmtProof>,
}

impl MembershipCircuit {
    /// Create an empty circuit for setup.
    /// Uses dummy values that produce valid constraint structure.
    pub fn empty() -> Self {
        let dummy_entry = Entry::new(Fr::from(1u64), Fr::zero());
        Self {
            proof: Some(SmtProof::non_membership(
                dummy_entry,
                Entry::new(Fr::from(2u64), Fr::zero()),
                empty_siblings(),
                Fr::zero(),
            )),
        }
    }

    pub fn new(proof: SmtProof) -> Self {
        Self { proof: Some(proof) }
    }

    /// Public inputs in allocation order.
    pub fn public_inputs(proof: &SmtProof) -> Vec<Fr> {
        vec![
            proof.root,
            proof.entry.key,
            proof.entry.value,
            Fr::from(!proof.is_membership() as u64),
        ]
    }
}

impl ConstraintSynthesizer<Fr> for MembershipCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let proof = self.proof.ok_or(SynthesisError::AssignmentMissing)?;

        // === Allocate public inputs ===
        let root_var = FpVar::new_input(cs.clone(), || Ok(proof.root))?;
        let key_var = FpVar::new_input(cs.clone(), || Ok(proof.entry.key))?;
        let value_var = FpVar::new_input(cs.clone(), || Ok(proof.entry.value))?;
        let is_non_membership =
            Boolean::new_input(cs.clone(), || Ok(proof.matching_entry.is_some()))?;

        // === Allocate witnesses ===
        // Unused when proving membership; the zero entry keeps the shape fixed
        let matching = proof
            .matching_entry
            .unwrap_or(Entry::new(Fr::zero(), Fr::zero()));
        let matching_var = MatchingEntryVar {
            is_some: is_non_membership,
            entry: EntryVar::new_witness(cs.clone(), &matching)?,
        };
        let siblings_var = SiblingPathVar::new_witness(cs.clone(), &proof.siblings)?;

        verify_var(
            cs,
            &root_var,
            &EntryVar::new(key_var, value_var),
            &matching_var,
            &siblings_var,
        )
    }
}
