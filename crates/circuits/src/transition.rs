//! State transition circuit for the SMT.
//!
//! Proves that `new_root` is the result of adding, deleting or updating the
//! entry at `key` in the tree under `old_root`. Each operation type has its
//! own constraint system and therefore its own setup.
//!
//! Public inputs: `[old_root, new_root, key]`
//!
//! Witnesses:
//! - Old value (delete, update) and new value (add, update)
//! - Sibling path of the key

use std::fmt;

use ark_bn254::Fr;
use ark_ff::Zero;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

use crate::error::SmtError;
use crate::smt::{
    self, add_var, delete_var, empty_siblings, update_var, Entry, EntryVar, SiblingPath,
    SiblingPathVar,
};

/// Kind of state transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpType {
    /// Insert an absent key
    Add = 0,
    /// Remove a present key
    Delete = 1,
    /// Change the value of a present key
    Update = 2,
}

impl OpType {
    pub const ALL: [OpType; 3] = [OpType::Add, OpType::Delete, OpType::Update];

    /// Stable lowercase name, used for key file names.
    pub fn name(self) -> &'static str {
        match self {
            OpType::Add => "add",
            OpType::Delete => "delete",
            OpType::Update => "update",
        }
    }
}

impl fmt::Display for OpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// State transition circuit.
#[derive(Clone)]
pub struct TransitionCircuit {
    /// Which transition the constraints encode (fixed at setup)
    pub op: OpType,

    // Public inputs
    /// Root before the transition
    pub old_root: Option<Fr>,
    /// Root after the transition
    pub new_root: Option<Fr>,
    /// Key being changed
    pub key: Option<Fr>,

    // Witnesses
    /// Value before the transition (delete, update)
    pub old_value: Option<Fr>,
    /// Value after the transition (add, update)
    pub new_value: Option<Fr>,
    /// Siblings of the key
    pub siblings: Option<SiblingPath>,
}

impl TransitionCircuit {
    /// Create an empty circuit for setup.
    /// Uses dummy values that produce valid constraint structure.
    pub fn empty(op: OpType) -> Self {
        Self {
            op,
            old_root: Some(Fr::zero()),
            new_root: Some(Fr::zero()),
            key: Some(Fr::from(1u64)),
            old_value: Some(Fr::zero()),
            new_value: Some(Fr::zero()),
            siblings: Some(empty_siblings()),
        }
    }

    /// Circuit for [`smt::add`]. Fails if the entry cannot be added under `old_root`.
    pub fn add(new_entry: Entry, old_root: Fr, siblings: SiblingPath) -> Result<Self, SmtError> {
        let new_root = smt::add(&new_entry, old_root, &siblings)?;
        Ok(Self {
            op: OpType::Add,
            old_root: Some(old_root),
            new_root: Some(new_root),
            key: Some(new_entry.key),
            old_value: Some(Fr::zero()),
            new_value: Some(new_entry.value),
            siblings: Some(siblings),
        })
    }

    /// Circuit for [`smt::delete`]. Fails if the entry is not present under `old_root`.
    pub fn delete(entry: Entry, old_root: Fr, siblings: SiblingPath) -> Result<Self, SmtError> {
        let new_root = smt::delete(&entry, old_root, &siblings)?;
        Ok(Self {
            op: OpType::Delete,
            old_root: Some(old_root),
            new_root: Some(new_root),
            key: Some(entry.key),
            old_value: Some(entry.value),
            new_value: Some(Fr::zero()),
            siblings: Some(siblings),
        })
    }

    /// Circuit for [`smt::update`]. Fails if `old_entry` is not present under `old_root`.
    pub fn update(
        new_value: Fr,
        old_entry: Entry,
        old_root: Fr,
        siblings: SiblingPath,
    ) -> Result<Self, SmtError> {
        let new_root = smt::update(new_value, &old_entry, old_root, &siblings)?;
        Ok(Self {
            op: OpType::Update,
            old_root: Some(old_root),
            new_root: Some(new_root),
            key: Some(old_entry.key),
            old_value: Some(old_entry.value),
            new_value: Some(new_value),
            siblings: Some(siblings),
        })
    }

    /// Public inputs in allocation order, if all are assigned.
    pub fn public_inputs(&self) -> Option<Vec<Fr>> {
        Some(vec![self.old_root?, self.new_root?, self.key?])
    }
}

impl ConstraintSynthesizer<Fr> for TransitionCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        // === Allocate public inputs ===
        let old_root_var = FpVar::new_input(cs.clone(), || {
            self.old_root.ok_or(SynthesisError::AssignmentMissing)
        })?;
        let new_root_var = FpVar::new_input(cs.clone(), || {
            self.new_root.ok_or(SynthesisError::AssignmentMissing)
        })?;
        let key_var = FpVar::new_input(cs.clone(), || {
            self.key.ok_or(SynthesisError::AssignmentMissing)
        })?;

        // === Allocate witnesses ===
        let siblings = self.siblings.ok_or(SynthesisError::AssignmentMissing)?;
        let siblings_var = SiblingPathVar::new_witness(cs.clone(), &siblings)?;

        let computed_root = match self.op {
            OpType::Add => {
                let value_var = FpVar::new_witness(cs.clone(), || {
                    self.new_value.ok_or(SynthesisError::AssignmentMissing)
                })?;
                let entry_var = EntryVar::new(key_var, value_var);
                add_var(cs, &old_root_var, &entry_var, &siblings_var)?
            }
            OpType::Delete => {
                let value_var = FpVar::new_witness(cs.clone(), || {
                    self.old_value.ok_or(SynthesisError::AssignmentMissing)
                })?;
                let entry_var = EntryVar::new(key_var, value_var);
                delete_var(cs, &old_root_var, &entry_var, &siblings_var)?
            }
            OpType::Update => {
                let old_value_var = FpVar::new_witness(cs.clone(), || {
                    self.old_value.ok_or(SynthesisError::AssignmentMissing)
                })?;
                let new_value_var = FpVar::new_witness(cs.clone(), || {
                    self.new_value.ok_or(SynthesisError::AssignmentMissing)
                })?;
                let entry_var = EntryVar::new(key_var, old_value_var);
                update_var(cs, &old_root_var, &entry_var, &new_value_var, &siblings_var)?
            }
        };

        // === The transition must land on the claimed root ===
        computed_root.enforce_equal(&new_root_var)?;

        Ok(())
    }
}
