//! Trusted setup utilities for generating proving and verifying keys.

use std::path::{Path, PathBuf};

use ark_bn254::Bn254;
use ark_groth16::{Groth16, ProvingKey, VerifyingKey};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_snark::SNARK;
use ark_std::rand::{rngs::StdRng, SeedableRng};
use thiserror::Error;
use tracing::info;

use smt_circuits::{MembershipCircuit, OpType, TransitionCircuit};

/// Environment variable naming the keys directory.
pub const KEYS_DIR_ENV: &str = "SMT_KEYS_DIR";

/// Keys directory used when [`KEYS_DIR_ENV`] is unset.
pub const DEFAULT_KEYS_DIR: &str = "keys";

/// Errors that can occur during setup
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Circuit setup failed: {0}")]
    CircuitSetup(String),
    #[error("Serialization failed: {0}")]
    Serialization(String),
    #[error("Deserialization failed: {0}")]
    Deserialization(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Keys directory from the environment, falling back to `keys`.
pub fn keys_dir() -> PathBuf {
    std::env::var_os(KEYS_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_KEYS_DIR))
}

/// Keys for a single circuit
#[derive(Clone)]
pub struct CircuitKeyPair {
    pub proving_key: ProvingKey<Bn254>,
    pub verifying_key: VerifyingKey<Bn254>,
}

impl CircuitKeyPair {
    /// Serialize proving key to bytes
    pub fn serialize_pk(&self) -> Result<Vec<u8>, SetupError> {
        let mut bytes = Vec::new();
        self.proving_key
            .serialize_compressed(&mut bytes)
            .map_err(|e| SetupError::Serialization(e.to_string()))?;
        Ok(bytes)
    }

    /// Serialize verifying key to bytes
    pub fn serialize_vk(&self) -> Result<Vec<u8>, SetupError> {
        let mut bytes = Vec::new();
        self.verifying_key
            .serialize_compressed(&mut bytes)
            .map_err(|e| SetupError::Serialization(e.to_string()))?;
        Ok(bytes)
    }

    /// Deserialize proving key from bytes
    pub fn deserialize_pk(bytes: &[u8]) -> Result<ProvingKey<Bn254>, SetupError> {
        ProvingKey::deserialize_compressed(bytes)
            .map_err(|e| SetupError::Deserialization(e.to_string()))
    }

    /// Deserialize verifying key from bytes
    pub fn deserialize_vk(bytes: &[u8]) -> Result<VerifyingKey<Bn254>, SetupError> {
        VerifyingKey::deserialize_compressed(bytes)
            .map_err(|e| SetupError::Deserialization(e.to_string()))
    }

    /// Write `<name>.pk` and `<name>.vk` into `dir`.
    fn save(&self, dir: &Path, name: &str) -> Result<(), SetupError> {
        std::fs::write(dir.join(format!("{name}.pk")), self.serialize_pk()?)?;
        std::fs::write(dir.join(format!("{name}.vk")), self.serialize_vk()?)?;
        Ok(())
    }

    /// Read `<name>.pk` and `<name>.vk` from `dir`.
    fn load(dir: &Path, name: &str) -> Result<Self, SetupError> {
        Ok(Self {
            proving_key: Self::deserialize_pk(&std::fs::read(dir.join(format!("{name}.pk")))?)?,
            verifying_key: Self::deserialize_vk(&std::fs::read(dir.join(format!("{name}.vk")))?)?,
        })
    }
}

/// All circuit keys
pub struct CircuitKeys {
    pub membership: CircuitKeyPair,
    pub add: CircuitKeyPair,
    pub delete: CircuitKeyPair,
    pub update: CircuitKeyPair,
}

impl CircuitKeys {
    /// Keys of the transition circuit for `op`.
    pub fn transition(&self, op: OpType) -> &CircuitKeyPair {
        match op {
            OpType::Add => &self.add,
            OpType::Delete => &self.delete,
            OpType::Update => &self.update,
        }
    }

    /// Circuit names paired with their keys, in a fixed order.
    pub fn named(&self) -> [(&'static str, &CircuitKeyPair); 4] {
        [
            ("membership", &self.membership),
            (OpType::Add.name(), &self.add),
            (OpType::Delete.name(), &self.delete),
            (OpType::Update.name(), &self.update),
        ]
    }

    /// Save all keys to a directory
    pub fn save_to_directory(&self, dir: &Path) -> Result<(), SetupError> {
        std::fs::create_dir_all(dir)?;

        for (name, pair) in self.named() {
            pair.save(dir, name)?;
        }

        info!(dir = %dir.display(), "saved circuit keys");
        Ok(())
    }

    /// Load all keys from a directory
    pub fn load_from_directory(dir: &Path) -> Result<Self, SetupError> {
        let keys = Self {
            membership: CircuitKeyPair::load(dir, "membership")?,
            add: CircuitKeyPair::load(dir, OpType::Add.name())?,
            delete: CircuitKeyPair::load(dir, OpType::Delete.name())?,
            update: CircuitKeyPair::load(dir, OpType::Update.name())?,
        };

        info!(dir = %dir.display(), "loaded circuit keys");
        Ok(keys)
    }
}

/// Run trusted setup for all circuits
pub fn setup_all_circuits() -> Result<CircuitKeys, SetupError> {
    // Use a fixed seed for reproducible setup (in production, use secure randomness)
    let mut rng = StdRng::seed_from_u64(42);

    info!("setting up MembershipCircuit");
    let membership = setup_membership(&mut rng)?;

    info!("setting up TransitionCircuit (add)");
    let add = setup_transition(&mut rng, OpType::Add)?;

    info!("setting up TransitionCircuit (delete)");
    let delete = setup_transition(&mut rng, OpType::Delete)?;

    info!("setting up TransitionCircuit (update)");
    let update = setup_transition(&mut rng, OpType::Update)?;

    Ok(CircuitKeys {
        membership,
        add,
        delete,
        update,
    })
}

/// Setup MembershipCircuit
pub fn setup_membership(rng: &mut StdRng) -> Result<CircuitKeyPair, SetupError> {
    let circuit = MembershipCircuit::empty();
    let (pk, vk) = Groth16::<Bn254>::circuit_specific_setup(circuit, rng)
        .map_err(|e| SetupError::CircuitSetup(e.to_string()))?;

    Ok(CircuitKeyPair {
        proving_key: pk,
        verifying_key: vk,
    })
}

/// Setup TransitionCircuit for one operation type
pub fn setup_transition(rng: &mut StdRng, op: OpType) -> Result<CircuitKeyPair, SetupError> {
    let circuit = TransitionCircuit::empty(op);
    let (pk, vk) = Groth16::<Bn254>::circuit_specific_setup(circuit, rng)
        .map_err(|e| SetupError::CircuitSetup(e.to_string()))?;

    Ok(CircuitKeyPair {
        proving_key: pk,
        verifying_key: vk,
    })
}
