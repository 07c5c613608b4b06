//! Field-element parsing, formatting and serde adapters.
//!
//! Field elements cross the crate boundary as decimal strings (or `0x`-prefixed
//! big-endian hex). Anything at or above the BN254 scalar modulus is rejected
//! here rather than being silently reduced.

use ark_bn254::Fr;
use ark_ff::PrimeField;
use num_bigint::BigUint;
use num_traits::Num;

use crate::error::SmtError;

/// The BN254 scalar field modulus as an arbitrary-precision integer.
pub fn modulus() -> BigUint {
    BigUint::from(Fr::MODULUS)
}

/// Parse a canonical field element from a decimal or `0x` hex string.
pub fn parse_fr(input: &str) -> Result<Fr, SmtError> {
    let trimmed = input.trim();
    let (digits, radix) = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => (hex, 16),
        None => (trimmed, 10),
    };

    let value = BigUint::from_str_radix(digits, radix)
        .map_err(|e| SmtError::invalid(format!("{input:?} is not a field element: {e}")))?;

    if value >= modulus() {
        return Err(SmtError::invalid(format!(
            "{input:?} is not below the field modulus"
        )));
    }

    Ok(Fr::from(value))
}

/// Format a field element as its canonical decimal representation.
pub fn fr_to_decimal(value: &Fr) -> String {
    BigUint::from(value.into_bigint()).to_str_radix(10)
}

/// Serde adapter for a single `Fr` encoded as a decimal string.
pub mod serde_fr {
    use ark_bn254::Fr;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Fr, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::fr_to_decimal(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Fr, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_fr(&raw).map_err(de::Error::custom)
    }
}

/// Serde adapter for a sibling path, encoded sparsely as `{level: "value"}`.
///
/// Zero siblings are omitted on output and implied on input.
pub mod serde_siblings {
    use std::collections::BTreeMap;

    use ark_ff::Zero;
    use serde::ser::SerializeMap;
    use serde::{de, Deserialize, Deserializer, Serializer};

    use crate::error::SmtError;
    use crate::smt::{sparse_siblings, SiblingPath};

    pub fn serialize<S: Serializer>(
        siblings: &SiblingPath,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let populated: Vec<(usize, String)> = siblings
            .iter()
            .enumerate()
            .filter(|(_, sibling)| !sibling.is_zero())
            .map(|(level, sibling)| (level, super::fr_to_decimal(sibling)))
            .collect();

        let mut map = serializer.serialize_map(Some(populated.len()))?;
        for (level, sibling) in &populated {
            map.serialize_entry(level, sibling)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<SiblingPath, D::Error> {
        // String keys: buffered (tagged or flattened) content never yields integer map keys
        let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
        let levels = raw
            .iter()
            .map(|(level, value)| {
                let level = level.parse::<usize>().map_err(|e| {
                    SmtError::invalid(format!("sibling level {level:?} is not an index: {e}"))
                })?;
                super::parse_fr(value).map(|fr| (level, fr))
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(de::Error::custom)?;
        sparse_siblings(&levels).map_err(de::Error::custom)
    }
}
