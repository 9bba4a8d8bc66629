//! Name resolution for asymmetric and asymmetric-encryption descriptors.
//!
//! Resolved descriptors carry the family's default generation parameters.

use std::collections::HashMap;

use algoforge_core::normalize;
use once_cell::sync::Lazy;

use super::{AsymmetricAlgorithm, AsymmetricEncryptionAlgorithm};

static ASYMMETRIC_TABLE: Lazy<Vec<(Vec<&'static str>, AsymmetricAlgorithm)>> = Lazy::new(|| {
    vec![
        (vec!["DSA"], AsymmetricAlgorithm::dsa()),
        (vec!["ECDSA"], AsymmetricAlgorithm::ecdsa()),
        (
            vec!["ECGOST3410", "ECGOST3410-2001", "ECGOST-3410", "ECGOST-3410-2001"],
            AsymmetricAlgorithm::ecgost3410(),
        ),
        (vec!["ED25519"], AsymmetricAlgorithm::ed25519()),
        (vec!["ED448"], AsymmetricAlgorithm::ed448()),
        (vec!["ELGAMAL"], AsymmetricAlgorithm::elgamal()),
        (
            vec!["GOST3410", "GOST3410-94", "GOST-3410", "GOST-3410-94"],
            AsymmetricAlgorithm::gost3410(),
        ),
        (vec!["RSA"], AsymmetricAlgorithm::rsa()),
        (vec!["SM2"], AsymmetricAlgorithm::sm2()),
    ]
});

static ASYMMETRIC_ALIASES: Lazy<HashMap<&'static str, AsymmetricAlgorithm>> = Lazy::new(|| {
    ASYMMETRIC_TABLE
        .iter()
        .flat_map(|(aliases, algorithm)| aliases.iter().map(move |alias| (*alias, algorithm.clone())))
        .collect()
});

/// Every static asymmetric entry with default parameters.
pub fn asymmetric_algorithms() -> Vec<AsymmetricAlgorithm> {
    ASYMMETRIC_TABLE.iter().map(|(_, algorithm)| algorithm.clone()).collect()
}

/// The encryption-capable entries: RSA and ElGamal.
pub fn asymmetric_encryption_algorithms() -> Vec<AsymmetricEncryptionAlgorithm> {
    vec![AsymmetricEncryptionAlgorithm::elgamal(), AsymmetricEncryptionAlgorithm::rsa()]
}

/// Resolve names such as `"RSA"`, `"ed25519"` or `"ECGOST-3410-2001"`.
pub fn try_get_algorithm(mechanism: &str) -> Option<AsymmetricAlgorithm> {
    let resolved = ASYMMETRIC_ALIASES.get(normalize(mechanism).as_str()).cloned();
    match &resolved {
        Some(algorithm) => tracing::debug!(name = mechanism, mechanism = %algorithm, "asymmetric algorithm resolved"),
        None => tracing::debug!(name = mechanism, "asymmetric algorithm not found"),
    }
    resolved
}

/// Resolve an encryption-capable mechanism. Only `RSA` and `ElGamal`
/// resolve.
pub fn try_get_encryption_algorithm(mechanism: &str) -> Option<AsymmetricEncryptionAlgorithm> {
    let resolved = match normalize(mechanism).as_str() {
        "RSA" => Some(AsymmetricEncryptionAlgorithm::rsa()),
        "ELGAMAL" => Some(AsymmetricEncryptionAlgorithm::elgamal()),
        _ => None,
    };
    match &resolved {
        Some(algorithm) => tracing::debug!(name = mechanism, mechanism = %algorithm, "asymmetric encryption resolved"),
        None => tracing::debug!(name = mechanism, "asymmetric encryption not found"),
    }
    resolved
}
