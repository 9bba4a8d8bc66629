//! Shared fixtures for cross-family integration tests

use algoforge_crypto::{
    AsymmetricAlgorithm, AsymmetricKeyPair, SecureRandom, SignatureAlgorithm,
};
use once_cell::sync::Lazy;

/// Install a test subscriber once per process. Later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt::try_init();
}

/// RSA-1024 pair shared by every RSA scenario. Small enough to generate
/// quickly in debug builds.
pub static RSA_1024: Lazy<AsymmetricKeyPair> = Lazy::new(|| {
    AsymmetricAlgorithm::rsa_with(1024, 25)
        .generate_key_pair_with(&mut SecureRandom::from_seed([0x52; 32]))
        .unwrap()
});

/// DSA-1024/160 pair shared by every DSA scenario.
pub static DSA_1024: Lazy<AsymmetricKeyPair> = Lazy::new(|| {
    AsymmetricAlgorithm::dsa()
        .generate_key_pair_with(&mut SecureRandom::from_seed([0x44; 32]))
        .unwrap()
});

/// Deterministic message of `len` bytes.
pub fn sample_buffer(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 + 7) as u8).collect()
}

/// A key pair the signature can use: the shared fixtures for RSA and DSA,
/// a fresh pair for the curve families. `None` when the family has no key
/// generation backend.
pub fn key_pair_for(signature: &SignatureAlgorithm) -> Option<AsymmetricKeyPair> {
    match signature.asymmetric_algorithm().mechanism() {
        "RSA" => Some(RSA_1024.clone()),
        "DSA" => Some(DSA_1024.clone()),
        _ => signature.generate_key_pair().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_buffer_is_stable() {
        assert_eq!(sample_buffer(123), sample_buffer(123));
        assert_eq!(sample_buffer(4), vec![7, 38, 69, 100]);
    }
}
