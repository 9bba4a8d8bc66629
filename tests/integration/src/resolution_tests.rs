//! Name resolution across every registry
//!
//! Covers alias invariance, catalog round trips and the documented lookup
//! scenarios.

use algoforge_crypto::registry;
use algoforge_crypto::{BlockAlgorithm, CmacAlgorithm, HashAlgorithm};

use crate::test_utils::init_tracing;

#[test]
fn test_triple_des_aliases_are_identical() {
    init_tracing();
    let reference = registry::try_get_block_algorithm("DESede").unwrap();
    for alias in ["3DES", "desede", "TDEA", "TripleDES", "DESEDE3", "tripledes"] {
        tracing::info!(alias, "resolving Triple DES alias");
        let resolved = registry::try_get_block_algorithm(alias).unwrap();
        assert_eq!(resolved.mechanism(), reference.mechanism(), "{alias}");
        assert_eq!(resolved.legal_key_sizes(), reference.legal_key_sizes(), "{alias}");
        assert_eq!(resolved.legal_block_sizes(), reference.legal_block_sizes(), "{alias}");
    }
}

#[test]
fn test_every_catalog_round_trips() {
    init_tracing();

    tracing::info!("Step 1: hashes");
    for hash in registry::hash_algorithms() {
        let resolved = registry::try_get_hash_algorithm(hash.mechanism()).unwrap();
        assert_eq!(resolved, hash);
        assert_eq!(resolved.legal_hash_sizes(), hash.legal_hash_sizes());
    }

    tracing::info!("Step 2: HMAC, CMAC and raw MACs");
    for hmac in registry::hmac_algorithms() {
        assert_eq!(registry::try_get_hmac_algorithm(hmac.mechanism()).unwrap(), hmac);
    }
    for cmac in registry::cmac_algorithms() {
        let resolved = registry::try_get_cmac_algorithm(cmac.mechanism(), Some(cmac.hash_size())).unwrap();
        assert_eq!(resolved, cmac);
    }
    for mac in registry::mac_algorithms() {
        let resolved = registry::try_get_mac_algorithm(mac.mechanism(), Some(mac.hash_size())).unwrap();
        assert_eq!(resolved, mac);
    }

    tracing::info!("Step 3: block and stream ciphers");
    for block in registry::block_algorithms() {
        let resolved = registry::try_get_block_algorithm(block.mechanism()).unwrap();
        assert_eq!(resolved.mechanism(), block.mechanism());
        assert_eq!(resolved.legal_key_sizes(), block.legal_key_sizes());
    }
    for stream in registry::stream_algorithms() {
        let resolved = registry::try_get_stream_algorithm(stream.mechanism()).unwrap();
        assert_eq!(resolved.mechanism(), stream.mechanism());
        assert_eq!(resolved.legal_iv_sizes(), stream.legal_iv_sizes());
    }

    tracing::info!("Step 4: asymmetric and signatures");
    for asymmetric in registry::asymmetric_algorithms() {
        assert_eq!(
            registry::try_get_asymmetric_algorithm(asymmetric.mechanism()).unwrap(),
            asymmetric
        );
    }
    for signature in registry::signature_algorithms() {
        assert_eq!(
            registry::try_get_signature_algorithm(signature.mechanism()).unwrap(),
            signature
        );
    }
}

#[test]
fn test_cmac_with_omitted_mac_size() {
    init_tracing();
    let cmac = registry::try_get_cmac_algorithm("aes_cmac", None).unwrap();
    assert_eq!(cmac.mechanism(), "AES/CMAC");
    assert_eq!(cmac.hash_size(), 128);
    assert_eq!(cmac, CmacAlgorithm::new(BlockAlgorithm::aes()).unwrap());
}

#[test]
fn test_parametrized_blake2b() {
    init_tracing();
    let blake = registry::try_get_hash_algorithm("blake2b-160").unwrap();
    assert_eq!(blake.hash_size(), 160);
    assert_eq!(blake, HashAlgorithm::blake2b(160).unwrap());
    assert!(registry::try_get_hash_algorithm("blake2b-5").is_none());
}

#[test]
fn test_unknown_names_resolve_to_none() {
    init_tracing();
    for name in ["", "   ", "NOT-A-HASH", "SHA-999"] {
        assert!(registry::try_get_hash_algorithm(name).is_none(), "{name}");
    }
    assert!(registry::try_get_block_algorithm("AES-9000").is_none());
    assert!(registry::try_get_stream_algorithm("RC5").is_none());
    assert!(registry::try_get_signature_algorithm("SHA256withElGamal").is_none());
    assert!(registry::try_get_asymmetric_encryption_algorithm("DSA").is_none());
}
