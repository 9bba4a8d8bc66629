//! Signature resolution, OID mapping and sign/verify round trips

use algoforge_crypto::registry;
use algoforge_crypto::{mechanism_to_oid, CryptoError, SignatureAlgorithm};

use crate::test_utils::{init_tracing, key_pair_for, sample_buffer, RSA_1024};

#[test]
fn test_sha256_with_ecdsa_scenario() {
    init_tracing();
    let signature = registry::try_get_signature_algorithm("SHA256WITHECDSA").unwrap();
    assert_eq!(signature.asymmetric_algorithm().mechanism(), "ECDSA");
    assert_eq!(signature.oid().unwrap().to_string(), "1.2.840.10045.4.3.2");
    assert_eq!(mechanism_to_oid("SHA256WITHECDSA"), signature.oid());
}

/// Every catalogued signature whose backend exists signs and verifies; the
/// rest report `Unavailable`.
#[test]
fn test_round_trip_every_available_signature() {
    init_tracing();
    let message = sample_buffer(123);
    let mut exercised = 0;

    for signature in registry::signature_algorithms() {
        let Some(pair) = key_pair_for(&signature) else {
            tracing::info!(mechanism = %signature, "no key generation backend");
            continue;
        };
        let mut signer = match signature.generate_signer(&pair.private()) {
            Ok(signer) => signer,
            Err(CryptoError::Unavailable { .. }) => {
                tracing::info!(mechanism = %signature, "no signature backend");
                continue;
            }
            Err(other) => panic!("{signature}: {other}"),
        };
        tracing::info!(mechanism = %signature, "signing sample buffer");
        signer.update(&message);
        let signed = signer
            .generate_signature()
            .unwrap_or_else(|error| panic!("{signature}: {error}"));

        let mut verifier = signature.generate_signer(&pair.public()).unwrap();
        verifier.update(&message);
        assert!(verifier.verify_signature(&signed).unwrap(), "{signature}");

        verifier.update(&message[1..]);
        assert!(!verifier.verify_signature(&signed).unwrap(), "{signature} accepted a modified message");
        exercised += 1;
    }
    tracing::info!(exercised, "signatures exercised");
    assert!(exercised >= 48, "only {exercised} signatures exercised");
}

#[test]
fn test_signer_is_reusable() {
    init_tracing();
    let signature = registry::try_get_signature_algorithm("SHA256withRSA").unwrap();
    let mut signer = signature.generate_signer(&RSA_1024.private()).unwrap();
    signer.update(b"first");
    let first = signer.generate_signature().unwrap();
    signer.update(b"first");
    assert_eq!(signer.generate_signature().unwrap(), first);
    signer.update(b"first");
    assert!(signer.verify_signature(&first).unwrap());
}

#[test]
fn test_pss_salted_signatures_differ_but_verify() {
    init_tracing();
    let pss = registry::try_get_signature_algorithm("PSSwithRSA").unwrap();
    assert_eq!(pss.oid().unwrap().to_string(), "1.2.840.113549.1.1.10");
    let first = pss.sign(&RSA_1024.private(), b"message").unwrap();
    let second = pss.sign(&RSA_1024.private(), b"message").unwrap();
    assert_ne!(first, second);
    assert!(pss.verify(&RSA_1024.public(), b"message", &first).unwrap());
    assert!(pss.verify(&RSA_1024.public(), b"message", &second).unwrap());
}

#[test]
fn test_wrong_key_family() {
    init_tracing();
    let ecdsa = registry::try_get_signature_algorithm("SHA256withECDSA").unwrap();
    assert!(matches!(
        ecdsa.generate_signer(&RSA_1024.public()),
        Err(CryptoError::InvalidKey { .. })
    ));
}

#[test]
fn test_asymmetric_reference_must_match() {
    init_tracing();
    let rsa = registry::try_get_signature_algorithm("SHA256withRSA").unwrap();
    let dsa = registry::try_get_asymmetric_algorithm("DSA").unwrap();
    match rsa.with_asymmetric(dsa) {
        Err(CryptoError::UnsupportedConfiguration { reason, .. }) => {
            assert_eq!(reason, "requires RSA asymmetric algorithm")
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_oid_coverage_of_catalog() {
    init_tracing();
    let catalog = registry::signature_algorithms();
    let with_oid = catalog.iter().filter(|signature| signature.oid().is_some()).count();
    // Edwards-curve schemes carry no identifier.
    assert_eq!(with_oid, 48);
    for signature in catalog.iter().filter(|signature| signature.oid().is_some()) {
        assert_eq!(mechanism_to_oid(signature.mechanism()), signature.oid(), "{signature}");
    }
    assert_eq!(SignatureAlgorithm::ed25519().oid(), None);
}

#[test]
fn test_regional_and_edwards448_schemes_round_trip() {
    init_tracing();
    for name in ["SM3withSM2", "SHA256withSM2", "Ed448", "Ed448ph"] {
        let signature = registry::try_get_signature_algorithm(name).unwrap();
        let pair = signature.generate_key_pair().unwrap();
        let signed = signature.sign(&pair.private(), b"message").unwrap();
        assert!(signature.verify(&pair.public(), b"message", &signed).unwrap(), "{name}");
        assert!(!signature.verify(&pair.public(), b"massage", &signed).unwrap(), "{name}");
    }
}
