//! Name resolution for signature descriptors.
//!
//! The static entries cover the common hash and scheme pairs. Any other
//! `<hash>with<scheme>` name resolves when both halves do, so
//! `"BLAKE2b-256withECDSA"` and `"SHA512withRSA/X9.31"` work even though
//! they are not catalogued.

use std::collections::HashMap;

use algoforge_core::normalize_keep_slash;
use once_cell::sync::Lazy;

use super::oid::hash_prefix_spellings;
use super::{SignatureAlgorithm, SignatureKind};
use crate::hash::{self, HashAlgorithm};

const ECGOST3410_NAMES: [&str; 4] = ["ECGOST3410", "ECGOST3410-2001", "ECGOST-3410", "ECGOST-3410-2001"];
const GOST3410_NAMES: [&str; 4] = ["GOST3410", "GOST3410-94", "GOST-3410", "GOST-3410-94"];

fn sha2_family() -> Vec<HashAlgorithm> {
    vec![
        HashAlgorithm::sha1(),
        HashAlgorithm::sha224(),
        HashAlgorithm::sha256(),
        HashAlgorithm::sha384(),
        HashAlgorithm::sha512(),
    ]
}

fn sha3_family() -> Vec<HashAlgorithm> {
    [224, 256, 384, 512]
        .into_iter()
        .filter_map(|size| HashAlgorithm::sha3(size).ok())
        .collect()
}

/// Static entries with their normalized aliases, in catalog order.
static SIGNATURE_TABLE: Lazy<Vec<(Vec<String>, SignatureAlgorithm)>> = Lazy::new(|| {
    let mut hashed: Vec<(SignatureKind, Vec<HashAlgorithm>)> = vec![(SignatureKind::CvcEcdsa, sha2_family())];
    let mut plain = vec![HashAlgorithm::ripemd160()];
    plain.extend(sha2_family());
    hashed.push((SignatureKind::PlainEcdsa, plain));
    for kind in [SignatureKind::Dsa, SignatureKind::Ecdsa] {
        let mut hashes = sha2_family();
        hashes.extend(sha3_family());
        hashed.push((kind, hashes));
    }
    let mut rsa = vec![
        HashAlgorithm::md2(),
        HashAlgorithm::md5(),
        HashAlgorithm::ripemd128(),
        HashAlgorithm::ripemd160(),
        HashAlgorithm::ripemd256(),
    ];
    rsa.extend(sha2_family());
    rsa.extend(sha3_family());
    hashed.push((SignatureKind::Rsa, rsa));
    hashed.push((SignatureKind::Sm2, vec![HashAlgorithm::sha256(), HashAlgorithm::sm3()]));

    let mut table = Vec::new();
    for (kind, hashes) in hashed {
        for hash in hashes {
            if let Ok(algorithm) = SignatureAlgorithm::with_hash(kind, hash) {
                table.push((spelled_aliases(&algorithm), algorithm));
            }
        }
    }

    if let Ok(pss) = SignatureAlgorithm::with_hash(SignatureKind::RsaAndMgf1, HashAlgorithm::sha1()) {
        let aliases = ["PSSWITHRSA", "SHA1WITHRSAANDMGF1", "SHA-1WITHRSAANDMGF1"];
        table.push((aliases.iter().map(|alias| alias.to_string()).collect(), pss));
    }
    for (kind, names) in [
        (SignatureKind::EcGost3410, ECGOST3410_NAMES),
        (SignatureKind::Gost3410, GOST3410_NAMES),
    ] {
        if let Ok(algorithm) = SignatureAlgorithm::with_hash(kind, HashAlgorithm::gost3411()) {
            let mut aliases = vec![normalize_keep_slash(algorithm.mechanism())];
            aliases.extend(names.iter().map(|name| name.to_string()));
            table.push((aliases, algorithm));
        }
    }

    let edwards = [
        ("ED25519", SignatureAlgorithm::ed25519()),
        ("ED25519CTX", SignatureAlgorithm::ed25519ctx(&[])),
        ("ED25519PH", SignatureAlgorithm::ed25519ph(&[])),
        ("ED448", SignatureAlgorithm::ed448(&[])),
        ("ED448PH", SignatureAlgorithm::ed448ph(&[])),
    ];
    for (alias, algorithm) in edwards {
        table.push((vec![alias.to_string()], algorithm));
    }
    table
});

static SIGNATURE_ALIASES: Lazy<HashMap<String, SignatureAlgorithm>> = Lazy::new(|| {
    SIGNATURE_TABLE
        .iter()
        .flat_map(|(aliases, algorithm)| aliases.iter().map(move |alias| (alias.clone(), algorithm.clone())))
        .collect()
});

/// `SHA256WITHECDSA` and `SHA-256WITHECDSA` for `SHA256withECDSA`.
fn spelled_aliases(algorithm: &SignatureAlgorithm) -> Vec<String> {
    let normalized = normalize_keep_slash(algorithm.mechanism());
    match normalized.split_once("WITH") {
        Some((prefix, suffix)) => hash_prefix_spellings(prefix)
            .into_iter()
            .map(|spelling| format!("{spelling}WITH{suffix}"))
            .collect(),
        None => vec![normalized],
    }
}

/// Every static signature entry, in catalog order.
pub fn signature_algorithms() -> Vec<SignatureAlgorithm> {
    SIGNATURE_TABLE.iter().map(|(_, algorithm)| algorithm.clone()).collect()
}

/// Resolve names such as `"SHA256withECDSA"`, `"sha-1WithRSAandMGF1"`,
/// `"PSSwithRSA"` or `"Ed25519ph"`.
pub fn try_get_algorithm(mechanism: &str) -> Option<SignatureAlgorithm> {
    let normalized = normalize_keep_slash(mechanism);
    if normalized.is_empty() {
        return None;
    }
    let resolved = SIGNATURE_ALIASES
        .get(&normalized)
        .cloned()
        .or_else(|| compose(&normalized));
    match &resolved {
        Some(algorithm) => tracing::debug!(name = mechanism, mechanism = %algorithm, "signature resolved"),
        None => tracing::debug!(name = mechanism, "signature not found"),
    }
    resolved
}

/// Split at the first `WITH` and resolve the hash and scheme halves.
fn compose(normalized: &str) -> Option<SignatureAlgorithm> {
    let (prefix, suffix) = normalized.split_once("WITH").unwrap_or(("", normalized));
    if suffix == "ELGAMAL" || prefix.is_empty() {
        return None;
    }
    let kind = scheme_from_suffix(suffix)?;
    let hash = hash::registry::try_get_algorithm(prefix)?;
    SignatureAlgorithm::with_hash(kind, hash).ok()
}

fn scheme_from_suffix(suffix: &str) -> Option<SignatureKind> {
    let kind = match suffix {
        "CVC-ECDSA" => SignatureKind::CvcEcdsa,
        "DSA" => SignatureKind::Dsa,
        "ECDSA" => SignatureKind::Ecdsa,
        "ECNR" => SignatureKind::Ecnr,
        "PLAIN-ECDSA" => SignatureKind::PlainEcdsa,
        "RSA" => SignatureKind::Rsa,
        "ISO9796-2" | "RSA/ISO9796-2" | "RSAANDISO9796-2" => SignatureKind::RsaAndIso9796_2,
        "RSAANDMGF1" => SignatureKind::RsaAndMgf1,
        "RSA/X9.31" | "RSA/X931" | "RSAANDX931" | "RSAANDX9.31" => SignatureKind::RsaAndX931,
        "SM2" => SignatureKind::Sm2,
        other if ECGOST3410_NAMES.contains(&other) => SignatureKind::EcGost3410,
        other if GOST3410_NAMES.contains(&other) => SignatureKind::Gost3410,
        _ => return None,
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_shape() {
        let catalog = signature_algorithms();
        assert_eq!(catalog.len(), 53);
        let hashed = catalog.iter().filter(|algorithm| algorithm.kind().is_hashed()).count();
        assert_eq!(hashed, 48);
        for algorithm in &catalog {
            assert_eq!(try_get_algorithm(algorithm.mechanism()).as_ref(), Some(algorithm), "{algorithm}");
        }
    }

    #[test]
    fn test_sha256_with_ecdsa() {
        let algorithm = try_get_algorithm("SHA256WITHECDSA").unwrap();
        assert_eq!(algorithm.mechanism(), "SHA256withECDSA");
        assert_eq!(algorithm.asymmetric_algorithm().mechanism(), "ECDSA");
        assert_eq!(algorithm.hash_algorithm().map(|hash| hash.mechanism()), Some("SHA256"));
        assert_eq!(algorithm.oid().unwrap().to_string(), "1.2.840.10045.4.3.2");
    }

    #[test]
    fn test_hyphenated_aliases() {
        let expected = try_get_algorithm("SHA3-256withRSA").unwrap();
        assert_eq!(try_get_algorithm("sha-3-256withrsa").unwrap(), expected);
        assert_eq!(
            try_get_algorithm("RIPEMD-160withPLAIN-ECDSA").unwrap().mechanism(),
            "RIPEMD160withPLAIN-ECDSA"
        );
        assert_eq!(try_get_algorithm("SHA-1withDSA").unwrap().mechanism(), "SHA1withDSA");
    }

    #[test]
    fn test_pss_aliases() {
        for name in ["PSSwithRSA", "SHA1withRSAandMGF1", "sha-1withRSAandMGF1"] {
            let algorithm = try_get_algorithm(name).unwrap();
            assert_eq!(algorithm.mechanism(), "SHA1withRSAandMGF1", "{name}");
            assert_eq!(algorithm.kind(), SignatureKind::RsaAndMgf1);
        }
    }

    #[test]
    fn test_bare_gost_names() {
        for name in ["ECGOST3410", "ecgost-3410-2001"] {
            assert_eq!(try_get_algorithm(name).unwrap().mechanism(), "GOST3411withECGOST3410", "{name}");
        }
        for name in ["GOST3410", "gost_3410_94"] {
            assert_eq!(try_get_algorithm(name).unwrap().mechanism(), "GOST3411withGOST3410", "{name}");
        }
    }

    #[test]
    fn test_composed_names() {
        let x931 = try_get_algorithm("SHA512withRSAandX9.31").unwrap();
        assert_eq!(x931.mechanism(), "SHA512withRSA/X9.31");
        assert_eq!(x931.kind(), SignatureKind::RsaAndX931);

        let iso = try_get_algorithm("SHA256withRSA/ISO9796-2").unwrap();
        assert_eq!(iso.mechanism(), "SHA256withISO9796-2");

        let ecnr = try_get_algorithm("SHA384withECNR").unwrap();
        assert_eq!(ecnr.asymmetric_algorithm().mechanism(), "ECDSA");

        let blake = try_get_algorithm("BLAKE2b-256withECDSA").unwrap();
        assert_eq!(blake.mechanism(), "BLAKE2b-256withECDSA");
        assert_eq!(blake.oid(), None);

        let gost = try_get_algorithm("GOST3411withECGOST-3410").unwrap();
        assert_eq!(gost.kind(), SignatureKind::EcGost3410);
    }

    #[test]
    fn test_edwards_entries() {
        assert_eq!(try_get_algorithm("ed25519").unwrap(), SignatureAlgorithm::ed25519());
        let ctx = try_get_algorithm("Ed25519ctx").unwrap();
        assert_eq!(ctx.kind(), SignatureKind::Ed25519ctx);
        assert!(ctx.context().is_empty());
        assert_eq!(try_get_algorithm("ED448PH").unwrap().asymmetric_algorithm().mechanism(), "Ed448");
    }

    #[test]
    fn test_unresolvable_names() {
        for name in ["SHA256withElGamal", "withRSA", "RSA", "SHA256withFOO", "NOPEwithRSA", "", "Ed25519withRSA"] {
            assert!(try_get_algorithm(name).is_none(), "{name}");
        }
    }
}
