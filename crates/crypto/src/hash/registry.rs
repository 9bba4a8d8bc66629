//! Name resolution for hash descriptors.

use std::collections::HashMap;

use algoforge_core::normalize;
use once_cell::sync::Lazy;

use super::{HashAlgorithm, HashKind};
use crate::error::CryptoResult;

/// Static entries with their normalized aliases, in catalog order.
static HASH_TABLE: Lazy<Vec<(Vec<&'static str>, HashAlgorithm)>> = Lazy::new(|| {
    let entries: Vec<(Vec<&'static str>, CryptoResult<HashAlgorithm>)> = vec![
        (vec!["BLAKE2B-256"], HashAlgorithm::blake2b(256)),
        (vec!["BLAKE2B-384"], HashAlgorithm::blake2b(384)),
        (vec!["BLAKE2B-512"], HashAlgorithm::blake2b(512)),
        (vec!["BLAKE2S-256"], HashAlgorithm::blake2s(256)),
        (vec!["CSHAKE128", "CSHAKE-128"], HashAlgorithm::cshake(128, &[], &[])),
        (vec!["CSHAKE256", "CSHAKE-256"], HashAlgorithm::cshake(256, &[], &[])),
        (vec!["DSTU7564-256"], HashAlgorithm::dstu7564(256)),
        (vec!["DSTU7564-384"], HashAlgorithm::dstu7564(384)),
        (vec!["DSTU7564-512"], HashAlgorithm::dstu7564(512)),
        (vec!["GOST3411"], Ok(HashAlgorithm::gost3411())),
        (vec!["GOST3411-2012-256"], HashAlgorithm::gost3411_2012(256)),
        (vec!["GOST3411-2012-512"], HashAlgorithm::gost3411_2012(512)),
        (vec!["KECCAK-128", "KECCAK128"], HashAlgorithm::keccak(128)),
        (vec!["KECCAK-224", "KECCAK224"], HashAlgorithm::keccak(224)),
        (vec!["KECCAK-256", "KECCAK256"], HashAlgorithm::keccak(256)),
        (vec!["KECCAK-288", "KECCAK288"], HashAlgorithm::keccak(288)),
        (vec!["KECCAK-384", "KECCAK384"], HashAlgorithm::keccak(384)),
        (vec!["KECCAK-512", "KECCAK512"], HashAlgorithm::keccak(512)),
        (vec!["MD2"], Ok(HashAlgorithm::md2())),
        (vec!["MD4"], Ok(HashAlgorithm::md4())),
        (vec!["MD5"], Ok(HashAlgorithm::md5())),
        (vec!["RIPEMD128", "RIPEMD-128"], Ok(HashAlgorithm::ripemd128())),
        (vec!["RIPEMD160", "RIPEMD-160"], Ok(HashAlgorithm::ripemd160())),
        (vec!["RIPEMD256", "RIPEMD-256"], Ok(HashAlgorithm::ripemd256())),
        (vec!["RIPEMD320", "RIPEMD-320"], Ok(HashAlgorithm::ripemd320())),
        (vec!["SHA1", "SHA-1"], Ok(HashAlgorithm::sha1())),
        (vec!["SHA224", "SHA-224"], Ok(HashAlgorithm::sha224())),
        (vec!["SHA256", "SHA-256"], Ok(HashAlgorithm::sha256())),
        (vec!["SHA384", "SHA-384"], Ok(HashAlgorithm::sha384())),
        (vec!["SHA512", "SHA-512"], Ok(HashAlgorithm::sha512())),
        (vec!["SHA512-224", "SHA-512-224"], HashAlgorithm::sha512_t(224)),
        (vec!["SHA512-256", "SHA-512-256"], HashAlgorithm::sha512_t(256)),
        (vec!["SHA3-224", "SHA-3-224"], HashAlgorithm::sha3(224)),
        (vec!["SHA3-256", "SHA-3-256"], HashAlgorithm::sha3(256)),
        (vec!["SHA3-384", "SHA-3-384"], HashAlgorithm::sha3(384)),
        (vec!["SHA3-512", "SHA-3-512"], HashAlgorithm::sha3(512)),
        (vec!["SHAKE128", "SHAKE-128"], HashAlgorithm::shake(128)),
        (vec!["SHAKE256", "SHAKE-256"], HashAlgorithm::shake(256)),
        (vec!["SKEIN-256-256"], HashAlgorithm::skein(256, 256)),
        (vec!["SKEIN-512-512"], HashAlgorithm::skein(512, 512)),
        (vec!["SKEIN-1024-1024"], HashAlgorithm::skein(1024, 1024)),
        (vec!["SM3"], Ok(HashAlgorithm::sm3())),
        (vec!["TIGER"], Ok(HashAlgorithm::tiger())),
        (vec!["WHIRLPOOL"], Ok(HashAlgorithm::whirlpool())),
    ];
    entries
        .into_iter()
        .filter_map(|(aliases, algorithm)| algorithm.ok().map(|algorithm| (aliases, algorithm)))
        .collect()
});

static HASH_ALIASES: Lazy<HashMap<&'static str, HashAlgorithm>> = Lazy::new(|| {
    HASH_TABLE
        .iter()
        .flat_map(|(aliases, algorithm)| aliases.iter().map(move |alias| (*alias, algorithm.clone())))
        .collect()
});

/// Every static hash entry, in catalog order.
pub fn hash_algorithms() -> Vec<HashAlgorithm> {
    HASH_TABLE.iter().map(|(_, algorithm)| algorithm.clone()).collect()
}

/// Resolve a hash mechanism name.
///
/// Accepts the static aliases plus the parametrized forms `BLAKE2b-<n>`,
/// `BLAKE2s-<n>`, `SHA-512-<n>`, `SHA512-<n>` and `Skein-<state>-<n>`.
/// Unknown names and illegal sizes resolve to `None`.
pub fn try_get_algorithm(mechanism: &str) -> Option<HashAlgorithm> {
    let normalized = normalize(mechanism);
    if normalized.is_empty() {
        return None;
    }
    let resolved = lookup_normalized(&normalized);
    match &resolved {
        Some(algorithm) => tracing::debug!(name = mechanism, mechanism = %algorithm, "hash resolved"),
        None => tracing::debug!(name = mechanism, "hash not found"),
    }
    resolved
}

/// Lookup on an already normalized name.
pub(crate) fn lookup_normalized(normalized: &str) -> Option<HashAlgorithm> {
    HASH_ALIASES
        .get(normalized)
        .cloned()
        .or_else(|| try_get_nano_algorithm(normalized))
}

/// Static lookup that skips CSHAKE, used by HMAC resolution.
pub(crate) fn lookup_for_hmac(normalized: &str) -> Option<HashAlgorithm> {
    lookup_normalized(normalized).filter(|algorithm| !matches!(algorithm.kind(), HashKind::Cshake { .. }))
}

fn try_get_nano_algorithm(normalized: &str) -> Option<HashAlgorithm> {
    let tokens: Vec<&str> = normalized.split('-').collect();
    let kind = match tokens.as_slice() {
        ["BLAKE2B", size] => HashKind::Blake2b { size: size.parse().ok()? },
        ["BLAKE2S", size] => HashKind::Blake2s { size: size.parse().ok()? },
        ["SHA", "512", size] | ["SHA512", size] => HashKind::Sha512T { size: size.parse().ok()? },
        ["SKEIN", state, size] => HashKind::Skein {
            state_size: state.parse().ok()?,
            size: size.parse().ok()?,
        },
        _ => return None,
    };
    let legal = kind.legal_hash_sizes().is_legal(kind.hash_size())
        && match kind {
            HashKind::Skein { state_size, .. } => HashKind::skein_state_sizes().is_legal(state_size),
            _ => true,
        };
    if legal {
        HashAlgorithm::new(kind).ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_resolve_to_same_descriptor() {
        let canonical = try_get_algorithm("SHA3-256").unwrap();
        for alias in ["sha3_256", "SHA-3-256", "Sha3/256"] {
            assert_eq!(try_get_algorithm(alias).unwrap(), canonical);
        }
        assert_eq!(try_get_algorithm("ripemd_160").unwrap(), HashAlgorithm::ripemd160());
        assert_eq!(try_get_algorithm("sha512/224").unwrap().mechanism(), "SHA512/224");
    }

    #[test]
    fn test_nano_parser() {
        assert_eq!(try_get_algorithm("blake2b-160").unwrap().hash_size(), 160);
        assert_eq!(try_get_algorithm("BLAKE2s-96").unwrap().mechanism(), "BLAKE2s-96");
        assert_eq!(try_get_algorithm("SHA-512-200").unwrap().mechanism(), "SHA512/200");
        assert_eq!(try_get_algorithm("SHA512_256").unwrap(), HashAlgorithm::sha512_t(256).unwrap());
        assert_eq!(try_get_algorithm("Skein-512-160").unwrap().mechanism(), "Skein-512-160");
    }

    #[test]
    fn test_nano_parser_rejects_illegal_sizes() {
        assert!(try_get_algorithm("blake2b-5").is_none());
        assert!(try_get_algorithm("blake2b-520").is_none());
        assert!(try_get_algorithm("blake2b-160-1").is_none());
        assert!(try_get_algorithm("SHA-512-384").is_none());
        assert!(try_get_algorithm("SHA-256-128").is_none());
        assert!(try_get_algorithm("Skein-384-256").is_none());
        assert!(try_get_algorithm("blake2b-x").is_none());
        assert!(try_get_algorithm("blake2b--8").is_none());
    }

    #[test]
    fn test_unknown_and_empty_names() {
        assert!(try_get_algorithm("").is_none());
        assert!(try_get_algorithm("   ").is_none());
        assert!(try_get_algorithm("SHA-2").is_none());
        assert!(try_get_algorithm("MD6").is_none());
    }

    #[test]
    fn test_catalog_round_trip() {
        let catalog = hash_algorithms();
        assert_eq!(catalog.len(), 44);
        for algorithm in catalog {
            let resolved = try_get_algorithm(algorithm.mechanism()).unwrap();
            assert_eq!(resolved.mechanism(), algorithm.mechanism());
            assert_eq!(resolved.legal_hash_sizes(), algorithm.legal_hash_sizes());
            assert_eq!(resolved.hash_size(), algorithm.hash_size());
        }
    }

    #[test]
    fn test_hmac_lookup_skips_cshake() {
        assert!(lookup_for_hmac("CSHAKE128").is_none());
        assert!(lookup_for_hmac("SHAKE128").is_some());
    }
}
