//! Name resolution for HMAC, CMAC and raw block-cipher MAC descriptors.
//!
//! Each family strips its decoration (`/HMAC`, `-CMAC`, `MAC`, ...) and
//! resolves the remainder through the hash or block cipher aliases.

use std::collections::HashMap;

use algoforge_core::mechanism::{strip_any_prefix, strip_any_suffix};
use algoforge_core::{normalize, normalize_keep_slash};
use once_cell::sync::Lazy;

use super::{CmacAlgorithm, HmacAlgorithm, MacAlgorithm};
use crate::hash::registry::{hash_algorithms, lookup_for_hmac};
use crate::hash::HashKind;
use crate::symmetric::registry::{block_algorithms, lookup_block_normalized};

static CMAC_TABLE: Lazy<Vec<CmacAlgorithm>> = Lazy::new(|| {
    block_algorithms()
        .into_iter()
        .filter_map(|block| CmacAlgorithm::new(block).ok())
        .collect()
});

/// CMAC entries keyed by block cipher mechanism.
static CMAC_BY_BLOCK: Lazy<HashMap<String, CmacAlgorithm>> = Lazy::new(|| {
    CMAC_TABLE
        .iter()
        .map(|cmac| (cmac.block_algorithm().mechanism().to_string(), cmac.clone()))
        .collect()
});

static MAC_TABLE: Lazy<Vec<MacAlgorithm>> = Lazy::new(|| {
    block_algorithms()
        .into_iter()
        .filter_map(|block| MacAlgorithm::new(block).ok())
        .collect()
});

static MAC_BY_BLOCK: Lazy<HashMap<String, MacAlgorithm>> = Lazy::new(|| {
    MAC_TABLE
        .iter()
        .map(|mac| (mac.block_algorithm().mechanism().to_string(), mac.clone()))
        .collect()
});

/// Every static HMAC entry: one per static hash except CSHAKE.
pub fn hmac_algorithms() -> Vec<HmacAlgorithm> {
    hash_algorithms()
        .into_iter()
        .filter(|hash| !matches!(hash.kind(), HashKind::Cshake { .. }))
        .map(HmacAlgorithm::new)
        .collect()
}

/// Every static CMAC entry, at the default tag size.
pub fn cmac_algorithms() -> Vec<CmacAlgorithm> {
    CMAC_TABLE.clone()
}

/// Every static raw MAC entry, at the default tag size.
pub fn mac_algorithms() -> Vec<MacAlgorithm> {
    MAC_TABLE.clone()
}

fn undecorated(mechanism: &str, suffixes: &[&str]) -> String {
    let upper = normalize_keep_slash(mechanism);
    normalize(strip_any_suffix(&upper, suffixes))
}

/// Resolve names such as `"HMAC-SHA256"`, `"sha3_256/hmac"` or
/// `"BLAKE2b-168HMAC"`.
pub fn try_get_hmac_algorithm(mechanism: &str) -> Option<HmacAlgorithm> {
    let upper = normalize_keep_slash(mechanism);
    let stripped = strip_any_suffix(&upper, &["/HMAC", "-HMAC", "HMAC"]);
    let stripped = strip_any_prefix(stripped, &["HMAC/", "HMAC-", "HMAC"]);
    let normalized = normalize(stripped);
    let resolved = if normalized.is_empty() {
        None
    } else {
        lookup_for_hmac(&normalized).map(HmacAlgorithm::new)
    };
    match &resolved {
        Some(algorithm) => tracing::debug!(name = mechanism, mechanism = %algorithm, "hmac resolved"),
        None => tracing::debug!(name = mechanism, "hmac not found"),
    }
    resolved
}

/// Resolve names such as `"AES/CMAC"` or `"3des-cmac"`.
///
/// `mac_size` of `None` or equal to the block size yields the static entry;
/// any other legal size builds a truncated descriptor. Illegal sizes resolve
/// to `None`.
pub fn try_get_cmac_algorithm(mechanism: &str, mac_size: Option<u32>) -> Option<CmacAlgorithm> {
    let block = undecorated(mechanism, &["/CMAC", "-CMAC", "CMAC"]);
    let resolved = lookup_block_normalized(&block)
        .and_then(|block| CMAC_BY_BLOCK.get(block.mechanism()).cloned())
        .and_then(|referent| match mac_size {
            None => Some(referent),
            Some(size) if size == referent.hash_size() => Some(referent),
            Some(size) => CmacAlgorithm::with_mac_size(referent.block_algorithm().clone(), size).ok(),
        });
    match &resolved {
        Some(algorithm) => tracing::debug!(name = mechanism, mechanism = %algorithm, mac_size = algorithm.hash_size(), "cmac resolved"),
        None => tracing::debug!(name = mechanism, ?mac_size, "cmac not found"),
    }
    resolved
}

/// Resolve names such as `"DES/MAC"` or `"Twofish-MAC"`.
///
/// `mac_size` of `None` or half the block size yields the static entry.
pub fn try_get_mac_algorithm(mechanism: &str, mac_size: Option<u32>) -> Option<MacAlgorithm> {
    let block = undecorated(mechanism, &["/MAC", "-MAC", "MAC"]);
    let resolved = lookup_block_normalized(&block)
        .and_then(|block| MAC_BY_BLOCK.get(block.mechanism()).cloned())
        .and_then(|referent| match mac_size {
            None => Some(referent),
            Some(size) if size == referent.hash_size() => Some(referent),
            Some(size) => MacAlgorithm::with_mac_size(referent.block_algorithm().clone(), size).ok(),
        });
    match &resolved {
        Some(algorithm) => tracing::debug!(name = mechanism, mechanism = %algorithm, mac_size = algorithm.hash_size(), "mac resolved"),
        None => tracing::debug!(name = mechanism, ?mac_size, "mac not found"),
    }
    resolved
}
