//! Name resolution for block and stream cipher descriptors.

use std::collections::HashMap;

use algoforge_core::normalize;
use once_cell::sync::Lazy;

use super::{BlockAlgorithm, StreamAlgorithm};
use crate::error::CryptoResult;

static BLOCK_TABLE: Lazy<Vec<(Vec<&'static str>, BlockAlgorithm)>> = Lazy::new(|| {
    let entries: Vec<(Vec<&'static str>, CryptoResult<BlockAlgorithm>)> = vec![
        (vec!["AES"], Ok(BlockAlgorithm::aes())),
        (vec!["BLOWFISH"], Ok(BlockAlgorithm::blowfish())),
        (vec!["CAMELLIA"], Ok(BlockAlgorithm::camellia())),
        (vec!["CAST5"], Ok(BlockAlgorithm::cast5())),
        (vec!["CAST6"], Ok(BlockAlgorithm::cast6())),
        (vec!["DES"], Ok(BlockAlgorithm::des())),
        (
            vec!["DESEDE", "DESEDE3", "TDEA", "TRIPLEDES", "3DES"],
            Ok(BlockAlgorithm::des_ede()),
        ),
        (vec!["DSTU7624-128"], BlockAlgorithm::dstu7624(128)),
        (vec!["DSTU7624-256"], BlockAlgorithm::dstu7624(256)),
        (vec!["DSTU7624-512"], BlockAlgorithm::dstu7624(512)),
        (vec!["GOST28147"], Ok(BlockAlgorithm::gost28147())),
        (vec!["IDEA"], Ok(BlockAlgorithm::idea())),
        (vec!["NOEKEON"], Ok(BlockAlgorithm::noekeon())),
        (vec!["RC2"], Ok(BlockAlgorithm::rc2())),
        (vec!["RC5", "RC5-32"], Ok(BlockAlgorithm::rc5_32())),
        (vec!["RC5-64"], Ok(BlockAlgorithm::rc5_64())),
        (vec!["RC6"], Ok(BlockAlgorithm::rc6())),
        (vec!["RIJNDAEL-128", "RIJNDAEL128"], BlockAlgorithm::rijndael(128)),
        (vec!["RIJNDAEL-160", "RIJNDAEL160"], BlockAlgorithm::rijndael(160)),
        (vec!["RIJNDAEL-192", "RIJNDAEL192"], BlockAlgorithm::rijndael(192)),
        (vec!["RIJNDAEL-224", "RIJNDAEL224"], BlockAlgorithm::rijndael(224)),
        (vec!["RIJNDAEL-256", "RIJNDAEL256"], BlockAlgorithm::rijndael(256)),
        (vec!["SEED"], Ok(BlockAlgorithm::seed())),
        (vec!["SERPENT"], Ok(BlockAlgorithm::serpent())),
        (vec!["SKIPJACK"], Ok(BlockAlgorithm::skipjack())),
        (vec!["SM4"], Ok(BlockAlgorithm::sm4())),
        (vec!["TEA"], Ok(BlockAlgorithm::tea())),
        (vec!["THREEFISH-256", "THREEFISH256"], BlockAlgorithm::threefish(256)),
        (vec!["THREEFISH-512", "THREEFISH512"], BlockAlgorithm::threefish(512)),
        (vec!["THREEFISH-1024", "THREEFISH1024"], BlockAlgorithm::threefish(1024)),
        (vec!["TNEPRES"], Ok(BlockAlgorithm::tnepres())),
        (vec!["TWOFISH"], Ok(BlockAlgorithm::twofish())),
        (vec!["XTEA"], Ok(BlockAlgorithm::xtea())),
    ];
    entries
        .into_iter()
        .filter_map(|(aliases, algorithm)| algorithm.ok().map(|algorithm| (aliases, algorithm)))
        .collect()
});

static BLOCK_ALIASES: Lazy<HashMap<&'static str, BlockAlgorithm>> = Lazy::new(|| {
    BLOCK_TABLE
        .iter()
        .flat_map(|(aliases, algorithm)| aliases.iter().map(move |alias| (*alias, algorithm.clone())))
        .collect()
});

static STREAM_TABLE: Lazy<Vec<(Vec<&'static str>, StreamAlgorithm)>> = Lazy::new(|| {
    vec![
        (vec!["CHACHA"], StreamAlgorithm::chacha()),
        (vec!["CHACHA7539", "CHACHA20"], StreamAlgorithm::chacha7539()),
        (vec!["HC128", "HC-128"], StreamAlgorithm::hc128()),
        (vec!["HC256", "HC-256"], StreamAlgorithm::hc256()),
        (vec!["ISAAC"], StreamAlgorithm::isaac()),
        (vec!["RC4", "ARC4", "ARCFOUR"], StreamAlgorithm::rc4()),
        (vec!["SALSA20"], StreamAlgorithm::salsa20()),
        (vec!["VMPC"], StreamAlgorithm::vmpc()),
        (vec!["VMPC-KSA3", "VMPCKSA3"], StreamAlgorithm::vmpc_ksa3()),
        (vec!["XSALSA20"], StreamAlgorithm::xsalsa20()),
    ]
});

static STREAM_ALIASES: Lazy<HashMap<&'static str, StreamAlgorithm>> = Lazy::new(|| {
    STREAM_TABLE
        .iter()
        .flat_map(|(aliases, algorithm)| aliases.iter().map(move |alias| (*alias, algorithm.clone())))
        .collect()
});

/// Every static block cipher entry, in catalog order.
pub fn block_algorithms() -> Vec<BlockAlgorithm> {
    BLOCK_TABLE.iter().map(|(_, algorithm)| algorithm.clone()).collect()
}

/// Every static stream cipher entry, in catalog order.
pub fn stream_algorithms() -> Vec<StreamAlgorithm> {
    STREAM_TABLE.iter().map(|(_, algorithm)| algorithm.clone()).collect()
}

/// Lookup on an already normalized name.
pub(crate) fn lookup_block_normalized(normalized: &str) -> Option<BlockAlgorithm> {
    BLOCK_ALIASES.get(normalized).cloned()
}

/// Resolve a block cipher name such as `"aes"`, `"3DES"` or `"Rijndael_192"`.
pub fn try_get_block_algorithm(mechanism: &str) -> Option<BlockAlgorithm> {
    let resolved = lookup_block_normalized(&normalize(mechanism));
    match &resolved {
        Some(algorithm) => tracing::debug!(name = mechanism, mechanism = %algorithm, "block cipher resolved"),
        None => tracing::debug!(name = mechanism, "block cipher not found"),
    }
    resolved
}

/// Resolve a stream cipher name such as `"ChaCha20"` or `"ARCFOUR"`.
pub fn try_get_stream_algorithm(mechanism: &str) -> Option<StreamAlgorithm> {
    let resolved = STREAM_ALIASES.get(normalize(mechanism).as_str()).cloned();
    match &resolved {
        Some(algorithm) => tracing::debug!(name = mechanism, mechanism = %algorithm, "stream cipher resolved"),
        None => tracing::debug!(name = mechanism, "stream cipher not found"),
    }
    resolved
}
