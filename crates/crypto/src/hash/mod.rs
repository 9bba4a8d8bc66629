//! Hash descriptors.
//!
//! A [`HashAlgorithm`] fixes one digest family and output size. It can only
//! be built through the validating constructors below, so every instance
//! carries a legal size for its family.

mod backend;
pub mod registry;

use std::fmt;

use algoforge_core::{SizeRange, SizeTable};
use serde::{Deserialize, Serialize};

use crate::engine::DigestEngine;
use crate::error::{CryptoError, CryptoResult};
use crate::parameters::slice_range;

pub(crate) use backend::{dyn_digest, hmac_engine};

/// GOST 28147-89 substitution boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Gost28147SBox {
    #[default]
    Default,
    DTest,
    DA,
    ETest,
    EA,
    EB,
    EC,
    ED,
}

impl Gost28147SBox {
    pub const ALL: [Gost28147SBox; 8] = [
        Gost28147SBox::Default,
        Gost28147SBox::DTest,
        Gost28147SBox::DA,
        Gost28147SBox::ETest,
        Gost28147SBox::EA,
        Gost28147SBox::EB,
        Gost28147SBox::EC,
        Gost28147SBox::ED,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Gost28147SBox::Default => "Default",
            Gost28147SBox::DTest => "D-Test",
            Gost28147SBox::DA => "D-A",
            Gost28147SBox::ETest => "E-Test",
            Gost28147SBox::EA => "E-A",
            Gost28147SBox::EB => "E-B",
            Gost28147SBox::EC => "E-C",
            Gost28147SBox::ED => "E-D",
        }
    }
}

/// Digest family plus the size parameters that select one member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashKind {
    Blake2b { size: u32 },
    Blake2s { size: u32 },
    Cshake { size: u32 },
    Dstu7564 { size: u32 },
    Gost3411 { sbox: Gost28147SBox },
    Gost3411_2012 { size: u32 },
    Keccak { size: u32 },
    Md2,
    Md4,
    Md5,
    Ripemd128,
    Ripemd160,
    Ripemd256,
    Ripemd320,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Sha512T { size: u32 },
    Sha3 { size: u32 },
    Shake { size: u32 },
    Skein { state_size: u32, size: u32 },
    Sm3,
    Tiger,
    Whirlpool,
}

impl HashKind {
    /// Output size in bits.
    pub fn hash_size(&self) -> u32 {
        match *self {
            HashKind::Blake2b { size }
            | HashKind::Blake2s { size }
            | HashKind::Cshake { size }
            | HashKind::Dstu7564 { size }
            | HashKind::Gost3411_2012 { size }
            | HashKind::Keccak { size }
            | HashKind::Sha512T { size }
            | HashKind::Sha3 { size }
            | HashKind::Shake { size }
            | HashKind::Skein { size, .. } => size,
            HashKind::Gost3411 { .. } => 256,
            HashKind::Md2 | HashKind::Md4 | HashKind::Md5 | HashKind::Ripemd128 => 128,
            HashKind::Ripemd160 | HashKind::Sha1 => 160,
            HashKind::Ripemd256 | HashKind::Sha256 | HashKind::Sm3 => 256,
            HashKind::Ripemd320 => 320,
            HashKind::Sha224 => 224,
            HashKind::Sha384 => 384,
            HashKind::Sha512 | HashKind::Whirlpool => 512,
            HashKind::Tiger => 192,
        }
    }

    /// Every output size the family accepts.
    pub fn legal_hash_sizes(&self) -> SizeTable {
        match self {
            HashKind::Blake2b { .. } => SizeTable::single(SizeRange::new(8, 512, 8)),
            HashKind::Blake2s { .. } => SizeTable::single(SizeRange::new(8, 256, 8)),
            HashKind::Cshake { .. } | HashKind::Shake { .. } => {
                SizeTable::single(SizeRange::new(128, 256, 128))
            }
            HashKind::Dstu7564 { .. } => SizeTable::single(SizeRange::new(256, 512, 128)),
            HashKind::Gost3411_2012 { .. } => SizeTable::single(SizeRange::new(256, 512, 256)),
            HashKind::Keccak { .. } => SizeTable::of(&[128, 224, 256, 288, 384, 512]),
            HashKind::Sha512T { .. } => SizeTable::new(vec![
                SizeRange::new(224, 376, 8),
                SizeRange::new(392, 504, 8),
            ]),
            HashKind::Sha3 { .. } => SizeTable::of(&[224, 256, 384, 512]),
            HashKind::Skein { .. } => SizeTable::single(SizeRange::new(8, 2_147_483_640, 8)),
            other => SizeTable::exact(other.hash_size()),
        }
    }

    /// Legal internal state sizes for Skein.
    pub fn skein_state_sizes() -> SizeTable {
        SizeTable::of(&[256, 512, 1024])
    }

    fn mechanism(&self) -> String {
        match *self {
            HashKind::Blake2b { size } => format!("BLAKE2b-{size}"),
            HashKind::Blake2s { size } => format!("BLAKE2s-{size}"),
            HashKind::Cshake { size } => format!("CSHAKE{size}"),
            HashKind::Dstu7564 { size } => format!("DSTU7564-{size}"),
            HashKind::Gost3411 { .. } => "GOST3411".to_string(),
            HashKind::Gost3411_2012 { size } => format!("GOST3411-2012-{size}"),
            HashKind::Keccak { size } => format!("Keccak-{size}"),
            HashKind::Md2 => "MD2".to_string(),
            HashKind::Md4 => "MD4".to_string(),
            HashKind::Md5 => "MD5".to_string(),
            HashKind::Ripemd128 => "RIPEMD128".to_string(),
            HashKind::Ripemd160 => "RIPEMD160".to_string(),
            HashKind::Ripemd256 => "RIPEMD256".to_string(),
            HashKind::Ripemd320 => "RIPEMD320".to_string(),
            HashKind::Sha1 => "SHA1".to_string(),
            HashKind::Sha224 => "SHA224".to_string(),
            HashKind::Sha256 => "SHA256".to_string(),
            HashKind::Sha384 => "SHA384".to_string(),
            HashKind::Sha512 => "SHA512".to_string(),
            HashKind::Sha512T { size } => format!("SHA512/{size}"),
            HashKind::Sha3 { size } => format!("SHA3-{size}"),
            HashKind::Shake { size } => format!("SHAKE{size}"),
            HashKind::Skein { state_size, size } => format!("Skein-{state_size}-{size}"),
            HashKind::Sm3 => "SM3".to_string(),
            HashKind::Tiger => "Tiger".to_string(),
            HashKind::Whirlpool => "Whirlpool".to_string(),
        }
    }
}

/// Function-name and customization strings of a CSHAKE instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CshakeStrings {
    pub function_name: Vec<u8>,
    pub customization: Vec<u8>,
}

/// Immutable hash descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HashAlgorithm {
    kind: HashKind,
    mechanism: String,
    cshake: Option<CshakeStrings>,
}

impl HashAlgorithm {
    /// Validate `kind` against its family's size tables.
    pub fn new(kind: HashKind) -> CryptoResult<Self> {
        let size = kind.hash_size();
        let mechanism = kind.mechanism();
        if !kind.legal_hash_sizes().is_legal(size) {
            return Err(CryptoError::unsupported(
                mechanism,
                "hash_size",
                size,
                format!("legal sizes are {}", kind.legal_hash_sizes()),
            ));
        }
        if let HashKind::Skein { state_size, .. } = kind {
            if !HashKind::skein_state_sizes().is_legal(state_size) {
                return Err(CryptoError::unsupported(
                    mechanism,
                    "state_size",
                    state_size,
                    "legal state sizes are 256, 512, 1024",
                ));
            }
        }
        let cshake = matches!(kind, HashKind::Cshake { .. }).then(CshakeStrings::default);
        Ok(Self {
            kind,
            mechanism,
            cshake,
        })
    }

    /// Fixed-size families whose only size is always legal.
    fn fixed(kind: HashKind) -> Self {
        Self {
            kind,
            mechanism: kind.mechanism(),
            cshake: None,
        }
    }

    pub fn blake2b(size: u32) -> CryptoResult<Self> {
        Self::new(HashKind::Blake2b { size })
    }

    pub fn blake2s(size: u32) -> CryptoResult<Self> {
        Self::new(HashKind::Blake2s { size })
    }

    /// CSHAKE with optional function-name and customization strings.
    pub fn cshake(size: u32, function_name: &[u8], customization: &[u8]) -> CryptoResult<Self> {
        let mut algorithm = Self::new(HashKind::Cshake { size })?;
        algorithm.cshake = Some(CshakeStrings {
            function_name: function_name.to_vec(),
            customization: customization.to_vec(),
        });
        Ok(algorithm)
    }

    pub fn dstu7564(size: u32) -> CryptoResult<Self> {
        Self::new(HashKind::Dstu7564 { size })
    }

    pub fn gost3411() -> Self {
        Self::fixed(HashKind::Gost3411 {
            sbox: Gost28147SBox::Default,
        })
    }

    pub fn gost3411_with_sbox(sbox: Gost28147SBox) -> Self {
        Self::fixed(HashKind::Gost3411 { sbox })
    }

    pub fn gost3411_2012(size: u32) -> CryptoResult<Self> {
        Self::new(HashKind::Gost3411_2012 { size })
    }

    pub fn keccak(size: u32) -> CryptoResult<Self> {
        Self::new(HashKind::Keccak { size })
    }

    pub fn md2() -> Self {
        Self::fixed(HashKind::Md2)
    }

    pub fn md4() -> Self {
        Self::fixed(HashKind::Md4)
    }

    pub fn md5() -> Self {
        Self::fixed(HashKind::Md5)
    }

    pub fn ripemd128() -> Self {
        Self::fixed(HashKind::Ripemd128)
    }

    pub fn ripemd160() -> Self {
        Self::fixed(HashKind::Ripemd160)
    }

    pub fn ripemd256() -> Self {
        Self::fixed(HashKind::Ripemd256)
    }

    pub fn ripemd320() -> Self {
        Self::fixed(HashKind::Ripemd320)
    }

    pub fn sha1() -> Self {
        Self::fixed(HashKind::Sha1)
    }

    pub fn sha224() -> Self {
        Self::fixed(HashKind::Sha224)
    }

    pub fn sha256() -> Self {
        Self::fixed(HashKind::Sha256)
    }

    pub fn sha384() -> Self {
        Self::fixed(HashKind::Sha384)
    }

    pub fn sha512() -> Self {
        Self::fixed(HashKind::Sha512)
    }

    /// SHA-512/t.
    pub fn sha512_t(size: u32) -> CryptoResult<Self> {
        Self::new(HashKind::Sha512T { size })
    }

    pub fn sha3(size: u32) -> CryptoResult<Self> {
        Self::new(HashKind::Sha3 { size })
    }

    pub fn shake(size: u32) -> CryptoResult<Self> {
        Self::new(HashKind::Shake { size })
    }

    pub fn skein(state_size: u32, size: u32) -> CryptoResult<Self> {
        Self::new(HashKind::Skein { state_size, size })
    }

    pub fn sm3() -> Self {
        Self::fixed(HashKind::Sm3)
    }

    pub fn tiger() -> Self {
        Self::fixed(HashKind::Tiger)
    }

    pub fn whirlpool() -> Self {
        Self::fixed(HashKind::Whirlpool)
    }

    pub fn kind(&self) -> HashKind {
        self.kind
    }

    pub fn mechanism(&self) -> &str {
        &self.mechanism
    }

    /// Output size in bits.
    pub fn hash_size(&self) -> u32 {
        self.kind.hash_size()
    }

    pub fn legal_hash_sizes(&self) -> SizeTable {
        self.kind.legal_hash_sizes()
    }

    /// Output length in bytes.
    pub fn output_len(&self) -> usize {
        self.hash_size() as usize / 8
    }

    pub fn cshake_strings(&self) -> Option<&CshakeStrings> {
        self.cshake.as_ref()
    }

    /// Build a fresh digest engine; reusable after every `finalize_reset`.
    pub fn generate_digest(&self) -> CryptoResult<Box<dyn DigestEngine>> {
        let engine = backend::digest_engine(self)?;
        tracing::debug!(mechanism = %self.mechanism, "digest constructed");
        Ok(engine)
    }

    /// One-shot digest of `data`.
    pub fn compute_hash(&self, data: &[u8]) -> CryptoResult<Vec<u8>> {
        let mut digest = self.generate_digest()?;
        digest.update(data);
        Ok(digest.finalize_reset())
    }

    /// One-shot digest of `data[offset..offset + len]`.
    pub fn compute_hash_range(&self, data: &[u8], offset: usize, len: usize) -> CryptoResult<Vec<u8>> {
        let range = slice_range("data", data, offset, len)?;
        self.compute_hash(range)
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.mechanism)
    }
}
