//! Stream cipher descriptors.

use std::fmt;

use algoforge_core::{SizeRange, SizeTable};
use cipher::consts::U32;
use cipher::{KeyInit, KeyIvInit, StreamCipher};
use zeroize::Zeroize;

use super::buffered::{StreamBufferedCipher, StreamBuilder};
use crate::engine::BufferedCipher;
use crate::error::{CryptoError, CryptoResult};
use crate::parameters::{slice_range, CipherParameters, KeyParameter};

/// Stream cipher family. ChaCha and Salsa20 carry their round count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    ChaCha { rounds: u32 },
    ChaCha7539,
    Hc128,
    Hc256,
    Isaac,
    Rc4,
    Salsa20 { rounds: u32 },
    Vmpc,
    VmpcKsa3,
    XSalsa20,
}

impl StreamKind {
    pub fn legal_key_sizes(self) -> SizeTable {
        match self {
            StreamKind::ChaCha { .. } | StreamKind::Salsa20 { .. } | StreamKind::Hc256 => {
                SizeTable::single(SizeRange::new(128, 256, 128))
            }
            StreamKind::Hc128 => SizeTable::exact(128),
            StreamKind::Isaac => SizeTable::single(SizeRange::new(64, 8192, 16)),
            StreamKind::ChaCha7539
            | StreamKind::Rc4
            | StreamKind::Vmpc
            | StreamKind::VmpcKsa3
            | StreamKind::XSalsa20 => SizeTable::exact(256),
        }
    }

    pub fn legal_iv_sizes(self) -> SizeTable {
        match self {
            StreamKind::ChaCha { .. } | StreamKind::Salsa20 { .. } => SizeTable::exact(64),
            StreamKind::ChaCha7539 => SizeTable::exact(96),
            StreamKind::Hc128 => SizeTable::single(SizeRange::new(0, 128, 8)),
            StreamKind::Hc256 => SizeTable::single(SizeRange::new(128, 256, 8)),
            StreamKind::Isaac | StreamKind::Rc4 => SizeTable::none(),
            StreamKind::Vmpc | StreamKind::VmpcKsa3 => SizeTable::single(SizeRange::new(8, 6144, 8)),
            StreamKind::XSalsa20 => SizeTable::exact(192),
        }
    }

    pub fn mechanism(self) -> &'static str {
        match self {
            StreamKind::ChaCha { .. } => "ChaCha",
            StreamKind::ChaCha7539 => "ChaCha7539",
            StreamKind::Hc128 => "HC128",
            StreamKind::Hc256 => "HC256",
            StreamKind::Isaac => "ISAAC",
            StreamKind::Rc4 => "RC4",
            StreamKind::Salsa20 { .. } => "Salsa20",
            StreamKind::Vmpc => "VMPC",
            StreamKind::VmpcKsa3 => "VMPC-KSA3",
            StreamKind::XSalsa20 => "XSalsa20",
        }
    }

    /// Linked implementation for this kind and key length, if any.
    fn builder(self, key_len: usize) -> Option<StreamBuilder> {
        match (self, key_len) {
            (StreamKind::ChaCha { rounds: 20 }, 32) => Some(keyed::<chacha20::ChaCha20Legacy>),
            (StreamKind::ChaCha7539, 32) => Some(keyed::<chacha20::ChaCha20>),
            (StreamKind::Salsa20 { rounds: 20 }, 32) => Some(keyed::<salsa20::Salsa20>),
            (StreamKind::Salsa20 { rounds: 12 }, 32) => Some(keyed::<salsa20::Salsa12>),
            (StreamKind::Salsa20 { rounds: 8 }, 32) => Some(keyed::<salsa20::Salsa8>),
            (StreamKind::XSalsa20, 32) => Some(keyed::<salsa20::XSalsa20>),
            (StreamKind::Hc256, 16 | 32) => Some(hc256_keyed),
            (StreamKind::Rc4, 32) => Some(rc4_keyed),
            _ => None,
        }
    }
}

fn keyed<S>(key: &[u8], iv: &[u8]) -> Result<Box<dyn StreamCipher + Send>, cipher::InvalidLength>
where
    S: KeyIvInit + StreamCipher + Send + 'static,
{
    Ok(Box::new(S::new_from_slices(key, iv)?))
}

fn rc4_keyed(key: &[u8], _iv: &[u8]) -> Result<Box<dyn StreamCipher + Send>, cipher::InvalidLength> {
    Ok(Box::new(rc4::Rc4::<U32>::new_from_slice(key)?))
}

/// HC-256 is keyed with 256 bits of key and IV. A 128-bit key is repeated
/// and a shorter IV is extended with its own leading bytes.
fn hc256_keyed(key: &[u8], iv: &[u8]) -> Result<Box<dyn StreamCipher + Send>, cipher::InvalidLength> {
    if !matches!(key.len(), 16 | 32) || !(16..=32).contains(&iv.len()) {
        return Err(cipher::InvalidLength);
    }
    let mut full_key = [0u8; 32];
    for (index, byte) in full_key.iter_mut().enumerate() {
        *byte = key[index % key.len()];
    }
    let mut full_iv = [0u8; 32];
    full_iv[..iv.len()].copy_from_slice(iv);
    full_iv[iv.len()..].copy_from_slice(&iv[..32 - iv.len()]);
    let cipher = hc_256::Hc256::new_from_slices(&full_key, &full_iv);
    full_key.zeroize();
    Ok(Box::new(cipher?))
}

/// Immutable stream cipher descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StreamAlgorithm {
    kind: StreamKind,
}

impl StreamAlgorithm {
    /// Round counts must be even and positive.
    pub fn new(kind: StreamKind) -> CryptoResult<Self> {
        if let StreamKind::ChaCha { rounds } | StreamKind::Salsa20 { rounds } = kind {
            if rounds == 0 || rounds % 2 != 0 {
                return Err(CryptoError::unsupported(
                    kind.mechanism(),
                    "rounds",
                    rounds,
                    "rounds must be even and positive",
                ));
            }
        }
        Ok(Self { kind })
    }

    /// ChaCha with 20 rounds and a 64-bit nonce.
    pub fn chacha() -> Self {
        Self {
            kind: StreamKind::ChaCha { rounds: 20 },
        }
    }

    pub fn chacha_with_rounds(rounds: u32) -> CryptoResult<Self> {
        Self::new(StreamKind::ChaCha { rounds })
    }

    /// ChaCha20 with the 96-bit nonce of RFC 7539.
    pub fn chacha7539() -> Self {
        Self {
            kind: StreamKind::ChaCha7539,
        }
    }

    pub fn hc128() -> Self {
        Self { kind: StreamKind::Hc128 }
    }

    pub fn hc256() -> Self {
        Self { kind: StreamKind::Hc256 }
    }

    pub fn isaac() -> Self {
        Self { kind: StreamKind::Isaac }
    }

    pub fn rc4() -> Self {
        Self { kind: StreamKind::Rc4 }
    }

    pub fn salsa20() -> Self {
        Self {
            kind: StreamKind::Salsa20 { rounds: 20 },
        }
    }

    pub fn salsa20_with_rounds(rounds: u32) -> CryptoResult<Self> {
        Self::new(StreamKind::Salsa20 { rounds })
    }

    pub fn vmpc() -> Self {
        Self { kind: StreamKind::Vmpc }
    }

    pub fn vmpc_ksa3() -> Self {
        Self {
            kind: StreamKind::VmpcKsa3,
        }
    }

    pub fn xsalsa20() -> Self {
        Self {
            kind: StreamKind::XSalsa20,
        }
    }

    pub fn kind(&self) -> StreamKind {
        self.kind
    }

    pub fn mechanism(&self) -> &str {
        self.kind.mechanism()
    }

    /// Round count for ChaCha and Salsa20.
    pub fn rounds(&self) -> Option<u32> {
        match self.kind {
            StreamKind::ChaCha { rounds } | StreamKind::Salsa20 { rounds } => Some(rounds),
            _ => None,
        }
    }

    pub fn legal_key_sizes(&self) -> SizeTable {
        self.kind.legal_key_sizes()
    }

    pub fn legal_iv_sizes(&self) -> SizeTable {
        self.kind.legal_iv_sizes()
    }

    pub fn generate_parameters(&self, key: &[u8], iv: Option<&[u8]>) -> CryptoResult<CipherParameters> {
        if key.is_empty() {
            return Err(CryptoError::invalid_argument("key", "key is empty"));
        }
        let key = KeyParameter::new(key);
        Ok(match iv {
            Some(iv) if !iv.is_empty() => CipherParameters::KeyWithIv { key, iv: iv.to_vec() },
            _ => CipherParameters::Key(key),
        })
    }

    /// Parameters from sub-ranges of larger buffers. The IV is ignored when
    /// `iv_len` is zero.
    pub fn generate_parameters_range(
        &self,
        key: &[u8],
        key_offset: usize,
        key_len: usize,
        iv: Option<&[u8]>,
        iv_offset: usize,
        iv_len: usize,
    ) -> CryptoResult<CipherParameters> {
        let key = slice_range("key", key, key_offset, key_len)?;
        let iv = match iv {
            Some(iv) if iv_len > 0 => Some(slice_range("iv", iv, iv_offset, iv_len)?),
            _ => None,
        };
        self.generate_parameters(key, iv)
    }

    /// Build a reusable cipher. Key and IV lengths are checked against the
    /// tables; an absent IV counts as zero bits.
    pub fn generate_cipher(
        &self,
        encrypting: bool,
        parameters: &CipherParameters,
    ) -> CryptoResult<Box<dyn BufferedCipher>> {
        let mechanism = self.mechanism();
        if let CipherParameters::Aead(_) = parameters {
            return Err(CryptoError::invalid_argument(
                "parameters",
                format!("{mechanism} does not take AEAD parameters"),
            ));
        }
        let key = parameters.key();
        if key.is_empty() {
            return Err(CryptoError::invalid_argument("key", "key is empty"));
        }
        if !self.legal_key_sizes().is_legal_bytes(key.len()) {
            return Err(CryptoError::unsupported(
                mechanism,
                "key_size",
                key.size_bits(),
                format!("legal key sizes are {}", self.legal_key_sizes()),
            ));
        }
        let iv = parameters.iv().unwrap_or_default();
        if !self.legal_iv_sizes().is_legal_bytes(iv.len()) {
            return Err(CryptoError::unsupported(
                mechanism,
                "iv_size",
                iv.len() * 8,
                format!("legal IV sizes are {}", self.legal_iv_sizes()),
            ));
        }
        let build = self.kind.builder(key.len()).ok_or_else(|| {
            CryptoError::unavailable(
                mechanism,
                match self.rounds() {
                    Some(rounds) => format!("no backend for {rounds} rounds with {}-bit keys", key.size_bits()),
                    None => format!("no backend for {}-bit keys", key.size_bits()),
                },
            )
        })?;
        let cipher = StreamBufferedCipher::new(mechanism, encrypting, key.as_bytes(), iv, build)?;
        tracing::debug!(cipher = mechanism, encrypting, "cipher constructed");
        Ok(Box::new(cipher))
    }
}

impl fmt::Display for StreamAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mechanism())
    }
}
