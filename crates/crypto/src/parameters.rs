//! Opaque parameter bundles handed to operation factories.
//!
//! Descriptors build these from raw bytes (or from a sub-range of a larger
//! buffer) and validate them again when an operation is created. Key bytes
//! are zeroized on drop and never appear in `Debug` output.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CryptoError, CryptoResult};

/// Borrow `len` bytes at `offset`, failing with `InvalidArgument` when the
/// range falls outside `data`.
pub(crate) fn slice_range<'a>(
    argument: &str,
    data: &'a [u8],
    offset: usize,
    len: usize,
) -> CryptoResult<&'a [u8]> {
    offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or_else(|| {
            CryptoError::invalid_argument(
                argument,
                format!(
                    "range {}..{}+{} exceeds buffer of {} bytes",
                    offset, offset, len, data.len()
                ),
            )
        })
}

/// Secret key bytes.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct KeyParameter {
    key: Vec<u8>,
}

impl KeyParameter {
    pub fn new(key: &[u8]) -> Self {
        Self { key: key.to_vec() }
    }

    pub fn from_range(key: &[u8], offset: usize, len: usize) -> CryptoResult<Self> {
        slice_range("key", key, offset, len).map(Self::new)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }

    pub fn len(&self) -> usize {
        self.key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }

    pub fn size_bits(&self) -> u64 {
        self.key.len() as u64 * 8
    }
}

impl fmt::Debug for KeyParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyParameter")
            .field("len", &self.key.len())
            .finish_non_exhaustive()
    }
}

/// Key, nonce, tag size and associated text for an AEAD mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AeadParameters {
    key: KeyParameter,
    nonce: Vec<u8>,
    mac_size: u32,
    associated_text: Vec<u8>,
}

impl AeadParameters {
    /// `mac_size` is the tag length in bits.
    pub fn new(key: KeyParameter, nonce: &[u8], mac_size: u32, associated_text: &[u8]) -> Self {
        Self {
            key,
            nonce: nonce.to_vec(),
            mac_size,
            associated_text: associated_text.to_vec(),
        }
    }

    pub fn key(&self) -> &KeyParameter {
        &self.key
    }

    pub fn nonce(&self) -> &[u8] {
        &self.nonce
    }

    pub fn mac_size(&self) -> u32 {
        self.mac_size
    }

    pub fn associated_text(&self) -> &[u8] {
        &self.associated_text
    }
}

/// Parameters accepted by cipher and MAC factories.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CipherParameters {
    Key(KeyParameter),
    KeyWithIv { key: KeyParameter, iv: Vec<u8> },
    Aead(AeadParameters),
}

impl CipherParameters {
    pub fn key(&self) -> &KeyParameter {
        match self {
            CipherParameters::Key(key) => key,
            CipherParameters::KeyWithIv { key, .. } => key,
            CipherParameters::Aead(aead) => aead.key(),
        }
    }

    /// IV bytes for non-AEAD parameters.
    pub fn iv(&self) -> Option<&[u8]> {
        match self {
            CipherParameters::KeyWithIv { iv, .. } => Some(iv),
            _ => None,
        }
    }

    /// IV length in bits, `0` when absent.
    pub(crate) fn iv_bits(&self) -> u64 {
        self.iv().map_or(0, |iv| iv.len() as u64 * 8)
    }
}

impl From<KeyParameter> for CipherParameters {
    fn from(key: KeyParameter) -> Self {
        CipherParameters::Key(key)
    }
}

impl From<AeadParameters> for CipherParameters {
    fn from(parameters: AeadParameters) -> Self {
        CipherParameters::Aead(parameters)
    }
}
