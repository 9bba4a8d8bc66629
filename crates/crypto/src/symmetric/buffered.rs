//! Buffered cipher instances returned by the symmetric descriptors.

use std::mem;

use cipher::StreamCipher;
use zeroize::Zeroizing;

use super::backend::{AeadBackend, UnitTransform};
use super::padding::PaddingScheme;
use crate::engine::BufferedCipher;
use crate::error::{CryptoError, CryptoResult};
use crate::parameters::AeadParameters;

/// Block mode plus optional padding, holding back partial units.
pub(crate) struct PaddedBlockCipher {
    name: String,
    encrypting: bool,
    transform: Box<dyn UnitTransform>,
    padding: Option<PaddingScheme>,
    pending: Vec<u8>,
    last_byte: Option<u8>,
}

impl PaddedBlockCipher {
    pub(crate) fn new(
        name: String,
        encrypting: bool,
        transform: Box<dyn UnitTransform>,
        padding: Option<PaddingScheme>,
    ) -> Self {
        Self {
            name,
            encrypting,
            transform,
            padding,
            pending: Vec::new(),
            last_byte: None,
        }
    }

    fn reset(&mut self) {
        self.pending.clear();
        self.last_byte = None;
        self.transform.reset();
    }

    fn finish(&mut self) -> CryptoResult<Vec<u8>> {
        let unit = self.transform.unit_len();
        let mut block = mem::take(&mut self.pending);
        match (self.encrypting, self.padding) {
            (true, Some(scheme)) => {
                let pos = block.len();
                block.resize(unit, 0);
                scheme.pad(&mut block, pos, self.last_byte);
                self.transform.apply(&mut block)?;
                Ok(block)
            }
            (false, Some(scheme)) => {
                if block.len() != unit {
                    return Err(CryptoError::Decryption {
                        reason: "last block incomplete in decryption".to_string(),
                    });
                }
                self.transform.apply(&mut block)?;
                Ok(scheme.unpad(&block)?.to_vec())
            }
            (_, None) => {
                if block.is_empty() {
                    return Ok(block);
                }
                if !self.transform.allows_partial() {
                    return Err(CryptoError::invalid_argument("input", "data not block size aligned"));
                }
                self.transform.apply(&mut block)?;
                Ok(block)
            }
        }
    }
}

impl BufferedCipher for PaddedBlockCipher {
    fn algorithm_name(&self) -> &str {
        &self.name
    }

    fn is_encrypting(&self) -> bool {
        self.encrypting
    }

    fn update(&mut self, input: &[u8]) -> CryptoResult<Vec<u8>> {
        self.pending.extend_from_slice(input);
        let unit = self.transform.unit_len();
        let mut ready = self.pending.len() / unit * unit;
        // With padding, decryption must keep the last unit for unpadding.
        if !self.encrypting && self.padding.is_some() && ready == self.pending.len() && ready > 0 {
            ready -= unit;
        }
        if ready == 0 {
            return Ok(Vec::new());
        }
        let mut output: Vec<u8> = self.pending.drain(..ready).collect();
        if self.encrypting {
            self.last_byte = output.last().copied();
        }
        if let Err(error) = self.transform.apply(&mut output) {
            self.reset();
            return Err(error);
        }
        Ok(output)
    }

    fn finalize(&mut self) -> CryptoResult<Vec<u8>> {
        let result = self.finish();
        self.reset();
        result
    }
}

/// Collects the whole message and seals or opens it on `finalize`.
pub(crate) struct AeadCipher {
    name: String,
    encrypting: bool,
    backend: Box<dyn AeadBackend>,
    nonce: Vec<u8>,
    associated: Vec<u8>,
    buffer: Zeroizing<Vec<u8>>,
    used: bool,
}

impl AeadCipher {
    pub(crate) fn new(
        name: String,
        encrypting: bool,
        backend: Box<dyn AeadBackend>,
        parameters: &AeadParameters,
    ) -> Self {
        Self {
            name,
            encrypting,
            backend,
            nonce: parameters.nonce().to_vec(),
            associated: parameters.associated_text().to_vec(),
            buffer: Zeroizing::new(Vec::new()),
            used: false,
        }
    }
}

impl BufferedCipher for AeadCipher {
    fn algorithm_name(&self) -> &str {
        &self.name
    }

    fn is_encrypting(&self) -> bool {
        self.encrypting
    }

    fn update(&mut self, input: &[u8]) -> CryptoResult<Vec<u8>> {
        self.buffer.extend_from_slice(input);
        Ok(Vec::new())
    }

    fn finalize(&mut self) -> CryptoResult<Vec<u8>> {
        let mut data = mem::take(&mut *self.buffer);
        if self.encrypting {
            if self.used {
                return Err(CryptoError::NonceReuse {
                    mechanism: self.name.clone(),
                });
            }
            self.used = true;
            self.backend.seal(&self.nonce, &self.associated, &mut data)?;
        } else {
            self.backend.open(&self.nonce, &self.associated, &mut data)?;
        }
        Ok(data)
    }
}

/// Builds a keyed stream cipher from key and IV bytes.
pub(crate) type StreamBuilder =
    fn(&[u8], &[u8]) -> Result<Box<dyn StreamCipher + Send>, cipher::InvalidLength>;

/// Stream cipher wrapper; `finalize` rekeys so the instance can be reused.
pub(crate) struct StreamBufferedCipher {
    name: String,
    encrypting: bool,
    key: Zeroizing<Vec<u8>>,
    iv: Vec<u8>,
    build: StreamBuilder,
    cipher: Box<dyn StreamCipher + Send>,
}

impl StreamBufferedCipher {
    pub(crate) fn new(
        name: &str,
        encrypting: bool,
        key: &[u8],
        iv: &[u8],
        build: StreamBuilder,
    ) -> CryptoResult<Self> {
        let cipher = build(key, iv).map_err(|_| {
            CryptoError::unavailable(
                name,
                format!("backend rejects {}-bit keys with {}-bit IVs", key.len() * 8, iv.len() * 8),
            )
        })?;
        Ok(Self {
            name: name.to_string(),
            encrypting,
            key: Zeroizing::new(key.to_vec()),
            iv: iv.to_vec(),
            build,
            cipher,
        })
    }
}

impl BufferedCipher for StreamBufferedCipher {
    fn algorithm_name(&self) -> &str {
        &self.name
    }

    fn is_encrypting(&self) -> bool {
        self.encrypting
    }

    fn update(&mut self, input: &[u8]) -> CryptoResult<Vec<u8>> {
        let mut output = input.to_vec();
        self.cipher
            .try_apply_keystream(&mut output)
            .map_err(|_| CryptoError::invalid_argument("input", "keystream exhausted"))?;
        Ok(output)
    }

    fn finalize(&mut self) -> CryptoResult<Vec<u8>> {
        self.cipher = (self.build)(&self.key, &self.iv).map_err(|_| {
            CryptoError::unavailable(self.name.as_str(), "backend rejected the stored key")
        })?;
        Ok(Vec::new())
    }
}
