//! CMAC (OMAC1) over a 64- or 128-bit block cipher.

use std::fmt;

use algoforge_core::{SizeRange, SizeTable};
use subtle::ConstantTimeEq;

use crate::engine::MacEngine;
use crate::error::{CryptoError, CryptoResult};
use crate::parameters::{slice_range, CipherParameters};
use crate::symmetric::BlockAlgorithm;

/// Tag sizes a block-cipher MAC can truncate to.
pub(crate) fn truncated_mac_sizes(block_size: u32) -> SizeTable {
    SizeTable::single(SizeRange::new(8, block_size, 8))
}

pub(crate) fn check_mac_size(mechanism: &str, block_size: u32, mac_size: u32) -> CryptoResult<()> {
    if truncated_mac_sizes(block_size).is_legal(mac_size) {
        Ok(())
    } else {
        Err(CryptoError::unsupported(
            mechanism,
            "mac_size",
            mac_size,
            "legal mac size is between 8 and block size (8 bits increments)",
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmacAlgorithm {
    block: BlockAlgorithm,
    mac_size: u32,
    mechanism: String,
}

impl CmacAlgorithm {
    /// CMAC with the full block as tag.
    pub fn new(block: BlockAlgorithm) -> CryptoResult<Self> {
        let mac_size = block.block_size();
        Self::with_mac_size(block, mac_size)
    }

    /// CMAC truncated to `mac_size` bits.
    pub fn with_mac_size(block: BlockAlgorithm, mac_size: u32) -> CryptoResult<Self> {
        let mechanism = format!("{}/CMAC", block.mechanism());
        if !matches!(block.block_size(), 64 | 128) {
            return Err(CryptoError::unsupported(
                mechanism,
                "block_size",
                block.block_size(),
                "legal algorithms of block size 64 or 128 bits",
            ));
        }
        check_mac_size(&mechanism, block.block_size(), mac_size)?;
        Ok(Self {
            block,
            mac_size,
            mechanism,
        })
    }

    pub fn mechanism(&self) -> &str {
        &self.mechanism
    }

    pub fn block_algorithm(&self) -> &BlockAlgorithm {
        &self.block
    }

    pub fn block_size(&self) -> u32 {
        self.block.block_size()
    }

    /// Tag size in bits.
    pub fn hash_size(&self) -> u32 {
        self.mac_size
    }

    pub fn legal_key_sizes(&self) -> SizeTable {
        self.block.legal_key_sizes()
    }

    pub fn legal_mac_sizes(&self) -> SizeTable {
        truncated_mac_sizes(self.block.block_size())
    }

    pub fn generate_parameters(&self, key: &[u8]) -> CryptoResult<CipherParameters> {
        self.block.generate_parameters(key, None)
    }

    pub fn generate_parameters_range(&self, key: &[u8], offset: usize, len: usize) -> CryptoResult<CipherParameters> {
        self.block.generate_parameters_range(key, offset, len, None, 0, 0)
    }

    /// A reusable CMAC engine. Any IV in `parameters` is ignored.
    pub fn generate_mac(&self, parameters: &CipherParameters) -> CryptoResult<Box<dyn MacEngine>> {
        let engine = self.block.keyed_engine(parameters.key())?;
        let mac = engine.cmac(&self.mechanism, self.mac_size as usize / 8).ok_or_else(|| {
            CryptoError::unavailable(
                self.mechanism.as_str(),
                format!("no CMAC backend for {}-bit blocks", engine.block_len() * 8),
            )
        })?;
        tracing::debug!(mechanism = %self.mechanism, mac_size = self.mac_size, "mac constructed");
        Ok(mac)
    }

    pub fn compute_mac(&self, parameters: &CipherParameters, data: &[u8]) -> CryptoResult<Vec<u8>> {
        let mut engine = self.generate_mac(parameters)?;
        engine.update(data);
        Ok(engine.finalize_reset())
    }

    pub fn compute_mac_range(
        &self,
        parameters: &CipherParameters,
        data: &[u8],
        offset: usize,
        len: usize,
    ) -> CryptoResult<Vec<u8>> {
        self.compute_mac(parameters, slice_range("data", data, offset, len)?)
    }

    /// Constant-time check of a (possibly truncated) tag.
    pub fn verify_mac(&self, parameters: &CipherParameters, data: &[u8], tag: &[u8]) -> CryptoResult<bool> {
        let expected = self.compute_mac(parameters, data)?;
        Ok(bool::from(expected.ct_eq(tag)))
    }
}

impl fmt::Display for CmacAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.mechanism)
    }
}
