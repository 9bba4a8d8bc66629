//! Raw block-cipher MACs: CBC-MAC and CFB-MAC with optional padding.

use std::fmt;
use std::mem;

use algoforge_core::{SizeRange, SizeTable};

use super::cmac::{check_mac_size, truncated_mac_sizes};
use crate::engine::MacEngine;
use crate::error::{CryptoError, CryptoResult};
use crate::parameters::{slice_range, CipherParameters};
use crate::symmetric::backend::{Feedback, ShiftRegister, UnitTransform};
use crate::symmetric::padding::PaddingScheme;
use crate::symmetric::{BlockAlgorithm, MacCipherMode, MacPaddingMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacAlgorithm {
    block: BlockAlgorithm,
    mac_size: u32,
    mechanism: String,
}

impl MacAlgorithm {
    /// MAC with half the block as tag.
    pub fn new(block: BlockAlgorithm) -> CryptoResult<Self> {
        let mac_size = block.block_size() / 2;
        Self::with_mac_size(block, mac_size)
    }

    pub fn with_mac_size(block: BlockAlgorithm, mac_size: u32) -> CryptoResult<Self> {
        let mechanism = format!("{}/MAC", block.mechanism());
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

    /// IV sizes accepted by `mode`: CBC takes exactly one block, CFB any
    /// whole number of bytes up to one block.
    pub fn try_get_iv_sizes(&self, mode: MacCipherMode) -> Option<SizeTable> {
        let block_size = self.block.block_size();
        Some(match mode {
            MacCipherMode::Cbc => SizeTable::exact(block_size),
            MacCipherMode::Cfb => SizeTable::single(SizeRange::new(8, block_size, 8)),
        })
    }

    pub fn generate_parameters(&self, key: &[u8], iv: Option<&[u8]>) -> CryptoResult<CipherParameters> {
        self.block.generate_parameters(key, iv)
    }

    pub fn generate_parameters_range(
        &self,
        key: &[u8],
        key_offset: usize,
        key_len: usize,
        iv: Option<&[u8]>,
        iv_offset: usize,
        iv_len: usize,
    ) -> CryptoResult<CipherParameters> {
        self.block
            .generate_parameters_range(key, key_offset, key_len, iv, iv_offset, iv_len)
    }

    /// A reusable MAC engine chaining the cipher in `mode`.
    pub fn generate_mac(
        &self,
        mode: MacCipherMode,
        padding: MacPaddingMode,
        parameters: &CipherParameters,
    ) -> CryptoResult<Box<dyn MacEngine>> {
        let iv = parameters.iv().unwrap_or_default();
        let legal = self.try_get_iv_sizes(mode).unwrap_or_else(SizeTable::none);
        if u32::try_from(parameters.iv_bits()).map_or(true, |bits| !legal.is_legal(bits)) {
            return Err(CryptoError::unsupported(
                self.mechanism.as_str(),
                "iv_size",
                parameters.iv_bits(),
                format!("{} mac mode requires IV sizes {}", mode.name(), legal),
            ));
        }
        let engine = self.block.keyed_engine(parameters.key())?;
        let chain = match mode {
            MacCipherMode::Cbc => Chain::Cbc(engine.cbc(true, iv)?),
            MacCipherMode::Cfb => Chain::Cfb(ShiftRegister::new(engine, Feedback::Cipher, true, iv)?),
        };
        tracing::debug!(mechanism = %self.mechanism, mode = mode.name(), mac_size = self.mac_size, "mac constructed");
        Ok(Box::new(ChainedMac {
            name: format!("{}/{}", self.mechanism, mode.name()),
            mac_len: self.mac_size as usize / 8,
            padding: padding.scheme(),
            chain,
            pending: Vec::new(),
            last: Vec::new(),
            last_byte: None,
        }))
    }

    pub fn compute_mac(
        &self,
        mode: MacCipherMode,
        padding: MacPaddingMode,
        parameters: &CipherParameters,
        data: &[u8],
    ) -> CryptoResult<Vec<u8>> {
        let mut engine = self.generate_mac(mode, padding, parameters)?;
        engine.update(data);
        Ok(engine.finalize_reset())
    }

    pub fn compute_mac_range(
        &self,
        mode: MacCipherMode,
        padding: MacPaddingMode,
        parameters: &CipherParameters,
        data: &[u8],
        offset: usize,
        len: usize,
    ) -> CryptoResult<Vec<u8>> {
        self.compute_mac(mode, padding, parameters, slice_range("data", data, offset, len)?)
    }
}

impl fmt::Display for MacAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.mechanism)
    }
}

enum Chain {
    Cbc(Box<dyn UnitTransform>),
    Cfb(ShiftRegister),
}

impl Chain {
    fn transform(&mut self) -> &mut dyn UnitTransform {
        match self {
            Chain::Cbc(transform) => transform.as_mut(),
            Chain::Cfb(register) => register,
        }
    }
}

/// Chains units through the cipher, holding the final unit back until
/// `finalize_reset`.
///
/// CBC tags are the last ciphertext block; with padding, an aligned message
/// gets a whole padding block. CFB tags are one further encryption of the
/// shift register, and only a partial final segment is padded. Without
/// padding the final unit is zero-filled.
struct ChainedMac {
    name: String,
    mac_len: usize,
    padding: Option<PaddingScheme>,
    chain: Chain,
    pending: Vec<u8>,
    last: Vec<u8>,
    last_byte: Option<u8>,
}

impl ChainedMac {
    fn absorb(&mut self, mut unit: Vec<u8>) {
        if let Some(byte) = unit.last() {
            self.last_byte = Some(*byte);
        }
        // Units are always full, which every chain accepts.
        if self.chain.transform().apply(&mut unit).is_ok() {
            self.last = unit;
        }
    }

    fn pad(&self, block: &mut Vec<u8>, unit: usize) {
        let pos = block.len();
        block.resize(unit, 0);
        if let Some(scheme) = self.padding {
            scheme.pad(block, pos, self.last_byte);
        }
    }
}

impl MacEngine for ChainedMac {
    fn algorithm_name(&self) -> &str {
        &self.name
    }

    fn mac_len(&self) -> usize {
        self.mac_len
    }

    fn update(&mut self, data: &[u8]) {
        let unit = self.chain.transform().unit_len();
        self.pending.extend_from_slice(data);
        while self.pending.len() > unit {
            let block: Vec<u8> = self.pending.drain(..unit).collect();
            self.absorb(block);
        }
    }

    fn finalize_reset(&mut self) -> Vec<u8> {
        let unit = self.chain.transform().unit_len();
        let mut block = mem::take(&mut self.pending);
        let cbc = matches!(self.chain, Chain::Cbc(_));
        if cbc && self.padding.is_some() && block.len() == unit {
            self.absorb(mem::take(&mut block));
        }
        if block.len() < unit {
            self.pad(&mut block, unit);
        }
        self.absorb(block);
        let mut tag = match &self.chain {
            Chain::Cbc(_) => mem::take(&mut self.last),
            Chain::Cfb(register) => register.output_block(),
        };
        tag.truncate(self.mac_len);
        self.reset();
        tag
    }

    fn reset(&mut self) {
        self.pending.clear();
        self.last.clear();
        self.last_byte = None;
        self.chain.transform().reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symmetric::{SymmetricCipherMode, SymmetricPaddingMode};

    fn fips197_key() -> Vec<u8> {
        hex::decode("000102030405060708090a0b0c0d0e0f").unwrap()
    }

    fn full_mac() -> MacAlgorithm {
        MacAlgorithm::with_mac_size(BlockAlgorithm::aes(), 128).unwrap()
    }

    #[test]
    fn test_default_size_is_half_block() {
        let mac = MacAlgorithm::new(BlockAlgorithm::aes()).unwrap();
        assert_eq!(mac.mechanism(), "AES/MAC");
        assert_eq!(mac.hash_size(), 64);
        assert_eq!(MacAlgorithm::new(BlockAlgorithm::des()).unwrap().hash_size(), 32);
        assert!(MacAlgorithm::with_mac_size(BlockAlgorithm::aes(), 136).is_err());
        assert!(MacAlgorithm::with_mac_size(BlockAlgorithm::aes(), 60).is_err());
    }

    #[test]
    fn test_iv_tables() {
        let mac = MacAlgorithm::new(BlockAlgorithm::des()).unwrap();
        assert_eq!(mac.try_get_iv_sizes(MacCipherMode::Cbc), Some(SizeTable::exact(64)));
        let cfb = mac.try_get_iv_sizes(MacCipherMode::Cfb).unwrap();
        assert!(cfb.is_legal(8));
        assert!(cfb.is_legal(64));
        assert!(!cfb.is_legal(72));
    }

    #[test]
    fn test_cbc_mac_single_block_is_block_encryption() {
        let mac = full_mac();
        let params = mac.generate_parameters(&fips197_key(), Some(&[0u8; 16])).unwrap();
        let message = hex::decode("00112233445566778899aabbccddeeff").unwrap();
        let tag = mac
            .compute_mac(MacCipherMode::Cbc, MacPaddingMode::NoPadding, &params, &message)
            .unwrap();
        assert_eq!(hex::encode(tag), "69c4e0d86a7b0430d8cdb78070b4c55a");
    }

    #[test]
    fn test_cbc_mac_zero_fills_without_padding() {
        let mac = full_mac();
        let params = mac.generate_parameters(&fips197_key(), Some(&[0u8; 16])).unwrap();
        let empty = mac
            .compute_mac(MacCipherMode::Cbc, MacPaddingMode::NoPadding, &params, b"")
            .unwrap();
        let zeros = mac
            .compute_mac(MacCipherMode::Cbc, MacPaddingMode::NoPadding, &params, &[0u8; 16])
            .unwrap();
        assert_eq!(empty, zeros);
        let short = mac
            .compute_mac(MacCipherMode::Cbc, MacPaddingMode::NoPadding, &params, b"abc")
            .unwrap();
        let mut filled = b"abc".to_vec();
        filled.resize(16, 0);
        assert_eq!(
            short,
            mac.compute_mac(MacCipherMode::Cbc, MacPaddingMode::NoPadding, &params, &filled)
                .unwrap()
        );
    }

    #[test]
    fn test_cbc_mac_padding_adds_block_to_aligned_input() {
        let mac = full_mac();
        let params = mac.generate_parameters(&fips197_key(), Some(&[0u8; 16])).unwrap();
        let message = [0x5Au8; 32];
        let padded = mac
            .compute_mac(MacCipherMode::Cbc, MacPaddingMode::Pkcs7, &params, &message)
            .unwrap();
        let mut explicit = message.to_vec();
        explicit.extend_from_slice(&[16u8; 16]);
        assert_eq!(
            padded,
            mac.compute_mac(MacCipherMode::Cbc, MacPaddingMode::NoPadding, &params, &explicit)
                .unwrap()
        );
    }

    #[test]
    fn test_cfb_mac_encrypts_final_register() {
        let mac = full_mac();
        let key = fips197_key();
        let iv = [0x24u8; 16];
        let message = [0x11u8; 32];
        let params = mac.generate_parameters(&key, Some(&iv)).unwrap();
        let tag = mac
            .compute_mac(MacCipherMode::Cfb, MacPaddingMode::NoPadding, &params, &message)
            .unwrap();

        // Tag = E(last CFB ciphertext block).
        let block = BlockAlgorithm::aes();
        let mut cfb = block
            .generate_cipher(
                true,
                SymmetricCipherMode::Cfb,
                SymmetricPaddingMode::NoPadding,
                &block.generate_parameters(&key, Some(&iv)).unwrap(),
            )
            .unwrap();
        let ciphertext = cfb.process(&message).unwrap();
        let mut ecb = block
            .generate_cipher(
                true,
                SymmetricCipherMode::Ecb,
                SymmetricPaddingMode::NoPadding,
                &block.generate_parameters(&key, None).unwrap(),
            )
            .unwrap();
        assert_eq!(tag, ecb.process(&ciphertext[16..]).unwrap());
    }

    #[test]
    fn test_cfb_mac_with_short_segments() {
        let mac = MacAlgorithm::new(BlockAlgorithm::des()).unwrap();
        let params = mac
            .generate_parameters(&hex::decode("0123456789abcdef").unwrap(), Some(&[1, 2]))
            .unwrap();
        let mut engine = mac
            .generate_mac(MacCipherMode::Cfb, MacPaddingMode::Iso7816_4, &params)
            .unwrap();
        assert_eq!(engine.mac_len(), 4);
        engine.update(b"seven b");
        let first = engine.finalize_reset();
        engine.update(b"seven");
        engine.update(b" b");
        assert_eq!(engine.finalize_reset(), first);
    }

    #[test]
    fn test_iv_rules() {
        let mac = MacAlgorithm::new(BlockAlgorithm::aes()).unwrap();
        let key = fips197_key();
        let missing = mac.generate_parameters(&key, None).unwrap();
        let short = mac.generate_parameters(&key, Some(&[0u8; 8])).unwrap();
        for (mode, params) in [
            (MacCipherMode::Cbc, &missing),
            (MacCipherMode::Cbc, &short),
            (MacCipherMode::Cfb, &missing),
        ] {
            match mac.generate_mac(mode, MacPaddingMode::NoPadding, params) {
                Err(CryptoError::UnsupportedConfiguration { parameter, .. }) => assert_eq!(parameter, "iv_size"),
                Err(other) => panic!("unexpected error: {other}"),
                Ok(_) => panic!("{} accepted a bad IV", mode.name()),
            }
        }
        assert!(mac.generate_mac(MacCipherMode::Cfb, MacPaddingMode::NoPadding, &short).is_ok());
    }

    #[test]
    fn test_compute_mac_range() {
        let mac = MacAlgorithm::new(BlockAlgorithm::aes()).unwrap();
        let params = mac
            .generate_parameters_range(&[0u8; 40], 4, 16, Some(&[9u8; 32]), 8, 16)
            .unwrap();
        assert_eq!(
            mac.compute_mac_range(MacCipherMode::Cbc, MacPaddingMode::Tbc, &params, b"--payload--", 2, 7)
                .unwrap(),
            mac.compute_mac(MacCipherMode::Cbc, MacPaddingMode::Tbc, &params, b"payload")
                .unwrap()
        );
    }
}
