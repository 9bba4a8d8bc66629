//! Block cipher descriptors.

use std::fmt;

use algoforge_core::{SizeRange, SizeTable};
use serde::{Deserialize, Serialize};

use super::backend::{block_engine, mode_transform, BlockEngine};
use super::buffered::{AeadCipher, PaddedBlockCipher};
use super::mode::{self, SymmetricCipherMode, SymmetricPaddingMode};
use crate::engine::BufferedCipher;
use crate::error::{CryptoError, CryptoResult};
use crate::parameters::{slice_range, AeadParameters, CipherParameters, KeyParameter};

/// DES weak and semi-weak keys.
const DES_WEAK_KEYS: [[u8; 8]; 16] = [
    [0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01],
    [0x1f, 0x1f, 0x1f, 0x1f, 0x0e, 0x0e, 0x0e, 0x0e],
    [0xe0, 0xe0, 0xe0, 0xe0, 0xf1, 0xf1, 0xf1, 0xf1],
    [0xfe, 0xfe, 0xfe, 0xfe, 0xfe, 0xfe, 0xfe, 0xfe],
    [0x01, 0xfe, 0x01, 0xfe, 0x01, 0xfe, 0x01, 0xfe],
    [0x1f, 0xe0, 0x1f, 0xe0, 0x0e, 0xf1, 0x0e, 0xf1],
    [0x01, 0xe0, 0x01, 0xe0, 0x01, 0xf1, 0x01, 0xf1],
    [0x1f, 0xfe, 0x1f, 0xfe, 0x0e, 0xfe, 0x0e, 0xfe],
    [0x01, 0x1f, 0x01, 0x1f, 0x01, 0x0e, 0x01, 0x0e],
    [0xe0, 0xfe, 0xe0, 0xfe, 0xf1, 0xfe, 0xf1, 0xfe],
    [0xfe, 0x01, 0xfe, 0x01, 0xfe, 0x01, 0xfe, 0x01],
    [0xe0, 0x1f, 0xe0, 0x1f, 0xf1, 0x0e, 0xf1, 0x0e],
    [0xe0, 0x01, 0xe0, 0x01, 0xf1, 0x01, 0xf1, 0x01],
    [0xfe, 0x1f, 0xfe, 0x1f, 0xfe, 0x0e, 0xfe, 0x0e],
    [0x1f, 0x01, 0x1f, 0x01, 0x0e, 0x01, 0x0e, 0x01],
    [0xfe, 0xe0, 0xfe, 0xe0, 0xfe, 0xf1, 0xfe, 0xf1],
];

fn is_weak_des_key(key: &[u8]) -> bool {
    key.chunks_exact(8)
        .any(|part| DES_WEAK_KEYS.iter().any(|weak| weak[..] == *part))
}

/// Block cipher family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    Aes,
    Blowfish,
    Camellia,
    Cast5,
    Cast6,
    Des,
    DesEde,
    Dstu7624,
    Gost28147,
    Idea,
    Noekeon,
    Rc2,
    Rc5_32,
    Rc5_64,
    Rc6,
    Rijndael,
    Seed,
    Serpent,
    Skipjack,
    Sm4,
    Tea,
    Threefish,
    Tnepres,
    Twofish,
    Xtea,
}

impl BlockKind {
    pub fn legal_block_sizes(self) -> SizeTable {
        match self {
            BlockKind::Blowfish
            | BlockKind::Cast5
            | BlockKind::Des
            | BlockKind::DesEde
            | BlockKind::Gost28147
            | BlockKind::Idea
            | BlockKind::Rc2
            | BlockKind::Rc5_32
            | BlockKind::Skipjack
            | BlockKind::Tea
            | BlockKind::Xtea => SizeTable::exact(64),
            BlockKind::Dstu7624 => SizeTable::of(&[128, 256, 512]),
            BlockKind::Rijndael => SizeTable::single(SizeRange::new(128, 256, 32)),
            BlockKind::Threefish => SizeTable::of(&[256, 512, 1024]),
            _ => SizeTable::exact(128),
        }
    }

    /// Key table for a cipher of this family with `block_size` bits.
    pub fn legal_key_sizes(self, block_size: u32) -> SizeTable {
        match self {
            BlockKind::Aes | BlockKind::Camellia => SizeTable::single(SizeRange::new(128, 256, 64)),
            BlockKind::Blowfish
            | BlockKind::Noekeon
            | BlockKind::Seed
            | BlockKind::Sm4
            | BlockKind::Tea
            | BlockKind::Xtea => SizeTable::exact(128),
            BlockKind::Cast5 => SizeTable::single(SizeRange::new(40, 128, 8)),
            BlockKind::Cast6 => SizeTable::single(SizeRange::new(128, 256, 8)),
            BlockKind::Des => SizeTable::exact(64),
            BlockKind::DesEde => SizeTable::single(SizeRange::new(128, 192, 64)),
            BlockKind::Dstu7624 => match block_size {
                128 => SizeTable::single(SizeRange::new(128, 256, 128)),
                256 => SizeTable::single(SizeRange::new(256, 512, 256)),
                _ => SizeTable::exact(512),
            },
            BlockKind::Gost28147 => SizeTable::exact(256),
            BlockKind::Idea => SizeTable::single(SizeRange::new(8, 128, 8)),
            BlockKind::Rc2 => SizeTable::single(SizeRange::new(8, 1024, 8)),
            BlockKind::Rc5_32 | BlockKind::Rc5_64 => SizeTable::single(SizeRange::new(8, 2040, 8)),
            BlockKind::Rc6 => SizeTable::single(SizeRange::new(8, 2_147_483_640, 8)),
            BlockKind::Rijndael => SizeTable::single(SizeRange::new(128, 256, 32)),
            BlockKind::Serpent | BlockKind::Tnepres => SizeTable::single(SizeRange::new(32, 512, 32)),
            BlockKind::Skipjack => SizeTable::exact(80),
            BlockKind::Threefish => SizeTable::exact(block_size),
            BlockKind::Twofish => SizeTable::single(SizeRange::new(64, 256, 64)),
        }
    }

    fn mechanism(self, block_size: u32) -> String {
        match self {
            BlockKind::Aes => "AES".to_string(),
            BlockKind::Blowfish => "Blowfish".to_string(),
            BlockKind::Camellia => "Camellia".to_string(),
            BlockKind::Cast5 => "CAST5".to_string(),
            BlockKind::Cast6 => "CAST6".to_string(),
            BlockKind::Des => "DES".to_string(),
            BlockKind::DesEde => "DESede".to_string(),
            BlockKind::Dstu7624 => format!("DSTU7624-{block_size}"),
            BlockKind::Gost28147 => "GOST28147".to_string(),
            BlockKind::Idea => "IDEA".to_string(),
            BlockKind::Noekeon => "Noekeon".to_string(),
            BlockKind::Rc2 => "RC2".to_string(),
            BlockKind::Rc5_32 => "RC5".to_string(),
            BlockKind::Rc5_64 => "RC5-64".to_string(),
            BlockKind::Rc6 => "RC6".to_string(),
            BlockKind::Rijndael => format!("Rijndael-{block_size}"),
            BlockKind::Seed => "SEED".to_string(),
            BlockKind::Serpent => "Serpent".to_string(),
            BlockKind::Skipjack => "SKIPJACK".to_string(),
            BlockKind::Sm4 => "SM4".to_string(),
            BlockKind::Tea => "TEA".to_string(),
            BlockKind::Threefish => format!("Threefish-{block_size}"),
            BlockKind::Tnepres => "Tnepres".to_string(),
            BlockKind::Twofish => "Twofish".to_string(),
            BlockKind::Xtea => "XTEA".to_string(),
        }
    }
}

/// Immutable block cipher descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockAlgorithm {
    kind: BlockKind,
    block_size: u32,
    mechanism: String,
}

impl BlockAlgorithm {
    /// Validate `block_size` against the family's block table.
    pub fn new(kind: BlockKind, block_size: u32) -> CryptoResult<Self> {
        let mechanism = kind.mechanism(block_size);
        let legal = kind.legal_block_sizes();
        if !legal.is_legal(block_size) {
            return Err(CryptoError::unsupported(
                mechanism,
                "block_size",
                block_size,
                format!("legal block sizes are {legal}"),
            ));
        }
        Ok(Self {
            kind,
            block_size,
            mechanism,
        })
    }

    /// Families with a single block size.
    fn fixed(kind: BlockKind) -> Self {
        let block_size = kind.legal_block_sizes().min().unwrap_or_default();
        Self {
            kind,
            block_size,
            mechanism: kind.mechanism(block_size),
        }
    }

    pub fn aes() -> Self {
        Self::fixed(BlockKind::Aes)
    }

    pub fn blowfish() -> Self {
        Self::fixed(BlockKind::Blowfish)
    }

    pub fn camellia() -> Self {
        Self::fixed(BlockKind::Camellia)
    }

    pub fn cast5() -> Self {
        Self::fixed(BlockKind::Cast5)
    }

    pub fn cast6() -> Self {
        Self::fixed(BlockKind::Cast6)
    }

    pub fn des() -> Self {
        Self::fixed(BlockKind::Des)
    }

    /// Triple DES (EDE), with two or three independent keys.
    pub fn des_ede() -> Self {
        Self::fixed(BlockKind::DesEde)
    }

    /// DSTU 7624 (Kalyna) with a 128, 256 or 512-bit block.
    pub fn dstu7624(block_size: u32) -> CryptoResult<Self> {
        Self::new(BlockKind::Dstu7624, block_size)
    }

    pub fn gost28147() -> Self {
        Self::fixed(BlockKind::Gost28147)
    }

    pub fn idea() -> Self {
        Self::fixed(BlockKind::Idea)
    }

    pub fn noekeon() -> Self {
        Self::fixed(BlockKind::Noekeon)
    }

    pub fn rc2() -> Self {
        Self::fixed(BlockKind::Rc2)
    }

    pub fn rc5_32() -> Self {
        Self::fixed(BlockKind::Rc5_32)
    }

    pub fn rc5_64() -> Self {
        Self::fixed(BlockKind::Rc5_64)
    }

    pub fn rc6() -> Self {
        Self::fixed(BlockKind::Rc6)
    }

    /// Rijndael with a 128 to 256-bit block in 32-bit steps.
    pub fn rijndael(block_size: u32) -> CryptoResult<Self> {
        Self::new(BlockKind::Rijndael, block_size)
    }

    pub fn seed() -> Self {
        Self::fixed(BlockKind::Seed)
    }

    pub fn serpent() -> Self {
        Self::fixed(BlockKind::Serpent)
    }

    pub fn skipjack() -> Self {
        Self::fixed(BlockKind::Skipjack)
    }

    pub fn sm4() -> Self {
        Self::fixed(BlockKind::Sm4)
    }

    pub fn tea() -> Self {
        Self::fixed(BlockKind::Tea)
    }

    /// Threefish; the key is always as long as the block.
    pub fn threefish(block_size: u32) -> CryptoResult<Self> {
        Self::new(BlockKind::Threefish, block_size)
    }

    pub fn tnepres() -> Self {
        Self::fixed(BlockKind::Tnepres)
    }

    pub fn twofish() -> Self {
        Self::fixed(BlockKind::Twofish)
    }

    pub fn xtea() -> Self {
        Self::fixed(BlockKind::Xtea)
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn mechanism(&self) -> &str {
        &self.mechanism
    }

    /// Block size in bits.
    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    pub fn legal_block_sizes(&self) -> SizeTable {
        self.kind.legal_block_sizes()
    }

    pub fn legal_key_sizes(&self) -> SizeTable {
        self.kind.legal_key_sizes(self.block_size)
    }

    /// IV table for `mode` with `padding`; the nonce table for AEAD modes.
    pub fn legal_iv_sizes(
        &self,
        mode: SymmetricCipherMode,
        padding: SymmetricPaddingMode,
    ) -> Option<SizeTable> {
        mode::iv_sizes(mode, padding, self.block_size)
    }

    pub fn legal_nonce_and_tag_sizes(
        &self,
        mode: SymmetricCipherMode,
        padding: SymmetricPaddingMode,
    ) -> Option<(SizeTable, SizeTable)> {
        mode::nonce_and_tag_sizes(mode, padding, self.block_size)
    }

    fn check_key(&self, key: &[u8]) -> CryptoResult<()> {
        if key.is_empty() {
            return Err(CryptoError::invalid_argument("key", "key is empty"));
        }
        if matches!(self.kind, BlockKind::Des | BlockKind::DesEde) && is_weak_des_key(key) {
            return Err(CryptoError::InvalidKey {
                reason: format!("attempt to create weak {} key", self.mechanism),
            });
        }
        Ok(())
    }

    /// Key plus optional IV. An empty key is rejected, as are DES weak keys.
    pub fn generate_parameters(&self, key: &[u8], iv: Option<&[u8]>) -> CryptoResult<CipherParameters> {
        self.check_key(key)?;
        let key = KeyParameter::new(key);
        Ok(match iv {
            Some(iv) => CipherParameters::KeyWithIv { key, iv: iv.to_vec() },
            None => CipherParameters::Key(key),
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

    /// AEAD parameters; `mac_size` is the tag length in bits.
    pub fn generate_aead_parameters(
        &self,
        key: &[u8],
        nonce: &[u8],
        mac_size: u32,
        associated_text: &[u8],
    ) -> CryptoResult<CipherParameters> {
        self.check_key(key)?;
        Ok(AeadParameters::new(KeyParameter::new(key), nonce, mac_size, associated_text).into())
    }

    fn mode_rejection(&self, mode: SymmetricCipherMode, padding: SymmetricPaddingMode) -> CryptoError {
        if mode.requires_no_padding() && padding != SymmetricPaddingMode::NoPadding {
            CryptoError::unsupported(
                self.mechanism.as_str(),
                "padding",
                padding,
                format!("{mode} cipher mode can only select NoPadding"),
            )
        } else {
            CryptoError::unsupported(
                self.mechanism.as_str(),
                "mode",
                mode,
                format!("requires {}", mode.block_requirement()),
            )
        }
    }

    fn engine(&self, key: &KeyParameter) -> CryptoResult<Box<dyn BlockEngine>> {
        if key.is_empty() {
            return Err(CryptoError::invalid_argument("key", "key is empty"));
        }
        if !self.legal_key_sizes().is_legal_bytes(key.len()) {
            return Err(CryptoError::unsupported(
                self.mechanism.as_str(),
                "key_size",
                key.size_bits(),
                format!("legal key sizes are {}", self.legal_key_sizes()),
            ));
        }
        block_engine(&self.mechanism, self.kind, self.block_size, key.as_bytes())
    }

    /// Build a cipher for `mode` and `padding`, keyed from `parameters`.
    ///
    /// Non-AEAD instances are reusable: every `finalize` returns them to the
    /// keyed initial state. AEAD encryption instances encrypt one message
    /// only, since reusing them would repeat the nonce.
    pub fn generate_cipher(
        &self,
        encrypting: bool,
        mode: SymmetricCipherMode,
        padding: SymmetricPaddingMode,
        parameters: &CipherParameters,
    ) -> CryptoResult<Box<dyn BufferedCipher>> {
        let iv_sizes = self
            .legal_iv_sizes(mode, padding)
            .ok_or_else(|| self.mode_rejection(mode, padding))?;
        let name = format!("{}/{}/{}", self.mechanism, mode, padding);

        if mode.is_aead() {
            let aead = match parameters {
                CipherParameters::Aead(aead) => aead,
                _ => {
                    return Err(CryptoError::invalid_argument(
                        "parameters",
                        format!("{mode} requires AEAD parameters"),
                    ))
                }
            };
            let (_, tag_sizes) = self
                .legal_nonce_and_tag_sizes(mode, padding)
                .ok_or_else(|| self.mode_rejection(mode, padding))?;
            if !iv_sizes.is_legal_bytes(aead.nonce().len()) {
                return Err(CryptoError::unsupported(
                    self.mechanism.as_str(),
                    "nonce_size",
                    aead.nonce().len() * 8,
                    format!("legal nonce sizes are {iv_sizes}"),
                ));
            }
            if !tag_sizes.is_legal(aead.mac_size()) {
                return Err(CryptoError::unsupported(
                    self.mechanism.as_str(),
                    "mac_size",
                    aead.mac_size(),
                    format!("legal tag sizes are {tag_sizes}"),
                ));
            }
            let engine = self.engine(aead.key())?;
            let tag_len = aead.mac_size() as usize / 8;
            let backend = engine
                .aead(aead.key().as_bytes(), mode, aead.nonce().len(), tag_len)
                .ok_or_else(|| {
                    CryptoError::unavailable(
                        self.mechanism.as_str(),
                        format!(
                            "no {mode} backend for {}-byte nonces and {tag_len}-byte tags",
                            aead.nonce().len()
                        ),
                    )
                })?;
            tracing::debug!(cipher = %name, encrypting, "cipher constructed");
            return Ok(Box::new(AeadCipher::new(name, encrypting, backend, aead)));
        }

        if let CipherParameters::Aead(_) = parameters {
            return Err(CryptoError::invalid_argument(
                "parameters",
                format!("{mode} does not take AEAD parameters"),
            ));
        }
        let iv = parameters.iv().unwrap_or_default();
        if !iv_sizes.is_legal_bytes(iv.len()) {
            return Err(CryptoError::unsupported(
                self.mechanism.as_str(),
                "iv_size",
                iv.len() * 8,
                format!("legal IV sizes for {mode} are {iv_sizes}"),
            ));
        }
        let engine = self.engine(parameters.key())?;
        let transform = mode_transform(engine.as_ref(), &self.mechanism, mode, encrypting, iv)?;
        tracing::debug!(cipher = %name, encrypting, "cipher constructed");
        Ok(Box::new(PaddedBlockCipher::new(
            name,
            encrypting,
            transform,
            padding.scheme(),
        )))
    }

    /// The keyed engine, for MAC constructions over this cipher.
    pub(crate) fn keyed_engine(&self, key: &KeyParameter) -> CryptoResult<Box<dyn BlockEngine>> {
        self.engine(key)
    }
}

impl fmt::Display for BlockAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.mechanism)
    }
}
