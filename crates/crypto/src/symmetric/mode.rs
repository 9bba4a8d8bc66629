//! Cipher modes, padding schemes and their compatibility tables.

use std::fmt;

use algoforge_core::{SizeRange, SizeTable};
use serde::{Deserialize, Serialize};

/// Largest nonce length, in bits, accepted by EAX and GCM.
pub const MAX_NONCE_BITS: u32 = 2_147_483_640;

/// Block cipher modes of operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymmetricCipherMode {
    Cbc,
    Ecb,
    Ofb,
    Cfb,
    Cts,
    Ctr,
    CtsEcb,
    Gofb,
    OpenPgpCfb,
    Sic,
    Ccm,
    Eax,
    Gcm,
    Ocb,
}

impl SymmetricCipherMode {
    pub const ALL: [SymmetricCipherMode; 14] = [
        SymmetricCipherMode::Cbc,
        SymmetricCipherMode::Ecb,
        SymmetricCipherMode::Ofb,
        SymmetricCipherMode::Cfb,
        SymmetricCipherMode::Cts,
        SymmetricCipherMode::Ctr,
        SymmetricCipherMode::CtsEcb,
        SymmetricCipherMode::Gofb,
        SymmetricCipherMode::OpenPgpCfb,
        SymmetricCipherMode::Sic,
        SymmetricCipherMode::Ccm,
        SymmetricCipherMode::Eax,
        SymmetricCipherMode::Gcm,
        SymmetricCipherMode::Ocb,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SymmetricCipherMode::Cbc => "CBC",
            SymmetricCipherMode::Ecb => "ECB",
            SymmetricCipherMode::Ofb => "OFB",
            SymmetricCipherMode::Cfb => "CFB",
            SymmetricCipherMode::Cts => "CTS",
            SymmetricCipherMode::Ctr => "CTR",
            SymmetricCipherMode::CtsEcb => "CTS_ECB",
            SymmetricCipherMode::Gofb => "GOFB",
            SymmetricCipherMode::OpenPgpCfb => "OpenPGPCFB",
            SymmetricCipherMode::Sic => "SIC",
            SymmetricCipherMode::Ccm => "CCM",
            SymmetricCipherMode::Eax => "EAX",
            SymmetricCipherMode::Gcm => "GCM",
            SymmetricCipherMode::Ocb => "OCB",
        }
    }

    /// Authenticated modes that take nonce, tag size and associated text.
    pub fn is_aead(self) -> bool {
        matches!(
            self,
            SymmetricCipherMode::Ccm
                | SymmetricCipherMode::Eax
                | SymmetricCipherMode::Gcm
                | SymmetricCipherMode::Ocb
        )
    }

    /// Modes that only combine with [`SymmetricPaddingMode::NoPadding`].
    pub fn requires_no_padding(self) -> bool {
        self.is_aead() || matches!(self, SymmetricCipherMode::Cts | SymmetricCipherMode::CtsEcb)
    }

    /// Whether the mode runs on a cipher with `block_size` bits.
    pub fn supports_block_size(self, block_size: u32) -> bool {
        match self {
            SymmetricCipherMode::Gofb => block_size == 64,
            SymmetricCipherMode::Sic => block_size >= 128,
            SymmetricCipherMode::Ccm | SymmetricCipherMode::Gcm | SymmetricCipherMode::Ocb => {
                block_size == 128
            }
            SymmetricCipherMode::Eax => block_size == 64 || block_size == 128,
            _ => true,
        }
    }

    /// Human-readable block-size requirement, used in rejection messages.
    pub(crate) fn block_requirement(self) -> &'static str {
        match self {
            SymmetricCipherMode::Gofb => "a 64-bit block",
            SymmetricCipherMode::Sic => "a block of at least 128 bits",
            SymmetricCipherMode::Eax => "a 64-bit or 128-bit block",
            SymmetricCipherMode::Ccm | SymmetricCipherMode::Gcm | SymmetricCipherMode::Ocb => {
                "a 128-bit block"
            }
            _ => "any block size",
        }
    }
}

impl fmt::Display for SymmetricCipherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Padding applied to the last unit of a block cipher stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymmetricPaddingMode {
    NoPadding,
    Pkcs7,
    Zeros,
    X923,
    Iso10126,
    Iso7816_4,
    Tbc,
}

impl SymmetricPaddingMode {
    pub const ALL: [SymmetricPaddingMode; 7] = [
        SymmetricPaddingMode::NoPadding,
        SymmetricPaddingMode::Pkcs7,
        SymmetricPaddingMode::Zeros,
        SymmetricPaddingMode::X923,
        SymmetricPaddingMode::Iso10126,
        SymmetricPaddingMode::Iso7816_4,
        SymmetricPaddingMode::Tbc,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SymmetricPaddingMode::NoPadding => "NoPadding",
            SymmetricPaddingMode::Pkcs7 => "PKCS7",
            SymmetricPaddingMode::Zeros => "Zeros",
            SymmetricPaddingMode::X923 => "X923",
            SymmetricPaddingMode::Iso10126 => "ISO10126",
            SymmetricPaddingMode::Iso7816_4 => "ISO7816_4",
            SymmetricPaddingMode::Tbc => "TBC",
        }
    }
}

impl fmt::Display for SymmetricPaddingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Smallest CTR/SIC IV: half the block, but never leaving more than 64 counter bits.
fn counter_iv_min(block_size: u32) -> u32 {
    (block_size / 2).max(block_size.saturating_sub(64))
}

/// IV (or, for AEAD modes, nonce) table for `mode` and `padding` on a
/// cipher with `block_size` bits. `None` marks an unsupported combination.
pub fn iv_sizes(
    mode: SymmetricCipherMode,
    padding: SymmetricPaddingMode,
    block_size: u32,
) -> Option<SizeTable> {
    if mode.requires_no_padding() && padding != SymmetricPaddingMode::NoPadding {
        return None;
    }
    if !mode.supports_block_size(block_size) {
        return None;
    }
    let range = match mode {
        SymmetricCipherMode::Cbc | SymmetricCipherMode::Cts | SymmetricCipherMode::Gofb => {
            SizeRange::exact(block_size)
        }
        SymmetricCipherMode::Ecb | SymmetricCipherMode::CtsEcb => SizeRange::NONE,
        SymmetricCipherMode::Ofb | SymmetricCipherMode::Cfb | SymmetricCipherMode::OpenPgpCfb => {
            SizeRange::new(8, block_size, 8)
        }
        SymmetricCipherMode::Ctr | SymmetricCipherMode::Sic => {
            SizeRange::new(counter_iv_min(block_size), block_size, 8)
        }
        SymmetricCipherMode::Ccm => SizeRange::new(56, 104, 8),
        SymmetricCipherMode::Eax | SymmetricCipherMode::Gcm => SizeRange::new(8, MAX_NONCE_BITS, 8),
        SymmetricCipherMode::Ocb => SizeRange::new(0, 120, 8),
    };
    Some(SizeTable::single(range))
}

/// Nonce and tag tables for AEAD modes. `None` for every other mode and for
/// any padding but `NoPadding`.
pub fn nonce_and_tag_sizes(
    mode: SymmetricCipherMode,
    padding: SymmetricPaddingMode,
    block_size: u32,
) -> Option<(SizeTable, SizeTable)> {
    if !mode.is_aead() || padding != SymmetricPaddingMode::NoPadding {
        return None;
    }
    let nonce = iv_sizes(mode, padding, block_size)?;
    let tag = match mode {
        SymmetricCipherMode::Ccm => SizeRange::new(32, 128, 16),
        SymmetricCipherMode::Eax => SizeRange::new(8, block_size, 8),
        SymmetricCipherMode::Gcm => SizeRange::new(32, 128, 8),
        _ => SizeRange::new(64, 128, 8),
    };
    Some((nonce, SizeTable::single(tag)))
}

/// Modes a raw block-cipher MAC can chain with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MacCipherMode {
    Cbc,
    Cfb,
}

impl MacCipherMode {
    pub fn name(self) -> &'static str {
        match self {
            MacCipherMode::Cbc => "CBC",
            MacCipherMode::Cfb => "CFB",
        }
    }
}

/// Paddings a raw block-cipher MAC accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MacPaddingMode {
    NoPadding,
    Pkcs7,
    Zeros,
    X923,
    Iso7816_4,
    Tbc,
}

impl MacPaddingMode {
    pub const ALL: [MacPaddingMode; 6] = [
        MacPaddingMode::NoPadding,
        MacPaddingMode::Pkcs7,
        MacPaddingMode::Zeros,
        MacPaddingMode::X923,
        MacPaddingMode::Iso7816_4,
        MacPaddingMode::Tbc,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctr_iv_table() {
        let table = iv_sizes(SymmetricCipherMode::Ctr, SymmetricPaddingMode::NoPadding, 128).unwrap();
        assert!(table.is_legal(64));
        assert!(!table.is_legal(56));
        assert!(table.is_legal(128));

        let narrow = iv_sizes(SymmetricCipherMode::Ctr, SymmetricPaddingMode::Pkcs7, 64).unwrap();
        assert_eq!(narrow.ranges(), &[SizeRange::new(32, 64, 8)]);

        let wide = iv_sizes(SymmetricCipherMode::Sic, SymmetricPaddingMode::NoPadding, 256).unwrap();
        assert_eq!(wide.ranges(), &[SizeRange::new(192, 256, 8)]);
    }

    #[test]
    fn test_block_size_restrictions() {
        assert!(iv_sizes(SymmetricCipherMode::Gofb, SymmetricPaddingMode::NoPadding, 128).is_none());
        assert!(iv_sizes(SymmetricCipherMode::Gofb, SymmetricPaddingMode::Zeros, 64).is_some());
        assert!(iv_sizes(SymmetricCipherMode::Sic, SymmetricPaddingMode::NoPadding, 64).is_none());
        assert!(iv_sizes(SymmetricCipherMode::Eax, SymmetricPaddingMode::NoPadding, 64).is_some());
        assert!(iv_sizes(SymmetricCipherMode::Eax, SymmetricPaddingMode::NoPadding, 256).is_none());
        assert!(iv_sizes(SymmetricCipherMode::Gcm, SymmetricPaddingMode::NoPadding, 64).is_none());
    }

    #[test]
    fn test_no_padding_only_modes() {
        for mode in SymmetricCipherMode::ALL.into_iter().filter(|m| m.requires_no_padding()) {
            assert!(iv_sizes(mode, SymmetricPaddingMode::NoPadding, 128).is_some(), "{mode}");
            for padding in &SymmetricPaddingMode::ALL[1..] {
                assert!(iv_sizes(mode, *padding, 128).is_none(), "{mode} {padding}");
            }
        }
    }

    #[test]
    fn test_ecb_is_none_not_any() {
        let table = iv_sizes(SymmetricCipherMode::Ecb, SymmetricPaddingMode::Pkcs7, 64).unwrap();
        assert!(table.is_none());
        assert!(!table.is_legal(64));
    }

    #[test]
    fn test_nonce_and_tag_tables() {
        let (nonce, tag) =
            nonce_and_tag_sizes(SymmetricCipherMode::Ccm, SymmetricPaddingMode::NoPadding, 128).unwrap();
        assert!(nonce.is_legal(56) && nonce.is_legal(104) && !nonce.is_legal(112));
        assert!(tag.is_legal(32) && tag.is_legal(48) && !tag.is_legal(40));

        let (_, eax_tag) =
            nonce_and_tag_sizes(SymmetricCipherMode::Eax, SymmetricPaddingMode::NoPadding, 64).unwrap();
        assert_eq!(eax_tag.max(), Some(64));

        let (ocb_nonce, ocb_tag) =
            nonce_and_tag_sizes(SymmetricCipherMode::Ocb, SymmetricPaddingMode::NoPadding, 128).unwrap();
        assert!(ocb_nonce.is_legal(0) && ocb_nonce.is_legal(120));
        assert!(!ocb_tag.is_legal(56));

        assert!(nonce_and_tag_sizes(SymmetricCipherMode::Cbc, SymmetricPaddingMode::NoPadding, 128).is_none());
        assert!(nonce_and_tag_sizes(SymmetricCipherMode::Gcm, SymmetricPaddingMode::Pkcs7, 128).is_none());
    }
}
