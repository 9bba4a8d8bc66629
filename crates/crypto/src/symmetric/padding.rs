//! Padding of the final cipher or MAC unit.

use cipher::block_padding::{AnsiX923, Iso10126, Iso7816, Pkcs7, RawPadding, ZeroPadding};

use super::mode::{MacPaddingMode, SymmetricPaddingMode};
use crate::error::{CryptoError, CryptoResult};

/// A concrete padding scheme; `NoPadding` maps to `None` before reaching here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PaddingScheme {
    Pkcs7,
    Zeros,
    X923,
    Iso10126,
    Iso7816_4,
    Tbc,
}

impl PaddingScheme {
    /// Fill `unit[pos..]`. `pos` is strictly less than the unit length.
    ///
    /// `last_data_byte` is the final byte of the message so far; TBC reads it
    /// when the unit holds no data of its own.
    pub(crate) fn pad(self, unit: &mut [u8], pos: usize, last_data_byte: Option<u8>) {
        match self {
            PaddingScheme::Pkcs7 => Pkcs7::raw_pad(unit, pos),
            PaddingScheme::Zeros => ZeroPadding::raw_pad(unit, pos),
            PaddingScheme::X923 => AnsiX923::raw_pad(unit, pos),
            PaddingScheme::Iso10126 => Iso10126::raw_pad(unit, pos),
            PaddingScheme::Iso7816_4 => Iso7816::raw_pad(unit, pos),
            PaddingScheme::Tbc => {
                let last = if pos > 0 { Some(unit[pos - 1]) } else { last_data_byte };
                let fill = match last {
                    Some(byte) if byte & 0x01 == 1 => 0x00,
                    _ => 0xFF,
                };
                unit[pos..].fill(fill);
            }
        }
    }

    /// Strip padding from a decrypted final unit.
    pub(crate) fn unpad(self, unit: &[u8]) -> CryptoResult<&[u8]> {
        let stripped = match self {
            PaddingScheme::Pkcs7 => Pkcs7::raw_unpad(unit),
            PaddingScheme::Zeros => ZeroPadding::raw_unpad(unit),
            PaddingScheme::X923 => AnsiX923::raw_unpad(unit),
            PaddingScheme::Iso10126 => Iso10126::raw_unpad(unit),
            PaddingScheme::Iso7816_4 => Iso7816::raw_unpad(unit),
            PaddingScheme::Tbc => return Ok(tbc_unpad(unit)),
        };
        stripped.map_err(|_| CryptoError::Decryption {
            reason: "pad block corrupted".to_string(),
        })
    }
}

/// Trailing-bit-complement removal: drop the run of bytes equal to the last one.
fn tbc_unpad(unit: &[u8]) -> &[u8] {
    match unit.last() {
        Some(&code) => {
            let run = unit.iter().rev().take_while(|&&byte| byte == code).count();
            &unit[..unit.len() - run]
        }
        None => unit,
    }
}

impl SymmetricPaddingMode {
    pub(crate) fn scheme(self) -> Option<PaddingScheme> {
        match self {
            SymmetricPaddingMode::NoPadding => None,
            SymmetricPaddingMode::Pkcs7 => Some(PaddingScheme::Pkcs7),
            SymmetricPaddingMode::Zeros => Some(PaddingScheme::Zeros),
            SymmetricPaddingMode::X923 => Some(PaddingScheme::X923),
            SymmetricPaddingMode::Iso10126 => Some(PaddingScheme::Iso10126),
            SymmetricPaddingMode::Iso7816_4 => Some(PaddingScheme::Iso7816_4),
            SymmetricPaddingMode::Tbc => Some(PaddingScheme::Tbc),
        }
    }
}

impl MacPaddingMode {
    pub(crate) fn scheme(self) -> Option<PaddingScheme> {
        match self {
            MacPaddingMode::NoPadding => None,
            MacPaddingMode::Pkcs7 => Some(PaddingScheme::Pkcs7),
            MacPaddingMode::Zeros => Some(PaddingScheme::Zeros),
            MacPaddingMode::X923 => Some(PaddingScheme::X923),
            MacPaddingMode::Iso7816_4 => Some(PaddingScheme::Iso7816_4),
            MacPaddingMode::Tbc => Some(PaddingScheme::Tbc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padded(scheme: PaddingScheme, data: &[u8], unit: usize) -> Vec<u8> {
        let mut block = vec![0xAAu8; unit];
        block[..data.len()].copy_from_slice(data);
        scheme.pad(&mut block, data.len(), data.last().copied());
        block
    }

    #[test]
    fn test_pkcs7_and_x923() {
        assert_eq!(padded(PaddingScheme::Pkcs7, b"abcde", 8), b"abcde\x03\x03\x03");
        assert_eq!(padded(PaddingScheme::X923, b"abcde", 8), b"abcde\x00\x00\x03");
        assert_eq!(PaddingScheme::Pkcs7.unpad(b"abcde\x03\x03\x03").unwrap(), b"abcde");
        assert!(PaddingScheme::Pkcs7.unpad(b"abcde\x03\x02\x03").is_err());
    }

    #[test]
    fn test_iso7816() {
        assert_eq!(padded(PaddingScheme::Iso7816_4, b"ab", 4), b"ab\x80\x00");
        assert_eq!(PaddingScheme::Iso7816_4.unpad(b"ab\x80\x00").unwrap(), b"ab");
        assert!(PaddingScheme::Iso7816_4.unpad(b"ab\x00\x00").is_err());
    }

    #[test]
    fn test_tbc_complements_last_bit() {
        assert_eq!(padded(PaddingScheme::Tbc, b"\x01", 4), b"\x01\x00\x00\x00");
        assert_eq!(padded(PaddingScheme::Tbc, b"\x02", 4), b"\x02\xFF\xFF\xFF");
        assert_eq!(PaddingScheme::Tbc.unpad(b"\x02\xFF\xFF\xFF").unwrap(), b"\x02");

        let mut empty = vec![0u8; 4];
        PaddingScheme::Tbc.pad(&mut empty, 0, Some(0x03));
        assert_eq!(empty, b"\x00\x00\x00\x00");
        PaddingScheme::Tbc.pad(&mut empty, 0, None);
        assert_eq!(empty, b"\xFF\xFF\xFF\xFF");
    }

    #[test]
    fn test_zero_padding_strips_trailing_zeros() {
        assert_eq!(PaddingScheme::Zeros.unpad(b"ab\x00\x00").unwrap(), b"ab");
    }

    #[test]
    fn test_no_padding_has_no_scheme() {
        assert_eq!(SymmetricPaddingMode::NoPadding.scheme(), None);
        assert_eq!(MacPaddingMode::NoPadding.scheme(), None);
        assert_eq!(MacPaddingMode::Tbc.scheme(), Some(PaddingScheme::Tbc));
    }
}
