//! Public-key encryption for the RSA and ElGamal descriptors.

use std::fmt;

use rand::{CryptoRng, RngCore};
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::{BigUint, Oaep, Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};

use super::{AsymmetricAlgorithm, AsymmetricKey, AsymmetricKeyPair, PrivateKey, PublicKey};
use crate::engine::AsymmetricBlockCipher;
use crate::error::{CryptoError, CryptoResult};

/// Overhead of PKCS#1 v1.5 encryption padding in bytes.
const PKCS1_OVERHEAD: usize = 10;
/// Overhead of OAEP over SHA-1 beyond the raw block, in bytes.
const OAEP_SHA1_OVERHEAD: usize = 1 + 2 * 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsymmetricPaddingMode {
    NoPadding,
    #[serde(rename = "PKCS1")]
    Pkcs1,
    #[serde(rename = "OAEP")]
    Oaep,
    #[serde(rename = "ISO9796_1")]
    Iso9796_1,
}

impl AsymmetricPaddingMode {
    pub const ALL: [AsymmetricPaddingMode; 4] = [
        AsymmetricPaddingMode::NoPadding,
        AsymmetricPaddingMode::Pkcs1,
        AsymmetricPaddingMode::Oaep,
        AsymmetricPaddingMode::Iso9796_1,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AsymmetricPaddingMode::NoPadding => "NoPadding",
            AsymmetricPaddingMode::Pkcs1 => "PKCS1",
            AsymmetricPaddingMode::Oaep => "OAEP",
            AsymmetricPaddingMode::Iso9796_1 => "ISO9796_1",
        }
    }
}

impl fmt::Display for AsymmetricPaddingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An asymmetric descriptor whose family supports encryption.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AsymmetricEncryptionAlgorithm {
    algorithm: AsymmetricAlgorithm,
}

impl AsymmetricEncryptionAlgorithm {
    pub fn rsa() -> Self {
        Self {
            algorithm: AsymmetricAlgorithm::rsa(),
        }
    }

    pub fn elgamal() -> Self {
        Self {
            algorithm: AsymmetricAlgorithm::elgamal(),
        }
    }

    /// `None` unless `algorithm` is RSA or ElGamal.
    pub fn from_algorithm(algorithm: AsymmetricAlgorithm) -> Option<Self> {
        match algorithm {
            AsymmetricAlgorithm::Rsa { .. } | AsymmetricAlgorithm::ElGamal { .. } => Some(Self { algorithm }),
            _ => None,
        }
    }

    pub fn mechanism(&self) -> &'static str {
        self.algorithm.mechanism()
    }

    pub fn asymmetric_algorithm(&self) -> &AsymmetricAlgorithm {
        &self.algorithm
    }

    pub fn generate_key_pair(&self) -> CryptoResult<AsymmetricKeyPair> {
        self.algorithm.generate_key_pair()
    }

    pub fn generate_key_pair_with<R: RngCore + CryptoRng>(&self, rng: &mut R) -> CryptoResult<AsymmetricKeyPair> {
        self.algorithm.generate_key_pair_with(rng)
    }

    /// A cipher that encrypts with a public key or decrypts with a private
    /// key. The cipher can be reused for any number of blocks.
    pub fn generate_cipher(
        &self,
        padding: AsymmetricPaddingMode,
        key: &AsymmetricKey,
    ) -> CryptoResult<Box<dyn AsymmetricBlockCipher>> {
        let mechanism = self.mechanism();
        if matches!(self.algorithm, AsymmetricAlgorithm::ElGamal { .. }) {
            if padding == AsymmetricPaddingMode::Iso9796_1 {
                return Err(CryptoError::unsupported(
                    mechanism,
                    "padding",
                    padding,
                    "ISO9796_1 padding mode does not support ElGamal",
                ));
            }
            return Err(CryptoError::unavailable(mechanism, "no ElGamal backend"));
        }
        if padding == AsymmetricPaddingMode::Iso9796_1 {
            return Err(CryptoError::unavailable(
                format!("{mechanism}/{padding}"),
                "no ISO 9796-1 encoding backend",
            ));
        }
        let direction = match key {
            AsymmetricKey::Public(PublicKey::Rsa(public)) => RsaDirection::Encrypt(public.clone()),
            AsymmetricKey::Private(PrivateKey::Rsa(private)) => RsaDirection::Decrypt(private.clone()),
            other => {
                return Err(CryptoError::InvalidKey {
                    reason: format!("{mechanism} cipher requires an RSA key, got {}", other.mechanism()),
                })
            }
        };
        let cipher = RsaCipher {
            name: format!("{mechanism}/{padding}"),
            padding,
            direction,
        };
        tracing::debug!(mechanism = %cipher.name, encrypting = cipher.is_encrypting(), "cipher constructed");
        Ok(Box::new(cipher))
    }
}

impl fmt::Display for AsymmetricEncryptionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mechanism())
    }
}

enum RsaDirection {
    Encrypt(RsaPublicKey),
    Decrypt(RsaPrivateKey),
}

struct RsaCipher {
    name: String,
    padding: AsymmetricPaddingMode,
    direction: RsaDirection,
}

impl RsaCipher {
    fn modulus_len(&self) -> usize {
        match &self.direction {
            RsaDirection::Encrypt(key) => key.size(),
            RsaDirection::Decrypt(key) => key.size(),
        }
    }

    /// Bytes that always fit below the modulus.
    fn raw_block_len(&self) -> usize {
        let bits = match &self.direction {
            RsaDirection::Encrypt(key) => key.n().bits(),
            RsaDirection::Decrypt(key) => key.n().bits(),
        };
        (bits - 1) / 8
    }

    /// Raw encryption takes any value below the modulus, so a full-length
    /// block is accepted and range-checked later.
    fn max_input_len(&self) -> usize {
        match (&self.direction, self.padding) {
            (RsaDirection::Encrypt(_), AsymmetricPaddingMode::NoPadding) => self.modulus_len(),
            _ => self.input_block_size(),
        }
    }

    fn padding_overhead(&self) -> usize {
        match self.padding {
            AsymmetricPaddingMode::Pkcs1 => PKCS1_OVERHEAD,
            AsymmetricPaddingMode::Oaep => OAEP_SHA1_OVERHEAD,
            _ => 0,
        }
    }
}

fn raw_rsa(input: &[u8], exponent: &BigUint, modulus: &BigUint) -> CryptoResult<BigUint> {
    let value = BigUint::from_bytes_be(input);
    if &value >= modulus {
        return Err(CryptoError::invalid_argument("input", "input too large for RSA cipher"));
    }
    Ok(value.modpow(exponent, modulus))
}

impl AsymmetricBlockCipher for RsaCipher {
    fn algorithm_name(&self) -> &str {
        &self.name
    }

    fn is_encrypting(&self) -> bool {
        matches!(self.direction, RsaDirection::Encrypt(_))
    }

    fn input_block_size(&self) -> usize {
        match self.direction {
            RsaDirection::Encrypt(_) => self.raw_block_len().saturating_sub(self.padding_overhead()),
            RsaDirection::Decrypt(_) => self.modulus_len(),
        }
    }

    fn output_block_size(&self) -> usize {
        match self.direction {
            RsaDirection::Encrypt(_) => self.modulus_len(),
            RsaDirection::Decrypt(_) => self.raw_block_len().saturating_sub(self.padding_overhead()),
        }
    }

    fn process_block(&mut self, input: &[u8]) -> CryptoResult<Vec<u8>> {
        let limit = self.max_input_len();
        if input.len() > limit {
            return Err(CryptoError::invalid_argument(
                "input",
                format!("{} bytes exceeds the {} byte block of {}", input.len(), limit, self.name),
            ));
        }
        match (&self.direction, self.padding) {
            (RsaDirection::Encrypt(key), AsymmetricPaddingMode::NoPadding) => {
                let encrypted = raw_rsa(input, key.e(), key.n())?.to_bytes_be();
                let mut block = vec![0u8; key.size().saturating_sub(encrypted.len())];
                block.extend(encrypted);
                Ok(block)
            }
            (RsaDirection::Decrypt(key), AsymmetricPaddingMode::NoPadding) => {
                let decrypted = raw_rsa(input, key.d(), key.n())?;
                if decrypted.bits() == 0 {
                    return Ok(Vec::new());
                }
                Ok(decrypted.to_bytes_be())
            }
            (RsaDirection::Encrypt(key), AsymmetricPaddingMode::Pkcs1) => key
                .encrypt(&mut rand::thread_rng(), Pkcs1v15Encrypt, input)
                .map_err(|error| CryptoError::invalid_argument("input", error.to_string())),
            (RsaDirection::Decrypt(key), AsymmetricPaddingMode::Pkcs1) => key
                .decrypt(Pkcs1v15Encrypt, input)
                .map_err(|error| CryptoError::Decryption { reason: error.to_string() }),
            (RsaDirection::Encrypt(key), AsymmetricPaddingMode::Oaep) => key
                .encrypt(&mut rand::thread_rng(), Oaep::new::<sha1::Sha1>(), input)
                .map_err(|error| CryptoError::invalid_argument("input", error.to_string())),
            (RsaDirection::Decrypt(key), AsymmetricPaddingMode::Oaep) => key
                .decrypt(Oaep::new::<sha1::Sha1>(), input)
                .map_err(|error| CryptoError::Decryption { reason: error.to_string() }),
            (_, AsymmetricPaddingMode::Iso9796_1) => Err(CryptoError::unavailable(
                self.name.clone(),
                "no ISO 9796-1 encoding backend",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;

    static PAIR: Lazy<AsymmetricKeyPair> = Lazy::new(|| {
        AsymmetricAlgorithm::rsa_with(1024, 25)
            .generate_key_pair()
            .expect("rsa key generation")
    });

    fn round_trip(padding: AsymmetricPaddingMode, message: &[u8]) -> Vec<u8> {
        let rsa = AsymmetricEncryptionAlgorithm::rsa();
        let mut encryptor = rsa.generate_cipher(padding, &PAIR.public()).unwrap();
        let mut decryptor = rsa.generate_cipher(padding, &PAIR.private()).unwrap();
        assert!(encryptor.is_encrypting());
        assert!(!decryptor.is_encrypting());
        let ciphertext = encryptor.process_block(message).unwrap();
        assert_eq!(ciphertext.len(), 128);
        decryptor.process_block(&ciphertext).unwrap()
    }

    #[test]
    fn test_padded_round_trips() {
        assert_eq!(round_trip(AsymmetricPaddingMode::Pkcs1, b"attack at dawn"), b"attack at dawn");
        assert_eq!(round_trip(AsymmetricPaddingMode::Oaep, b"attack at dawn"), b"attack at dawn");
    }

    #[test]
    fn test_raw_rsa_strips_leading_zeros() {
        assert_eq!(round_trip(AsymmetricPaddingMode::NoPadding, &[0, 0, 1, 2, 3]), vec![1, 2, 3]);
    }

    #[test]
    fn test_block_sizes() {
        let rsa = AsymmetricEncryptionAlgorithm::rsa();
        let raw = rsa.generate_cipher(AsymmetricPaddingMode::NoPadding, &PAIR.public()).unwrap();
        assert_eq!((raw.input_block_size(), raw.output_block_size()), (127, 128));
        let pkcs1 = rsa.generate_cipher(AsymmetricPaddingMode::Pkcs1, &PAIR.public()).unwrap();
        assert_eq!(pkcs1.input_block_size(), 117);
        let oaep = rsa.generate_cipher(AsymmetricPaddingMode::Oaep, &PAIR.private()).unwrap();
        assert_eq!((oaep.input_block_size(), oaep.output_block_size()), (128, 86));
    }

    #[test]
    fn test_oversized_input_rejected() {
        let rsa = AsymmetricEncryptionAlgorithm::rsa();
        let mut cipher = rsa.generate_cipher(AsymmetricPaddingMode::Pkcs1, &PAIR.public()).unwrap();
        assert!(matches!(
            cipher.process_block(&[1u8; 200]),
            Err(CryptoError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_elgamal_and_iso9796() {
        let elgamal = AsymmetricEncryptionAlgorithm::elgamal();
        match elgamal.generate_cipher(AsymmetricPaddingMode::Iso9796_1, &PAIR.public()) {
            Err(CryptoError::UnsupportedConfiguration { reason, .. }) => {
                assert_eq!(reason, "ISO9796_1 padding mode does not support ElGamal")
            }
            _ => panic!("ElGamal accepted ISO9796_1"),
        }
        assert!(matches!(
            elgamal.generate_cipher(AsymmetricPaddingMode::Pkcs1, &PAIR.public()),
            Err(CryptoError::Unavailable { .. })
        ));
        assert!(matches!(
            AsymmetricEncryptionAlgorithm::rsa().generate_cipher(AsymmetricPaddingMode::Iso9796_1, &PAIR.public()),
            Err(CryptoError::Unavailable { .. })
        ));
    }

    #[test]
    fn test_wrong_key_family() {
        let ed = AsymmetricAlgorithm::ed25519().generate_key_pair().unwrap();
        assert!(matches!(
            AsymmetricEncryptionAlgorithm::rsa().generate_cipher(AsymmetricPaddingMode::Pkcs1, &ed.public()),
            Err(CryptoError::InvalidKey { .. })
        ));
        assert!(AsymmetricEncryptionAlgorithm::from_algorithm(AsymmetricAlgorithm::dsa()).is_none());
        assert_eq!(AsymmetricPaddingMode::Iso9796_1.to_string(), "ISO9796_1");
    }
}
