//! Asymmetric descriptors: key-pair generation for every public-key family,
//! plus RSA and ElGamal encryption.
//!
//! Each descriptor carries the generation parameters of its family. Only the
//! families with a linked backend (RSA, DSA, ECDSA on the NIST and secp256k1
//! curves, Ed25519, Ed448, SM2) can generate keys; the rest report
//! `Unavailable`.

mod curves;
mod encryption;
mod keys;
pub mod registry;

use std::fmt;

use algoforge_core::AsymmetricDefaults;
use rand::{CryptoRng, RngCore};
use rsa::{BigUint, RsaPrivateKey};

use crate::error::{CryptoError, CryptoResult};

pub use curves::{EcGost3410Curve, EcdsaCurve};
pub use encryption::{AsymmetricEncryptionAlgorithm, AsymmetricPaddingMode};
pub use keys::{AsymmetricKey, AsymmetricKeyPair, PrivateKey, PublicKey};

pub const DEFAULT_RSA_KEY_SIZE: u32 = 2048;
pub const DEFAULT_RSA_CERTAINTY: u32 = 25;
pub const DEFAULT_RSA_PUBLIC_EXPONENT: u64 = 65537;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AsymmetricAlgorithm {
    Dsa { key_size: u32, certainty: u32 },
    Ecdsa { curve: EcdsaCurve },
    EcGost3410 { curve: EcGost3410Curve },
    Ed25519,
    Ed448,
    ElGamal { key_size: u32, certainty: u32 },
    Gost3410 { key_size: u32, procedure: u32 },
    /// `certainty` is carried for callers that inspect it; prime generation
    /// uses the backend's own test count.
    Rsa { key_size: u32, certainty: u32, public_exponent: u64 },
    Sm2,
}

impl AsymmetricAlgorithm {
    pub fn dsa() -> Self {
        Self::dsa_with(1024, 80)
    }

    pub fn dsa_with(key_size: u32, certainty: u32) -> Self {
        AsymmetricAlgorithm::Dsa { key_size, certainty }
    }

    pub fn ecdsa() -> Self {
        Self::ecdsa_with(EcdsaCurve::default())
    }

    pub fn ecdsa_with(curve: EcdsaCurve) -> Self {
        AsymmetricAlgorithm::Ecdsa { curve }
    }

    pub fn ecgost3410() -> Self {
        Self::ecgost3410_with(EcGost3410Curve::default())
    }

    pub fn ecgost3410_with(curve: EcGost3410Curve) -> Self {
        AsymmetricAlgorithm::EcGost3410 { curve }
    }

    pub fn ed25519() -> Self {
        AsymmetricAlgorithm::Ed25519
    }

    pub fn ed448() -> Self {
        AsymmetricAlgorithm::Ed448
    }

    pub fn elgamal() -> Self {
        Self::elgamal_with(768, 20)
    }

    pub fn elgamal_with(key_size: u32, certainty: u32) -> Self {
        AsymmetricAlgorithm::ElGamal { key_size, certainty }
    }

    pub fn gost3410() -> Self {
        Self::gost3410_with(1024, 2)
    }

    pub fn gost3410_with(key_size: u32, procedure: u32) -> Self {
        AsymmetricAlgorithm::Gost3410 { key_size, procedure }
    }

    pub fn rsa() -> Self {
        Self::rsa_with(DEFAULT_RSA_KEY_SIZE, DEFAULT_RSA_CERTAINTY)
    }

    pub fn rsa_with(key_size: u32, certainty: u32) -> Self {
        AsymmetricAlgorithm::Rsa {
            key_size,
            certainty,
            public_exponent: DEFAULT_RSA_PUBLIC_EXPONENT,
        }
    }

    pub fn rsa_with_exponent(key_size: u32, certainty: u32, public_exponent: u64) -> Self {
        AsymmetricAlgorithm::Rsa {
            key_size,
            certainty,
            public_exponent,
        }
    }

    pub fn sm2() -> Self {
        AsymmetricAlgorithm::Sm2
    }

    pub fn mechanism(&self) -> &'static str {
        match self {
            AsymmetricAlgorithm::Dsa { .. } => "DSA",
            AsymmetricAlgorithm::Ecdsa { .. } => "ECDSA",
            AsymmetricAlgorithm::EcGost3410 { .. } => "ECGOST3410",
            AsymmetricAlgorithm::Ed25519 => "Ed25519",
            AsymmetricAlgorithm::Ed448 => "Ed448",
            AsymmetricAlgorithm::ElGamal { .. } => "ElGamal",
            AsymmetricAlgorithm::Gost3410 { .. } => "GOST3410",
            AsymmetricAlgorithm::Rsa { .. } => "RSA",
            AsymmetricAlgorithm::Sm2 => "SM2",
        }
    }

    /// Resolve `name` and apply the configured generation parameters.
    ///
    /// Returns `Ok(None)` for unknown names and an error when the configured
    /// curve names are not recognised.
    pub fn configured(name: &str, defaults: &AsymmetricDefaults) -> CryptoResult<Option<Self>> {
        let Some(resolved) = registry::try_get_algorithm(name) else {
            return Ok(None);
        };
        let configured = match resolved {
            AsymmetricAlgorithm::Dsa { .. } => Self::dsa_with(defaults.dsa_key_size, defaults.dsa_certainty),
            AsymmetricAlgorithm::Ecdsa { .. } => Self::ecdsa_with(defaults.ecdsa_curve.parse()?),
            AsymmetricAlgorithm::EcGost3410 { .. } => Self::ecgost3410_with(defaults.ecgost3410_curve.parse()?),
            AsymmetricAlgorithm::ElGamal { .. } => {
                Self::elgamal_with(defaults.elgamal_key_size, defaults.elgamal_certainty)
            }
            AsymmetricAlgorithm::Gost3410 { .. } => {
                Self::gost3410_with(defaults.gost3410_key_size, defaults.gost3410_procedure)
            }
            AsymmetricAlgorithm::Rsa { .. } => Self::rsa_with_exponent(
                defaults.rsa_key_size,
                defaults.rsa_certainty,
                defaults.rsa_public_exponent,
            ),
            other => other,
        };
        tracing::debug!(name, algorithm = ?configured, "asymmetric algorithm configured");
        Ok(Some(configured))
    }

    /// Generate a key pair from the thread-local generator.
    pub fn generate_key_pair(&self) -> CryptoResult<AsymmetricKeyPair> {
        self.generate_key_pair_with(&mut rand::thread_rng())
    }

    pub fn generate_key_pair_with<R: RngCore + CryptoRng>(&self, rng: &mut R) -> CryptoResult<AsymmetricKeyPair> {
        let private = match *self {
            AsymmetricAlgorithm::Rsa {
                key_size,
                public_exponent,
                ..
            } => PrivateKey::Rsa(generate_rsa(rng, key_size, public_exponent)?),
            AsymmetricAlgorithm::Dsa { key_size, .. } => {
                let components = dsa::Components::generate(rng, dsa_key_size(key_size)?);
                PrivateKey::Dsa(dsa::SigningKey::generate(rng, components))
            }
            AsymmetricAlgorithm::Ecdsa { curve } => match curve {
                EcdsaCurve::SecP256r1 => PrivateKey::EcP256(p256::ecdsa::SigningKey::random(rng)),
                EcdsaCurve::SecP384r1 => PrivateKey::EcP384(p384::ecdsa::SigningKey::random(rng)),
                EcdsaCurve::SecP521r1 => PrivateKey::EcP521(p521::ecdsa::SigningKey::random(rng)),
                EcdsaCurve::SecP256k1 => PrivateKey::EcK256(k256::ecdsa::SigningKey::random(rng)),
                other => {
                    return Err(CryptoError::unavailable(
                        self.mechanism(),
                        format!("no backend for curve {other}"),
                    ))
                }
            },
            AsymmetricAlgorithm::Ed25519 => {
                let mut secret = [0u8; 32];
                rng.fill_bytes(&mut secret);
                let key = ed25519_dalek::SigningKey::from_bytes(&secret);
                zeroize::Zeroize::zeroize(&mut secret);
                PrivateKey::Ed25519(key)
            }
            AsymmetricAlgorithm::Ed448 => PrivateKey::Ed448(ed448_goldilocks_plus::SigningKey::generate(&mut *rng)),
            AsymmetricAlgorithm::Sm2 => PrivateKey::Sm2(sm2::SecretKey::random(rng)),
            _ => {
                return Err(CryptoError::unavailable(
                    self.mechanism(),
                    "no key generation backend",
                ))
            }
        };
        tracing::debug!(mechanism = self.mechanism(), "key pair generated");
        Ok(AsymmetricKeyPair::from_private(private))
    }
}

impl fmt::Display for AsymmetricAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mechanism())
    }
}

fn generate_rsa<R: RngCore + CryptoRng>(rng: &mut R, key_size: u32, public_exponent: u64) -> CryptoResult<RsaPrivateKey> {
    if public_exponent < 3 || public_exponent % 2 == 0 {
        return Err(CryptoError::unsupported(
            "RSA",
            "public_exponent",
            public_exponent,
            "public exponent must be odd and at least 3",
        ));
    }
    RsaPrivateKey::new_with_exp(rng, key_size as usize, &BigUint::from(public_exponent))
        .map_err(|error| CryptoError::unsupported("RSA", "key_size", key_size, error.to_string()))
}

/// DSA domain size for a modulus length; the subgroup size follows FIPS 186-4.
#[allow(deprecated)]
fn dsa_key_size(key_size: u32) -> CryptoResult<dsa::KeySize> {
    match key_size {
        1024 => Ok(dsa::KeySize::DSA_1024_160),
        2048 => Ok(dsa::KeySize::DSA_2048_224),
        3072 => Ok(dsa::KeySize::DSA_3072_256),
        other => Err(CryptoError::unsupported(
            "DSA",
            "key_size",
            other,
            "legal key sizes are 1024, 2048 and 3072 bits",
        )),
    }
}
