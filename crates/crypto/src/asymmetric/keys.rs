//! Asymmetric key material produced by key generation.
//!
//! Keys are tagged by backend so a signer or cipher can check it was handed
//! a key of the family it expects. Private keys never print their secret
//! parts.

use std::fmt;

use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sm2::elliptic_curve::sec1::ToEncodedPoint;

#[derive(Clone)]
pub enum PrivateKey {
    Rsa(RsaPrivateKey),
    Dsa(dsa::SigningKey),
    EcP256(p256::ecdsa::SigningKey),
    EcP384(p384::ecdsa::SigningKey),
    EcP521(p521::ecdsa::SigningKey),
    EcK256(k256::ecdsa::SigningKey),
    Ed25519(ed25519_dalek::SigningKey),
    Ed448(ed448_goldilocks_plus::SigningKey),
    Sm2(sm2::SecretKey),
}

#[derive(Clone)]
pub enum PublicKey {
    Rsa(RsaPublicKey),
    Dsa(dsa::VerifyingKey),
    EcP256(p256::ecdsa::VerifyingKey),
    EcP384(p384::ecdsa::VerifyingKey),
    EcP521(p521::ecdsa::VerifyingKey),
    EcK256(k256::ecdsa::VerifyingKey),
    Ed25519(ed25519_dalek::VerifyingKey),
    Ed448(ed448_goldilocks_plus::VerifyingKey),
    Sm2(sm2::PublicKey),
}

impl PrivateKey {
    /// Asymmetric mechanism of the key family.
    pub fn mechanism(&self) -> &'static str {
        match self {
            PrivateKey::Rsa(_) => "RSA",
            PrivateKey::Dsa(_) => "DSA",
            PrivateKey::EcP256(_) | PrivateKey::EcP384(_) | PrivateKey::EcP521(_) | PrivateKey::EcK256(_) => "ECDSA",
            PrivateKey::Ed25519(_) => "Ed25519",
            PrivateKey::Ed448(_) => "Ed448",
            PrivateKey::Sm2(_) => "SM2",
        }
    }

    pub fn public_key(&self) -> PublicKey {
        match self {
            PrivateKey::Rsa(key) => PublicKey::Rsa(key.to_public_key()),
            PrivateKey::Dsa(key) => PublicKey::Dsa(key.verifying_key().clone()),
            PrivateKey::EcP256(key) => PublicKey::EcP256(p256::ecdsa::VerifyingKey::from(key)),
            PrivateKey::EcP384(key) => PublicKey::EcP384(p384::ecdsa::VerifyingKey::from(key)),
            PrivateKey::EcP521(key) => PublicKey::EcP521(p521::ecdsa::VerifyingKey::from(key)),
            PrivateKey::EcK256(key) => PublicKey::EcK256(k256::ecdsa::VerifyingKey::from(key)),
            PrivateKey::Ed25519(key) => PublicKey::Ed25519(key.verifying_key()),
            PrivateKey::Ed448(key) => PublicKey::Ed448(key.verifying_key()),
            PrivateKey::Sm2(key) => PublicKey::Sm2(key.public_key()),
        }
    }
}

impl PublicKey {
    pub fn mechanism(&self) -> &'static str {
        match self {
            PublicKey::Rsa(_) => "RSA",
            PublicKey::Dsa(_) => "DSA",
            PublicKey::EcP256(_) | PublicKey::EcP384(_) | PublicKey::EcP521(_) | PublicKey::EcK256(_) => "ECDSA",
            PublicKey::Ed25519(_) => "Ed25519",
            PublicKey::Ed448(_) => "Ed448",
            PublicKey::Sm2(_) => "SM2",
        }
    }

    /// Encoded public value: RSA modulus, DSA `y`, SEC1 compressed point or
    /// the 32-byte Ed25519 and 57-byte Ed448 keys.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            PublicKey::Rsa(key) => key.n().to_bytes_be(),
            PublicKey::Dsa(key) => key.y().to_bytes_be(),
            PublicKey::EcP256(key) => key.to_encoded_point(true).as_bytes().to_vec(),
            PublicKey::EcP384(key) => key.to_encoded_point(true).as_bytes().to_vec(),
            PublicKey::EcP521(key) => key.to_encoded_point(true).as_bytes().to_vec(),
            PublicKey::EcK256(key) => key.to_encoded_point(true).as_bytes().to_vec(),
            PublicKey::Ed25519(key) => key.to_bytes().to_vec(),
            PublicKey::Ed448(key) => key.to_bytes().to_vec(),
            PublicKey::Sm2(key) => key.to_encoded_point(true).as_bytes().to_vec(),
        }
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("mechanism", &self.mechanism())
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("mechanism", &self.mechanism())
            .field("value", &hex_prefix(&self.to_bytes()))
            .finish()
    }
}

fn hex_prefix(bytes: &[u8]) -> String {
    let mut rendered: String = bytes.iter().take(8).map(|byte| format!("{byte:02x}")).collect();
    if bytes.len() > 8 {
        rendered.push_str("..");
    }
    rendered
}

/// Either half of a key pair. Public keys verify and encrypt, private keys
/// sign and decrypt.
#[derive(Clone, Debug)]
pub enum AsymmetricKey {
    Public(PublicKey),
    Private(PrivateKey),
}

impl AsymmetricKey {
    pub fn is_private(&self) -> bool {
        matches!(self, AsymmetricKey::Private(_))
    }

    pub fn mechanism(&self) -> &'static str {
        match self {
            AsymmetricKey::Public(key) => key.mechanism(),
            AsymmetricKey::Private(key) => key.mechanism(),
        }
    }
}

impl From<PublicKey> for AsymmetricKey {
    fn from(key: PublicKey) -> Self {
        AsymmetricKey::Public(key)
    }
}

impl From<PrivateKey> for AsymmetricKey {
    fn from(key: PrivateKey) -> Self {
        AsymmetricKey::Private(key)
    }
}

#[derive(Clone, Debug)]
pub struct AsymmetricKeyPair {
    public: PublicKey,
    private: PrivateKey,
}

impl AsymmetricKeyPair {
    pub(crate) fn from_private(private: PrivateKey) -> Self {
        Self {
            public: private.public_key(),
            private,
        }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private
    }

    /// The public half as an operation key.
    pub fn public(&self) -> AsymmetricKey {
        AsymmetricKey::Public(self.public.clone())
    }

    /// The private half as an operation key.
    pub fn private(&self) -> AsymmetricKey {
        AsymmetricKey::Private(self.private.clone())
    }

    pub fn into_parts(self) -> (PublicKey, PrivateKey) {
        (self.public, self.private)
    }
}
