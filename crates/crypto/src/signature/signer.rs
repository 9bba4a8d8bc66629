//! Signer engines bound to RustCrypto signature backends.

use std::mem;

use ::signature::hazmat::{PrehashSigner, PrehashVerifier};
use ed25519_dalek::{Signer as _, Verifier as _};
use ed448_goldilocks_plus::PreHasherXof;
use rsa::{BigUint, Pkcs1v15Sign, Pss};
use sha2::{Digest, Sha512};
use sha3::Shake256;
use sm2::elliptic_curve::sec1::ToEncodedPoint;

use super::{SignatureAlgorithm, SignatureKind};
use crate::asymmetric::{AsymmetricKey, PrivateKey, PublicKey};
use crate::engine::{DigestEngine, SignerEngine};
use crate::error::{CryptoError, CryptoResult};
use crate::hash::{dyn_digest, HashAlgorithm, HashKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EcdsaEncoding {
    /// ASN.1 `SEQUENCE { r, s }`.
    Der,
    /// Fixed-width `r || s`.
    Plain,
}

enum Scheme {
    Pkcs1v15(Pkcs1v15Sign),
    Pss(HashAlgorithm),
    Dsa,
    Ecdsa(EcdsaEncoding),
    Ed25519,
    Ed25519ph(Vec<u8>),
    Sm2,
    Ed448(Vec<u8>),
    Ed448ph(Vec<u8>),
}

/// Distinguishing identifier used when none is configured.
const SM2_DEFAULT_ID: &str = "1234567812345678";
const SM2_FIELD_LEN: usize = 32;

const SM2_A: [u8; SM2_FIELD_LEN] = [
    0xff, 0xff, 0xff, 0xfe, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0x00, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfc,
];
const SM2_B: [u8; SM2_FIELD_LEN] = [
    0x28, 0xe9, 0xfa, 0x9e, 0x9d, 0x9f, 0x5e, 0x34, 0x4d, 0x5a, 0x9e, 0x4b, 0xcf, 0x65, 0x09, 0xa7, 0xf3, 0x97, 0x89,
    0xf5, 0x15, 0xab, 0x8f, 0x92, 0xdd, 0xbc, 0xbd, 0x41, 0x4d, 0x94, 0x0e, 0x93,
];
const SM2_GX: [u8; SM2_FIELD_LEN] = [
    0x32, 0xc4, 0xae, 0x2c, 0x1f, 0x19, 0x81, 0x19, 0x5f, 0x99, 0x04, 0x46, 0x6a, 0x39, 0xc9, 0x94, 0x8f, 0xe3, 0x0b,
    0xbf, 0xf2, 0x66, 0x0b, 0xe1, 0x71, 0x5a, 0x45, 0x89, 0x33, 0x4c, 0x74, 0xc7,
];
const SM2_GY: [u8; SM2_FIELD_LEN] = [
    0xbc, 0x37, 0x36, 0xa2, 0xf4, 0xf6, 0x77, 0x9c, 0x59, 0xbd, 0xce, 0xe3, 0x6b, 0x69, 0x21, 0x53, 0xd0, 0xa9, 0x87,
    0x7c, 0xc6, 0x2a, 0x47, 0x40, 0x02, 0xdf, 0x32, 0xe5, 0x21, 0x39, 0xf0, 0xa0,
];
const SM2_ORDER: [u8; SM2_FIELD_LEN] = [
    0xff, 0xff, 0xff, 0xfe, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x72, 0x03, 0xdf,
    0x6b, 0x21, 0xc6, 0x05, 0x2b, 0x53, 0xbb, 0xf4, 0x09, 0x39, 0xd5, 0x41, 0x23,
];

enum Message {
    Digest(Box<dyn DigestEngine>),
    /// Digest that restarts from the signer's identity hash `Z`.
    Identified {
        engine: Box<dyn DigestEngine>,
        identity: Vec<u8>,
    },
    Buffer(Vec<u8>),
    Prehash(Sha512),
    Shake(Shake256),
}

impl Message {
    fn update(&mut self, data: &[u8]) {
        match self {
            Message::Digest(engine) | Message::Identified { engine, .. } => engine.update(data),
            Message::Buffer(buffer) => buffer.extend_from_slice(data),
            Message::Prehash(state) => Digest::update(state, data),
            Message::Shake(state) => sha3::digest::Update::update(state, data),
        }
    }

    fn reset(&mut self) {
        match self {
            Message::Digest(engine) => engine.reset(),
            Message::Identified { engine, identity } => {
                engine.reset();
                engine.update(identity);
            }
            Message::Buffer(buffer) => buffer.clear(),
            Message::Prehash(state) => *state = Sha512::new(),
            Message::Shake(state) => *state = Shake256::default(),
        }
    }

    /// Digest output, the raw message or nothing for the prehashed
    /// Edwards schemes.
    fn take_bytes(&mut self) -> Vec<u8> {
        match self {
            Message::Digest(engine) => engine.finalize_reset(),
            Message::Identified { engine, identity } => {
                let hashed = engine.finalize_reset();
                engine.update(identity);
                hashed
            }
            Message::Buffer(buffer) => mem::take(buffer),
            Message::Prehash(_) | Message::Shake(_) => Vec::new(),
        }
    }

    fn take_shake(&mut self) -> Shake256 {
        match self {
            Message::Shake(state) => mem::take(state),
            _ => Shake256::default(),
        }
    }

    /// Prefixes the digest with `Z = H(ENTL || ID || a || b || xG || yG || xA || yA)`.
    fn identified(mut engine: Box<dyn DigestEngine>, key: &sm2::PublicKey) -> Self {
        let id = SM2_DEFAULT_ID.as_bytes();
        engine.reset();
        engine.update(&((id.len() * 8) as u16).to_be_bytes());
        engine.update(id);
        for part in [&SM2_A, &SM2_B, &SM2_GX, &SM2_GY] {
            engine.update(part);
        }
        engine.update(&key.to_encoded_point(false).as_bytes()[1..]);
        let identity = engine.finalize_reset();
        engine.update(&identity);
        Message::Identified { engine, identity }
    }

    fn take_prehash(&mut self) -> Sha512 {
        match self {
            Message::Prehash(state) => mem::replace(state, Sha512::new()),
            _ => Sha512::new(),
        }
    }
}

struct KeyedSigner {
    name: String,
    scheme: Scheme,
    message: Message,
    private: Option<PrivateKey>,
    public: PublicKey,
}

pub(super) fn signer_engine(algorithm: &SignatureAlgorithm, key: &AsymmetricKey) -> CryptoResult<Box<dyn SignerEngine>> {
    let name = algorithm.mechanism();
    let (scheme, message) = match algorithm.kind() {
        SignatureKind::Rsa => {
            let hash = required_hash(algorithm)?;
            let padding = pkcs1v15_padding(hash).ok_or_else(|| {
                CryptoError::unavailable(name, format!("no DigestInfo prefix for {}", hash.mechanism()))
            })?;
            (Scheme::Pkcs1v15(padding), Message::Digest(hash.generate_digest()?))
        }
        SignatureKind::RsaAndMgf1 => {
            let hash = required_hash(algorithm)?;
            if dyn_digest(hash).is_none() {
                return Err(CryptoError::unavailable(
                    name,
                    format!("MGF1 needs a fixed-output digest, got {}", hash.mechanism()),
                ));
            }
            (Scheme::Pss(hash.clone()), Message::Digest(hash.generate_digest()?))
        }
        SignatureKind::Dsa => (Scheme::Dsa, Message::Digest(required_hash(algorithm)?.generate_digest()?)),
        SignatureKind::Ecdsa => (
            Scheme::Ecdsa(EcdsaEncoding::Der),
            Message::Digest(required_hash(algorithm)?.generate_digest()?),
        ),
        SignatureKind::CvcEcdsa | SignatureKind::PlainEcdsa => (
            Scheme::Ecdsa(EcdsaEncoding::Plain),
            Message::Digest(required_hash(algorithm)?.generate_digest()?),
        ),
        SignatureKind::Ed25519 => (Scheme::Ed25519, Message::Buffer(Vec::new())),
        SignatureKind::Ed25519ph => (
            Scheme::Ed25519ph(algorithm.context().to_vec()),
            Message::Prehash(Sha512::new()),
        ),
        SignatureKind::Sm2 => (Scheme::Sm2, Message::Digest(required_hash(algorithm)?.generate_digest()?)),
        SignatureKind::Ed448 => (
            Scheme::Ed448(algorithm.context().to_vec()),
            Message::Buffer(Vec::new()),
        ),
        SignatureKind::Ed448ph => (
            Scheme::Ed448ph(algorithm.context().to_vec()),
            Message::Shake(Shake256::default()),
        ),
        other => {
            return Err(CryptoError::unavailable(
                name,
                format!("no signature backend for {other:?}"),
            ))
        }
    };

    let required = algorithm.kind().asymmetric_mechanism();
    if key.mechanism() != required {
        return Err(CryptoError::InvalidKey {
            reason: format!("{name} requires a {required} key, got {}", key.mechanism()),
        });
    }
    let (private, public) = match key {
        AsymmetricKey::Private(private) => (Some(private.clone()), private.public_key()),
        AsymmetricKey::Public(public) => (None, public.clone()),
    };
    let message = match (message, &public) {
        (Message::Digest(engine), PublicKey::Sm2(key)) => Message::identified(engine, key),
        (message, _) => message,
    };
    Ok(Box::new(KeyedSigner {
        name: name.to_string(),
        scheme,
        message,
        private,
        public,
    }))
}

fn required_hash(algorithm: &SignatureAlgorithm) -> CryptoResult<&HashAlgorithm> {
    algorithm
        .hash_algorithm()
        .ok_or_else(|| CryptoError::invalid_argument("hash_algorithm", format!("{} needs a hash", algorithm.mechanism())))
}

/// PKCS#1 v1.5 DigestInfo padding for hashes with an assigned identifier.
fn pkcs1v15_padding(hash: &HashAlgorithm) -> Option<Pkcs1v15Sign> {
    let padding = match hash.kind() {
        HashKind::Md2 => Pkcs1v15Sign::new::<md2::Md2>(),
        HashKind::Md5 => Pkcs1v15Sign::new::<md5::Md5>(),
        HashKind::Ripemd128 => Pkcs1v15Sign::new::<ripemd::Ripemd128>(),
        HashKind::Ripemd160 => Pkcs1v15Sign::new::<ripemd::Ripemd160>(),
        HashKind::Ripemd256 => Pkcs1v15Sign::new::<ripemd::Ripemd256>(),
        HashKind::Sha1 => Pkcs1v15Sign::new::<sha1::Sha1>(),
        HashKind::Sha224 => Pkcs1v15Sign::new::<sha2::Sha224>(),
        HashKind::Sha256 => Pkcs1v15Sign::new::<sha2::Sha256>(),
        HashKind::Sha384 => Pkcs1v15Sign::new::<sha2::Sha384>(),
        HashKind::Sha512 => Pkcs1v15Sign::new::<sha2::Sha512>(),
        HashKind::Sha3 { size: 224 } => Pkcs1v15Sign::new::<sha3::Sha3_224>(),
        HashKind::Sha3 { size: 256 } => Pkcs1v15Sign::new::<sha3::Sha3_256>(),
        HashKind::Sha3 { size: 384 } => Pkcs1v15Sign::new::<sha3::Sha3_384>(),
        HashKind::Sha3 { size: 512 } => Pkcs1v15Sign::new::<sha3::Sha3_512>(),
        _ => return None,
    };
    Some(padding)
}

fn pss_padding(hash: &HashAlgorithm) -> CryptoResult<Pss> {
    let digest = dyn_digest(hash)
        .ok_or_else(|| CryptoError::unavailable(hash.mechanism(), "no fixed-output digest for MGF1"))?;
    Ok(Pss {
        blinded: false,
        digest,
        salt_len: hash.output_len(),
    })
}

fn signing_failed(error: impl std::fmt::Display) -> CryptoError {
    CryptoError::Signing {
        reason: error.to_string(),
    }
}

/// Left-pads `bytes` with zeros up to `len`, keeping the integer value.
fn left_padded(bytes: &[u8], len: usize) -> Vec<u8> {
    let mut padded = vec![0u8; len.saturating_sub(bytes.len())];
    padded.extend_from_slice(bytes);
    padded
}

/// The SM2 `e` value as a field-width scalar encoding.
fn sm2_prehash(hashed: &[u8]) -> Vec<u8> {
    if hashed.len() <= SM2_FIELD_LEN {
        return left_padded(hashed, SM2_FIELD_LEN);
    }
    let reduced = BigUint::from_bytes_be(hashed) % BigUint::from_bytes_be(&SM2_ORDER);
    left_padded(&reduced.to_bytes_be(), SM2_FIELD_LEN)
}

fn sm2_sign(key: &sm2::SecretKey, hashed: &[u8]) -> CryptoResult<Vec<u8>> {
    let signer = sm2::dsa::SigningKey::new(SM2_DEFAULT_ID, key).map_err(signing_failed)?;
    let signature: sm2::dsa::Signature =
        PrehashSigner::sign_prehash(&signer, &sm2_prehash(hashed)).map_err(signing_failed)?;
    let encoded = ecdsa::Signature::<sm2::Sm2>::from_scalars(signature.r_bytes(), signature.s_bytes())
        .map_err(signing_failed)?;
    Ok(encoded.to_der().as_bytes().to_vec())
}

fn sm2_verify(key: &sm2::PublicKey, hashed: &[u8], signature: &[u8]) -> bool {
    let Ok(verifier) = sm2::dsa::VerifyingKey::new(SM2_DEFAULT_ID, *key) else {
        return false;
    };
    let Ok(parsed) = ecdsa::Signature::<sm2::Sm2>::from_der(signature) else {
        return false;
    };
    let (r, s) = parsed.split_bytes();
    match sm2::dsa::Signature::from_scalars(r, s) {
        Ok(parsed) => PrehashVerifier::verify_prehash(&verifier, &sm2_prehash(hashed), &parsed).is_ok(),
        Err(_) => false,
    }
}

macro_rules! ecdsa_sign {
    ($curve:ident, $key:expr, $prehash:expr, $encoding:expr) => {{
        let prehash = left_padded($prehash, $curve::FieldBytes::default().len());
        let signature: $curve::ecdsa::Signature =
            PrehashSigner::sign_prehash($key, &prehash).map_err(signing_failed)?;
        match $encoding {
            EcdsaEncoding::Der => signature.to_der().as_bytes().to_vec(),
            EcdsaEncoding::Plain => signature.to_bytes().to_vec(),
        }
    }};
}

macro_rules! ecdsa_verify {
    ($curve:ident, $key:expr, $prehash:expr, $encoding:expr, $signature:expr) => {{
        let prehash = left_padded($prehash, $curve::FieldBytes::default().len());
        let parsed = match $encoding {
            EcdsaEncoding::Der => $curve::ecdsa::Signature::from_der($signature),
            EcdsaEncoding::Plain => $curve::ecdsa::Signature::from_slice($signature),
        };
        match parsed {
            Ok(signature) => PrehashVerifier::verify_prehash($key, &prehash, &signature).is_ok(),
            Err(_) => false,
        }
    }};
}

impl KeyedSigner {
    fn sign(&mut self) -> CryptoResult<Vec<u8>> {
        let private = self.private.as_ref().ok_or_else(|| CryptoError::Signing {
            reason: format!("{} was constructed from a public key", self.name),
        })?;
        let signature = match (&self.scheme, private) {
            (Scheme::Pkcs1v15(padding), PrivateKey::Rsa(key)) => {
                let hashed = self.message.take_bytes();
                key.sign(padding.clone(), &hashed).map_err(signing_failed)?
            }
            (Scheme::Pss(hash), PrivateKey::Rsa(key)) => {
                let hashed = self.message.take_bytes();
                key.sign_with_rng(&mut rand::thread_rng(), pss_padding(hash)?, &hashed)
                    .map_err(signing_failed)?
            }
            (Scheme::Dsa, PrivateKey::Dsa(key)) => {
                let hashed = self.message.take_bytes();
                let signature: dsa::Signature = PrehashSigner::sign_prehash(key, &hashed).map_err(signing_failed)?;
                Box::<[u8]>::from(signature).into_vec()
            }
            (Scheme::Ecdsa(encoding), key) => {
                let hashed = self.message.take_bytes();
                match key {
                    PrivateKey::EcP256(key) => ecdsa_sign!(p256, key, &hashed, encoding),
                    PrivateKey::EcP384(key) => ecdsa_sign!(p384, key, &hashed, encoding),
                    PrivateKey::EcP521(key) => ecdsa_sign!(p521, key, &hashed, encoding),
                    PrivateKey::EcK256(key) => ecdsa_sign!(k256, key, &hashed, encoding),
                    _ => return Err(self.wrong_key()),
                }
            }
            (Scheme::Ed25519, PrivateKey::Ed25519(key)) => {
                let message = self.message.take_bytes();
                key.sign(&message).to_bytes().to_vec()
            }
            (Scheme::Ed25519ph(context), PrivateKey::Ed25519(key)) => {
                let prehash = self.message.take_prehash();
                key.sign_prehashed(prehash, Some(context.as_slice()))
                    .map_err(signing_failed)?
                    .to_bytes()
                    .to_vec()
            }
            (Scheme::Sm2, PrivateKey::Sm2(key)) => sm2_sign(key, &self.message.take_bytes())?,
            (Scheme::Ed448(context), PrivateKey::Ed448(key)) => {
                let message = self.message.take_bytes();
                key.sign_ctx(context, &message).map_err(signing_failed)?.to_bytes().to_vec()
            }
            (Scheme::Ed448ph(context), PrivateKey::Ed448(key)) => {
                let prehash = PreHasherXof::new(self.message.take_shake());
                key.sign_prehashed(Some(context.as_slice()), prehash)
                    .map_err(signing_failed)?
                    .to_bytes()
                    .to_vec()
            }
            _ => return Err(self.wrong_key()),
        };
        tracing::trace!(mechanism = %self.name, len = signature.len(), "signature generated");
        Ok(signature)
    }

    fn verify(&mut self, signature: &[u8]) -> CryptoResult<bool> {
        let valid = match (&self.scheme, &self.public) {
            (Scheme::Pkcs1v15(padding), PublicKey::Rsa(key)) => {
                let hashed = self.message.take_bytes();
                key.verify(padding.clone(), &hashed, signature).is_ok()
            }
            (Scheme::Pss(hash), PublicKey::Rsa(key)) => {
                let hashed = self.message.take_bytes();
                key.verify(pss_padding(hash)?, &hashed, signature).is_ok()
            }
            (Scheme::Dsa, PublicKey::Dsa(key)) => {
                let hashed = self.message.take_bytes();
                match dsa::Signature::try_from(signature) {
                    Ok(parsed) => PrehashVerifier::verify_prehash(key, &hashed, &parsed).is_ok(),
                    Err(_) => false,
                }
            }
            (Scheme::Ecdsa(encoding), key) => {
                let hashed = self.message.take_bytes();
                match key {
                    PublicKey::EcP256(key) => ecdsa_verify!(p256, key, &hashed, encoding, signature),
                    PublicKey::EcP384(key) => ecdsa_verify!(p384, key, &hashed, encoding, signature),
                    PublicKey::EcP521(key) => ecdsa_verify!(p521, key, &hashed, encoding, signature),
                    PublicKey::EcK256(key) => ecdsa_verify!(k256, key, &hashed, encoding, signature),
                    _ => return Err(self.wrong_key()),
                }
            }
            (Scheme::Ed25519, PublicKey::Ed25519(key)) => {
                let message = self.message.take_bytes();
                match ed25519_dalek::Signature::from_slice(signature) {
                    Ok(parsed) => key.verify(&message, &parsed).is_ok(),
                    Err(_) => false,
                }
            }
            (Scheme::Ed25519ph(context), PublicKey::Ed25519(key)) => {
                let prehash = self.message.take_prehash();
                match ed25519_dalek::Signature::from_slice(signature) {
                    Ok(parsed) => key.verify_prehashed(prehash, Some(context.as_slice()), &parsed).is_ok(),
                    Err(_) => false,
                }
            }
            (Scheme::Sm2, PublicKey::Sm2(key)) => sm2_verify(key, &self.message.take_bytes(), signature),
            (Scheme::Ed448(context), PublicKey::Ed448(key)) => {
                let message = self.message.take_bytes();
                match ed448_goldilocks_plus::Signature::try_from(signature) {
                    Ok(parsed) => key.verify_ctx(&parsed, context, &message).is_ok(),
                    Err(_) => false,
                }
            }
            (Scheme::Ed448ph(context), PublicKey::Ed448(key)) => {
                let prehash = PreHasherXof::new(self.message.take_shake());
                match ed448_goldilocks_plus::Signature::try_from(signature) {
                    Ok(parsed) => key.verify_prehashed(&parsed, Some(context.as_slice()), prehash).is_ok(),
                    Err(_) => false,
                }
            }
            _ => return Err(self.wrong_key()),
        };
        tracing::trace!(mechanism = %self.name, valid, "signature checked");
        Ok(valid)
    }

    fn wrong_key(&self) -> CryptoError {
        CryptoError::InvalidKey {
            reason: format!("{} cannot use a {} key", self.name, self.public.mechanism()),
        }
    }
}

impl SignerEngine for KeyedSigner {
    fn algorithm_name(&self) -> &str {
        &self.name
    }

    fn is_signing(&self) -> bool {
        self.private.is_some()
    }

    fn update(&mut self, data: &[u8]) {
        self.message.update(data);
    }

    fn generate_signature(&mut self) -> CryptoResult<Vec<u8>> {
        let result = self.sign();
        self.message.reset();
        result
    }

    fn verify_signature(&mut self, signature: &[u8]) -> CryptoResult<bool> {
        let result = self.verify(signature);
        self.message.reset();
        result
    }

    fn reset(&mut self) {
        self.message.reset();
    }
}
