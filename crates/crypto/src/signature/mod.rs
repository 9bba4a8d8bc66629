//! Signature descriptors.
//!
//! A [`SignatureAlgorithm`] pairs a signature scheme with the asymmetric
//! family whose keys it uses and, for hash-then-sign schemes, the hash that
//! digests the message. The X.509 algorithm identifier is looked up once at
//! construction.

mod oid;
pub mod registry;
mod signer;

use std::fmt;

use const_oid::ObjectIdentifier;
use rand::{CryptoRng, RngCore};

use crate::asymmetric::{AsymmetricAlgorithm, AsymmetricKey, AsymmetricKeyPair};
use crate::engine::SignerEngine;
use crate::error::{CryptoError, CryptoResult};
use crate::hash::HashAlgorithm;

pub use oid::mechanism_to_oid;

/// Signature scheme family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureKind {
    /// ECDSA with plain `r || s` encoding, BSI TR-03111 CVC identifiers.
    CvcEcdsa,
    Dsa,
    /// ECDSA with DER-encoded `(r, s)`.
    Ecdsa,
    EcGost3410,
    /// EC Nyberg-Rueppel.
    Ecnr,
    Gost3410,
    /// ECDSA with plain `r || s` encoding, BSI plain identifiers.
    PlainEcdsa,
    /// RSASSA-PKCS1-v1_5.
    Rsa,
    RsaAndIso9796_2,
    /// RSASSA-PSS with MGF1 over the message hash.
    RsaAndMgf1,
    RsaAndX931,
    Sm2,
    Ed25519,
    Ed25519ctx,
    Ed25519ph,
    Ed448,
    Ed448ph,
}

impl SignatureKind {
    /// Mechanism of the asymmetric family this scheme signs with.
    pub fn asymmetric_mechanism(self) -> &'static str {
        match self {
            SignatureKind::CvcEcdsa | SignatureKind::Ecdsa | SignatureKind::Ecnr | SignatureKind::PlainEcdsa => {
                "ECDSA"
            }
            SignatureKind::Dsa => "DSA",
            SignatureKind::EcGost3410 => "ECGOST3410",
            SignatureKind::Gost3410 => "GOST3410",
            SignatureKind::Rsa | SignatureKind::RsaAndIso9796_2 | SignatureKind::RsaAndMgf1 | SignatureKind::RsaAndX931 => {
                "RSA"
            }
            SignatureKind::Sm2 => "SM2",
            SignatureKind::Ed25519 | SignatureKind::Ed25519ctx | SignatureKind::Ed25519ph => "Ed25519",
            SignatureKind::Ed448 | SignatureKind::Ed448ph => "Ed448",
        }
    }

    pub fn default_asymmetric(self) -> AsymmetricAlgorithm {
        match self.asymmetric_mechanism() {
            "DSA" => AsymmetricAlgorithm::dsa(),
            "ECGOST3410" => AsymmetricAlgorithm::ecgost3410(),
            "GOST3410" => AsymmetricAlgorithm::gost3410(),
            "RSA" => AsymmetricAlgorithm::rsa(),
            "SM2" => AsymmetricAlgorithm::sm2(),
            "Ed25519" => AsymmetricAlgorithm::ed25519(),
            "Ed448" => AsymmetricAlgorithm::ed448(),
            _ => AsymmetricAlgorithm::ecdsa(),
        }
    }

    /// Whether the scheme digests the message with a separate hash
    /// descriptor.
    pub fn is_hashed(self) -> bool {
        !self.is_edwards()
    }

    pub fn is_edwards(self) -> bool {
        matches!(
            self,
            SignatureKind::Ed25519
                | SignatureKind::Ed25519ctx
                | SignatureKind::Ed25519ph
                | SignatureKind::Ed448
                | SignatureKind::Ed448ph
        )
    }

    /// Text following `with` in a hashed mechanism name.
    fn suffix(self) -> &'static str {
        match self {
            SignatureKind::CvcEcdsa => "CVC-ECDSA",
            SignatureKind::Dsa => "DSA",
            SignatureKind::Ecdsa => "ECDSA",
            SignatureKind::EcGost3410 => "ECGOST3410",
            SignatureKind::Ecnr => "ECNR",
            SignatureKind::Gost3410 => "GOST3410",
            SignatureKind::PlainEcdsa => "PLAIN-ECDSA",
            SignatureKind::Rsa => "RSA",
            SignatureKind::RsaAndIso9796_2 => "ISO9796-2",
            SignatureKind::RsaAndMgf1 => "RSAandMGF1",
            SignatureKind::RsaAndX931 => "RSA/X9.31",
            SignatureKind::Sm2 => "SM2",
            SignatureKind::Ed25519 => "Ed25519",
            SignatureKind::Ed25519ctx => "Ed25519ctx",
            SignatureKind::Ed25519ph => "Ed25519ph",
            SignatureKind::Ed448 => "Ed448",
            SignatureKind::Ed448ph => "Ed448ph",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignatureAlgorithm {
    kind: SignatureKind,
    mechanism: String,
    asymmetric: AsymmetricAlgorithm,
    hash: Option<HashAlgorithm>,
    context: Vec<u8>,
    oid: Option<ObjectIdentifier>,
}

impl SignatureAlgorithm {
    /// A hash-then-sign scheme over the family's default asymmetric
    /// parameters, e.g. `SHA256withECDSA` on `SecP256r1`.
    pub fn with_hash(kind: SignatureKind, hash: HashAlgorithm) -> CryptoResult<Self> {
        if kind.is_edwards() {
            return Err(CryptoError::unsupported(
                kind.suffix(),
                "hash_algorithm",
                hash.mechanism(),
                "Edwards-curve signatures hash internally",
            ));
        }
        let mechanism = format!("{}with{}", hash.mechanism(), kind.suffix());
        Ok(Self::build(kind, mechanism, kind.default_asymmetric(), Some(hash), Vec::new()))
    }

    pub fn ed25519() -> Self {
        Self::edwards(SignatureKind::Ed25519, &[])
    }

    pub fn ed25519ctx(context: &[u8]) -> Self {
        Self::edwards(SignatureKind::Ed25519ctx, context)
    }

    pub fn ed25519ph(context: &[u8]) -> Self {
        Self::edwards(SignatureKind::Ed25519ph, context)
    }

    pub fn ed448(context: &[u8]) -> Self {
        Self::edwards(SignatureKind::Ed448, context)
    }

    pub fn ed448ph(context: &[u8]) -> Self {
        Self::edwards(SignatureKind::Ed448ph, context)
    }

    fn edwards(kind: SignatureKind, context: &[u8]) -> Self {
        let mechanism = kind.suffix().to_string();
        Self::build(kind, mechanism, kind.default_asymmetric(), None, context.to_vec())
    }

    fn build(
        kind: SignatureKind,
        mechanism: String,
        asymmetric: AsymmetricAlgorithm,
        hash: Option<HashAlgorithm>,
        context: Vec<u8>,
    ) -> Self {
        let oid = mechanism_to_oid(&mechanism);
        Self {
            kind,
            mechanism,
            asymmetric,
            hash,
            context,
            oid,
        }
    }

    /// Swap the referenced asymmetric descriptor, e.g. to sign ECDSA on
    /// another curve. The family must match the scheme.
    pub fn with_asymmetric(mut self, asymmetric: AsymmetricAlgorithm) -> CryptoResult<Self> {
        let required = self.kind.asymmetric_mechanism();
        if asymmetric.mechanism() != required {
            return Err(CryptoError::unsupported(
                self.mechanism,
                "asymmetric_algorithm",
                asymmetric.mechanism(),
                format!("requires {required} asymmetric algorithm"),
            ));
        }
        self.asymmetric = asymmetric;
        Ok(self)
    }

    pub fn kind(&self) -> SignatureKind {
        self.kind
    }

    pub fn mechanism(&self) -> &str {
        &self.mechanism
    }

    pub fn asymmetric_algorithm(&self) -> &AsymmetricAlgorithm {
        &self.asymmetric
    }

    /// `None` for Edwards-curve schemes.
    pub fn hash_algorithm(&self) -> Option<&HashAlgorithm> {
        self.hash.as_ref()
    }

    /// Context string of the Edwards-curve schemes; empty otherwise.
    pub fn context(&self) -> &[u8] {
        &self.context
    }

    /// X.509 signature algorithm identifier, when one is assigned.
    pub fn oid(&self) -> Option<ObjectIdentifier> {
        self.oid
    }

    pub fn generate_key_pair(&self) -> CryptoResult<AsymmetricKeyPair> {
        self.asymmetric.generate_key_pair()
    }

    pub fn generate_key_pair_with<R: RngCore + CryptoRng>(&self, rng: &mut R) -> CryptoResult<AsymmetricKeyPair> {
        self.asymmetric.generate_key_pair_with(rng)
    }

    /// A reusable signer. A private key signs (and can also verify); a
    /// public key only verifies.
    pub fn generate_signer(&self, key: &AsymmetricKey) -> CryptoResult<Box<dyn SignerEngine>> {
        let engine = signer::signer_engine(self, key)?;
        tracing::debug!(mechanism = %self.mechanism, signing = engine.is_signing(), "signer constructed");
        Ok(engine)
    }

    /// One-shot signature over `data`.
    pub fn sign(&self, key: &AsymmetricKey, data: &[u8]) -> CryptoResult<Vec<u8>> {
        let mut signer = self.generate_signer(key)?;
        signer.update(data);
        signer.generate_signature()
    }

    /// One-shot verification of `signature` over `data`.
    pub fn verify(&self, key: &AsymmetricKey, data: &[u8], signature: &[u8]) -> CryptoResult<bool> {
        let mut signer = self.generate_signer(key)?;
        signer.update(data);
        signer.verify_signature(signature)
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.mechanism)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asymmetric::EcdsaCurve;

    #[test]
    fn test_mechanism_formats() {
        let cases = [
            (SignatureKind::CvcEcdsa, "SHA256withCVC-ECDSA"),
            (SignatureKind::Dsa, "SHA256withDSA"),
            (SignatureKind::Ecdsa, "SHA256withECDSA"),
            (SignatureKind::Ecnr, "SHA256withECNR"),
            (SignatureKind::PlainEcdsa, "SHA256withPLAIN-ECDSA"),
            (SignatureKind::Rsa, "SHA256withRSA"),
            (SignatureKind::RsaAndIso9796_2, "SHA256withISO9796-2"),
            (SignatureKind::RsaAndMgf1, "SHA256withRSAandMGF1"),
            (SignatureKind::RsaAndX931, "SHA256withRSA/X9.31"),
            (SignatureKind::Sm2, "SHA256withSM2"),
        ];
        for (kind, expected) in cases {
            let algorithm = SignatureAlgorithm::with_hash(kind, HashAlgorithm::sha256()).unwrap();
            assert_eq!(algorithm.mechanism(), expected);
            assert_eq!(algorithm.asymmetric_algorithm().mechanism(), kind.asymmetric_mechanism());
        }
        assert_eq!(SignatureAlgorithm::ed25519ph(b"").mechanism(), "Ed25519ph");
        assert_eq!(SignatureAlgorithm::ed448(b"ctx").context(), b"ctx");
        assert_eq!(SignatureAlgorithm::ed448ph(b"").asymmetric_algorithm().mechanism(), "Ed448");
    }

    #[test]
    fn test_edwards_rejects_hash() {
        assert!(SignatureAlgorithm::with_hash(SignatureKind::Ed25519, HashAlgorithm::sha512()).is_err());
        assert!(SignatureAlgorithm::ed25519().hash_algorithm().is_none());
    }

    #[test]
    fn test_asymmetric_reference_is_checked() {
        let ecdsa = SignatureAlgorithm::with_hash(SignatureKind::Ecdsa, HashAlgorithm::sha256()).unwrap();
        let on_p384 = ecdsa
            .clone()
            .with_asymmetric(AsymmetricAlgorithm::ecdsa_with(EcdsaCurve::SecP384r1))
            .unwrap();
        assert_eq!(on_p384.mechanism(), "SHA256withECDSA");
        match ecdsa.with_asymmetric(AsymmetricAlgorithm::rsa()) {
            Err(CryptoError::UnsupportedConfiguration { reason, .. }) => {
                assert_eq!(reason, "requires ECDSA asymmetric algorithm")
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(SignatureAlgorithm::ed25519ph(b"")
            .with_asymmetric(AsymmetricAlgorithm::ed448())
            .is_err());
    }

    #[test]
    fn test_oid_attached_at_construction() {
        let ecdsa = SignatureAlgorithm::with_hash(SignatureKind::Ecdsa, HashAlgorithm::sha256()).unwrap();
        assert_eq!(ecdsa.oid().unwrap().to_string(), "1.2.840.10045.4.3.2");
        let pss = SignatureAlgorithm::with_hash(SignatureKind::RsaAndMgf1, HashAlgorithm::sha1()).unwrap();
        assert_eq!(pss.oid().unwrap().to_string(), "1.2.840.113549.1.1.10");
        let pss256 = SignatureAlgorithm::with_hash(SignatureKind::RsaAndMgf1, HashAlgorithm::sha256()).unwrap();
        assert_eq!(pss256.oid(), None);
        assert_eq!(SignatureAlgorithm::ed25519().oid(), None);
    }
}
