//! Algorithm descriptors and operation factories for AlgoForge.
//!
//! Every family follows the same shape: a registry resolves a loosely spelled
//! mechanism name into an immutable, validated descriptor, and the descriptor
//! builds single-threaded operation instances on demand.
//!
//! # Families
//!
//! - **Hashes**: MD, RIPEMD, SHA-1/2/3, SHAKE, CSHAKE, BLAKE2 and friends
//! - **MACs**: HMAC over any hash, CMAC and raw CBC/CFB MACs over block ciphers
//! - **Symmetric**: block ciphers with mode and padding tables, stream ciphers
//! - **Asymmetric**: key generation for RSA, DSA, ECDSA and Ed25519, RSA encryption
//! - **Signatures**: hash-then-sign schemes, Edwards-curve schemes and their OIDs
//!
//! Mechanisms whose names and size tables are known but which have no linked
//! backend still resolve and validate; building an operation reports
//! [`CryptoError::Unavailable`].
//!
//! # Example
//!
//! ```
//! use algoforge_crypto::registry;
//!
//! let ecdsa = registry::try_get_signature_algorithm("SHA256WITHECDSA").unwrap();
//! assert_eq!(ecdsa.asymmetric_algorithm().mechanism(), "ECDSA");
//! assert_eq!(ecdsa.oid().unwrap().to_string(), "1.2.840.10045.4.3.2");
//! ```

pub mod asymmetric;
pub mod engine;
pub mod error;
pub mod hash;
pub mod mac;
pub mod parameters;
pub mod registry;
pub mod rng;
pub mod signature;
pub mod symmetric;

#[cfg(test)]
mod test_vectors;

pub use asymmetric::{
    AsymmetricAlgorithm, AsymmetricEncryptionAlgorithm, AsymmetricKey, AsymmetricKeyPair,
    AsymmetricPaddingMode, EcGost3410Curve, EcdsaCurve, PrivateKey, PublicKey,
};
pub use engine::{AsymmetricBlockCipher, BufferedCipher, DigestEngine, MacEngine, SignerEngine};
pub use error::{CryptoError, CryptoResult};
pub use hash::{HashAlgorithm, HashKind};
pub use mac::{CmacAlgorithm, HmacAlgorithm, MacAlgorithm};
pub use parameters::{AeadParameters, CipherParameters, KeyParameter};
pub use rng::SecureRandom;
pub use crate::signature::{mechanism_to_oid, SignatureAlgorithm, SignatureKind};
pub use symmetric::{
    BlockAlgorithm, BlockKind, MacCipherMode, MacPaddingMode, StreamAlgorithm, StreamKind,
    SymmetricCipherMode, SymmetricPaddingMode,
};
