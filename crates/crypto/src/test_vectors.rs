//! Known-answer vectors for digests and Edwards-curve signatures.
//!
//! Digest vectors are the `"abc"` examples from FIPS 180-4, FIPS 202,
//! RFC 1319, RFC 1321 and the RIPEMD reference page. Signature vectors are
//! TEST 1 and TEST abc from RFC 8032.

use crate::asymmetric::{AsymmetricKey, PrivateKey};
use crate::hash::registry::try_get_algorithm;
use crate::signature::SignatureAlgorithm;

/// A digest of a fixed message.
#[derive(Debug, Clone)]
pub struct DigestTestVector {
    pub mechanism: &'static str,
    pub message: &'static [u8],
    pub expected_hex: &'static str,
}

/// An Edwards-curve signature over a fixed key and message.
#[derive(Debug, Clone)]
pub struct SignatureTestVector {
    pub name: &'static str,
    pub mechanism: &'static str,
    pub secret_key_hex: &'static str,
    pub public_key_hex: &'static str,
    pub message_hex: &'static str,
    pub expected_signature_hex: &'static str,
}

/// RFC 8032 TEST 1 secret key.
///
/// Publicly known. Only for reproducible vectors.
pub const TEST_VECTOR_PRIVATE_KEY: [u8; 32] = [
    0x9d, 0x61, 0xb1, 0x9d, 0xef, 0xfd, 0x5a, 0x60, 0xba, 0x84, 0x4a, 0xf4, 0x92, 0xec, 0x2c, 0xc4,
    0x44, 0x49, 0xc5, 0x69, 0x7b, 0x32, 0x69, 0x19, 0x70, 0x3b, 0xac, 0x03, 0x1c, 0xae, 0x7f, 0x60,
];

pub fn digest_vectors() -> Vec<DigestTestVector> {
    vec![
        DigestTestVector {
            mechanism: "MD2",
            message: b"abc",
            expected_hex: "da853b0d3f88d99b30283a69e6ded6bb",
        },
        DigestTestVector {
            mechanism: "MD5",
            message: b"abc",
            expected_hex: "900150983cd24fb0d6963f7d28e17f72",
        },
        DigestTestVector {
            mechanism: "RIPEMD160",
            message: b"abc",
            expected_hex: "8eb208f7e05d987a9b044a8e98c6b087f15a0bfc",
        },
        DigestTestVector {
            mechanism: "SHA-1",
            message: b"abc",
            expected_hex: "a9993e364706816aba3e25717850c26c9cd0d89d",
        },
        DigestTestVector {
            mechanism: "SHA-256",
            message: b"abc",
            expected_hex: "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
        },
        DigestTestVector {
            mechanism: "SHA512",
            message: b"abc",
            expected_hex: "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
                           2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f",
        },
        DigestTestVector {
            mechanism: "SHA3-256",
            message: b"abc",
            expected_hex: "3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532",
        },
    ]
}

pub fn signature_vectors() -> Vec<SignatureTestVector> {
    vec![
        SignatureTestVector {
            name: "rfc8032_ed25519_test1",
            mechanism: "Ed25519",
            secret_key_hex: "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60",
            public_key_hex: "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a",
            message_hex: "",
            expected_signature_hex: "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e06522490155\
                                     5fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b",
        },
        SignatureTestVector {
            name: "rfc8032_ed25519ph_abc",
            mechanism: "Ed25519ph",
            secret_key_hex: "833fe62409237b9d62ec77587520911e9a759cec1d19755b7da901b96dca3d42",
            public_key_hex: "ec172b93ad5e563bf4932c70e1245034c35467ef2efd4d64ebf819683467e2bf",
            message_hex: "616263",
            expected_signature_hex: "98a70222f0b8121aa9d30f813d683f809e462b469c7ff87639499bb94e6dae41\
                                     31f85042463c2a355a2003d062adf5aaa10b8c61e636062aaad11c2a26083406",
        },
    ]
}

fn ed25519_key(secret_hex: &str) -> AsymmetricKey {
    let secret: [u8; 32] = hex::decode(secret_hex).unwrap().try_into().unwrap();
    AsymmetricKey::Private(PrivateKey::Ed25519(ed25519_dalek::SigningKey::from_bytes(&secret)))
}

fn signature_algorithm(mechanism: &str) -> SignatureAlgorithm {
    crate::signature::registry::try_get_algorithm(mechanism).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::SignatureKind;
    use crate::hash::HashAlgorithm;

    #[test]
    fn test_digest_vectors() {
        for vector in digest_vectors() {
            let algorithm = try_get_algorithm(vector.mechanism).unwrap();
            let digest = algorithm.compute_hash(vector.message).unwrap();
            assert_eq!(hex::encode(digest), vector.expected_hex, "{}", vector.mechanism);
        }
    }

    #[test]
    fn test_signature_vectors() {
        for vector in signature_vectors() {
            let algorithm = signature_algorithm(vector.mechanism);
            let key = ed25519_key(vector.secret_key_hex);
            let public = match &key {
                AsymmetricKey::Private(private) => private.public_key(),
                AsymmetricKey::Public(public) => public.clone(),
            };
            assert_eq!(hex::encode(public.to_bytes()), vector.public_key_hex, "{}", vector.name);

            let message = hex::decode(vector.message_hex).unwrap();
            let signature = algorithm.sign(&key, &message).unwrap();
            assert_eq!(hex::encode(&signature), vector.expected_signature_hex, "{}", vector.name);
            assert!(algorithm.verify(&AsymmetricKey::Public(public), &message, &signature).unwrap());
        }
    }

    #[test]
    fn test_fixed_key_matches_first_vector() {
        assert_eq!(hex::encode(TEST_VECTOR_PRIVATE_KEY), signature_vectors()[0].secret_key_hex);
    }

    #[test]
    fn test_deterministic_ecdsa() {
        let algorithm = SignatureAlgorithm::with_hash(SignatureKind::Ecdsa, HashAlgorithm::sha256()).unwrap();
        let key = AsymmetricKey::Private(PrivateKey::EcP256(
            p256::ecdsa::SigningKey::from_slice(&TEST_VECTOR_PRIVATE_KEY).unwrap(),
        ));
        let first = algorithm.sign(&key, b"sample").unwrap();
        let second = algorithm.sign(&key, b"sample").unwrap();
        assert_eq!(first, second);
    }
}
