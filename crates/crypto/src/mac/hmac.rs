//! HMAC over a hash descriptor.

use std::fmt;

use subtle::ConstantTimeEq;

use crate::engine::MacEngine;
use crate::error::CryptoResult;
use crate::hash::{self, HashAlgorithm};
use crate::parameters::{slice_range, KeyParameter};

/// HMAC keyed with an arbitrary-length key; the tag is the full hash output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HmacAlgorithm {
    hash: HashAlgorithm,
    mechanism: String,
}

impl HmacAlgorithm {
    pub fn new(hash: HashAlgorithm) -> Self {
        let mechanism = format!("{}/HMAC", hash.mechanism());
        Self { hash, mechanism }
    }

    pub fn mechanism(&self) -> &str {
        &self.mechanism
    }

    pub fn hash_algorithm(&self) -> &HashAlgorithm {
        &self.hash
    }

    /// Tag size in bits.
    pub fn hash_size(&self) -> u32 {
        self.hash.hash_size()
    }

    pub fn generate_parameters(&self, key: &[u8]) -> KeyParameter {
        KeyParameter::new(key)
    }

    pub fn generate_parameters_range(&self, key: &[u8], offset: usize, len: usize) -> CryptoResult<KeyParameter> {
        KeyParameter::from_range(key, offset, len)
    }

    /// A reusable HMAC engine keyed with `key`. Any key length is accepted,
    /// including an empty key.
    pub fn generate_mac(&self, key: &KeyParameter) -> CryptoResult<Box<dyn MacEngine>> {
        let engine = hash::hmac_engine(&self.hash, &self.mechanism, key.as_bytes())?;
        tracing::debug!(mechanism = %self.mechanism, "mac constructed");
        Ok(engine)
    }

    pub fn compute_mac(&self, key: &KeyParameter, data: &[u8]) -> CryptoResult<Vec<u8>> {
        let mut engine = self.generate_mac(key)?;
        engine.update(data);
        Ok(engine.finalize_reset())
    }

    pub fn compute_mac_range(
        &self,
        key: &KeyParameter,
        data: &[u8],
        offset: usize,
        len: usize,
    ) -> CryptoResult<Vec<u8>> {
        self.compute_mac(key, slice_range("data", data, offset, len)?)
    }

    /// Recompute the tag over `data` and compare it with `tag` in constant
    /// time.
    pub fn verify_mac(&self, key: &KeyParameter, data: &[u8], tag: &[u8]) -> CryptoResult<bool> {
        let expected = self.compute_mac(key, data)?;
        Ok(bool::from(expected.ct_eq(tag)))
    }
}

impl fmt::Display for HmacAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.mechanism)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CryptoError;

    #[test]
    fn test_rfc4231_case_2() {
        let hmac = HmacAlgorithm::new(HashAlgorithm::sha256());
        assert_eq!(hmac.mechanism(), "SHA256/HMAC");
        assert_eq!(hmac.hash_size(), 256);

        let key = hmac.generate_parameters(b"Jefe");
        let tag = hmac.compute_mac(&key, b"what do ya want for nothing?").unwrap();
        assert_eq!(
            hex::encode(tag),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_engine_is_reusable() {
        let hmac = HmacAlgorithm::new(HashAlgorithm::sha1());
        let key = hmac.generate_parameters(&[0x0b; 20]);
        let mut engine = hmac.generate_mac(&key).unwrap();
        engine.update(b"Hi There");
        let first = engine.finalize_reset();
        engine.update(b"Hi ");
        engine.update(b"There");
        assert_eq!(engine.finalize_reset(), first);
        assert_eq!(first.len(), 20);
    }

    #[test]
    fn test_verify_mac() {
        let hmac = HmacAlgorithm::new(HashAlgorithm::sha256());
        let key = hmac.generate_parameters(b"Jefe");
        let mut tag = hmac.compute_mac(&key, b"payload").unwrap();
        assert!(hmac.verify_mac(&key, b"payload", &tag).unwrap());
        assert!(!hmac.verify_mac(&key, b"payload", &tag[..16]).unwrap());
        tag[0] ^= 1;
        assert!(!hmac.verify_mac(&key, b"payload", &tag).unwrap());
    }

    #[test]
    fn test_range_helpers() {
        let hmac = HmacAlgorithm::new(HashAlgorithm::md5());
        let buffer = b"..secret..";
        let key = hmac.generate_parameters_range(buffer, 2, 6).unwrap();
        assert_eq!(key.as_bytes(), b"secret");
        assert_eq!(
            hmac.compute_mac_range(&key, b"xxdataxx", 2, 4).unwrap(),
            hmac.compute_mac(&key, b"data").unwrap()
        );
        assert!(hmac.compute_mac_range(&key, b"data", 3, 4).is_err());
    }

    #[test]
    fn test_empty_key_and_missing_backend() {
        let hmac = HmacAlgorithm::new(HashAlgorithm::sha256());
        assert_eq!(hmac.compute_mac(&KeyParameter::new(&[]), b"").unwrap().len(), 32);
        let dstu = HmacAlgorithm::new(HashAlgorithm::dstu7564(512).unwrap());
        assert!(matches!(
            dstu.generate_mac(&KeyParameter::new(b"key")),
            Err(CryptoError::Unavailable { .. })
        ));
    }
}
