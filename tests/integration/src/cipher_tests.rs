//! Symmetric and asymmetric cipher construction across the registries

use algoforge_crypto::registry;
use algoforge_crypto::{
    AsymmetricPaddingMode, CryptoError, SymmetricCipherMode, SymmetricPaddingMode,
};

use crate::test_utils::{init_tracing, sample_buffer, RSA_1024};

const AES_KEY: [u8; 16] = [0x2b; 16];

#[test]
fn test_aead_modes_reject_padding() {
    init_tracing();
    let aes = registry::try_get_block_algorithm("AES").unwrap();
    let parameters = aes.generate_aead_parameters(&AES_KEY, &[0u8; 12], 128, b"").unwrap();

    for mode in [SymmetricCipherMode::Gcm, SymmetricCipherMode::Ccm, SymmetricCipherMode::Eax] {
        for padding in SymmetricPaddingMode::ALL {
            if padding == SymmetricPaddingMode::NoPadding {
                continue;
            }
            tracing::info!(%mode, %padding, "expecting rejection");
            assert!(aes.legal_iv_sizes(mode, padding).is_none());
            match aes.generate_cipher(true, mode, padding, &parameters) {
                Err(CryptoError::UnsupportedConfiguration { parameter, .. }) => assert_eq!(parameter, "padding"),
                Err(other) => panic!("{mode}/{padding}: unexpected error {other}"),
                Ok(_) => panic!("{mode}/{padding}: accepted"),
            }
        }
    }
}

#[test]
fn test_aead_modes_reject_wide_blocks() {
    init_tracing();
    let rijndael = registry::try_get_block_algorithm("Rijndael-256").unwrap();
    for mode in [SymmetricCipherMode::Gcm, SymmetricCipherMode::Ccm] {
        assert!(rijndael.legal_iv_sizes(mode, SymmetricPaddingMode::NoPadding).is_none());
        let parameters = rijndael.generate_aead_parameters(&[1u8; 32], &[0u8; 12], 128, b"").unwrap();
        assert!(matches!(
            rijndael.generate_cipher(true, mode, SymmetricPaddingMode::NoPadding, &parameters),
            Err(CryptoError::UnsupportedConfiguration { .. })
        ));
    }
}

#[test]
fn test_gcm_with_pkcs7_is_unsupported() {
    init_tracing();
    let aes = registry::try_get_block_algorithm("aes").unwrap();
    let parameters = aes.generate_aead_parameters(&AES_KEY, &[0u8; 12], 128, b"").unwrap();
    assert!(matches!(
        aes.generate_cipher(true, SymmetricCipherMode::Gcm, SymmetricPaddingMode::Pkcs7, &parameters),
        Err(CryptoError::UnsupportedConfiguration { .. })
    ));
}

#[test]
fn test_ctr_iv_lengths() {
    init_tracing();
    let aes = registry::try_get_block_algorithm("AES").unwrap();
    let table = aes
        .legal_iv_sizes(SymmetricCipherMode::Ctr, SymmetricPaddingMode::NoPadding)
        .unwrap();
    assert!(table.is_legal(64));
    assert!(!table.is_legal(56));

    let legal = aes.generate_parameters(&AES_KEY, Some(&[0u8; 8])).unwrap();
    let mut cipher = aes
        .generate_cipher(true, SymmetricCipherMode::Ctr, SymmetricPaddingMode::NoPadding, &legal)
        .unwrap();
    let message = sample_buffer(37);
    let ciphertext = cipher.process(&message).unwrap();
    assert_eq!(ciphertext.len(), message.len());

    let mut decipher = aes
        .generate_cipher(false, SymmetricCipherMode::Ctr, SymmetricPaddingMode::NoPadding, &legal)
        .unwrap();
    assert_eq!(decipher.process(&ciphertext).unwrap(), message);

    let illegal = aes.generate_parameters(&AES_KEY, Some(&[0u8; 7])).unwrap();
    assert!(matches!(
        aes.generate_cipher(true, SymmetricCipherMode::Ctr, SymmetricPaddingMode::NoPadding, &illegal),
        Err(CryptoError::UnsupportedConfiguration { .. })
    ));
}

#[test]
fn test_gcm_round_trip_through_registry() {
    init_tracing();
    let aes = registry::try_get_block_algorithm("AES").unwrap();
    let parameters = aes.generate_aead_parameters(&AES_KEY, &[9u8; 12], 128, b"header").unwrap();
    let message = sample_buffer(100);

    let mut encryptor = aes
        .generate_cipher(true, SymmetricCipherMode::Gcm, SymmetricPaddingMode::NoPadding, &parameters)
        .unwrap();
    let sealed = encryptor.process(&message).unwrap();
    assert_eq!(sealed.len(), message.len() + 16);

    let mut decryptor = aes
        .generate_cipher(false, SymmetricCipherMode::Gcm, SymmetricPaddingMode::NoPadding, &parameters)
        .unwrap();
    assert_eq!(decryptor.process(&sealed).unwrap(), message);
}

#[test]
fn test_stream_cipher_round_trip() {
    init_tracing();
    let chacha = registry::try_get_stream_algorithm("ChaCha7539").unwrap();
    let parameters = chacha.generate_parameters(&[5u8; 32], Some(&[1u8; 12])).unwrap();
    let message = sample_buffer(64);
    let ciphertext = chacha.generate_cipher(true, &parameters).unwrap().process(&message).unwrap();
    assert_ne!(ciphertext, message);
    let plaintext = chacha.generate_cipher(false, &parameters).unwrap().process(&ciphertext).unwrap();
    assert_eq!(plaintext, message);
}

#[test]
fn test_rsa_encryption_through_registry() {
    init_tracing();
    let rsa = registry::try_get_asymmetric_encryption_algorithm("RSA").unwrap();
    let message = sample_buffer(40);
    for padding in [AsymmetricPaddingMode::Pkcs1, AsymmetricPaddingMode::Oaep] {
        tracing::info!(%padding, "encrypting with the public half");
        let mut encryptor = rsa.generate_cipher(padding, &RSA_1024.public()).unwrap();
        assert!(encryptor.is_encrypting());
        let ciphertext = encryptor.process_block(&message).unwrap();

        let mut decryptor = rsa.generate_cipher(padding, &RSA_1024.private()).unwrap();
        assert!(!decryptor.is_encrypting());
        assert_eq!(decryptor.process_block(&ciphertext).unwrap(), message);
    }
}

#[test]
fn test_independent_digests_agree() {
    init_tracing();
    let sha256 = registry::try_get_hash_algorithm("SHA-256").unwrap();
    let buffer = sample_buffer(123);

    let mut first = sha256.generate_digest().unwrap();
    let mut second = sha256.generate_digest().unwrap();
    first.update(&buffer);
    second.update(&buffer[..60]);
    second.update(&buffer[60..]);
    assert_eq!(first.finalize_reset(), second.finalize_reset());
    assert_eq!(sha256.compute_hash(&buffer).unwrap().len(), 32);
}
