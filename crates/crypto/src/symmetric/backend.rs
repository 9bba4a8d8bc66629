//! Binding of block cipher descriptors to RustCrypto engines and modes.
//!
//! A [`BlockEngine`] is one keyed cipher behind an object-safe interface.
//! Modes are exposed as [`UnitTransform`]s that the buffered cipher drives
//! one unit (block or feedback segment) at a time.

use std::mem;

use aes_gcm::aead::AeadInPlace;
use aes_gcm::AesGcm;
use cipher::consts::{U10, U11, U12, U13, U14, U15, U16, U4, U5, U6, U7, U8, U9};
use cipher::generic_array::GenericArray;
use cipher::{
    BlockCipher, BlockDecrypt, BlockDecryptMut, BlockEncrypt, BlockEncryptMut, BlockSizeUser,
    InnerIvInit, KeyInit, StreamCipher, StreamCipherCoreWrapper,
};
use digest::{InnerInit, Mac};

use super::block::BlockKind;
use super::mode::SymmetricCipherMode;
use crate::engine::MacEngine;
use crate::error::{CryptoError, CryptoResult};

/// One keyed block cipher.
pub(crate) trait BlockEngine: Send {
    /// Block length in bytes.
    fn block_len(&self) -> usize;

    fn encrypt_block(&self, block: &mut [u8]);

    fn decrypt_block(&self, block: &mut [u8]);

    fn boxed_clone(&self) -> Box<dyn BlockEngine>;

    /// CBC with a full-block IV.
    fn cbc(&self, encrypting: bool, iv: &[u8]) -> CryptoResult<Box<dyn UnitTransform>>;

    /// Full-block CFB.
    fn cfb(&self, encrypting: bool, iv: &[u8]) -> CryptoResult<Box<dyn UnitTransform>>;

    /// Big-endian counter over the whole block; `iv` is right-padded with zeros.
    fn ctr(&self, iv: &[u8]) -> CryptoResult<Box<dyn UnitTransform>>;

    /// CMAC truncated to `mac_len` bytes, or `None` for block sizes CMAC
    /// does not take.
    fn cmac(&self, _name: &str, _mac_len: usize) -> Option<Box<dyn MacEngine>> {
        None
    }

    /// AEAD backend for `mode`, or `None` when no linked construction
    /// handles this cipher with these nonce and tag lengths.
    fn aead(
        &self,
        key: &[u8],
        mode: SymmetricCipherMode,
        nonce_len: usize,
        tag_len: usize,
    ) -> Option<Box<dyn AeadBackend>>;
}

/// A keyed mode of operation processing whole units.
pub(crate) trait UnitTransform: Send {
    /// Unit length in bytes.
    fn unit_len(&self) -> usize;

    /// Whether a trailing partial unit can be processed without padding.
    fn allows_partial(&self) -> bool;

    /// Transform `data` in place. `data` holds whole units, except for the
    /// final call of a mode that allows partial units.
    fn apply(&mut self, data: &mut [u8]) -> CryptoResult<()>;

    /// Return to the state right after keying.
    fn reset(&mut self);
}

/// Detached-tag AEAD construction with fixed nonce and tag lengths.
pub(crate) trait AeadBackend: Send {
    fn tag_len(&self) -> usize;

    /// Encrypt `buffer` in place and append the tag.
    fn seal(&self, nonce: &[u8], associated: &[u8], buffer: &mut Vec<u8>) -> CryptoResult<()>;

    /// Verify and strip the trailing tag, then decrypt `buffer` in place.
    fn open(&self, nonce: &[u8], associated: &[u8], buffer: &mut Vec<u8>) -> CryptoResult<()>;
}

fn iv_length(_: cipher::InvalidLength) -> CryptoError {
    CryptoError::invalid_argument("iv", "IV length does not match the block size")
}

struct Keyed<C> {
    cipher: C,
}

struct CbcEncrypt<M> {
    pristine: M,
    mode: M,
}

impl<M: BlockEncryptMut + Clone + Send> UnitTransform for CbcEncrypt<M> {
    fn unit_len(&self) -> usize {
        M::block_size()
    }

    fn allows_partial(&self) -> bool {
        false
    }

    fn apply(&mut self, data: &mut [u8]) -> CryptoResult<()> {
        for block in data.chunks_exact_mut(M::block_size()) {
            self.mode.encrypt_block_mut(GenericArray::from_mut_slice(block));
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.mode = self.pristine.clone();
    }
}

struct CbcDecrypt<M> {
    pristine: M,
    mode: M,
}

impl<M: BlockDecryptMut + Clone + Send> UnitTransform for CbcDecrypt<M> {
    fn unit_len(&self) -> usize {
        M::block_size()
    }

    fn allows_partial(&self) -> bool {
        false
    }

    fn apply(&mut self, data: &mut [u8]) -> CryptoResult<()> {
        for block in data.chunks_exact_mut(M::block_size()) {
            self.mode.decrypt_block_mut(GenericArray::from_mut_slice(block));
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.mode = self.pristine.clone();
    }
}

/// Keystream modes, reset by restoring a pristine copy.
struct StreamUnits<S> {
    unit_len: usize,
    pristine: S,
    mode: S,
}

impl<S: StreamCipher + Clone + Send> UnitTransform for StreamUnits<S> {
    fn unit_len(&self) -> usize {
        self.unit_len
    }

    fn allows_partial(&self) -> bool {
        true
    }

    fn apply(&mut self, data: &mut [u8]) -> CryptoResult<()> {
        self.mode
            .try_apply_keystream(data)
            .map_err(|_| CryptoError::invalid_argument("input", "counter space exhausted"))
    }

    fn reset(&mut self) {
        self.mode = self.pristine.clone();
    }
}

struct CfbEncrypt<C: BlockEncryptMut + BlockCipher> {
    pristine: cfb_mode::BufEncryptor<C>,
    mode: cfb_mode::BufEncryptor<C>,
}

impl<C: BlockEncryptMut + BlockCipher + Clone + Send> UnitTransform for CfbEncrypt<C> {
    fn unit_len(&self) -> usize {
        C::block_size()
    }

    fn allows_partial(&self) -> bool {
        true
    }

    fn apply(&mut self, data: &mut [u8]) -> CryptoResult<()> {
        self.mode.encrypt(data);
        Ok(())
    }

    fn reset(&mut self) {
        self.mode = self.pristine.clone();
    }
}

struct CfbDecrypt<C: BlockEncryptMut + BlockCipher> {
    pristine: cfb_mode::BufDecryptor<C>,
    mode: cfb_mode::BufDecryptor<C>,
}

impl<C: BlockEncryptMut + BlockCipher + Clone + Send> UnitTransform for CfbDecrypt<C> {
    fn unit_len(&self) -> usize {
        C::block_size()
    }

    fn allows_partial(&self) -> bool {
        true
    }

    fn apply(&mut self, data: &mut [u8]) -> CryptoResult<()> {
        self.mode.decrypt(data);
        Ok(())
    }

    fn reset(&mut self) {
        self.mode = self.pristine.clone();
    }
}

struct Ecb {
    engine: Box<dyn BlockEngine>,
    encrypting: bool,
}

impl UnitTransform for Ecb {
    fn unit_len(&self) -> usize {
        self.engine.block_len()
    }

    fn allows_partial(&self) -> bool {
        false
    }

    fn apply(&mut self, data: &mut [u8]) -> CryptoResult<()> {
        let block_len = self.engine.block_len();
        for block in data.chunks_exact_mut(block_len) {
            if self.encrypting {
                self.engine.encrypt_block(block);
            } else {
                self.engine.decrypt_block(block);
            }
        }
        Ok(())
    }

    fn reset(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Feedback {
    /// CFB: the ciphertext segment is shifted into the register.
    Cipher,
    /// OFB: the keystream segment is shifted into the register.
    Output,
}

/// Feedback register for CFB and OFB with a segment narrower than the block.
///
/// The IV is right-aligned in a block-sized register; each segment consumes
/// `iv.len()` bytes of keystream and shifts the register left by as many.
pub(crate) struct ShiftRegister {
    engine: Box<dyn BlockEngine>,
    feedback: Feedback,
    encrypting: bool,
    segment: usize,
    initial: Vec<u8>,
    register: Vec<u8>,
}

impl ShiftRegister {
    /// `iv` must be non-empty and no longer than the block.
    pub(crate) fn new(
        engine: Box<dyn BlockEngine>,
        feedback: Feedback,
        encrypting: bool,
        iv: &[u8],
    ) -> CryptoResult<Self> {
        let block_len = engine.block_len();
        if iv.is_empty() || iv.len() > block_len {
            return Err(CryptoError::invalid_argument(
                "iv",
                format!("feedback IV must be 1 to {block_len} bytes"),
            ));
        }
        let mut initial = vec![0u8; block_len];
        initial[block_len - iv.len()..].copy_from_slice(iv);
        Ok(Self {
            engine,
            feedback,
            encrypting,
            segment: iv.len(),
            register: initial.clone(),
            initial,
        })
    }

    fn process_segment(&mut self, data: &mut [u8]) {
        let mut keystream = self.register.clone();
        self.engine.encrypt_block(&mut keystream);

        let mut fed = vec![0u8; self.segment];
        match self.feedback {
            Feedback::Output => fed.copy_from_slice(&keystream[..self.segment]),
            Feedback::Cipher if !self.encrypting => fed[..data.len()].copy_from_slice(data),
            Feedback::Cipher => {}
        }
        for (byte, key) in data.iter_mut().zip(&keystream) {
            *byte ^= key;
        }
        if self.feedback == Feedback::Cipher && self.encrypting {
            fed[..data.len()].copy_from_slice(data);
        }

        let block_len = self.register.len();
        self.register.rotate_left(self.segment);
        self.register[block_len - self.segment..].copy_from_slice(&fed);
    }

    /// Encryption of the current register; the CFB-MAC output block.
    pub(crate) fn output_block(&self) -> Vec<u8> {
        let mut block = self.register.clone();
        self.engine.encrypt_block(&mut block);
        block
    }
}

impl UnitTransform for ShiftRegister {
    fn unit_len(&self) -> usize {
        self.segment
    }

    fn allows_partial(&self) -> bool {
        true
    }

    fn apply(&mut self, data: &mut [u8]) -> CryptoResult<()> {
        for segment in data.chunks_mut(self.segment) {
            self.process_segment(segment);
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.register = self.initial.clone();
    }
}

/// CMAC from the `cmac` crate, truncated on output.
struct CmacMac<M> {
    name: String,
    mac_len: usize,
    pristine: M,
    inner: M,
}

impl<M: Mac + Clone + Send> MacEngine for CmacMac<M> {
    fn algorithm_name(&self) -> &str {
        &self.name
    }

    fn mac_len(&self) -> usize {
        self.mac_len
    }

    fn update(&mut self, data: &[u8]) {
        Mac::update(&mut self.inner, data);
    }

    fn finalize_reset(&mut self) -> Vec<u8> {
        let tag = mem::replace(&mut self.inner, self.pristine.clone())
            .finalize()
            .into_bytes();
        tag[..self.mac_len].to_vec()
    }

    fn reset(&mut self) {
        self.inner = self.pristine.clone();
    }
}

struct Detached<A> {
    aead: A,
}

impl<A: AeadInPlace + Send> AeadBackend for Detached<A> {
    fn tag_len(&self) -> usize {
        <A::TagSize as cipher::typenum::Unsigned>::USIZE
    }

    fn seal(&self, nonce: &[u8], associated: &[u8], buffer: &mut Vec<u8>) -> CryptoResult<()> {
        let tag = self
            .aead
            .encrypt_in_place_detached(GenericArray::from_slice(nonce), associated, buffer)
            .map_err(|_| CryptoError::invalid_argument("input", "message too long for this mode"))?;
        buffer.extend_from_slice(&tag);
        Ok(())
    }

    fn open(&self, nonce: &[u8], associated: &[u8], buffer: &mut Vec<u8>) -> CryptoResult<()> {
        let tag_len = self.tag_len();
        if buffer.len() < tag_len {
            return Err(CryptoError::Decryption {
                reason: "data too short".to_string(),
            });
        }
        let tag = buffer.split_off(buffer.len() - tag_len);
        self.aead
            .decrypt_in_place_detached(
                GenericArray::from_slice(nonce),
                associated,
                buffer,
                GenericArray::from_slice(&tag),
            )
            .map_err(|_| CryptoError::Decryption {
                reason: "mac check failed".to_string(),
            })
    }
}

fn detached<A: AeadInPlace + Send + 'static>(aead: A) -> Box<dyn AeadBackend> {
    Box::new(Detached { aead })
}

/// GCM with a 12 or 16 byte nonce and a 12 to 16 byte tag.
fn gcm<C>(cipher: C, nonce_len: usize, tag_len: usize) -> Option<Box<dyn AeadBackend>>
where
    C: BlockCipher + BlockSizeUser<BlockSize = U16> + BlockEncrypt + Send + 'static,
{
    macro_rules! with_tag {
        ($nonce:ty) => {
            match tag_len {
                12 => detached(AesGcm::<C, $nonce, U12>::from(cipher)),
                13 => detached(AesGcm::<C, $nonce, U13>::from(cipher)),
                14 => detached(AesGcm::<C, $nonce, U14>::from(cipher)),
                15 => detached(AesGcm::<C, $nonce, U15>::from(cipher)),
                16 => detached(AesGcm::<C, $nonce, U16>::from(cipher)),
                _ => return None,
            }
        };
    }
    Some(match nonce_len {
        12 => with_tag!(U12),
        16 => with_tag!(U16),
        _ => return None,
    })
}

/// CCM over every nonce and tag length the mode defines.
fn ccm<C>(cipher: C, nonce_len: usize, tag_len: usize) -> Option<Box<dyn AeadBackend>>
where
    C: BlockCipher + BlockSizeUser<BlockSize = U16> + BlockEncrypt + Send + 'static,
{
    macro_rules! with_tag {
        ($nonce:ty) => {
            match tag_len {
                4 => detached(ccm::Ccm::<C, U4, $nonce>::from(cipher)),
                6 => detached(ccm::Ccm::<C, U6, $nonce>::from(cipher)),
                8 => detached(ccm::Ccm::<C, U8, $nonce>::from(cipher)),
                10 => detached(ccm::Ccm::<C, U10, $nonce>::from(cipher)),
                12 => detached(ccm::Ccm::<C, U12, $nonce>::from(cipher)),
                14 => detached(ccm::Ccm::<C, U14, $nonce>::from(cipher)),
                16 => detached(ccm::Ccm::<C, U16, $nonce>::from(cipher)),
                _ => return None,
            }
        };
    }
    Some(match nonce_len {
        7 => with_tag!(U7),
        8 => with_tag!(U8),
        9 => with_tag!(U9),
        10 => with_tag!(U10),
        11 => with_tag!(U11),
        12 => with_tag!(U12),
        13 => with_tag!(U13),
        _ => return None,
    })
}

/// EAX with a block-sized nonce and a 4 to 16 byte tag.
fn eax<C>(key: &[u8], nonce_len: usize, tag_len: usize) -> Option<Box<dyn AeadBackend>>
where
    C: BlockCipher<BlockSize = U16> + BlockEncrypt + Clone + KeyInit + Send + 'static,
{
    if nonce_len != 16 {
        return None;
    }
    macro_rules! keyed {
        ($tag:ty) => {
            detached(eax::Eax::<C, $tag>::new_from_slice(key).ok()?)
        };
    }
    Some(match tag_len {
        4 => keyed!(U4),
        5 => keyed!(U5),
        6 => keyed!(U6),
        7 => keyed!(U7),
        8 => keyed!(U8),
        9 => keyed!(U9),
        10 => keyed!(U10),
        11 => keyed!(U11),
        12 => keyed!(U12),
        13 => keyed!(U13),
        14 => keyed!(U14),
        15 => keyed!(U15),
        16 => keyed!(U16),
        _ => return None,
    })
}

fn wide_aead<C>(
    cipher: &C,
    mode: SymmetricCipherMode,
    nonce_len: usize,
    tag_len: usize,
) -> Option<Box<dyn AeadBackend>>
where
    C: BlockCipher + BlockSizeUser<BlockSize = U16> + BlockEncrypt + Clone + Send + 'static,
{
    match mode {
        SymmetricCipherMode::Gcm => gcm(cipher.clone(), nonce_len, tag_len),
        SymmetricCipherMode::Ccm => ccm(cipher.clone(), nonce_len, tag_len),
        _ => None,
    }
}

/// Implements [`BlockEngine`] for concrete cipher types.
///
/// `wide_eax` ciphers have a 128-bit block and a fixed key size, `wide` ones
/// a 128-bit block and a variable key, `narrow` ones a 64-bit block and
/// `large` ones a block wider than CMAC accepts.
macro_rules! keyed_block {
    (@common $cipher:ty, $flavor:ty) => {
        fn block_len(&self) -> usize {
            <$cipher as BlockSizeUser>::block_size()
        }

        fn encrypt_block(&self, block: &mut [u8]) {
            BlockEncrypt::encrypt_block(&self.cipher, GenericArray::from_mut_slice(block));
        }

        fn decrypt_block(&self, block: &mut [u8]) {
            BlockDecrypt::decrypt_block(&self.cipher, GenericArray::from_mut_slice(block));
        }

        fn boxed_clone(&self) -> Box<dyn BlockEngine> {
            Box::new(Keyed {
                cipher: self.cipher.clone(),
            })
        }

        fn cbc(&self, encrypting: bool, iv: &[u8]) -> CryptoResult<Box<dyn UnitTransform>> {
            if encrypting {
                let mode = cbc::Encryptor::<$cipher>::inner_iv_slice_init(self.cipher.clone(), iv)
                    .map_err(iv_length)?;
                Ok(Box::new(CbcEncrypt {
                    pristine: mode.clone(),
                    mode,
                }))
            } else {
                let mode = cbc::Decryptor::<$cipher>::inner_iv_slice_init(self.cipher.clone(), iv)
                    .map_err(iv_length)?;
                Ok(Box::new(CbcDecrypt {
                    pristine: mode.clone(),
                    mode,
                }))
            }
        }

        fn cfb(&self, encrypting: bool, iv: &[u8]) -> CryptoResult<Box<dyn UnitTransform>> {
            if encrypting {
                let mode =
                    cfb_mode::BufEncryptor::<$cipher>::inner_iv_slice_init(self.cipher.clone(), iv)
                        .map_err(iv_length)?;
                Ok(Box::new(CfbEncrypt {
                    pristine: mode.clone(),
                    mode,
                }))
            } else {
                let mode =
                    cfb_mode::BufDecryptor::<$cipher>::inner_iv_slice_init(self.cipher.clone(), iv)
                        .map_err(iv_length)?;
                Ok(Box::new(CfbDecrypt {
                    pristine: mode.clone(),
                    mode,
                }))
            }
        }

        fn ctr(&self, iv: &[u8]) -> CryptoResult<Box<dyn UnitTransform>> {
            let block_len = self.block_len();
            let mut counter = vec![0u8; block_len];
            counter
                .get_mut(..iv.len())
                .ok_or_else(|| iv_length(cipher::InvalidLength))?
                .copy_from_slice(iv);
            let core = ctr::CtrCore::<$cipher, $flavor>::inner_iv_slice_init(self.cipher.clone(), &counter)
                .map_err(iv_length)?;
            let mode = StreamCipherCoreWrapper::from_core(core);
            Ok(Box::new(StreamUnits {
                unit_len: block_len,
                pristine: mode.clone(),
                mode,
            }))
        }

    };
    (@cmac $cipher:ty) => {
        fn cmac(&self, name: &str, mac_len: usize) -> Option<Box<dyn MacEngine>> {
            let pristine = cmac::Cmac::<$cipher>::from_core(cmac::CmacCore::inner_init(self.cipher.clone()));
            Some(Box::new(CmacMac {
                name: name.to_string(),
                mac_len,
                inner: pristine.clone(),
                pristine,
            }))
        }
    };
    (wide_eax: $($cipher:ty),+) => {$(
        impl BlockEngine for Keyed<$cipher> {
            keyed_block!(@common $cipher, ctr::flavors::Ctr128BE);
            keyed_block!(@cmac $cipher);

            fn aead(
                &self,
                key: &[u8],
                mode: SymmetricCipherMode,
                nonce_len: usize,
                tag_len: usize,
            ) -> Option<Box<dyn AeadBackend>> {
                match mode {
                    SymmetricCipherMode::Eax => eax::<$cipher>(key, nonce_len, tag_len),
                    other => wide_aead(&self.cipher, other, nonce_len, tag_len),
                }
            }
        }
    )+};
    (wide: $($cipher:ty),+) => {$(
        impl BlockEngine for Keyed<$cipher> {
            keyed_block!(@common $cipher, ctr::flavors::Ctr128BE);
            keyed_block!(@cmac $cipher);

            fn aead(
                &self,
                _key: &[u8],
                mode: SymmetricCipherMode,
                nonce_len: usize,
                tag_len: usize,
            ) -> Option<Box<dyn AeadBackend>> {
                wide_aead(&self.cipher, mode, nonce_len, tag_len)
            }
        }
    )+};
    (narrow: $($cipher:ty),+) => {$(
        keyed_block!(@no_aead $cipher, ctr::flavors::Ctr64BE, cmac);
    )+};
    (large: $($cipher:ty),+) => {$(
        keyed_block!(@no_aead $cipher, ctr::flavors::Ctr128BE);
    )+};
    (@no_aead $cipher:ty, $flavor:ty $(, $cmac:ident)?) => {
        impl BlockEngine for Keyed<$cipher> {
            keyed_block!(@common $cipher, $flavor);
            $(keyed_block!(@$cmac $cipher);)?

            fn aead(
                &self,
                _key: &[u8],
                _mode: SymmetricCipherMode,
                _nonce_len: usize,
                _tag_len: usize,
            ) -> Option<Box<dyn AeadBackend>> {
                None
            }
        }
    };
}

keyed_block!(wide_eax: aes::Aes128, aes::Aes192, aes::Aes256,
    camellia::Camellia128, camellia::Camellia192, camellia::Camellia256, sm4::Sm4);
keyed_block!(wide: cast6::Cast6, serpent::Serpent, twofish::Twofish);
keyed_block!(narrow: blowfish::Blowfish, cast5::Cast5, des::Des, des::TdesEde2, des::TdesEde3,
    idea::Idea, magma::Gost89Test, rc2::Rc2);
keyed_block!(large: threefish::Threefish256, threefish::Threefish512, threefish::Threefish1024);

fn keyed<C>(cipher: C) -> Box<dyn BlockEngine>
where
    Keyed<C>: BlockEngine + 'static,
{
    Box::new(Keyed { cipher })
}

fn variable<C>(mechanism: &str, key: &[u8]) -> CryptoResult<Box<dyn BlockEngine>>
where
    C: KeyInit,
    Keyed<C>: BlockEngine + 'static,
{
    C::new_from_slice(key).map(keyed).map_err(|_| {
        CryptoError::unavailable(mechanism, format!("backend rejects {}-bit keys", key.len() * 8))
    })
}

/// Key a backend engine for `kind`. Kinds without a linked engine, and key
/// lengths the linked engine cannot take, are `Unavailable`.
pub(crate) fn block_engine(
    mechanism: &str,
    kind: BlockKind,
    block_size: u32,
    key: &[u8],
) -> CryptoResult<Box<dyn BlockEngine>> {
    let rijndael_128 = kind == BlockKind::Rijndael && block_size == 128;
    match (kind, key.len()) {
        (BlockKind::Aes, 16) => variable::<aes::Aes128>(mechanism, key),
        (BlockKind::Aes, 24) => variable::<aes::Aes192>(mechanism, key),
        (BlockKind::Aes, 32) => variable::<aes::Aes256>(mechanism, key),
        (BlockKind::Rijndael, 16) if rijndael_128 => variable::<aes::Aes128>(mechanism, key),
        (BlockKind::Rijndael, 24) if rijndael_128 => variable::<aes::Aes192>(mechanism, key),
        (BlockKind::Rijndael, 32) if rijndael_128 => variable::<aes::Aes256>(mechanism, key),
        (BlockKind::Blowfish, _) => variable::<blowfish::Blowfish>(mechanism, key),
        (BlockKind::Camellia, 16) => variable::<camellia::Camellia128>(mechanism, key),
        (BlockKind::Camellia, 24) => variable::<camellia::Camellia192>(mechanism, key),
        (BlockKind::Camellia, 32) => variable::<camellia::Camellia256>(mechanism, key),
        (BlockKind::Cast5, _) => variable::<cast5::Cast5>(mechanism, key),
        (BlockKind::Cast6, _) => variable::<cast6::Cast6>(mechanism, key),
        (BlockKind::Des, _) => variable::<des::Des>(mechanism, key),
        (BlockKind::DesEde, 16) => variable::<des::TdesEde2>(mechanism, key),
        (BlockKind::DesEde, 24) => variable::<des::TdesEde3>(mechanism, key),
        // Magma words are big-endian, so output differs from little-endian
        // GOST 28147-89 engines under the same key.
        (BlockKind::Gost28147, _) => variable::<magma::Gost89Test>(mechanism, key),
        (BlockKind::Idea, _) => variable::<idea::Idea>(mechanism, key),
        (BlockKind::Rc2, _) => variable::<rc2::Rc2>(mechanism, key),
        (BlockKind::Serpent, _) => variable::<serpent::Serpent>(mechanism, key),
        (BlockKind::Sm4, _) => variable::<sm4::Sm4>(mechanism, key),
        (BlockKind::Threefish, _) => match block_size {
            256 => variable::<threefish::Threefish256>(mechanism, key),
            512 => variable::<threefish::Threefish512>(mechanism, key),
            _ => variable::<threefish::Threefish1024>(mechanism, key),
        },
        (BlockKind::Twofish, _) => variable::<twofish::Twofish>(mechanism, key),
        _ => Err(CryptoError::unavailable(
            mechanism,
            format!("no block cipher backend for {}-bit keys", key.len() * 8),
        )),
    }
}

/// Build the non-AEAD mode `mode` over `engine`.
pub(crate) fn mode_transform(
    engine: &dyn BlockEngine,
    mechanism: &str,
    mode: SymmetricCipherMode,
    encrypting: bool,
    iv: &[u8],
) -> CryptoResult<Box<dyn UnitTransform>> {
    match mode {
        SymmetricCipherMode::Ecb => Ok(Box::new(Ecb {
            engine: engine.boxed_clone(),
            encrypting,
        })),
        SymmetricCipherMode::Cbc => engine.cbc(encrypting, iv),
        SymmetricCipherMode::Cfb if iv.len() == engine.block_len() => engine.cfb(encrypting, iv),
        SymmetricCipherMode::Cfb => Ok(Box::new(ShiftRegister::new(
            engine.boxed_clone(),
            Feedback::Cipher,
            encrypting,
            iv,
        )?)),
        SymmetricCipherMode::Ofb => Ok(Box::new(ShiftRegister::new(
            engine.boxed_clone(),
            Feedback::Output,
            encrypting,
            iv,
        )?)),
        SymmetricCipherMode::Ctr | SymmetricCipherMode::Sic => engine.ctr(iv),
        other => Err(CryptoError::unavailable(
            mechanism,
            format!("{other} mode has no linked backend"),
        )),
    }
}
