//! Binding of hash descriptors to RustCrypto digest implementations.

use std::mem;

use blake2::{Blake2bVar, Blake2sVar};
use digest::consts::{U128, U16, U20, U28, U32, U48, U64};
use digest::core_api::BlockSizeUser;
use digest::{Digest, DynDigest, ExtendableOutput, KeyInit, Mac, Update, VariableOutput, XofReader};
use hmac::SimpleHmac;
use gost94::params::Gost94Params;
use gost94::Gost94Core;
use sha3::{CShake128, CShake128Core, CShake256, CShake256Core, Shake128, Shake256};

use super::{Gost28147SBox, HashAlgorithm, HashKind};
use crate::engine::{DigestEngine, MacEngine};
use crate::error::{CryptoError, CryptoResult};

/// Expand `$body` once per fixed-output digest type, binding the type to `$d`.
/// Evaluates to `None` for kinds without a fixed-output backend.
macro_rules! with_fixed_digest {
    ($kind:expr, |$d:ident| $body:expr) => {
        match $kind {
            HashKind::Blake2b { size: 160 } => { type $d = blake2::Blake2b<U20>; Some($body) }
            HashKind::Blake2b { size: 256 } => { type $d = blake2::Blake2b<U32>; Some($body) }
            HashKind::Blake2b { size: 384 } => { type $d = blake2::Blake2b<U48>; Some($body) }
            HashKind::Blake2b { size: 512 } => { type $d = blake2::Blake2b<U64>; Some($body) }
            HashKind::Blake2s { size: 128 } => { type $d = blake2::Blake2s<U16>; Some($body) }
            HashKind::Blake2s { size: 160 } => { type $d = blake2::Blake2s<U20>; Some($body) }
            HashKind::Blake2s { size: 224 } => { type $d = blake2::Blake2s<U28>; Some($body) }
            HashKind::Blake2s { size: 256 } => { type $d = blake2::Blake2s<U32>; Some($body) }
            HashKind::Keccak { size: 224 } => { type $d = sha3::Keccak224; Some($body) }
            HashKind::Keccak { size: 256 } => { type $d = sha3::Keccak256; Some($body) }
            HashKind::Keccak { size: 384 } => { type $d = sha3::Keccak384; Some($body) }
            HashKind::Keccak { size: 512 } => { type $d = sha3::Keccak512; Some($body) }
            HashKind::Md2 => { type $d = md2::Md2; Some($body) }
            HashKind::Md4 => { type $d = md4::Md4; Some($body) }
            HashKind::Md5 => { type $d = md5::Md5; Some($body) }
            HashKind::Ripemd128 => { type $d = ripemd::Ripemd128; Some($body) }
            HashKind::Ripemd160 => { type $d = ripemd::Ripemd160; Some($body) }
            HashKind::Ripemd256 => { type $d = ripemd::Ripemd256; Some($body) }
            HashKind::Ripemd320 => { type $d = ripemd::Ripemd320; Some($body) }
            HashKind::Sha1 => { type $d = sha1::Sha1; Some($body) }
            HashKind::Sha224 => { type $d = sha2::Sha224; Some($body) }
            HashKind::Sha256 => { type $d = sha2::Sha256; Some($body) }
            HashKind::Sha384 => { type $d = sha2::Sha384; Some($body) }
            HashKind::Sha512 => { type $d = sha2::Sha512; Some($body) }
            HashKind::Sha512T { size: 224 } => { type $d = sha2::Sha512_224; Some($body) }
            HashKind::Sha512T { size: 256 } => { type $d = sha2::Sha512_256; Some($body) }
            HashKind::Sha3 { size: 224 } => { type $d = sha3::Sha3_224; Some($body) }
            HashKind::Sha3 { size: 256 } => { type $d = sha3::Sha3_256; Some($body) }
            HashKind::Sha3 { size: 384 } => { type $d = sha3::Sha3_384; Some($body) }
            HashKind::Sha3 { size: 512 } => { type $d = sha3::Sha3_512; Some($body) }
            HashKind::Gost3411 { sbox: Gost28147SBox::Default | Gost28147SBox::DA } => {
                type $d = gost94::Gost94CryptoPro; Some($body)
            }
            HashKind::Gost3411 { sbox: Gost28147SBox::DTest } => { type $d = gost94::Gost94Test; Some($body) }
            HashKind::Gost3411 { sbox: Gost28147SBox::ETest } => { type $d = Gost3411E<ETest>; Some($body) }
            HashKind::Gost3411 { sbox: Gost28147SBox::EA } => { type $d = Gost3411E<EA>; Some($body) }
            HashKind::Gost3411 { sbox: Gost28147SBox::EB } => { type $d = Gost3411E<EB>; Some($body) }
            HashKind::Gost3411 { sbox: Gost28147SBox::EC } => { type $d = Gost3411E<EC>; Some($body) }
            HashKind::Gost3411 { sbox: Gost28147SBox::ED } => { type $d = Gost3411E<ED>; Some($body) }
            HashKind::Gost3411_2012 { size: 256 } => { type $d = streebog::Streebog256; Some($body) }
            HashKind::Gost3411_2012 { size: 512 } => { type $d = streebog::Streebog512; Some($body) }
            HashKind::Skein { state_size: 256, size: 128 } => { type $d = skein::Skein256<U16>; Some($body) }
            HashKind::Skein { state_size: 256, size: 160 } => { type $d = skein::Skein256<U20>; Some($body) }
            HashKind::Skein { state_size: 256, size: 224 } => { type $d = skein::Skein256<U28>; Some($body) }
            HashKind::Skein { state_size: 256, size: 256 } => { type $d = skein::Skein256<U32>; Some($body) }
            HashKind::Skein { state_size: 512, size: 128 } => { type $d = skein::Skein512<U16>; Some($body) }
            HashKind::Skein { state_size: 512, size: 160 } => { type $d = skein::Skein512<U20>; Some($body) }
            HashKind::Skein { state_size: 512, size: 224 } => { type $d = skein::Skein512<U28>; Some($body) }
            HashKind::Skein { state_size: 512, size: 256 } => { type $d = skein::Skein512<U32>; Some($body) }
            HashKind::Skein { state_size: 512, size: 384 } => { type $d = skein::Skein512<U48>; Some($body) }
            HashKind::Skein { state_size: 512, size: 512 } => { type $d = skein::Skein512<U64>; Some($body) }
            HashKind::Skein { state_size: 1024, size: 384 } => { type $d = skein::Skein1024<U48>; Some($body) }
            HashKind::Skein { state_size: 1024, size: 512 } => { type $d = skein::Skein1024<U64>; Some($body) }
            HashKind::Skein { state_size: 1024, size: 1024 } => { type $d = skein::Skein1024<U128>; Some($body) }
            HashKind::Sm3 => { type $d = sm3::Sm3; Some($body) }
            HashKind::Tiger => { type $d = tiger::Tiger; Some($body) }
            HashKind::Whirlpool => { type $d = whirlpool::Whirlpool; Some($body) }
            _ => None,
        }
    };
}

/// GOST R 34.11-94 over one of the GOST 28147-89 encryption S-boxes.
type Gost3411E<P> = digest::core_api::CoreWrapper<Gost94Core<P>>;

trait CipherSbox {
    const SBOX: [[u8; 16]; 8];
}

impl<S: magma::Sbox> CipherSbox for magma::Gost89<S> {
    const SBOX: [[u8; 16]; 8] = S::SBOX;
}

macro_rules! encryption_sbox_params {
    ($($name:ident => $cipher:ty),+ $(,)?) => {
        $(
            #[derive(Clone, Copy, Default)]
            struct $name;

            impl Gost94Params for $name {
                const S_BOX: [[u8; 16]; 8] = <$cipher as CipherSbox>::SBOX;
                const H0: [u8; 32] = [0; 32];
                const NAME: &'static str = concat!("GOST3411-", stringify!($name));
            }
        )+
    };
}

encryption_sbox_params! {
    ETest => magma::Gost89Test,
    EA => magma::Gost89CryptoProA,
    EB => magma::Gost89CryptoProB,
    EC => magma::Gost89CryptoProC,
    ED => magma::Gost89CryptoProD,
}

struct FixedDigest<D> {
    name: String,
    inner: D,
}

impl<D: Digest + Send> DigestEngine for FixedDigest<D> {
    fn algorithm_name(&self) -> &str {
        &self.name
    }

    fn output_len(&self) -> usize {
        <D as Digest>::output_size()
    }

    fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.inner, data);
    }

    fn finalize_reset(&mut self) -> Vec<u8> {
        mem::replace(&mut self.inner, D::new()).finalize().to_vec()
    }

    fn reset(&mut self) {
        self.inner = D::new();
    }
}

fn fixed_digest<D: Digest + Send + 'static>(name: &str) -> Box<dyn DigestEngine> {
    Box::new(FixedDigest {
        name: name.to_string(),
        inner: D::new(),
    })
}

/// Runtime-sized BLAKE2 output.
struct VariableDigest<D> {
    name: String,
    output_len: usize,
    pristine: D,
    inner: D,
}

impl<D: VariableOutput + Update + Clone + Send> DigestEngine for VariableDigest<D> {
    fn algorithm_name(&self) -> &str {
        &self.name
    }

    fn output_len(&self) -> usize {
        self.output_len
    }

    fn update(&mut self, data: &[u8]) {
        Update::update(&mut self.inner, data);
    }

    fn finalize_reset(&mut self) -> Vec<u8> {
        mem::replace(&mut self.inner, self.pristine.clone())
            .finalize_boxed()
            .into_vec()
    }

    fn reset(&mut self) {
        self.inner = self.pristine.clone();
    }
}

fn variable_digest<D>(algorithm: &HashAlgorithm) -> CryptoResult<Box<dyn DigestEngine>>
where
    D: VariableOutput + Update + Clone + Send + 'static,
{
    let output_len = algorithm.output_len();
    let pristine = D::new(output_len).map_err(|_| {
        CryptoError::unavailable(algorithm.mechanism(), format!("output length {output_len} rejected"))
    })?;
    Ok(Box::new(VariableDigest {
        name: algorithm.mechanism().to_string(),
        output_len,
        inner: pristine.clone(),
        pristine,
    }))
}

/// SHAKE and CSHAKE, reading exactly `output_len` bytes.
struct XofDigest<D> {
    name: String,
    output_len: usize,
    pristine: D,
    inner: D,
}

impl<D: ExtendableOutput + Update + Clone + Send> DigestEngine for XofDigest<D> {
    fn algorithm_name(&self) -> &str {
        &self.name
    }

    fn output_len(&self) -> usize {
        self.output_len
    }

    fn update(&mut self, data: &[u8]) {
        Update::update(&mut self.inner, data);
    }

    fn finalize_reset(&mut self) -> Vec<u8> {
        let mut output = vec![0u8; self.output_len];
        mem::replace(&mut self.inner, self.pristine.clone())
            .finalize_xof()
            .read(&mut output);
        output
    }

    fn reset(&mut self) {
        self.inner = self.pristine.clone();
    }
}

fn xof_digest<D>(algorithm: &HashAlgorithm, pristine: D) -> Box<dyn DigestEngine>
where
    D: ExtendableOutput + Update + Clone + Send + 'static,
{
    Box::new(XofDigest {
        name: algorithm.mechanism().to_string(),
        output_len: algorithm.output_len(),
        inner: pristine.clone(),
        pristine,
    })
}

pub(crate) fn digest_engine(algorithm: &HashAlgorithm) -> CryptoResult<Box<dyn DigestEngine>> {
    let name = algorithm.mechanism();
    if let Some(engine) = with_fixed_digest!(algorithm.kind(), |D| fixed_digest::<D>(name)) {
        return Ok(engine);
    }
    match algorithm.kind() {
        HashKind::Blake2b { .. } => variable_digest::<Blake2bVar>(algorithm),
        HashKind::Blake2s { .. } => variable_digest::<Blake2sVar>(algorithm),
        HashKind::Shake { size: 128 } => Ok(xof_digest(algorithm, Shake128::default())),
        HashKind::Shake { size: 256 } => Ok(xof_digest(algorithm, Shake256::default())),
        HashKind::Cshake { size } => {
            let strings = algorithm.cshake_strings().cloned().unwrap_or_default();
            let (function_name, customization) = (&strings.function_name, &strings.customization);
            match size {
                128 => Ok(xof_digest(
                    algorithm,
                    CShake128::from_core(CShake128Core::new_with_function_name(function_name, customization)),
                )),
                _ => Ok(xof_digest(
                    algorithm,
                    CShake256::from_core(CShake256Core::new_with_function_name(function_name, customization)),
                )),
            }
        }
        _ => Err(CryptoError::unavailable(name, "no digest backend is linked")),
    }
}

struct HmacMac<D: Digest + BlockSizeUser> {
    name: String,
    pristine: SimpleHmac<D>,
    inner: SimpleHmac<D>,
}

impl<D> MacEngine for HmacMac<D>
where
    D: Digest + BlockSizeUser + Clone + Send,
{
    fn algorithm_name(&self) -> &str {
        &self.name
    }

    fn mac_len(&self) -> usize {
        <D as Digest>::output_size()
    }

    fn update(&mut self, data: &[u8]) {
        Mac::update(&mut self.inner, data);
    }

    fn finalize_reset(&mut self) -> Vec<u8> {
        mem::replace(&mut self.inner, self.pristine.clone())
            .finalize()
            .into_bytes()
            .to_vec()
    }

    fn reset(&mut self) {
        self.inner = self.pristine.clone();
    }
}

fn simple_hmac<D>(name: &str, key: &[u8]) -> CryptoResult<Box<dyn MacEngine>>
where
    D: Digest + BlockSizeUser + Clone + Send + 'static,
{
    let pristine = <SimpleHmac<D> as KeyInit>::new_from_slice(key)
        .map_err(|_| CryptoError::InvalidKey { reason: format!("{name} rejected the key") })?;
    Ok(Box::new(HmacMac {
        name: name.to_string(),
        inner: pristine.clone(),
        pristine,
    }))
}

/// HMAC keyed with `key` over the descriptor's digest.
pub(crate) fn hmac_engine(
    hash: &HashAlgorithm,
    name: &str,
    key: &[u8],
) -> CryptoResult<Box<dyn MacEngine>> {
    with_fixed_digest!(hash.kind(), |D| simple_hmac::<D>(name, key)).unwrap_or_else(|| {
        Err(CryptoError::unavailable(
            name,
            format!("no fixed-output backend for {}", hash.mechanism()),
        ))
    })
}

/// Object-safe digest for schemes that take one at runtime (PSS, OAEP).
pub(crate) fn dyn_digest(hash: &HashAlgorithm) -> Option<Box<dyn DynDigest + Send + Sync>> {
    with_fixed_digest!(hash.kind(), |D| Box::new(D::default()) as Box<dyn DynDigest + Send + Sync>)
}
