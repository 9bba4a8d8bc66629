//! Operation-instance traits.
//!
//! Every descriptor factory returns a boxed implementation of one of these.
//! Instances are `Send` but mutate internal buffers, so they are not shared
//! across threads without external synchronization. All of them return to
//! their initial keyed state after finishing, so one instance can process
//! any number of messages.

use crate::error::CryptoResult;

/// A message digest.
pub trait DigestEngine: Send {
    /// Canonical mechanism of the descriptor that built this engine.
    fn algorithm_name(&self) -> &str;

    /// Output length in bytes.
    fn output_len(&self) -> usize;

    fn update(&mut self, data: &[u8]);

    /// Produce the digest and reset.
    fn finalize_reset(&mut self) -> Vec<u8>;

    fn reset(&mut self);
}

/// A keyed message authentication code.
pub trait MacEngine: Send {
    fn algorithm_name(&self) -> &str;

    /// Tag length in bytes.
    fn mac_len(&self) -> usize;

    fn update(&mut self, data: &[u8]);

    /// Produce the tag and reset to the keyed initial state.
    fn finalize_reset(&mut self) -> Vec<u8>;

    fn reset(&mut self);
}

/// A symmetric cipher that buffers partial input between calls.
pub trait BufferedCipher: Send {
    fn algorithm_name(&self) -> &str;

    fn is_encrypting(&self) -> bool;

    /// Feed input; returns whatever output is already determined.
    fn update(&mut self, input: &[u8]) -> CryptoResult<Vec<u8>>;

    /// Flush buffered input, apply or strip padding, and reset.
    fn finalize(&mut self) -> CryptoResult<Vec<u8>>;

    /// One-shot `update` followed by `finalize`.
    fn process(&mut self, input: &[u8]) -> CryptoResult<Vec<u8>> {
        let mut output = self.update(input)?;
        output.extend(self.finalize()?);
        Ok(output)
    }
}

/// A single-block public-key cipher. The direction is fixed by the key it
/// was built with.
pub trait AsymmetricBlockCipher: Send {
    fn algorithm_name(&self) -> &str;

    fn is_encrypting(&self) -> bool;

    /// Largest input accepted by `process_block`, in bytes.
    fn input_block_size(&self) -> usize;

    /// Largest output produced by `process_block`, in bytes.
    fn output_block_size(&self) -> usize;

    fn process_block(&mut self, input: &[u8]) -> CryptoResult<Vec<u8>>;
}

/// A signature generator or verifier over a buffered message.
pub trait SignerEngine: Send {
    fn algorithm_name(&self) -> &str;

    /// `true` when built from a private key.
    fn is_signing(&self) -> bool;

    fn update(&mut self, data: &[u8]);

    /// Sign the data fed since the last reset, then reset.
    fn generate_signature(&mut self) -> CryptoResult<Vec<u8>>;

    /// Check `signature` against the data fed since the last reset, then
    /// reset. A malformed or mismatching signature yields `Ok(false)`.
    fn verify_signature(&mut self, signature: &[u8]) -> CryptoResult<bool>;

    fn reset(&mut self);
}
