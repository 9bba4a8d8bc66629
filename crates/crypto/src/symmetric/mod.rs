//! Symmetric cipher descriptors: block ciphers with their modes and paddings,
//! and stream ciphers.

pub(crate) mod backend;
mod block;
mod buffered;
mod mode;
pub(crate) mod padding;
pub mod registry;
mod stream;

pub use block::{BlockAlgorithm, BlockKind};
pub use mode::{
    iv_sizes, nonce_and_tag_sizes, MacCipherMode, MacPaddingMode, SymmetricCipherMode,
    SymmetricPaddingMode, MAX_NONCE_BITS,
};
pub use stream::{StreamAlgorithm, StreamKind};
