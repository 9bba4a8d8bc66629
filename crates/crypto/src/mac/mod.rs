//! Message authentication codes: HMAC over a hash, CMAC and raw CBC/CFB
//! MACs over a block cipher.

mod block_mac;
mod cmac;
mod hmac;
pub mod registry;

pub use block_mac::MacAlgorithm;
pub use self::cmac::CmacAlgorithm;
pub use self::hmac::HmacAlgorithm;
