//! Catalog of every statically registered descriptor, one function per
//! family, plus the name resolvers re-exported under one roof.

pub use crate::asymmetric::registry::{
    asymmetric_algorithms, asymmetric_encryption_algorithms,
    try_get_algorithm as try_get_asymmetric_algorithm,
    try_get_encryption_algorithm as try_get_asymmetric_encryption_algorithm,
};
pub use crate::hash::registry::{hash_algorithms, try_get_algorithm as try_get_hash_algorithm};
pub use crate::mac::registry::{
    cmac_algorithms, hmac_algorithms, mac_algorithms, try_get_cmac_algorithm, try_get_hmac_algorithm,
    try_get_mac_algorithm,
};
pub use crate::signature::registry::{signature_algorithms, try_get_algorithm as try_get_signature_algorithm};
pub use crate::symmetric::registry::{
    block_algorithms, stream_algorithms, try_get_block_algorithm, try_get_stream_algorithm,
};

/// Entry counts per family, in catalog order.
pub fn catalog_sizes() -> Vec<(&'static str, usize)> {
    vec![
        ("hash", hash_algorithms().len()),
        ("hmac", hmac_algorithms().len()),
        ("cmac", cmac_algorithms().len()),
        ("mac", mac_algorithms().len()),
        ("block", block_algorithms().len()),
        ("stream", stream_algorithms().len()),
        ("asymmetric", asymmetric_algorithms().len()),
        ("asymmetric_encryption", asymmetric_encryption_algorithms().len()),
        ("signature", signature_algorithms().len()),
    ]
}
