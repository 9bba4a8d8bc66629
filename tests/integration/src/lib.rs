//! Integration tests across descriptor families
//!
//! This test suite validates:
//! - Alias invariance and catalog round trips for every registry
//! - Mode, padding and IV legality at cipher construction
//! - Sign/verify round trips for every signature with a linked backend
//! - Configuration-driven asymmetric defaults

pub mod test_utils;

#[cfg(test)]
mod cipher_tests;

#[cfg(test)]
mod config_tests;

#[cfg(test)]
mod resolution_tests;

#[cfg(test)]
mod signature_tests;
