//! Core building blocks for the AlgoForge mechanism-resolution layer.
//!
//! This crate holds everything that is independent of a concrete cryptographic
//! backend: the size-legality engine that every descriptor validates against,
//! mechanism-name normalization shared by the registries, configuration and
//! logging bootstrap.

pub mod config;
pub mod error;
pub mod logging;
pub mod mechanism;
pub mod size;

pub use config::{AsymmetricDefaults, Config, LoggingConfig};
pub use error::{CoreError, Error, Result};
pub use mechanism::{normalize, normalize_keep_slash};
pub use size::{is_legal, SizeRange, SizeTable};
