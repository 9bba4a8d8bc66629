//! Configuration management for AlgoForge.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CoreError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub asymmetric: AsymmetricDefaults,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Key-generation parameters applied when an asymmetric mechanism is
/// resolved without explicit parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsymmetricDefaults {
    pub rsa_key_size: u32,
    pub rsa_certainty: u32,
    pub rsa_public_exponent: u64,
    pub dsa_key_size: u32,
    pub dsa_certainty: u32,
    pub elgamal_key_size: u32,
    pub elgamal_certainty: u32,
    pub gost3410_key_size: u32,
    pub gost3410_procedure: u32,
    pub ecdsa_curve: String,
    pub ecgost3410_curve: String,
}

impl Default for AsymmetricDefaults {
    fn default() -> Self {
        Self {
            rsa_key_size: 2048,
            rsa_certainty: 25,
            rsa_public_exponent: 65537,
            dsa_key_size: 1024,
            dsa_certainty: 80,
            elgamal_key_size: 768,
            elgamal_certainty: 20,
            gost3410_key_size: 1024,
            gost3410_procedure: 2,
            ecdsa_curve: "SecP256r1".to_string(),
            ecgost3410_curve: "GostR3410x2001CryptoProA".to_string(),
        }
    }
}

impl AsymmetricDefaults {
    /// Rejects values no key generator could accept.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("rsa_key_size", self.rsa_key_size),
            ("rsa_certainty", self.rsa_certainty),
            ("dsa_key_size", self.dsa_key_size),
            ("dsa_certainty", self.dsa_certainty),
            ("elgamal_key_size", self.elgamal_key_size),
            ("elgamal_certainty", self.elgamal_certainty),
            ("gost3410_key_size", self.gost3410_key_size),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(CoreError::Config {
                    field: field.to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        }
        if self.rsa_public_exponent < 3 || self.rsa_public_exponent % 2 == 0 {
            return Err(CoreError::Config {
                field: "rsa_public_exponent".to_string(),
                reason: format!("{} is not an odd exponent >= 3", self.rsa_public_exponent),
            });
        }
        if !matches!(self.gost3410_procedure, 1 | 2) {
            return Err(CoreError::Config {
                field: "gost3410_procedure".to_string(),
                reason: format!("{} is not one of 1, 2", self.gost3410_procedure),
            });
        }
        Ok(())
    }
}

impl Config {
    #[cfg(feature = "toml")]
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.asymmetric.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            logging: LoggingConfig::default(),
            asymmetric: AsymmetricDefaults::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
