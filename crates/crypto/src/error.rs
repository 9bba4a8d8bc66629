//! Error types for descriptor construction and operation execution.

use thiserror::Error;

/// Errors raised while building or running an operation.
///
/// Name resolution never produces these; registries return `Option`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// A resolved mechanism was asked for an illegal size, mode or padding.
    #[error("Unsupported configuration for {mechanism}: {parameter} = {value} ({reason})")]
    UnsupportedConfiguration {
        mechanism: String,
        parameter: String,
        value: String,
        reason: String,
    },

    /// Missing input or an out-of-range sub-slice.
    #[error("Invalid argument '{argument}': {reason}")]
    InvalidArgument { argument: String, reason: String },

    /// The configuration is legal but no linked backend executes it.
    #[error("Mechanism {mechanism} is unavailable: {detail}")]
    Unavailable { mechanism: String, detail: String },

    #[error("Invalid key: {reason}")]
    InvalidKey { reason: String },

    #[error("Decryption failed: {reason}")]
    Decryption { reason: String },

    #[error("Signing failed: {reason}")]
    Signing { reason: String },

    #[error("Verification failed: {reason}")]
    Verification { reason: String },

    /// An AEAD encryption instance was asked to encrypt a second message.
    #[error("AEAD cipher {mechanism} was already used for encryption; create a new cipher per message")]
    NonceReuse { mechanism: String },
}

impl CryptoError {
    pub(crate) fn unsupported(
        mechanism: impl Into<String>,
        parameter: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        let error = CryptoError::UnsupportedConfiguration {
            mechanism: mechanism.into(),
            parameter: parameter.into(),
            value: value.to_string(),
            reason: reason.into(),
        };
        tracing::warn!(%error, "configuration rejected");
        error
    }

    pub(crate) fn invalid_argument(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        CryptoError::InvalidArgument {
            argument: argument.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unavailable(mechanism: impl Into<String>, detail: impl Into<String>) -> Self {
        CryptoError::Unavailable {
            mechanism: mechanism.into(),
            detail: detail.into(),
        }
    }
}

pub type CryptoResult<T> = std::result::Result<T, CryptoError>;
