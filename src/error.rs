// src/error.rs
//! Public error types for the entire crate

use thiserror::Error;

/// Fatal errors: configuration problems, storage failures.
///
/// Per-field cipher failures are *not* represented here; they are reported
/// through diagnostics and never escape a lifecycle callback.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("No cipher secret configured (set [cipher].secret or FV_SECRET)")]
    MissingSecret,

    #[error("Cipher `{name}` rejected by capability check: {reason}")]
    CipherRejected { name: String, reason: String },

    #[error("{0} has not been persisted yet")]
    NotPersisted(&'static str),

    #[error("Sensitive field `{type_name}.{field}` has no {missing}")]
    MissingAccessor {
        type_name: &'static str,
        field: String,
        missing: AccessorKind,
    },
}

/// Which half of an accessor/mutator pair is absent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    Accessor,
    Mutator,
    Both,
}

impl std::fmt::Display for AccessorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessorKind::Accessor => f.write_str("accessor"),
            AccessorKind::Mutator => f.write_str("mutator"),
            AccessorKind::Both => f.write_str("accessor or mutator"),
        }
    }
}

/// Why a cipher transform did not produce a value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CipherError {
    #[error("ciphertext is not valid base64")]
    Encoding,

    #[error("ciphertext too short ({0} bytes)")]
    Truncated(usize),

    #[error("authenticated encryption failed")]
    Aead,

    #[error("decrypted bytes are not valid UTF-8")]
    Utf8,

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
