// src/crypto/mod.rs
//! Field cipher strategies: pure string-to-string transforms
//!
//! The transition engine only ever sees a [`CipherStrategy`]. A candidate
//! strategy must pass [`validate_strategy`] before it is handed out; the
//! built-in AES-256-GCM cipher is selected through [`build_cipher`].

mod gcm;
mod key;

use std::sync::Arc;

pub use gcm::Aes256GcmCipher;
pub use key::{derive_key, key_fingerprint};

use crate::config::CipherConfig;
use crate::consts::CAPABILITY_PROBE;
use crate::enums::CipherAlgorithm;
use crate::error::{CipherError, CoreError, Result};

pub type CipherResult<T> = std::result::Result<T, CipherError>;

/// A pluggable encrypt/decrypt pair over strings.
///
/// Implementations hold no mutable state besides their key, so a single
/// instance is shared across threads.
pub trait CipherStrategy: Send + Sync {
    /// Short name used in logs and error messages
    fn name(&self) -> &str;

    fn encrypt(&self, plaintext: &str) -> CipherResult<String>;

    fn decrypt(&self, ciphertext: &str) -> CipherResult<String>;
}

impl<C: CipherStrategy + ?Sized> CipherStrategy for Arc<C> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn encrypt(&self, plaintext: &str) -> CipherResult<String> {
        (**self).encrypt(plaintext)
    }

    fn decrypt(&self, ciphertext: &str) -> CipherResult<String> {
        (**self).decrypt(ciphertext)
    }
}

/// Capability check: the candidate must turn plaintext into something else
/// and get the exact plaintext back, for both a regular and an empty value.
pub fn validate_strategy(candidate: &dyn CipherStrategy) -> Result<()> {
    let reject = |reason: String| CoreError::CipherRejected {
        name: candidate.name().to_owned(),
        reason,
    };

    for probe in [CAPABILITY_PROBE, ""] {
        let sealed = candidate
            .encrypt(probe)
            .map_err(|e| reject(format!("encrypt failed: {e}")))?;
        if sealed == probe {
            return Err(reject("ciphertext equals plaintext".into()));
        }
        let opened = candidate
            .decrypt(&sealed)
            .map_err(|e| reject(format!("decrypt failed: {e}")))?;
        if opened != probe {
            return Err(reject("decrypt did not restore the plaintext".into()));
        }
    }
    Ok(())
}

/// Validate a candidate and, if it conforms, make it the shared strategy
pub fn accept<C: CipherStrategy + 'static>(candidate: C) -> Result<Arc<dyn CipherStrategy>> {
    validate_strategy(&candidate)?;
    tracing::debug!(cipher = candidate.name(), "cipher strategy accepted");
    Ok(Arc::new(candidate))
}

/// Build the configured cipher from its secret and run the capability check
pub fn build_cipher(config: &CipherConfig) -> Result<Arc<dyn CipherStrategy>> {
    let secret = config.secret()?;
    match config.algorithm {
        CipherAlgorithm::Aes256Gcm => accept(Aes256GcmCipher::new(&secret)),
    }
}
