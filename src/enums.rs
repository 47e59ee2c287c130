// src/enums.rs
//! Public enum types used throughout the crate
//!
//! Central location for the small choice enums: cipher algorithms,
//! transform directions, lifecycle events, changeset handling.

use serde::{Deserialize, Serialize};

/// Supported field cipher algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[non_exhaustive]
pub enum CipherAlgorithm {
    #[default]
    #[serde(rename = "aes-256-gcm", alias = "Aes256Gcm")]
    Aes256Gcm,
    // Future:
    // ChaCha20Poly1305,
    // XChaCha20Poly1305,
}

/// Which way a transition transforms sensitive fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// plaintext → ciphertext (persist, update)
    Encrypt,
    /// ciphertext → plaintext (load, after write)
    Decrypt,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Encrypt => "encrypt",
            Direction::Decrypt => "decrypt",
        }
    }
}

/// The five persistence callbacks the lifecycle adapter understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    PrePersist,
    PostPersist,
    PreUpdate,
    PostUpdate,
    PostLoad,
}

impl LifecycleEvent {
    /// Transform direction implied by the callback
    pub fn direction(self) -> Direction {
        match self {
            LifecycleEvent::PrePersist | LifecycleEvent::PreUpdate => Direction::Encrypt,
            LifecycleEvent::PostPersist | LifecycleEvent::PostUpdate | LifecycleEvent::PostLoad => {
                Direction::Decrypt
            }
        }
    }

    /// Only the first persist of a new object skips the registry precondition
    pub fn is_forced(self) -> bool {
        matches!(self, LifecycleEvent::PrePersist)
    }
}

/// How an update transition publishes its ciphertext
///
/// Some hosts only honour values staged in the changeset during the update
/// callback; others need the object itself mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangesetPolicy {
    /// Write into the changeset *and* through the field mutator
    #[default]
    MirrorToObject,
    /// Write into the changeset only; the object keeps its plaintext
    ChangesetOnly,
}
