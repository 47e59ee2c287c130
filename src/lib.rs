// src/lib.rs
//! encrypted-field-vault — transparent field-level encryption for persistence
//! lifecycles
//!
//! Features:
//! - AES-256-GCM field cipher behind a pluggable, capability-checked strategy
//! - Per-identity decoded-state tracking (no double encrypt / decrypt)
//! - Registration-time sensitive-field tables, config-driven annotations
//! - Lifecycle adapter for pre/post persist, update and load callbacks
//! - SQLite reference session

pub mod aliases;
pub mod config;
pub mod consts;
pub mod core;
pub mod crypto;
pub mod db;
pub mod enums;
pub mod lifecycle;
pub mod vault;

pub mod error;

// Re-export everything users need at the crate root
pub use config::load as load_config;
pub use crate::core::{
    Changeset, DecodedStateRegistry, Entity, EntityId, FieldAnnotations, FieldClassifier,
    Property, TrackedIdentity, TransitionEngine, TransitionReport, TransitionStatus,
};
pub use crypto::{Aes256GcmCipher, CipherStrategy};
pub use db::{Record, Session};
pub use enums::{ChangesetPolicy, CipherAlgorithm, Direction, LifecycleEvent};
pub use error::{CipherError, CoreError, Result as CoreResult};
pub use lifecycle::FieldEncryptionListener;
pub use vault::FieldVault;
