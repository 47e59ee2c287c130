// src/config/defaults.rs
use crate::config::app::{CipherConfig, Features, Paths};
use crate::consts::DEFAULT_STORE_DB;
use crate::enums::{ChangesetPolicy, CipherAlgorithm};

/// Only used when no config file exists at all
pub const DEV_CIPHER_SECRET: &str = "dev-field-vault-secret-2025";

pub fn default_cipher() -> CipherConfig {
    CipherConfig {
        algorithm: CipherAlgorithm::default(),
        secret: Some(DEV_CIPHER_SECRET.into()),
    }
}

pub fn default_paths() -> Paths {
    Paths {
        store_db: DEFAULT_STORE_DB.into(),
    }
}

pub fn default_features() -> Features {
    Features {
        encryption_disabled: false,
        verbose_diagnostics: false,
        changeset_policy: ChangesetPolicy::default(),
    }
}
