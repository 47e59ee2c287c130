// src/consts.rs
//! Shared constants: cipher parameters and config defaults

/// AES-GCM nonce length, prepended to every ciphertext
pub const AES_GCM_NONCE_SIZE: usize = 12;

/// AES-GCM authentication tag length
pub const AES_GCM_TAG_SIZE: usize = 16;

/// Number of hex characters shown for a key fingerprint in logs
pub const KEY_FINGERPRINT_HEX_LEN: usize = 16;

/// Default config file, overridable through `FV_CONFIG`
pub const DEFAULT_CONFIG_PATH: &str = "field-vault.toml";

/// Default SQLite file for the reference session host
pub const DEFAULT_STORE_DB: &str = "tests/data/store.db";

/// Values used by the startup capability check
pub const CAPABILITY_PROBE: &str = "field-vault capability probe \u{2713}";

/// Placeholder written to diagnostics instead of field values when verbose
/// diagnostics are off
pub const REDACTED: &str = "<redacted>";

pub const ENV_CONFIG: &str = "FV_CONFIG";
pub const ENV_SECRET: &str = "FV_SECRET";
pub const ENV_DISABLED: &str = "FV_DISABLED";
pub const ENV_VERBOSE: &str = "FV_VERBOSE";
