// src/config/app.rs
use super::defaults::*;
use crate::aliases::CipherSecret;
use crate::consts::{DEFAULT_CONFIG_PATH, ENV_CONFIG, ENV_DISABLED, ENV_SECRET, ENV_VERBOSE};
use crate::core::FieldAnnotations;
use crate::enums::{ChangesetPolicy, CipherAlgorithm};
use crate::error::{CoreError, Result};
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use zeroize::Zeroizing;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cipher: CipherConfig,
    #[serde(default)]
    pub features: Features,
    #[serde(default)]
    pub paths: Paths,
    /// `[entities.<TypeName>]` tables
    #[serde(default)]
    pub entities: BTreeMap<String, EntityConfig>,
}

#[derive(Clone, Default, Deserialize)]
pub struct CipherConfig {
    #[serde(default)]
    pub algorithm: CipherAlgorithm,
    pub secret: Option<String>,
}

// Never print the secret
impl std::fmt::Debug for CipherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherConfig")
            .field("algorithm", &self.algorithm)
            .field("secret", &self.secret.as_ref().map(|_| "<set>"))
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Features {
    #[serde(default)]
    pub encryption_disabled: bool,
    #[serde(default)]
    pub verbose_diagnostics: bool,
    #[serde(default)]
    pub changeset_policy: ChangesetPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Paths {
    pub store_db: String,
}

impl Default for Paths {
    fn default() -> Self {
        default_paths()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntityConfig {
    #[serde(default)]
    pub sensitive: Vec<String>,
}

impl CipherConfig {
    /// The configured secret, moved into zeroizing storage
    pub fn secret(&self) -> Result<CipherSecret> {
        match self.secret.as_deref() {
            Some(s) if !s.is_empty() => Ok(Zeroizing::new(s.to_owned())),
            _ => Err(CoreError::MissingSecret),
        }
    }
}

impl Config {
    /// Parse a TOML document. No env overrides are applied.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a TOML file. No env overrides are applied.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Built-in development defaults
    pub fn builtin() -> Self {
        Config {
            cipher: default_cipher(),
            features: default_features(),
            paths: default_paths(),
            entities: BTreeMap::new(),
        }
    }

    /// Apply `FV_SECRET`, `FV_DISABLED` and `FV_VERBOSE`
    pub fn apply_env_overrides(&mut self) {
        if let Ok(secret) = std::env::var(ENV_SECRET) {
            self.cipher.secret = Some(secret);
        }
        if let Some(flag) = env_flag(ENV_DISABLED) {
            self.features.encryption_disabled = flag;
        }
        if let Some(flag) = env_flag(ENV_VERBOSE) {
            self.features.verbose_diagnostics = flag;
        }
    }

    /// Sensitive-field marks declared under `[entities.*]`
    pub fn annotations(&self) -> FieldAnnotations {
        let mut annotations = FieldAnnotations::new();
        for (type_name, entity) in &self.entities {
            for field in &entity.sensitive {
                annotations.mark(type_name, field);
            }
        }
        annotations
    }
}

fn env_flag(name: &str) -> Option<bool> {
    let value = std::env::var(name).ok()?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            tracing::warn!(var = name, %value, "ignoring unrecognised boolean");
            None
        }
    }
}

static CONFIG: OnceCell<Config> = OnceCell::new();

/// Load the process config once from `FV_CONFIG` or `field-vault.toml`,
/// falling back to built-in defaults when the file is missing
pub fn load() -> Result<&'static Config> {
    CONFIG.get_or_try_init(|| {
        let config_path =
            std::env::var(ENV_CONFIG).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut conf = if Path::new(&config_path).exists() {
            Config::from_path(&config_path)?
        } else {
            tracing::warn!(path = %config_path, "config file not found, using built-in defaults");
            Config::builtin()
        };

        conf.apply_env_overrides();
        Ok(conf)
    })
}
