// src/config/mod.rs
//! Configuration system for encrypted-field-vault
//!
//! Central, lazy-loaded global config with TOML + env overrides. Hosts that
//! manage their own config can build a [`Config`] explicitly instead.

pub use app::{load, CipherConfig, Config, EntityConfig, Features, Paths};

mod app;
mod defaults;
