// src/bin/field_vault_check.rs
//! Startup check: load config, build and validate the field cipher
//!
//! Usage:
//!   field-vault-check                 validate config + cipher
//!   field-vault-check encrypt <text>  print ciphertext for <text>
//!   field-vault-check decrypt <b64>   print plaintext for <b64>

use anyhow::{bail, Context, Result};
use encrypted_field_vault::config;
use encrypted_field_vault::crypto::{build_cipher, derive_key, key_fingerprint, CipherStrategy};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::load().context("Failed to load configuration")?;
    let cipher = build_cipher(&config.cipher).context("Cipher failed the capability check")?;
    let secret = config.cipher.secret()?;

    info!(
        cipher = cipher.name(),
        key = %key_fingerprint(&derive_key(&secret)),
        disabled = config.features.encryption_disabled,
        verbose = config.features.verbose_diagnostics,
        "cipher accepted"
    );
    for (entity, fields) in &config.entities {
        info!(entity = %entity, sensitive = ?fields.sensitive, "annotated entity");
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => {}
        [cmd, value] if cmd == "encrypt" => {
            let sealed = cipher.encrypt(value).context("encrypt failed")?;
            println!("{sealed}");
        }
        [cmd, value] if cmd == "decrypt" => {
            let opened = cipher.decrypt(value).context("decrypt failed")?;
            println!("{opened}");
        }
        _ => bail!("usage: field-vault-check [encrypt <text> | decrypt <ciphertext>]"),
    }

    Ok(())
}
