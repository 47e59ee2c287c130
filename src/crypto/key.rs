// src/crypto/key.rs
use blake3::Hasher;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::aliases::FieldKey32;
use crate::consts::KEY_FINGERPRINT_HEX_LEN;

const FINGERPRINT_CONTEXT: &str = "encrypted-field-vault 2025 key fingerprint";

/// SHA-256 of the configured secret
pub fn derive_key(secret: &str) -> FieldKey32 {
    let digest = Sha256::digest(secret.as_bytes());
    let mut key = Zeroizing::new([0u8; 32]);
    key.copy_from_slice(&digest);
    key
}

/// Short, non-reversible identifier for a key, safe to log
pub fn key_fingerprint(key: &FieldKey32) -> String {
    let mut hasher = Hasher::new_derive_key(FINGERPRINT_CONTEXT);
    hasher.update(key.as_slice());
    hasher.finalize().to_hex().as_str()[..KEY_FINGERPRINT_HEX_LEN].to_owned()
}
