// src/crypto/gcm.rs
//! AES-256-GCM field cipher
//!
//! Layout of a sealed value, before base64 (standard alphabet, padded):
//! `[12-byte nonce][ciphertext][16-byte tag]`. A fresh random nonce is drawn
//! for every call, so encrypting the same plaintext twice never yields the
//! same string.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::key::{derive_key, key_fingerprint};
use super::{CipherResult, CipherStrategy};
use crate::aliases::CipherSecret;
use crate::consts::{AES_GCM_NONCE_SIZE, AES_GCM_TAG_SIZE};
use crate::error::CipherError;

pub struct Aes256GcmCipher {
    cipher: Aes256Gcm,
    fingerprint: String,
}

impl Aes256GcmCipher {
    pub fn new(secret: &CipherSecret) -> Self {
        let key = derive_key(secret);
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_slice()));
        Self {
            cipher,
            fingerprint: key_fingerprint(&key),
        }
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

impl std::fmt::Debug for Aes256GcmCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aes256GcmCipher")
            .field("fingerprint", &self.fingerprint)
            .finish_non_exhaustive()
    }
}

impl CipherStrategy for Aes256GcmCipher {
    fn name(&self) -> &str {
        "aes-256-gcm"
    }

    fn encrypt(&self, plaintext: &str) -> CipherResult<String> {
        let nonce: [u8; AES_GCM_NONCE_SIZE] = rand::random();
        let sealed = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
            .map_err(|_| CipherError::Aead)?;

        let mut out = Vec::with_capacity(nonce.len() + sealed.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&sealed);
        Ok(STANDARD.encode(out))
    }

    fn decrypt(&self, ciphertext: &str) -> CipherResult<String> {
        let raw = STANDARD
            .decode(ciphertext)
            .map_err(|_| CipherError::Encoding)?;
        if raw.len() < AES_GCM_NONCE_SIZE + AES_GCM_TAG_SIZE {
            return Err(CipherError::Truncated(raw.len()));
        }

        let (nonce, sealed) = raw.split_at(AES_GCM_NONCE_SIZE);
        let opened = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), sealed)
            .map_err(|_| CipherError::Aead)?;
        String::from_utf8(opened).map_err(|_| CipherError::Utf8)
    }
}
