// src/aliases.rs
//! Secret-holding types
//!
//! Everything here zeroizes its contents on drop.

use zeroize::Zeroizing;

/// 256-bit AES-GCM field key, derived from the configured secret
pub type FieldKey32 = Zeroizing<[u8; 32]>;

/// The static secret the cipher is constructed from
pub type CipherSecret = Zeroizing<String>;
