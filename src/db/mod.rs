// src/db/mod.rs
//! SQLite reference host
//!
//! A minimal persistence session that fires the five lifecycle callbacks
//! around its INSERT/UPDATE/SELECT statements, so sensitive columns are only
//! ever written as ciphertext.

pub mod session;
pub mod store_db_conn;

pub use session::{Record, Session};
pub use store_db_conn::{open_store_db, open_store_db_at};
