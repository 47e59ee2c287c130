// src/core/registry.rs
//! Decoded-state registry
//!
//! Maps an identity to "fields currently hold plaintext". A missing entry
//! means ciphertext. One registry belongs to one unit of work; it is never a
//! process global.

use std::collections::{HashMap, HashSet};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use crate::core::identity::TrackedIdentity;

#[derive(Default)]
struct RegistryState {
    decoded: HashMap<TrackedIdentity, bool>,
    in_flight: HashSet<TrackedIdentity>,
}

#[derive(Default)]
pub struct DecodedStateRegistry {
    state: Mutex<RegistryState>,
    released: Condvar,
}

impl DecodedStateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // Poisoning is ignored: every mutation is a single insert or remove.
    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// True iff the identity is present and marked plaintext
    pub fn has(&self, identity: &TrackedIdentity) -> bool {
        self.lock().decoded.get(identity).copied().unwrap_or(false)
    }

    pub fn mark_decrypted(&self, identity: TrackedIdentity) {
        self.lock().decoded.insert(identity, true);
    }

    pub fn mark_encrypted(&self, identity: &TrackedIdentity) {
        self.lock().decoded.remove(identity);
    }

    /// Drop whatever is known about an identity (back to "ciphertext")
    pub fn forget(&self, identity: &TrackedIdentity) {
        self.mark_encrypted(identity);
    }

    /// End of a unit of work
    pub fn clear(&self) {
        self.lock().decoded.clear();
    }

    /// Number of identities currently marked plaintext
    pub fn len(&self) -> usize {
        self.lock().decoded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Claim `identity` for one transition.
    ///
    /// Blocks while another transition holds the same identity, so the
    /// state check and the state update of a transition are atomic per
    /// identity. Not reentrant: a thread must not begin a second transition
    /// on an identity it already holds.
    pub fn begin(&self, identity: TrackedIdentity) -> TransitionGuard<'_> {
        let mut state = self.lock();
        while state.in_flight.contains(&identity) {
            state = self
                .released
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        state.in_flight.insert(identity.clone());
        TransitionGuard {
            registry: self,
            identity,
        }
    }
}

impl std::fmt::Debug for DecodedStateRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("DecodedStateRegistry")
            .field("decoded", &state.decoded.len())
            .field("in_flight", &state.in_flight.len())
            .finish()
    }
}

/// Exclusive claim on one identity, released on drop
pub struct TransitionGuard<'a> {
    registry: &'a DecodedStateRegistry,
    identity: TrackedIdentity,
}

impl TransitionGuard<'_> {
    pub fn identity(&self) -> &TrackedIdentity {
        &self.identity
    }

    pub fn is_decoded(&self) -> bool {
        self.registry.has(&self.identity)
    }

    pub fn mark_decrypted(&self) {
        self.registry.mark_decrypted(self.identity.clone());
    }

    pub fn mark_encrypted(&self) {
        self.registry.mark_encrypted(&self.identity);
    }
}

impl Drop for TransitionGuard<'_> {
    fn drop(&mut self) {
        self.registry.lock().in_flight.remove(&self.identity);
        self.registry.released.notify_all();
    }
}
