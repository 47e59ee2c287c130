// src/lifecycle.rs
//! Lifecycle adapter: maps persistence callbacks onto engine transitions
//!
//! | callback       | direction | forced | changeset |
//! |----------------|-----------|--------|-----------|
//! | `pre_persist`  | encrypt   | yes    | no        |
//! | `post_persist` | decrypt   | no     | no        |
//! | `pre_update`   | encrypt   | no     | optional  |
//! | `post_update`  | decrypt   | no     | no        |
//! | `post_load`    | decrypt   | no     | no        |

use std::sync::Arc;

use crate::core::{Changeset, DecodedStateRegistry, Entity, TransitionEngine, TransitionReport};
use crate::enums::LifecycleEvent;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct FieldEncryptionListener {
    engine: Arc<TransitionEngine>,
}

impl FieldEncryptionListener {
    pub fn new(engine: Arc<TransitionEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &TransitionEngine {
        &self.engine
    }

    pub fn registry(&self) -> &DecodedStateRegistry {
        self.engine.registry()
    }

    pub fn pre_persist<E: Entity>(&self, entity: &mut E) -> Result<TransitionReport> {
        self.dispatch(LifecycleEvent::PrePersist, entity, None)
    }

    pub fn post_persist<E: Entity>(&self, entity: &mut E) -> Result<TransitionReport> {
        self.dispatch(LifecycleEvent::PostPersist, entity, None)
    }

    pub fn pre_update<E: Entity>(
        &self,
        entity: &mut E,
        changeset: Option<&mut Changeset>,
    ) -> Result<TransitionReport> {
        self.dispatch(LifecycleEvent::PreUpdate, entity, changeset)
    }

    pub fn post_update<E: Entity>(&self, entity: &mut E) -> Result<TransitionReport> {
        self.dispatch(LifecycleEvent::PostUpdate, entity, None)
    }

    pub fn post_load<E: Entity>(&self, entity: &mut E) -> Result<TransitionReport> {
        self.dispatch(LifecycleEvent::PostLoad, entity, None)
    }

    /// Single entry point for hosts that route every callback through one
    /// function. A changeset is only honoured for `PreUpdate`.
    pub fn dispatch<E: Entity>(
        &self,
        event: LifecycleEvent,
        entity: &mut E,
        changeset: Option<&mut Changeset>,
    ) -> Result<TransitionReport> {
        let changeset = match event {
            LifecycleEvent::PreUpdate => changeset,
            _ => None,
        };
        self.engine
            .transition(entity, event.direction(), event.is_forced(), changeset)
    }
}
