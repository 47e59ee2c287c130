// src/core/engine.rs
//! Transition engine: moves an object between PLAINTEXT and CIPHERTEXT
//!
//! ```text
//!   PLAINTEXT ──encrypt──▶ CIPHERTEXT
//!   CIPHERTEXT ──decrypt──▶ PLAINTEXT
//! ```
//!
//! The registry is consulted before a transition (unless forced) and
//! updated after it, both under a per-identity guard. Cipher failures are
//! per field: they are reported and the remaining fields still run.

use std::sync::Arc;

use tracing::Level;

use crate::config::Features;
use crate::consts::REDACTED;
use crate::core::changeset::Changeset;
use crate::core::classifier::FieldClassifier;
use crate::core::diagnostics::{Diagnostic, DiagnosticsSink, TracingSink};
use crate::core::identity::{Entity, TrackedIdentity};
use crate::core::registry::DecodedStateRegistry;
use crate::crypto::{CipherResult, CipherStrategy};
use crate::enums::{ChangesetPolicy, Direction};
use crate::error::{CipherError, Result};

/// Runtime switches, fixed for the engine's lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineSettings {
    pub encryption_disabled: bool,
    pub verbose_diagnostics: bool,
    pub changeset_policy: ChangesetPolicy,
}

impl From<&Features> for EngineSettings {
    fn from(features: &Features) -> Self {
        Self {
            encryption_disabled: features.encryption_disabled,
            verbose_diagnostics: features.verbose_diagnostics,
            changeset_policy: features.changeset_policy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionStatus {
    /// Encryption switched off; nothing touched
    Disabled,
    /// Object has no primary key and the transition was not forced
    MissingIdentity,
    /// Registry says the object is already in the target state
    AlreadyInState,
    /// The type has no sensitive fields
    NoSensitiveFields,
    /// Sensitive fields were visited
    Applied,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldStatus {
    Transformed,
    /// No value to transform
    Null,
    Failed(CipherError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOutcome {
    pub field: &'static str,
    pub previous: Option<String>,
    pub current: Option<String>,
    pub status: FieldStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionReport {
    pub direction: Direction,
    pub status: TransitionStatus,
    pub identity: Option<TrackedIdentity>,
    pub outcomes: Vec<FieldOutcome>,
}

impl TransitionReport {
    fn skipped(
        direction: Direction,
        status: TransitionStatus,
        identity: Option<TrackedIdentity>,
    ) -> Self {
        Self {
            direction,
            status,
            identity,
            outcomes: Vec::new(),
        }
    }

    /// Whether sensitive fields were found and visited. Callers use this to
    /// skip further work for types with nothing to protect.
    pub fn annotated(&self) -> bool {
        self.status == TransitionStatus::Applied
    }

    pub fn transformed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == FieldStatus::Transformed)
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &FieldOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, FieldStatus::Failed(_)))
    }

    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }
}

pub struct TransitionEngine {
    cipher: Arc<dyn CipherStrategy>,
    classifier: Arc<FieldClassifier>,
    registry: Arc<DecodedStateRegistry>,
    sink: Arc<dyn DiagnosticsSink>,
    settings: EngineSettings,
}

impl TransitionEngine {
    pub fn new(
        cipher: Arc<dyn CipherStrategy>,
        classifier: Arc<FieldClassifier>,
        registry: Arc<DecodedStateRegistry>,
    ) -> Self {
        Self {
            cipher,
            classifier,
            registry,
            sink: Arc::new(TracingSink),
            settings: EngineSettings::default(),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticsSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> EngineSettings {
        self.settings
    }

    pub fn registry(&self) -> &Arc<DecodedStateRegistry> {
        &self.registry
    }

    /// Encrypt sensitive fields in place. `forced` bypasses the registry
    /// precondition (first persist of a new object).
    pub fn encrypt<E: Entity>(&self, entity: &mut E, forced: bool) -> Result<TransitionReport> {
        self.transition(entity, Direction::Encrypt, forced, None)
    }

    pub fn decrypt<E: Entity>(&self, entity: &mut E) -> Result<TransitionReport> {
        self.transition(entity, Direction::Decrypt, false, None)
    }

    /// Encrypt for an update, publishing ciphertext into `changeset` (and
    /// into the object, depending on [`ChangesetPolicy`]).
    pub fn encrypt_changeset<E: Entity>(
        &self,
        entity: &mut E,
        changeset: &mut Changeset,
    ) -> Result<TransitionReport> {
        self.transition(entity, Direction::Encrypt, false, Some(changeset))
    }

    /// Run one transition.
    ///
    /// Only classification errors are returned; everything else ends up in
    /// the report and the diagnostics sink. A failed field has no new value,
    /// so its diagnostic carries the cipher error in its place.
    pub fn transition<E: Entity>(
        &self,
        entity: &mut E,
        direction: Direction,
        forced: bool,
        mut changeset: Option<&mut Changeset>,
    ) -> Result<TransitionReport> {
        if self.settings.encryption_disabled {
            return Ok(TransitionReport::skipped(
                direction,
                TransitionStatus::Disabled,
                None,
            ));
        }

        let identity = TrackedIdentity::of(entity);
        let guard = match &identity {
            Some(id) => Some(self.registry.begin(id.clone())),
            None if forced => None,
            None => {
                self.emit(
                    Diagnostic::new(Level::WARN, "object has no primary key, transition skipped")
                        .with("entity", E::TYPE_NAME)
                        .with("direction", direction.as_str()),
                );
                return Ok(TransitionReport::skipped(
                    direction,
                    TransitionStatus::MissingIdentity,
                    None,
                ));
            }
        };

        if let (false, Some(guard)) = (forced, &guard) {
            let decoded = guard.is_decoded();
            let in_target_state = match direction {
                Direction::Encrypt => !decoded,
                Direction::Decrypt => decoded,
            };
            if in_target_state {
                if self.settings.verbose_diagnostics {
                    self.emit(
                        Diagnostic::new(Level::TRACE, "already in target state")
                            .with("identity", guard.identity())
                            .with("direction", direction.as_str()),
                    );
                }
                return Ok(TransitionReport::skipped(
                    direction,
                    TransitionStatus::AlreadyInState,
                    identity,
                ));
            }
        }

        let fields = self.classifier.fields_of::<E>()?;
        if fields.is_empty() {
            self.emit(
                Diagnostic::new(Level::DEBUG, "no annotated fields").with("entity", E::TYPE_NAME),
            );
            return Ok(TransitionReport::skipped(
                direction,
                TransitionStatus::NoSensitiveFields,
                identity,
            ));
        }

        // Under ChangesetOnly the object keeps its plaintext during an
        // update, so neither the object nor the registry may change.
        let writes_object = direction == Direction::Decrypt
            || changeset.is_none()
            || self.settings.changeset_policy == ChangesetPolicy::MirrorToObject;

        let label = identity
            .as_ref()
            .map_or_else(|| format!("{}#<new>", E::TYPE_NAME), ToString::to_string);
        let mut outcomes = Vec::with_capacity(fields.len());

        for field in fields.iter() {
            let staged = changeset.as_deref().and_then(|cs| cs.get(field.name()).cloned());
            if staged.is_none() && !writes_object {
                continue;
            }
            let previous = staged.unwrap_or_else(|| field.read(entity));

            let Some(value) = previous.as_deref() else {
                outcomes.push(FieldOutcome {
                    field: field.name(),
                    previous: None,
                    current: None,
                    status: FieldStatus::Null,
                });
                continue;
            };

            match self.apply(direction, value) {
                Ok(next) => {
                    if let Some(cs) = changeset.as_deref_mut() {
                        cs.replace(field.name(), Some(next.clone()));
                    }
                    if writes_object {
                        field.write(entity, Some(next.clone()));
                    }
                    if self.settings.verbose_diagnostics {
                        self.emit(
                            Diagnostic::new(Level::TRACE, "field transformed")
                                .with("identity", &label)
                                .with("field", field.name())
                                .with("direction", direction.as_str())
                                .with("old", value)
                                .with("new", &next),
                        );
                    }
                    outcomes.push(FieldOutcome {
                        field: field.name(),
                        previous: previous.clone(),
                        current: Some(next),
                        status: FieldStatus::Transformed,
                    });
                }
                Err(error) => {
                    self.emit(
                        Diagnostic::new(Level::WARN, "field transform failed")
                            .with("identity", &label)
                            .with("field", field.name())
                            .with("direction", direction.as_str())
                            .with("old", self.reveal(value))
                            .with("error", &error),
                    );
                    outcomes.push(FieldOutcome {
                        field: field.name(),
                        previous: previous.clone(),
                        current: previous.clone(),
                        status: FieldStatus::Failed(error),
                    });
                }
            }
        }

        // A visited null counts as done. After a decrypt the caller holds
        // whatever is in the object now, so it is plaintext even when every
        // field failed. An encrypt where every value failed still holds
        // plaintext and stays decoded.
        let settled = match direction {
            Direction::Decrypt => !outcomes.is_empty(),
            Direction::Encrypt => outcomes
                .iter()
                .any(|o| !matches!(o.status, FieldStatus::Failed(_))),
        };
        if let (true, true, Some(guard)) = (settled, writes_object, &guard) {
            match direction {
                Direction::Encrypt => guard.mark_encrypted(),
                Direction::Decrypt => guard.mark_decrypted(),
            }
        }

        Ok(TransitionReport {
            direction,
            status: TransitionStatus::Applied,
            identity,
            outcomes,
        })
    }

    fn apply(&self, direction: Direction, value: &str) -> CipherResult<String> {
        match direction {
            Direction::Encrypt => self.cipher.encrypt(value),
            Direction::Decrypt => self.cipher.decrypt(value),
        }
    }

    fn reveal<'a>(&self, value: &'a str) -> &'a str {
        if self.settings.verbose_diagnostics {
            value
        } else {
            REDACTED
        }
    }

    fn emit(&self, event: Diagnostic) {
        self.sink.record(&event);
    }
}

impl std::fmt::Debug for TransitionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionEngine")
            .field("cipher", &self.cipher.name())
            .field("registry", &self.registry)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
