// src/core/mod.rs
//! The encryption state machine
//!
//! Objects are tracked by [`TrackedIdentity`]; the [`DecodedStateRegistry`]
//! records which identities currently hold plaintext, the
//! [`FieldClassifier`] says which fields are sensitive, and the
//! [`TransitionEngine`] moves an object between the two states.

pub mod changeset;
pub mod classifier;
pub mod diagnostics;
pub mod engine;
pub mod identity;
pub mod registry;

pub use changeset::Changeset;
pub use classifier::{
    AnnotationSource, FieldAnnotations, FieldClassifier, Getter, Property, SensitiveField, Setter,
};
pub use diagnostics::{Diagnostic, DiagnosticsSink, MemorySink, TracingSink};
pub use engine::{
    EngineSettings, FieldOutcome, FieldStatus, TransitionEngine, TransitionReport,
    TransitionStatus,
};
pub use identity::{Entity, EntityId, TrackedIdentity};
pub use registry::{DecodedStateRegistry, TransitionGuard};
