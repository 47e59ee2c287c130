// src/vault.rs
//! The assembled stack: one validated cipher, one classifier and the
//! runtime switches, shared by every unit of work.

use std::sync::Arc;

use crate::config::Config;
use crate::core::{
    DecodedStateRegistry, DiagnosticsSink, EngineSettings, Entity, FieldClassifier,
    TracingSink, TransitionEngine,
};
use crate::crypto::{build_cipher, CipherStrategy};
use crate::error::Result;
use crate::lifecycle::FieldEncryptionListener;

#[derive(Clone)]
pub struct FieldVault {
    cipher: Arc<dyn CipherStrategy>,
    classifier: Arc<FieldClassifier>,
    sink: Arc<dyn DiagnosticsSink>,
    settings: EngineSettings,
}

impl FieldVault {
    /// Build from config: cipher (capability-checked), annotations, switches
    pub fn from_config(config: &Config) -> Result<Self> {
        let cipher = build_cipher(&config.cipher)?;
        let classifier = Arc::new(FieldClassifier::new(config.annotations()));
        let settings = EngineSettings::from(&config.features);
        if settings.encryption_disabled {
            tracing::warn!("field encryption is disabled; sensitive fields are stored as-is");
        }
        Ok(Self::new(cipher, classifier).with_settings(settings))
    }

    pub fn new(cipher: Arc<dyn CipherStrategy>, classifier: Arc<FieldClassifier>) -> Self {
        Self {
            cipher,
            classifier,
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

    /// Classify `E` now so a misconfigured entity fails at startup
    pub fn register<E: Entity>(&self) -> Result<usize> {
        self.classifier.register::<E>()
    }

    pub fn cipher(&self) -> &Arc<dyn CipherStrategy> {
        &self.cipher
    }

    pub fn settings(&self) -> EngineSettings {
        self.settings
    }

    /// Listener backed by a fresh registry, for one unit of work
    pub fn unit_of_work(&self) -> FieldEncryptionListener {
        self.listener_with(Arc::new(DecodedStateRegistry::new()))
    }

    /// Listener sharing an existing registry
    pub fn listener_with(&self, registry: Arc<DecodedStateRegistry>) -> FieldEncryptionListener {
        let engine = TransitionEngine::new(
            Arc::clone(&self.cipher),
            Arc::clone(&self.classifier),
            registry,
        )
        .with_sink(Arc::clone(&self.sink))
        .with_settings(self.settings);
        FieldEncryptionListener::new(Arc::new(engine))
    }
}

impl std::fmt::Debug for FieldVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldVault")
            .field("cipher", &self.cipher.name())
            .field("classifier", &self.classifier)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
