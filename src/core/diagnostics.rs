// src/core/diagnostics.rs
//! Structured diagnostics emitted by the transition engine
//!
//! The engine only needs somewhere to put a record; [`TracingSink`] forwards
//! to `tracing`, [`MemorySink`] keeps records for inspection.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use tracing::Level;

/// One structured event: severity, fixed message, key/value fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Level,
    pub message: &'static str,
    pub fields: Vec<(&'static str, String)>,
}

impl Diagnostic {
    pub fn new(severity: Level, message: &'static str) -> Self {
        Self {
            severity,
            message,
            fields: Vec::new(),
        }
    }

    pub fn with(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        self.fields.push((key, value.to_string()));
        self
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)?;
        for (key, value) in &self.fields {
            write!(f, " {key}={value}")?;
        }
        Ok(())
    }
}

pub trait DiagnosticsSink: Send + Sync {
    fn record(&self, event: &Diagnostic);
}

/// Forwards every record to the `tracing` dispatcher
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn record(&self, event: &Diagnostic) {
        let fields = FieldList(&event.fields);
        let message = event.message;
        match event.severity {
            Level::ERROR => tracing::error!(target: "field_vault", %fields, "{message}"),
            Level::WARN => tracing::warn!(target: "field_vault", %fields, "{message}"),
            Level::INFO => tracing::info!(target: "field_vault", %fields, "{message}"),
            Level::DEBUG => tracing::debug!(target: "field_vault", %fields, "{message}"),
            _ => tracing::trace!(target: "field_vault", %fields, "{message}"),
        }
    }
}

struct FieldList<'a>(&'a [(&'static str, String)]);

impl fmt::Display for FieldList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

/// Keeps every record in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Diagnostic> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain all records
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticsSink for MemorySink {
    fn record(&self, event: &Diagnostic) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
