// src/core/classifier.rs
//! Field classification
//!
//! Combines an entity's registered property table with an annotation source
//! to produce the ordered list of sensitive fields for that type. The result
//! is computed once per type and cached.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use indexmap::IndexSet;

use crate::core::identity::Entity;
use crate::error::{AccessorKind, CoreError, Result};

pub type Getter<E> = fn(&E) -> Option<String>;
pub type Setter<E> = fn(&mut E, Option<String>);

/// One string-valued property of an entity
pub struct Property<E> {
    name: &'static str,
    get: Option<Getter<E>>,
    set: Option<Setter<E>>,
}

impl<E> Property<E> {
    pub fn new(name: &'static str, get: Getter<E>, set: Setter<E>) -> Self {
        Self {
            name,
            get: Some(get),
            set: Some(set),
        }
    }

    /// Derived or computed value without a mutator
    pub fn read_only(name: &'static str, get: Getter<E>) -> Self {
        Self {
            name,
            get: Some(get),
            set: None,
        }
    }

    pub fn write_only(name: &'static str, set: Setter<E>) -> Self {
        Self {
            name,
            get: None,
            set: Some(set),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn sensitive(&self, type_name: &'static str) -> Result<SensitiveField<E>> {
        let missing = match (self.get, self.set) {
            (Some(get), Some(set)) => {
                return Ok(SensitiveField {
                    name: self.name,
                    get,
                    set,
                })
            }
            (None, Some(_)) => AccessorKind::Accessor,
            (Some(_), None) => AccessorKind::Mutator,
            (None, None) => AccessorKind::Both,
        };
        Err(CoreError::MissingAccessor {
            type_name,
            field: self.name.to_owned(),
            missing,
        })
    }
}

/// A sensitive field with its accessor/mutator pair
pub struct SensitiveField<E> {
    name: &'static str,
    get: Getter<E>,
    set: Setter<E>,
}

impl<E> SensitiveField<E> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn read(&self, entity: &E) -> Option<String> {
        (self.get)(entity)
    }

    pub fn write(&self, entity: &mut E, value: Option<String>) {
        (self.set)(entity, value)
    }
}

impl<E> std::fmt::Debug for SensitiveField<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SensitiveField").field(&self.name).finish()
    }
}

/// Where "this field is sensitive" marks come from
pub trait AnnotationSource: Send + Sync {
    fn is_marked_sensitive(&self, type_name: &str, field: &str) -> bool;

    /// Every field marked on `type_name`, declared or not
    fn marked_fields(&self, type_name: &str) -> Vec<String>;
}

/// Sensitive marks keyed by type name, built in code or from config
#[derive(Debug, Clone, Default)]
pub struct FieldAnnotations {
    marks: HashMap<String, IndexSet<String>>,
}

impl FieldAnnotations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, type_name: &str, field: &str) -> &mut Self {
        self.marks
            .entry(type_name.to_owned())
            .or_default()
            .insert(field.to_owned());
        self
    }

    pub fn with<I, S>(mut self, type_name: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for field in fields {
            self.mark(type_name, field.as_ref());
        }
        self
    }
}

impl AnnotationSource for FieldAnnotations {
    fn is_marked_sensitive(&self, type_name: &str, field: &str) -> bool {
        self.marks
            .get(type_name)
            .is_some_and(|fields| fields.contains(field))
    }

    fn marked_fields(&self, type_name: &str) -> Vec<String> {
        self.marks
            .get(type_name)
            .map(|fields| fields.iter().cloned().collect())
            .unwrap_or_default()
    }
}

type CachedFields = Box<dyn Any + Send + Sync>;

pub struct FieldClassifier {
    annotations: Box<dyn AnnotationSource>,
    cache: Mutex<HashMap<TypeId, CachedFields>>,
}

impl FieldClassifier {
    pub fn new(annotations: impl AnnotationSource + 'static) -> Self {
        Self {
            annotations: Box::new(annotations),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Sensitive fields of `E`, in property declaration order.
    ///
    /// Fails when a marked field has no accessor or no mutator, or is not a
    /// declared property at all.
    pub fn fields_of<E: Entity>(&self) -> Result<Arc<[SensitiveField<E>]>> {
        let key = TypeId::of::<E>();
        {
            let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(fields) = cache
                .get(&key)
                .and_then(|cached| cached.downcast_ref::<Arc<[SensitiveField<E>]>>())
            {
                return Ok(Arc::clone(fields));
            }
        }

        let fields: Arc<[SensitiveField<E>]> = self.classify::<E>()?.into();
        tracing::debug!(
            entity = E::TYPE_NAME,
            fields = ?fields.iter().map(SensitiveField::name).collect::<Vec<_>>(),
            "classified sensitive fields"
        );
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, Box::new(Arc::clone(&fields)));
        Ok(fields)
    }

    /// Classify `E` eagerly so configuration errors surface at startup.
    /// Returns the number of sensitive fields.
    pub fn register<E: Entity>(&self) -> Result<usize> {
        self.fields_of::<E>().map(|fields| fields.len())
    }

    fn classify<E: Entity>(&self) -> Result<Vec<SensitiveField<E>>> {
        let properties = E::properties();

        for marked in self.annotations.marked_fields(E::TYPE_NAME) {
            if !properties.iter().any(|p| p.name == marked) {
                return Err(CoreError::MissingAccessor {
                    type_name: E::TYPE_NAME,
                    field: marked,
                    missing: AccessorKind::Both,
                });
            }
        }

        properties
            .iter()
            .filter(|p| self.annotations.is_marked_sensitive(E::TYPE_NAME, p.name))
            .map(|p| p.sensitive(E::TYPE_NAME))
            .collect()
    }
}

impl std::fmt::Debug for FieldClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cached = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("FieldClassifier")
            .field("cached_types", &cached)
            .finish_non_exhaustive()
    }
}
