// src/core/identity.rs
//! Object identity: what the registry is keyed by

use std::fmt;

use crate::core::classifier::Property;

/// Primary-key value of a persistent object
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityId {
    Int(i64),
    Text(String),
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        EntityId::Int(id)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        EntityId::Text(id.to_owned())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        EntityId::Text(id)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Int(id) => write!(f, "{id}"),
            EntityId::Text(id) => f.write_str(id),
        }
    }
}

/// A persistent type's metadata, registered once per type.
///
/// `properties` is the capability table the classifier reads: every
/// string-valued property with its accessor and mutator, in declaration
/// order. Which of them are sensitive is decided by an
/// [`AnnotationSource`](crate::core::AnnotationSource), not by the entity.
pub trait Entity: Sized + 'static {
    const TYPE_NAME: &'static str;

    /// `None` until storage has assigned one
    fn primary_key(&self) -> Option<EntityId>;

    fn properties() -> Vec<Property<Self>>;
}

/// (type name, primary key) of one persistent object instance
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackedIdentity {
    type_name: &'static str,
    id: EntityId,
}

impl TrackedIdentity {
    pub fn new(type_name: &'static str, id: impl Into<EntityId>) -> Self {
        Self {
            type_name,
            id: id.into(),
        }
    }

    pub fn of<E: Entity>(entity: &E) -> Option<Self> {
        entity.primary_key().map(|id| Self::new(E::TYPE_NAME, id))
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }
}

impl fmt::Display for TrackedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.type_name, self.id)
    }
}
