//! Node types of the object tree.

use crate::model::id::ObjectId;
use crate::schema::{ClassInfo, PropertyInfo};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Value stored under a property name of a composite node.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Plain data (numbers, strings, booleans, references by name, ...).
    Scalar(serde_json::Value),
    /// An owned child node (Object or Array property).
    Child(ObjectId),
}

impl PropertyValue {
    pub fn as_scalar(&self) -> Option<&serde_json::Value> {
        match self {
            PropertyValue::Scalar(value) => Some(value),
            PropertyValue::Child(_) => None,
        }
    }

    pub fn as_child(&self) -> Option<ObjectId> {
        match self {
            PropertyValue::Child(id) => Some(*id),
            PropertyValue::Scalar(_) => None,
        }
    }
}

/// Variant-specific storage of a node.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Composite {
        properties: HashMap<String, PropertyValue>,
    },
    Array {
        elements: Vec<ObjectId>,
    },
}

/// A composite or array node stored in the tree arena.
#[derive(Debug, Clone)]
pub struct ObjectNode {
    /// Arena handle of this node.
    pub handle: ObjectId,
    /// Dotted identifier: parent id + "." + key, or the root id.
    pub id: String,
    /// Slot in the parent: property name, or minted element key inside an array.
    pub key: Option<String>,
    /// Non-owning back-reference used for traversal only.
    pub parent: Option<ObjectId>,
    /// For arrays this is the element class declared by the owning property.
    pub class: Arc<ClassInfo>,
    /// Descriptor of the property slot this node occupies, if any.
    pub property_info: Option<Arc<PropertyInfo>>,
    /// Counter for minting unique element keys. Never decreases.
    pub last_child_id: u32,
    pub modification_time: Option<DateTime<Utc>>,
    pub kind: NodeKind,
}

impl ObjectNode {
    pub fn is_array(&self) -> bool {
        matches!(self.kind, NodeKind::Array { .. })
    }

    pub fn elements(&self) -> Option<&[ObjectId]> {
        match &self.kind {
            NodeKind::Array { elements } => Some(elements),
            NodeKind::Composite { .. } => None,
        }
    }

    pub fn properties(&self) -> Option<&HashMap<String, PropertyValue>> {
        match &self.kind {
            NodeKind::Composite { properties } => Some(properties),
            NodeKind::Array { .. } => None,
        }
    }

    /// Raw named field, without consulting the class schema.
    pub fn field(&self, name: &str) -> Option<&PropertyValue> {
        self.properties().and_then(|p| p.get(name))
    }
}

/// Handle to anything addressable in the tree.
///
/// `Value` wraps a leaf property of a composite node so it can be selected,
/// labelled and located like a node. Value handles are built on demand and
/// never stored; two of them are equal when they name the same parent and key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjectRef {
    Node(ObjectId),
    Value { parent: ObjectId, key: String },
}

impl ObjectRef {
    pub fn value(parent: ObjectId, key: impl Into<String>) -> Self {
        ObjectRef::Value {
            parent,
            key: key.into(),
        }
    }

    /// Arena handle for node refs, `None` for value wrappers.
    pub fn node(&self) -> Option<ObjectId> {
        match self {
            ObjectRef::Node(id) => Some(*id),
            ObjectRef::Value { .. } => None,
        }
    }
}

impl From<ObjectId> for ObjectRef {
    fn from(id: ObjectId) -> Self {
        ObjectRef::Node(id)
    }
}

/// Tri-state discrimination of a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Object,
    Array,
    Value,
}

/// One step of an object path: a property name or an array position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}
