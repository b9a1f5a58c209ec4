//! # project-model: schema-driven object trees
//!
//! A generic document model for project editors. Documents are trees of
//! objects whose shape is described by class schemas; every query the
//! editors need (children for the navigation tree, paths, ancestry, labels,
//! property flags) is answered from the schema, never from hard-coded types.
//!
//! ## Architecture
//!
//! - **Schema**: [`PropertyInfo`] and [`ClassInfo`] descriptors, composed
//!   once per derived class and kept in an explicit [`ClassRegistry`]
//! - **Model**: an arena-backed [`ObjectTree`] of composite and array nodes
//!   with stable dotted ids (`root.pages.1`) and non-owning parent handles
//! - **Serialization**: JSON load/save through the same construction API
//! - **Config**: TOML settings in the platform data directory
//!
//! ## Example
//!
//! ```ignore
//! use project_model::{serialization, ObjectRef, SchemaDefinition};
//! use std::sync::Arc;
//!
//! let registry = SchemaDefinition::load("classes.toml")?.into_registry()?;
//! let tree = serialization::load_tree(Arc::new(registry), &json, "Project", "root")?;
//!
//! let page = tree.get_object_from_string_path(tree.root(), "/pages/0").unwrap();
//! for child in tree.get_children(&page) {
//!     println!("{}", tree.object_to_string(&child));
//! }
//! ```

pub mod config;
pub mod error;
pub mod humanize;
pub mod model;
pub mod schema;
pub mod serialization;

// Re-export commonly used types
pub use config::ModelConfig;
pub use error::{ModelError, Result, ResultExt};
pub use model::{
    ChildKey, Message, MessageType, NodeKind, ObjectId, ObjectKind, ObjectNode, ObjectRef,
    ObjectTree, PathSegment, PropertyValue, DEFAULT_ROOT_ID,
};
pub use schema::{
    ClassInfo, ClassInfoOverrides, ClassRegistry, Flag, PropertyInfo, PropertyType,
    SchemaDefinition,
};
