//! Class schemas for the object model.
//!
//! - [`PropertyInfo`] describes one named property: its semantic type and
//!   the optional attributes the editors, property grid and tree consult.
//! - [`ClassInfo`] is a flattened class descriptor; derived classes are
//!   composed from their base once, with [`ClassInfo::derive`].
//! - [`ClassRegistry`] maps names to descriptors.
//! - [`SchemaDefinition`] loads class declarations from TOML files.

pub mod class_info;
pub mod definition;
pub mod property;
pub mod registry;

pub use class_info::{
    is_proper_subclass_of, is_subclass_of, ClassInfo, ClassInfoOverrides, InheritedValue,
    PastePlace, ValueUpdate,
};
pub use definition::SchemaDefinition;
pub use property::{
    EnumItem, Flag, PropertyGridGroup, PropertyInfo, PropertyType, ACTIONS_GROUP, DATA_GROUP,
    GENERAL_GROUP, GEOMETRY_GROUP, STYLE_GROUP,
};
pub use registry::ClassRegistry;
