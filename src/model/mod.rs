//! The live object tree and every query over it.
//!
//! - `tree`: arena storage, construction and mutation
//! - `navigation`: children, ancestry, paths and id lookup
//! - `properties`: metadata-driven property access and labels
//! - `references`: name-based references between objects
//! - `check`: validation messages

mod check;
#[cfg(test)]
pub(crate) mod fixtures;
mod id;
mod navigation;
mod object;
mod properties;
mod references;
mod tree;

pub use check::{Message, MessageType};
pub use id::ObjectId;
pub use navigation::ChildKey;
pub use object::{NodeKind, ObjectKind, ObjectNode, ObjectRef, PathSegment, PropertyValue};
pub use properties::format_number;
pub use tree::{ObjectTree, DEFAULT_ROOT_ID};
