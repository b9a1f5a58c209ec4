//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;

use project_model::{serialization, ClassRegistry, ObjectId, ObjectTree, SchemaDefinition};
use std::path::PathBuf;
use std::sync::Arc;

/// Path of a file under `tests/fixtures`
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Registry built from `tests/fixtures/editor.toml`
pub fn editor_registry() -> Arc<ClassRegistry> {
    let registry = SchemaDefinition::load(fixture_path("editor.toml"))
        .and_then(SchemaDefinition::into_registry)
        .expect("editor schema should load");
    Arc::new(registry)
}

/// Tree loaded from `tests/fixtures/project.json`
pub fn load_project() -> ObjectTree {
    let text = std::fs::read_to_string(fixture_path("project.json")).expect("fixture exists");
    serialization::load_tree_from_str(editor_registry(), &text, "Project", "root")
        .expect("project fixture should load")
}

/// Node at a string path, panicking with the path if it does not resolve
pub fn node_at(tree: &ObjectTree, path: &str) -> ObjectId {
    tree.get_object_from_string_path(tree.root(), path)
        .and_then(|o| o.node())
        .unwrap_or_else(|| panic!("no node at {}", path))
}
