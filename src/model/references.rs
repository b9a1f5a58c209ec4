//! Name-based references between objects.
//!
//! An ObjectReference property stores the `name` of an element that lives in
//! the array found at the property's `referenced_object_collection_path`,
//! resolved from the root.

use crate::error::Result;
use crate::model::id::ObjectId;
use crate::model::object::{ObjectRef, PathSegment};
use crate::model::tree::ObjectTree;
use crate::schema::{PropertyInfo, PropertyType};
use serde_json::Value;

impl ObjectTree {
    /// Array at `collection_path` below the root.
    pub fn find_collection(&self, collection_path: &[String]) -> Option<ObjectId> {
        let path: Vec<PathSegment> = collection_path
            .iter()
            .map(|key| PathSegment::Key(key.clone()))
            .collect();
        let collection = self.get_object_from_path(self.root(), &path)?.node()?;
        self.as_array(collection).map(|_| collection)
    }

    /// Element of the property's referenced collection whose `name` is `value`.
    pub fn find_referenced_object(&self, property: &PropertyInfo, value: &str) -> Option<ObjectId> {
        let collection_path = property.referenced_object_collection_path.as_ref()?;
        let Some(collection) = self.find_collection(collection_path) else {
            tracing::debug!(
                property = %property.name,
                ?collection_path,
                "referenced collection not found"
            );
            return None;
        };
        self.as_array(collection)?
            .iter()
            .copied()
            .find(|&element| {
                self.get_scalar(element, "name").and_then(|v| v.as_str()) == Some(value)
            })
    }

    /// Rewrite every reference into `collection_path` that points at `old_name`.
    ///
    /// A property's `match_object_reference` decides what counts as pointing
    /// at `old_name` and its `replace_object_reference` builds the stored
    /// value; plain equality and the bare new name are used otherwise.
    /// Returns the number of rewritten references.
    pub fn update_object_references(
        &mut self,
        collection_path: &[String],
        old_name: &str,
        new_name: &str,
    ) -> Result<usize> {
        let mut updates: Vec<(ObjectId, String, Value)> = Vec::new();

        for object in self.descendants(self.root()) {
            let Some(node) = self.get(object) else {
                continue;
            };
            if node.is_array() {
                continue;
            }
            for property in &node.class.properties {
                let path = property.referenced_object_collection_path.as_deref();
                if property.property_type != PropertyType::ObjectReference
                    || path != Some(collection_path)
                {
                    continue;
                }
                let Some(current) = node
                    .field(&property.name)
                    .and_then(|v| v.as_scalar())
                    .and_then(|v| v.as_str())
                else {
                    continue;
                };
                let matches = match &property.match_object_reference {
                    Some(matcher) => matcher(current, old_name),
                    None => current == old_name,
                };
                if matches {
                    let replacement = match &property.replace_object_reference {
                        Some(replace) => replace(new_name),
                        None => new_name.to_string(),
                    };
                    updates.push((object, property.name.clone(), Value::String(replacement)));
                }
            }
        }

        for (object, name, value) in &updates {
            self.set_property(*object, name, value.clone())?;
            let reference = ObjectRef::value(*object, name.clone());
            tracing::trace!(?reference, "updated reference");
        }
        Ok(updates.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{self, SampleProject};
    use crate::schema::{ClassInfo, ClassRegistry};
    use serde_json::json;
    use std::sync::Arc;

    fn styles_path() -> Vec<String> {
        vec!["styles".to_string()]
    }

    #[test]
    fn test_find_referenced_object() {
        let SampleProject { tree, ids } = fixtures::sample_project();
        let widget = tree.registry().find("Widget").unwrap().clone();
        let style = widget.property("style").unwrap();
        assert_eq!(tree.find_referenced_object(style, "accent"), Some(ids.accent_style));
        assert_eq!(tree.find_referenced_object(style, "missing"), None);
        let name = widget.property("name").unwrap();
        assert_eq!(tree.find_referenced_object(name, "accent"), None);
    }

    #[test]
    fn test_find_collection() {
        let SampleProject { tree, ids } = fixtures::sample_project();
        assert_eq!(tree.find_collection(&styles_path()), Some(ids.styles));
        // settings is an object, not a collection
        assert_eq!(tree.find_collection(&["settings".to_string()]), None);
    }

    #[test]
    fn test_update_object_references() {
        let SampleProject { mut tree, ids } = fixtures::sample_project();
        let count = tree.update_object_references(&styles_path(), "default", "base").unwrap();
        // the label widget and the accent style both pointed at "default"
        assert_eq!(count, 2);
        assert_eq!(tree.get_scalar(ids.label, "style"), Some(&json!("base")));
        assert_eq!(tree.get_scalar(ids.accent_style, "inheritFrom"), Some(&json!("base")));
        assert_eq!(tree.get_scalar(ids.button, "style"), Some(&json!("accent")));
        assert!(tree.get(ids.label).unwrap().modification_time.is_some());
    }

    #[test]
    fn test_update_with_custom_matching() {
        let mut registry = ClassRegistry::new();
        let item = registry.register(Arc::new(ClassInfo::new(
            "Item",
            vec![PropertyInfo::new("name", PropertyType::String)],
        )));
        let root_class = registry.register(Arc::new(ClassInfo::new(
            "Root",
            vec![
                PropertyInfo::array("items", "Item"),
                PropertyInfo::new("expression", PropertyType::ObjectReference)
                    .with_referenced_collection(["items"])
                    .with_match_object_reference(|stored, name| {
                        stored.trim_start_matches('$') == name
                    })
                    .with_replace_object_reference(|name| format!("${}", name)),
            ],
        )));
        let mut tree = ObjectTree::new(Arc::new(registry), root_class);
        let root = tree.root();
        let items = tree.create_array(root, "items").unwrap();
        let element = tree.add_element(items, &item).unwrap();
        tree.set_property(element, "name", json!("speed")).unwrap();
        tree.set_property(root, "expression", json!("$speed")).unwrap();

        let count = tree
            .update_object_references(&["items".to_string()], "speed", "velocity")
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(tree.get_scalar(root, "expression"), Some(&json!("$velocity")));
    }
}
