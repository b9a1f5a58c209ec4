//! Class registry: name to class descriptor lookup.
//!
//! A registry is an ordinary value. Build one per schema set, share it
//! behind an `Arc` with every [`ObjectTree`](crate::model::ObjectTree) that
//! uses it, and tests can keep independent registries side by side.

use crate::schema::class_info::ClassInfo;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct ClassRegistry {
    /// Registered classes in registration order.
    classes: Vec<Arc<ClassInfo>>,
    /// Maps class names to their index in `classes`.
    name_index: HashMap<String, usize>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Register a class under its name.
    ///
    /// Registering the same class twice is a no-op. Registering a different
    /// class under an existing name replaces the earlier entry; keeping names
    /// unique is up to the caller.
    pub fn register(&mut self, class_info: Arc<ClassInfo>) -> Arc<ClassInfo> {
        match self.name_index.get(&class_info.name) {
            Some(&index) => {
                if !Arc::ptr_eq(&self.classes[index], &class_info) {
                    self.classes[index] = Arc::clone(&class_info);
                }
            }
            None => {
                self.name_index
                    .insert(class_info.name.clone(), self.classes.len());
                self.classes.push(Arc::clone(&class_info));
            }
        }
        class_info
    }

    /// Look up a class by name.
    pub fn find(&self, name: &str) -> Option<&Arc<ClassInfo>> {
        self.name_index.get(name).map(|&index| &self.classes[index])
    }

    /// Iterate over all registered classes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ClassInfo>> {
        self.classes.iter()
    }

    /// All registered classes that strictly descend from `base`.
    pub fn classes_derived_from(&self, base: &ClassInfo) -> Vec<Arc<ClassInfo>> {
        self.classes
            .iter()
            .filter(|c| c.is_proper_subclass_of(base))
            .cloned()
            .collect()
    }
}
