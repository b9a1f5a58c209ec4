//! Arena-backed object tree.
//!
//! Nodes live in a flat `Vec` indexed by [`ObjectId`]. The parent owns its
//! children (array elements, or `PropertyValue::Child` slots); each child
//! keeps a non-owning `parent` handle for upward traversal. Detached nodes
//! stay in the arena so stale handles can still be inspected and recognised
//! as such by [`ObjectTree::is_object_exists`].
//!
//! ```text
//! root                       (Project)
//! +-- root.settings          (Settings)
//! +-- root.pages             (array of Page)
//! |   +-- root.pages.1       (Page "Main")
//! |   +-- root.pages.2       (Page "Details")
//! +-- root.name              (value wrapper, built on demand)
//! ```

use crate::error::{ModelError, Result};
use crate::model::id::ObjectId;
use crate::model::object::{NodeKind, ObjectNode, ObjectRef, PropertyValue};
use crate::schema::{ClassInfo, ClassRegistry, PropertyInfo, PropertyType};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;

/// Identifier given to the root node when none is configured.
pub const DEFAULT_ROOT_ID: &str = "root";

#[derive(Debug)]
pub struct ObjectTree {
    registry: Arc<ClassRegistry>,
    nodes: Vec<ObjectNode>,
    root: ObjectId,
}

impl ObjectTree {
    /// Create a tree holding a single, empty root object of `root_class`.
    pub fn new(registry: Arc<ClassRegistry>, root_class: Arc<ClassInfo>) -> Self {
        Self::with_root_id(registry, root_class, DEFAULT_ROOT_ID)
    }

    pub fn with_root_id(
        registry: Arc<ClassRegistry>,
        root_class: Arc<ClassInfo>,
        root_id: impl Into<String>,
    ) -> Self {
        let root = ObjectNode {
            handle: ObjectId(0),
            id: root_id.into(),
            key: None,
            parent: None,
            class: root_class,
            property_info: None,
            last_child_id: 0,
            modification_time: None,
            kind: NodeKind::Composite {
                properties: HashMap::new(),
            },
        };
        Self {
            registry,
            nodes: vec![root],
            root: ObjectId(0),
        }
    }

    pub fn registry(&self) -> &Arc<ClassRegistry> {
        &self.registry
    }

    pub fn root(&self) -> ObjectId {
        self.root
    }

    /// Number of nodes in the arena, detached ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn get(&self, id: ObjectId) -> Option<&ObjectNode> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: ObjectId) -> Option<&mut ObjectNode> {
        self.nodes.get_mut(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectNode> {
        self.nodes.iter()
    }

    /// Class of a node. Value wrappers have no class.
    pub fn class_of(&self, object: &ObjectRef) -> Option<&Arc<ClassInfo>> {
        object.node().and_then(|id| self.get(id)).map(|n| &n.class)
    }

    /// Dotted identifier of a node or value wrapper.
    pub fn id_of(&self, object: &ObjectRef) -> Option<String> {
        match object {
            ObjectRef::Node(id) => self.get(*id).map(|n| n.id.clone()),
            ObjectRef::Value { parent, key } => {
                self.get(*parent).map(|p| format!("{}.{}", p.id, key))
            }
        }
    }

    pub fn parent_of(&self, object: &ObjectRef) -> Option<ObjectId> {
        match object {
            ObjectRef::Node(id) => self.get(*id).and_then(|n| n.parent),
            ObjectRef::Value { parent, .. } => Some(*parent),
        }
    }

    pub fn key_of<'a>(&'a self, object: &'a ObjectRef) -> Option<&'a str> {
        match object {
            ObjectRef::Node(id) => self.get(*id).and_then(|n| n.key.as_deref()),
            ObjectRef::Value { key, .. } => Some(key),
        }
    }

    /// Stamp the node's modification time.
    pub fn touch(&mut self, object: ObjectId) {
        if let Some(node) = self.get_mut(object) {
            node.modification_time = Some(Utc::now());
        }
    }

    // ==================== Construction ====================

    fn push_node(
        &mut self,
        parent: ObjectId,
        key: String,
        class: Arc<ClassInfo>,
        property_info: Option<Arc<PropertyInfo>>,
        kind: NodeKind,
    ) -> ObjectId {
        let handle = ObjectId(self.nodes.len() as u32);
        let id = format!("{}.{}", self.nodes[parent.index()].id, key);
        self.nodes.push(ObjectNode {
            handle,
            id,
            key: Some(key),
            parent: Some(parent),
            class,
            property_info,
            last_child_id: 0,
            modification_time: None,
            kind,
        });
        handle
    }

    fn container_property(
        &self,
        parent: ObjectId,
        property_name: &str,
        expected: PropertyType,
    ) -> Result<Arc<PropertyInfo>> {
        let node = self
            .get(parent)
            .ok_or_else(|| ModelError::Schema(format!("no object {}", parent)))?;
        if node.is_array() {
            return Err(ModelError::Schema(format!(
                "{} is an array and has no property '{}'",
                node.id, property_name
            )));
        }
        let property = node.class.property(property_name).ok_or_else(|| {
            ModelError::UnknownProperty {
                class: node.class.name.clone(),
                property: property_name.to_string(),
            }
        })?;
        if property.property_type != expected {
            return Err(ModelError::Schema(format!(
                "property '{}' of {} is {:?}, expected {:?}",
                property_name, node.class.name, property.property_type, expected
            )));
        }
        Ok(Arc::clone(property))
    }

    fn element_class(&self, property: &PropertyInfo) -> Result<Arc<ClassInfo>> {
        let class_name = property.type_class.as_deref().ok_or_else(|| {
            ModelError::Schema(format!("property '{}' has no type class", property.name))
        })?;
        self.registry
            .find(class_name)
            .cloned()
            .ok_or_else(|| ModelError::UnknownClass(class_name.to_string()))
    }

    fn set_field(&mut self, object: ObjectId, name: &str, value: PropertyValue) {
        if let Some(NodeKind::Composite { properties }) =
            self.get_mut(object).map(|n| &mut n.kind)
        {
            properties.insert(name.to_string(), value);
        }
    }

    /// Create an empty object of `class` in the Object-typed slot `property_name`.
    ///
    /// A child already occupying the slot is detached.
    pub fn create_object(
        &mut self,
        parent: ObjectId,
        property_name: &str,
        class: &Arc<ClassInfo>,
    ) -> Result<ObjectId> {
        let property = self.container_property(parent, property_name, PropertyType::Object)?;
        let child = self.push_node(
            parent,
            property_name.to_string(),
            Arc::clone(class),
            Some(property),
            NodeKind::Composite {
                properties: HashMap::new(),
            },
        );
        self.set_field(parent, property_name, PropertyValue::Child(child));
        tracing::trace!(id = %self.nodes[child.index()].id, class = %class.name, "created object");
        Ok(child)
    }

    /// Create an empty array in the Array-typed slot `property_name`.
    ///
    /// The array takes the element class declared by the property.
    pub fn create_array(&mut self, parent: ObjectId, property_name: &str) -> Result<ObjectId> {
        let property = self.container_property(parent, property_name, PropertyType::Array)?;
        let element_class = self.element_class(&property)?;
        let child = self.push_node(
            parent,
            property_name.to_string(),
            element_class,
            Some(property),
            NodeKind::Array {
                elements: Vec::new(),
            },
        );
        self.set_field(parent, property_name, PropertyValue::Child(child));
        tracing::trace!(id = %self.nodes[child.index()].id, "created array");
        Ok(child)
    }

    /// Append a new, empty element of `class` to `array`.
    pub fn add_element(&mut self, array: ObjectId, class: &Arc<ClassInfo>) -> Result<ObjectId> {
        let len = self.get(array).and_then(|n| n.elements()).map_or(0, |e| e.len());
        self.insert_element(array, len, class)
    }

    /// Insert a new, empty element of `class` at `index` (clamped to the array length).
    pub fn insert_element(
        &mut self,
        array: ObjectId,
        index: usize,
        class: &Arc<ClassInfo>,
    ) -> Result<ObjectId> {
        self.check_element_class(array, class)?;
        let key = self.mint_key(array);
        let element = self.push_node(
            array,
            key,
            Arc::clone(class),
            None,
            NodeKind::Composite {
                properties: HashMap::new(),
            },
        );
        if let Some(NodeKind::Array { elements }) = self.get_mut(array).map(|n| &mut n.kind) {
            let index = index.min(elements.len());
            elements.insert(index, element);
        }
        self.touch(array);
        Ok(element)
    }

    fn check_element_class(&self, array: ObjectId, class: &ClassInfo) -> Result<()> {
        let node = self
            .get(array)
            .ok_or_else(|| ModelError::Schema(format!("no object {}", array)))?;
        if !node.is_array() {
            return Err(ModelError::Schema(format!("{} is not an array", node.id)));
        }
        if !class.is_subclass_of(&node.class) {
            return Err(ModelError::Schema(format!(
                "{} cannot hold elements of class {}",
                node.id, class.name
            )));
        }
        Ok(())
    }

    /// Mint the next element key of `parent` from its child counter.
    fn mint_key(&mut self, parent: ObjectId) -> String {
        let node = &mut self.nodes[parent.index()];
        node.last_child_id += 1;
        node.last_child_id.to_string()
    }

    // ==================== Writes ====================

    /// Write a scalar property through the class update hooks.
    ///
    /// `update_object_value_hook` may substitute the stored value;
    /// `after_update_object_hook` sees the changed and previous values.
    /// Undeclared names are accepted: the schema is advisory for plain data.
    pub fn set_property(
        &mut self,
        object: ObjectId,
        name: &str,
        value: serde_json::Value,
    ) -> Result<()> {
        let node = self
            .get(object)
            .ok_or_else(|| ModelError::Schema(format!("no object {}", object)))?;
        if node.is_array() {
            return Err(ModelError::Schema(format!(
                "{} is an array and has no property '{}'",
                node.id, name
            )));
        }
        if let Some(property) = node.class.property(name) {
            if property.property_type.is_container() {
                return Err(ModelError::Schema(format!(
                    "property '{}' of {} holds child objects",
                    name, node.class.name
                )));
            }
        }

        let class = Arc::clone(&node.class);
        let previous = node
            .field(name)
            .and_then(|v| v.as_scalar())
            .cloned()
            .unwrap_or(serde_json::Value::Null);

        let (old_value, new_value) = match &class.update_object_value_hook {
            Some(hook) => match hook(self, object, name, &value) {
                Some(update) => (update.old_value, update.new_value),
                None => (previous, value),
            },
            None => (previous, value),
        };

        self.set_field(object, name, PropertyValue::Scalar(new_value.clone()));
        self.touch(object);

        if let Some(hook) = &class.after_update_object_hook {
            let mut changed = serde_json::Map::new();
            changed.insert(name.to_string(), new_value);
            let mut old_values = serde_json::Map::new();
            old_values.insert(name.to_string(), old_value);
            hook(self, object, &changed, &old_values);
        }
        Ok(())
    }

    /// Store a scalar without running hooks or stamping the modification time.
    pub(crate) fn set_scalar_raw(
        &mut self,
        object: ObjectId,
        name: &str,
        value: serde_json::Value,
    ) {
        self.set_field(object, name, PropertyValue::Scalar(value));
    }

    /// Put a previously held value back into the slot `name`.
    pub(crate) fn restore_field(&mut self, object: ObjectId, name: &str, value: PropertyValue) {
        self.set_field(object, name, value);
    }

    // ==================== Structure ====================

    /// Detach `object` from its parent. The root cannot be detached.
    ///
    /// Returns false if the node was not attached.
    pub fn remove(&mut self, object: ObjectId) -> bool {
        let Some(node) = self.get(object) else {
            return false;
        };
        let Some(parent) = node.parent else {
            return false;
        };
        let key = node.key.clone();

        let removed = match &mut self.nodes[parent.index()].kind {
            NodeKind::Array { elements } => match elements.iter().position(|&e| e == object) {
                Some(position) => {
                    elements.remove(position);
                    true
                }
                None => false,
            },
            NodeKind::Composite { properties } => match key {
                Some(key) if properties.get(&key) == Some(&PropertyValue::Child(object)) => {
                    properties.remove(&key);
                    true
                }
                _ => false,
            },
        };

        if removed {
            self.touch(parent);
            tracing::debug!(id = %self.nodes[object.index()].id, "detached object");
        }
        removed
    }

    /// Move `object` into `target` (an array) at `index`, or at the end.
    ///
    /// The node gets a fresh key from the target's counter and every id in
    /// its subtree is rebuilt before the call returns.
    pub fn move_object(
        &mut self,
        object: ObjectId,
        target: ObjectId,
        index: Option<usize>,
    ) -> Result<()> {
        let node = self
            .get(object)
            .ok_or_else(|| ModelError::InvalidMove(format!("no object {}", object)))?;
        if node.parent.is_none() {
            return Err(ModelError::InvalidMove("the root cannot be moved".into()));
        }
        let object_class = Arc::clone(&node.class);
        let object_is_array = node.is_array();

        let target_node = self
            .get(target)
            .ok_or_else(|| ModelError::InvalidMove(format!("no object {}", target)))?;
        if !target_node.is_array() {
            return Err(ModelError::InvalidMove(format!(
                "{} is not an array",
                target_node.id
            )));
        }
        if !object_is_array && !object_class.is_subclass_of(&target_node.class) {
            return Err(ModelError::InvalidMove(format!(
                "{} cannot hold elements of class {}",
                target_node.id, object_class.name
            )));
        }
        if self.is_ancestor(&ObjectRef::Node(target), &ObjectRef::Node(object)) {
            return Err(ModelError::InvalidMove(format!(
                "{} is inside the moved object",
                target_node.id
            )));
        }

        self.remove(object);

        let key = self.mint_key(target);
        {
            let node = &mut self.nodes[object.index()];
            node.parent = Some(target);
            node.key = Some(key);
            if !object_is_array {
                node.property_info = None;
            }
        }
        if let NodeKind::Array { elements } = &mut self.nodes[target.index()].kind {
            let index = index.unwrap_or(elements.len()).min(elements.len());
            elements.insert(index, object);
        }
        self.reassign_ids(object);
        self.touch(target);
        tracing::debug!(id = %self.nodes[object.index()].id, "moved object");
        Ok(())
    }

    /// Rebuild the dotted ids of `object` and everything below it.
    fn reassign_ids(&mut self, object: ObjectId) {
        let mut stack = vec![object];
        while let Some(current) = stack.pop() {
            let node = &self.nodes[current.index()];
            if let (Some(parent), Some(key)) = (node.parent, node.key.clone()) {
                let id = format!("{}.{}", self.nodes[parent.index()].id, key);
                self.nodes[current.index()].id = id;
            }
            stack.extend(self.owned_children(current));
        }
    }

    /// Every child node owned by `object`, regardless of schema flags.
    pub(crate) fn owned_children(&self, object: ObjectId) -> Vec<ObjectId> {
        match self.get(object).map(|n| &n.kind) {
            Some(NodeKind::Array { elements }) => elements.clone(),
            Some(NodeKind::Composite { properties }) => {
                let class = &self.nodes[object.index()].class;
                let mut children: Vec<ObjectId> = class
                    .properties
                    .iter()
                    .filter_map(|p| properties.get(&p.name).and_then(|v| v.as_child()))
                    .collect();
                // children stored under undeclared names still belong to the subtree
                for value in properties.values() {
                    if let Some(child) = value.as_child() {
                        if !children.contains(&child) {
                            children.push(child);
                        }
                    }
                }
                children
            }
            None => Vec::new(),
        }
    }
}
