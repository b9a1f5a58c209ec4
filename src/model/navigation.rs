//! Discrimination, children, ancestry and addressing.
//!
//! All queries here are reads. A failed lookup (bad path segment, stale
//! handle, unknown id) yields `None` or an empty result plus a `debug!`
//! diagnostic; nothing panics on user-driven navigation.

use crate::model::id::ObjectId;
use crate::model::object::{NodeKind, ObjectKind, ObjectRef, PathSegment, PropertyValue};
use crate::model::tree::ObjectTree;
use crate::schema::{ClassInfo, PropertyInfo, PropertyType};

/// Key accepted by [`ObjectTree::get_child_of_object`].
#[derive(Debug, Clone, Copy)]
pub enum ChildKey<'a> {
    Property(&'a PropertyInfo),
    Name(&'a str),
    Index(usize),
}

impl ObjectTree {
    // ==================== Discrimination ====================

    /// Variant of a handle, or `None` for a dangling node handle.
    pub fn kind(&self, object: &ObjectRef) -> Option<ObjectKind> {
        match object {
            ObjectRef::Value { parent, .. } => self.get(*parent).map(|_| ObjectKind::Value),
            ObjectRef::Node(id) => self.get(*id).map(|node| match node.kind {
                NodeKind::Array { .. } => ObjectKind::Array,
                NodeKind::Composite { .. } => ObjectKind::Object,
            }),
        }
    }

    pub fn is_value(&self, object: &ObjectRef) -> bool {
        self.kind(object) == Some(ObjectKind::Value)
    }

    pub fn is_array(&self, object: &ObjectRef) -> bool {
        self.kind(object) == Some(ObjectKind::Array)
    }

    /// Neither a value wrapper nor an array.
    pub fn is_object(&self, object: &ObjectRef) -> bool {
        self.kind(object) == Some(ObjectKind::Object)
    }

    /// Elements of an array node.
    pub fn as_array(&self, object: ObjectId) -> Option<&[ObjectId]> {
        self.get(object).and_then(|n| n.elements())
    }

    /// Identity for nodes; same parent and key for value wrappers.
    ///
    /// Only the first argument decides the comparison mode, so a value
    /// wrapper equals a node that sits in the same parent slot.
    pub fn is_equal(&self, object1: &ObjectRef, object2: &ObjectRef) -> bool {
        if self.is_value(object1) {
            self.parent_of(object1) == self.parent_of(object2)
                && self.key_of(object1) == self.key_of(object2)
        } else {
            object1 == object2
        }
    }

    pub fn is_object_instance_of(&self, object: &ObjectRef, base: &ClassInfo) -> bool {
        self.class_of(object).is_some_and(|c| c.is_subclass_of(base))
    }

    pub fn is_same_instance_type_as(&self, object1: &ObjectRef, object2: &ObjectRef) -> bool {
        match (self.class_of(object1), self.class_of(object2)) {
            (Some(a), Some(b)) => std::sync::Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn is_array_element(&self, object: &ObjectRef) -> bool {
        self.parent_of(object)
            .is_some_and(|parent| self.is_array(&ObjectRef::Node(parent)))
    }

    // ==================== Children ====================

    /// Children as shown in a navigation tree.
    ///
    /// Arrays yield their elements. Composites yield one node per enumerable,
    /// present Object/Array property, except that a composite whose only such
    /// property is an array shows that array's elements directly unless the
    /// property sets `show_only_children_in_tree = false`.
    pub fn get_children(&self, parent: &ObjectRef) -> Vec<ObjectRef> {
        let Some(id) = parent.node() else {
            return Vec::new();
        };
        let Some(node) = self.get(id) else {
            return Vec::new();
        };

        if let Some(elements) = node.elements() {
            return elements.iter().copied().map(ObjectRef::Node).collect();
        }

        let properties: Vec<&PropertyInfo> = node
            .class
            .properties
            .iter()
            .map(|p| p.as_ref())
            .filter(|p| {
                p.property_type.is_container()
                    && self.is_property_enumerable(id, p)
                    && node.field(&p.name).and_then(|v| v.as_child()).is_some()
            })
            .collect();

        if let [only] = properties.as_slice() {
            if only.property_type == PropertyType::Array
                && only.show_only_children_in_tree != Some(false)
            {
                let array = node.field(&only.name).and_then(|v| v.as_child());
                return array
                    .and_then(|a| self.as_array(a))
                    .map(|elements| elements.iter().copied().map(ObjectRef::Node).collect())
                    .unwrap_or_default();
            }
        }

        properties
            .iter()
            .filter_map(|p| node.field(&p.name).and_then(|v| v.as_child()))
            .map(ObjectRef::Node)
            .collect()
    }

    /// Child of an object by property descriptor, property name or array index.
    ///
    /// Properties with a type class yield the child node (if present); other
    /// properties yield a value wrapper. On arrays a name is parsed as an index.
    pub fn get_child_of_object(&self, object: &ObjectRef, key: ChildKey<'_>) -> Option<ObjectRef> {
        let id = object.node()?;
        let node = self.get(id)?;

        if let Some(elements) = node.elements() {
            let index = match key {
                ChildKey::Index(index) => Some(index),
                ChildKey::Name(name) => name.parse::<usize>().ok(),
                ChildKey::Property(_) => None,
            };
            return match index.and_then(|i| elements.get(i)) {
                Some(&element) => Some(ObjectRef::Node(element)),
                None => {
                    tracing::debug!(array = %node.id, ?key, "invalid array index");
                    None
                }
            };
        }

        let property = match key {
            ChildKey::Property(property) => property,
            ChildKey::Name(name) => node.class.property(name)?.as_ref(),
            ChildKey::Index(_) => {
                tracing::debug!(object = %node.id, ?key, "invalid key type");
                return None;
            }
        };

        if property.type_class.is_some() {
            node.field(&property.name)
                .and_then(|v| v.as_child())
                .map(ObjectRef::Node)
        } else {
            Some(ObjectRef::value(id, property.name.clone()))
        }
    }

    /// Node or value wrapper for `property` of `object`.
    pub fn get_object_property_as_object(
        &self,
        object: ObjectId,
        property: &PropertyInfo,
    ) -> Option<ObjectRef> {
        self.get_child_of_object(&ObjectRef::Node(object), ChildKey::Property(property))
    }

    // ==================== Ancestry ====================

    /// True if `ancestor` is `object` itself or sits anywhere above it.
    pub fn is_ancestor(&self, object: &ObjectRef, ancestor: &ObjectRef) -> bool {
        if self.kind(object).is_none() || self.kind(ancestor).is_none() {
            return false;
        }
        if object == ancestor {
            return true;
        }
        match self.parent_of(object) {
            Some(parent) => self.is_ancestor(&ObjectRef::Node(parent), ancestor),
            None => false,
        }
    }

    /// Like [`is_ancestor`](Self::is_ancestor) but false for the object itself.
    pub fn is_proper_ancestor(&self, object: &ObjectRef, ancestor: &ObjectRef) -> bool {
        if self.kind(object).is_none() || object == ancestor {
            return false;
        }
        match self.parent_of(object) {
            Some(parent) => self.is_ancestor(&ObjectRef::Node(parent), ancestor),
            None => false,
        }
    }

    /// Keep only objects that are neither ancestor nor descendant of an
    /// object kept earlier.
    fn unique_top(&self, objects: &[ObjectRef]) -> Vec<ObjectRef> {
        let mut kept: Vec<ObjectRef> = Vec::new();
        for object in objects {
            if !kept
                .iter()
                .any(|k| self.is_ancestor(object, k) || self.is_ancestor(k, object))
            {
                kept.push(object.clone());
            }
        }
        kept
    }

    fn unique_parents(&self, objects: &[ObjectRef]) -> Vec<ObjectRef> {
        let parents: Vec<ObjectRef> = objects
            .iter()
            .filter_map(|o| self.parent_of(o))
            .map(ObjectRef::Node)
            .collect();
        self.unique_top(&parents)
    }

    /// Climb a selection until its members share a single parent.
    ///
    /// Returns the top-level members at the first level where exactly one
    /// common parent exists, or an empty list when the selection spans
    /// disjoint roots.
    pub fn reduce_until_common_parent(&self, objects: &[ObjectRef]) -> Vec<ObjectRef> {
        let mut current = objects.to_vec();
        loop {
            let unique = self.unique_top(&current);
            let parents = self.unique_parents(&unique);
            match parents.len() {
                1 => return unique,
                0 => return Vec::new(),
                _ => current = parents,
            }
        }
    }

    pub fn get_root_object(&self, object: &ObjectRef) -> Option<ObjectId> {
        let mut current = match object {
            ObjectRef::Node(id) => *id,
            ObjectRef::Value { parent, .. } => *parent,
        };
        loop {
            match self.get(current)?.parent {
                Some(parent) => current = parent,
                None => return Some(current),
            }
        }
    }

    /// Nearest object (the object itself included) whose class derives from `base`.
    pub fn get_ancestor_of_type(&self, object: &ObjectRef, base: &ClassInfo) -> Option<ObjectRef> {
        let mut current = Some(object.clone());
        while let Some(candidate) = current {
            if self.is_object_instance_of(&candidate, base) {
                return Some(candidate);
            }
            current = self.parent_of(&candidate).map(ObjectRef::Node);
        }
        None
    }

    /// Owning objects from the root down towards `object`.
    ///
    /// `ancestor` defaults to the root. `show_single_array_child` only
    /// matters when `ancestor` is an array: the array itself is then listed
    /// first. Below that, arrays are listed where they are one of several
    /// container properties of their owner.
    pub fn get_ancestors(
        &self,
        object: &ObjectRef,
        ancestor: Option<ObjectId>,
        show_single_array_child: bool,
    ) -> Vec<ObjectRef> {
        let ancestor = match ancestor {
            Some(ancestor) => ancestor,
            None => match self.get_root_object(object) {
                Some(root) => return self.get_ancestors(object, Some(root), false),
                None => return Vec::new(),
            },
        };

        let object = match object {
            ObjectRef::Value { parent, .. } => *parent,
            ObjectRef::Node(id) => *id,
        };
        let (Some(object_node), Some(ancestor_node)) = (self.get(object), self.get(ancestor))
        else {
            return Vec::new();
        };
        let object_id = object_node.id.as_str();

        if let Some(elements) = ancestor_node.elements() {
            let possible = elements.iter().copied().find(|&element| {
                element == object || self.is_id_prefix_of(element, object_id)
            });
            if let Some(possible) = possible {
                if possible == object {
                    return if show_single_array_child {
                        vec![ObjectRef::Node(ancestor), ObjectRef::Node(object)]
                    } else {
                        vec![ObjectRef::Node(object)]
                    };
                }
                let rest = self.get_ancestors(&ObjectRef::Node(object), Some(possible), false);
                return if show_single_array_child {
                    std::iter::once(ObjectRef::Node(ancestor)).chain(rest).collect()
                } else {
                    rest
                };
            }
        } else {
            let containers: Vec<&PropertyInfo> = ancestor_node
                .class
                .properties
                .iter()
                .map(|p| p.as_ref())
                .filter(|p| p.property_type.is_container())
                .collect();

            for property in &containers {
                let Some(possible) = ancestor_node.field(&property.name).and_then(|v| v.as_child())
                else {
                    continue;
                };
                if possible == object {
                    return vec![ObjectRef::Node(ancestor)];
                }
                if self.is_id_prefix_of(possible, object_id) {
                    let rest = self.get_ancestors(
                        &ObjectRef::Node(object),
                        Some(possible),
                        containers.len() > 1,
                    );
                    return std::iter::once(ObjectRef::Node(ancestor)).chain(rest).collect();
                }
            }
        }
        Vec::new()
    }

    /// True if `id` names a strict descendant of `candidate` (`candidate.id + "."` prefix).
    fn is_id_prefix_of(&self, candidate: ObjectId, id: &str) -> bool {
        self.get(candidate).is_some_and(|c| {
            id.len() > c.id.len()
                && id.starts_with(c.id.as_str())
                && id.as_bytes()[c.id.len()] == b'.'
        })
    }

    /// Labels of the ancestors below the root, joined with `" / "`.
    pub fn get_human_readable_object_path(&self, object: &ObjectRef) -> String {
        self.get_ancestors(object, None, false)
            .iter()
            .skip(1)
            .map(|a| self.object_to_string(a))
            .collect::<Vec<_>>()
            .join(" / ")
    }

    // ==================== Paths ====================

    /// Keys from the root down to `object`: property names, or positions for
    /// array elements. `None` if an array element is no longer in its array.
    pub fn get_object_path(&self, object: &ObjectRef) -> Option<Vec<PathSegment>> {
        let mut segments = Vec::new();
        let mut current = object.clone();
        while let Some(parent) = self.parent_of(&current) {
            if let Some(elements) = self.as_array(parent) {
                let element = current.node()?;
                let Some(position) = elements.iter().position(|&e| e == element) else {
                    tracing::debug!(?element, "object is not an element of its parent array");
                    return None;
                };
                segments.push(PathSegment::Index(position));
            } else {
                segments.push(PathSegment::Key(self.key_of(&current)?.to_string()));
            }
            current = ObjectRef::Node(parent);
        }
        segments.reverse();
        Some(segments)
    }

    /// Object path as `"/pages/0/widgets/1"`; the root is `"/"`.
    pub fn get_object_path_as_string(&self, object: &ObjectRef) -> Option<String> {
        let path = self.get_object_path(object)?;
        let joined: Vec<String> = path.iter().map(|s| s.to_string()).collect();
        Some(format!("/{}", joined.join("/")))
    }

    /// Walk `path` from `root`, one segment per step.
    pub fn get_object_from_path(&self, root: ObjectId, path: &[PathSegment]) -> Option<ObjectRef> {
        let mut current = ObjectRef::Node(root);
        self.get(root)?;
        for segment in path {
            let key = match segment {
                PathSegment::Key(name) => ChildKey::Name(name),
                PathSegment::Index(index) => ChildKey::Index(*index),
            };
            current = self.get_child_of_object(&current, key)?;
        }
        Some(current)
    }

    /// Resolve a `"/"`-separated path; segments are matched as names.
    pub fn get_object_from_string_path(&self, root: ObjectId, path: &str) -> Option<ObjectRef> {
        if path == "/" {
            return self.get(root).map(|_| ObjectRef::Node(root));
        }
        let segments: Vec<PathSegment> = path
            .split('/')
            .skip(1)
            .map(PathSegment::from)
            .collect();
        self.get_object_from_path(root, &segments)
    }

    /// Find the node or value wrapper whose dotted id equals `object_id`.
    ///
    /// Descends by id prefix (`child.id + "."`), so only the branch that can
    /// contain the id is visited.
    pub fn get_object_from_object_id(&self, root: ObjectId, object_id: &str) -> Option<ObjectRef> {
        let mut current = root;
        loop {
            let node = self.get(current)?;
            if node.id == object_id {
                return Some(ObjectRef::Node(current));
            }

            let mut next = None;
            if let Some(elements) = node.elements() {
                for &element in elements {
                    let child = self.get(element)?;
                    if child.id == object_id {
                        return Some(ObjectRef::Node(element));
                    }
                    if self.is_id_prefix_of(element, object_id) {
                        next = Some(element);
                        break;
                    }
                }
            } else {
                for property in &node.class.properties {
                    let value_id = format!("{}.{}", node.id, property.name);
                    match node.field(&property.name) {
                        Some(PropertyValue::Child(child)) => {
                            if self.get(*child)?.id == object_id {
                                return Some(ObjectRef::Node(*child));
                            }
                            if self.is_id_prefix_of(*child, object_id) {
                                next = Some(*child);
                                break;
                            }
                        }
                        _ if !property.property_type.is_container() && value_id == object_id => {
                            return Some(ObjectRef::value(current, property.name.clone()));
                        }
                        _ => {}
                    }
                }
            }

            current = next?;
        }
    }

    /// Whether `object` is still reachable from its recorded parent.
    pub fn is_object_exists(&self, object: ObjectId) -> bool {
        let Some(node) = self.get(object) else {
            return false;
        };
        let Some(parent) = node.parent.and_then(|p| self.get(p)) else {
            return true;
        };
        match &parent.kind {
            NodeKind::Array { elements } => elements.contains(&object),
            NodeKind::Composite { properties } => match &node.key {
                Some(key) => properties.get(key) == Some(&PropertyValue::Child(object)),
                None => true,
            },
        }
    }

    /// False when the object's slot opts out of collapsing single-array children.
    pub fn is_show_only_children_in_tree(&self, object: &ObjectRef) -> bool {
        let (Some(parent), Some(key)) = (self.parent_of(object), self.key_of(object)) else {
            return true;
        };
        match self.find_property_by_name(parent, key) {
            Some(property) => property.show_only_children_in_tree != Some(false),
            None => true,
        }
    }

    pub fn are_all_children_of_the_same_parent(&self, objects: &[ObjectRef]) -> bool {
        let Some(first) = objects.first() else {
            return true;
        };
        let parent = self.parent_of(first);
        objects[1..].iter().all(|o| self.parent_of(o) == parent)
    }

    /// Every node reachable from `object`, depth first, parents before children.
    pub fn descendants(&self, object: ObjectId) -> Vec<ObjectId> {
        let mut out = Vec::new();
        let mut stack = vec![object];
        while let Some(current) = stack.pop() {
            if self.get(current).is_none() {
                continue;
            }
            out.push(current);
            let mut children = self.owned_children(current);
            children.reverse();
            stack.extend(children);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{self, SampleProject};
    use crate::schema::{ClassInfoOverrides, Flag};
    use std::sync::Arc;

    fn node(id: ObjectId) -> ObjectRef {
        ObjectRef::Node(id)
    }

    #[test]
    fn test_discrimination_is_exclusive() {
        let SampleProject { tree, ids } = fixtures::sample_project();
        let value = ObjectRef::value(ids.main_page, "name");
        assert!(tree.is_value(&value) && !tree.is_array(&value) && !tree.is_object(&value));
        assert!(tree.is_array(&node(ids.pages)) && !tree.is_object(&node(ids.pages)));
        assert!(tree.is_object(&node(ids.main_page)) && !tree.is_value(&node(ids.main_page)));
        assert!(!tree.is_object(&node(ObjectId(9999))));
        assert_eq!(tree.kind(&node(ObjectId(9999))), None);
    }

    #[test]
    fn test_is_equal() {
        let SampleProject { tree, ids } = fixtures::sample_project();
        let a = ObjectRef::value(ids.main_page, "name");
        let b = ObjectRef::value(ids.main_page, "name");
        assert!(tree.is_equal(&a, &b));
        assert!(!tree.is_equal(&a, &ObjectRef::value(ids.details_page, "name")));
        assert!(tree.is_equal(&node(ids.pages), &node(ids.pages)));
        assert!(!tree.is_equal(&node(ids.pages), &node(ids.styles)));
        // first argument selects the mode: a node never equals a wrapper
        let slot = ObjectRef::value(ids.root, "pages");
        assert!(tree.is_equal(&slot, &node(ids.pages)));
        assert!(!tree.is_equal(&node(ids.pages), &slot));
    }

    #[test]
    fn test_instance_of() {
        let SampleProject { tree, ids } = fixtures::sample_project();
        let widget = tree.registry().find("Widget").unwrap().clone();
        assert!(tree.is_object_instance_of(&node(ids.container), &widget));
        assert!(tree.is_object_instance_of(&node(ids.button), &widget));
        assert!(!tree.is_object_instance_of(&node(ids.main_page), &widget));
        assert!(tree.is_same_instance_type_as(&node(ids.main_page), &node(ids.details_page)));
        assert!(!tree.is_same_instance_type_as(&node(ids.button), &node(ids.container)));
        assert!(tree.is_array_element(&node(ids.main_page)));
        assert!(!tree.is_array_element(&node(ids.settings)));
    }

    #[test]
    fn test_children_of_array() {
        let SampleProject { tree, ids } = fixtures::sample_project();
        assert_eq!(
            tree.get_children(&node(ids.pages)),
            vec![node(ids.main_page), node(ids.details_page)]
        );
    }

    #[test]
    fn test_children_collapse_single_array() {
        let SampleProject { tree, ids } = fixtures::sample_project();
        // Page has only the widgets array: its elements are shown directly
        assert_eq!(
            tree.get_children(&node(ids.main_page)),
            vec![node(ids.button), node(ids.container)]
        );
        // Details page has no widgets array at all
        assert!(tree.get_children(&node(ids.details_page)).is_empty());
    }

    #[test]
    fn test_children_of_composite() {
        let SampleProject { tree, ids } = fixtures::sample_project();
        assert_eq!(
            tree.get_children(&node(ids.root)),
            vec![node(ids.settings), node(ids.pages), node(ids.styles)]
        );
        // single Object property is not collapsed
        assert_eq!(tree.get_children(&node(ids.settings)), vec![node(ids.general)]);
        assert!(tree.get_children(&ObjectRef::value(ids.root, "name")).is_empty());
    }

    #[test]
    fn test_children_opt_out_and_enumerable() {
        let mut registry = crate::schema::ClassRegistry::new();
        registry.register(Arc::new(ClassInfo::new("Item", vec![])));
        let holder = registry.register(Arc::new(ClassInfo::new(
            "Holder",
            vec![
                PropertyInfo::array("items", "Item").with_show_only_children_in_tree(false),
                PropertyInfo::array("hidden", "Item").with_enumerable(Flag::computed(
                    |_, _, _| false,
                )),
            ],
        )));
        let registry = Arc::new(registry);
        let mut tree = ObjectTree::new(registry.clone(), holder);
        let root = tree.root();
        let items = tree.create_array(root, "items").unwrap();
        tree.create_array(root, "hidden").unwrap();
        let item = registry.find("Item").unwrap().clone();
        tree.add_element(items, &item).unwrap();

        assert_eq!(tree.get_children(&node(root)), vec![node(items)]);
    }

    #[test]
    fn test_get_child_of_object() {
        let SampleProject { tree, ids } = fixtures::sample_project();
        assert_eq!(
            tree.get_child_of_object(&node(ids.pages), ChildKey::Name("1")),
            Some(node(ids.details_page))
        );
        assert_eq!(
            tree.get_child_of_object(&node(ids.pages), ChildKey::Index(0)),
            Some(node(ids.main_page))
        );
        assert_eq!(tree.get_child_of_object(&node(ids.pages), ChildKey::Index(7)), None);
        assert_eq!(tree.get_child_of_object(&node(ids.pages), ChildKey::Name("x")), None);
        assert_eq!(
            tree.get_child_of_object(&node(ids.root), ChildKey::Name("settings")),
            Some(node(ids.settings))
        );
        assert_eq!(
            tree.get_child_of_object(&node(ids.root), ChildKey::Name("name")),
            Some(ObjectRef::value(ids.root, "name"))
        );
        assert_eq!(tree.get_child_of_object(&node(ids.root), ChildKey::Index(0)), None);
        assert_eq!(tree.get_child_of_object(&node(ids.root), ChildKey::Name("nope")), None);
    }

    #[test]
    fn test_is_ancestor() {
        let SampleProject { tree, ids } = fixtures::sample_project();
        assert!(tree.is_ancestor(&node(ids.button), &node(ids.main_page)));
        assert!(tree.is_ancestor(&node(ids.button), &node(ids.button)));
        assert!(!tree.is_ancestor(&node(ids.main_page), &node(ids.button)));
        assert!(tree.is_proper_ancestor(&node(ids.button), &node(ids.root)));
        assert!(!tree.is_proper_ancestor(&node(ids.button), &node(ids.button)));
        let value = ObjectRef::value(ids.button, "left");
        assert!(tree.is_ancestor(&value, &node(ids.button)));
        assert!(!tree.is_ancestor(&node(ObjectId(9999)), &node(ids.root)));
    }

    #[test]
    fn test_reduce_siblings() {
        let SampleProject { tree, ids } = fixtures::sample_project();
        let selection = vec![node(ids.main_page), node(ids.details_page)];
        assert_eq!(tree.reduce_until_common_parent(&selection), selection);
    }

    #[test]
    fn test_reduce_drops_descendants() {
        let SampleProject { tree, ids } = fixtures::sample_project();
        let selection = vec![node(ids.main_page), node(ids.button), node(ids.details_page)];
        assert_eq!(
            tree.reduce_until_common_parent(&selection),
            vec![node(ids.main_page), node(ids.details_page)]
        );
    }

    #[test]
    fn test_reduce_climbs_to_shared_grandparent() {
        let SampleProject { tree, ids } = fixtures::sample_project();
        // a page and a style only meet at the root
        let selection = vec![node(ids.main_page), node(ids.default_style)];
        assert_eq!(
            tree.reduce_until_common_parent(&selection),
            vec![node(ids.pages), node(ids.styles)]
        );
    }

    #[test]
    fn test_reduce_single_root() {
        let SampleProject { tree, ids } = fixtures::sample_project();
        assert!(tree.reduce_until_common_parent(&[node(ids.root)]).is_empty());
    }

    #[test]
    fn test_object_path() {
        let SampleProject { tree, ids } = fixtures::sample_project();
        assert_eq!(tree.get_object_path_as_string(&node(ids.root)).unwrap(), "/");
        assert_eq!(
            tree.get_object_path_as_string(&node(ids.label)).unwrap(),
            "/pages/0/widgets/1/widgets/0"
        );
        assert_eq!(
            tree.get_object_path_as_string(&ObjectRef::value(ids.general, "title")).unwrap(),
            "/settings/general/title"
        );
    }

    #[test]
    fn test_object_path_of_detached_element() {
        let SampleProject { mut tree, ids } = fixtures::sample_project();
        tree.remove(ids.details_page);
        assert!(tree.get_object_path(&node(ids.details_page)).is_none());
    }

    #[test]
    fn test_object_from_path() {
        let SampleProject { tree, ids } = fixtures::sample_project();
        let path = tree.get_object_path(&node(ids.label)).unwrap();
        assert_eq!(tree.get_object_from_path(ids.root, &path), Some(node(ids.label)));
        assert_eq!(
            tree.get_object_from_string_path(ids.root, "/pages/0/widgets/1/widgets/0"),
            Some(node(ids.label))
        );
        assert_eq!(tree.get_object_from_string_path(ids.root, "/"), Some(node(ids.root)));
        assert_eq!(
            tree.get_object_from_string_path(ids.root, "/settings/general/title"),
            Some(ObjectRef::value(ids.general, "title"))
        );
        assert_eq!(tree.get_object_from_string_path(ids.root, "/pages/5"), None);
        assert_eq!(tree.get_object_from_string_path(ids.root, "/name/deeper"), None);
    }

    #[test]
    fn test_object_from_object_id() {
        let SampleProject { tree, ids } = fixtures::sample_project();
        assert_eq!(tree.get_object_from_object_id(ids.root, "root"), Some(node(ids.root)));
        assert_eq!(
            tree.get_object_from_object_id(ids.root, "root.pages.1.widgets.2.widgets.1"),
            Some(node(ids.label))
        );
        assert_eq!(
            tree.get_object_from_object_id(ids.root, "root.pages.1.widgets.1.left"),
            Some(ObjectRef::value(ids.button, "left"))
        );
        assert_eq!(tree.get_object_from_object_id(ids.root, "root.pages.9"), None);
        assert_eq!(tree.get_object_from_object_id(ids.root, "other.pages"), None);
    }

    #[test]
    fn test_object_id_prefix_requires_separator() {
        let mut registry = crate::schema::ClassRegistry::new();
        registry.register(Arc::new(ClassInfo::new("Leaf", vec![])));
        let root_class = registry.register(Arc::new(ClassInfo::new(
            "Root",
            vec![
                PropertyInfo::object("a", "Leaf"),
                PropertyInfo::object("ab", "Leaf"),
            ],
        )));
        let registry = Arc::new(registry);
        let leaf = registry.find("Leaf").unwrap().clone();
        let mut tree = ObjectTree::new(registry, root_class);
        let root = tree.root();
        tree.create_object(root, "a", &leaf).unwrap();
        let ab = tree.create_object(root, "ab", &leaf).unwrap();

        assert_eq!(tree.get_object_from_object_id(root, "root.ab"), Some(node(ab)));
        assert_eq!(tree.get_object_from_object_id(root, "root.abc"), None);
    }

    #[test]
    fn test_ancestors() {
        let SampleProject { tree, ids } = fixtures::sample_project();
        // array elements include themselves, the root level lists the owner only
        assert_eq!(
            tree.get_ancestors(&node(ids.button), None, false),
            vec![node(ids.root), node(ids.pages), node(ids.main_page), node(ids.button)]
        );
        assert_eq!(
            tree.get_ancestors(&node(ids.general), None, false),
            vec![node(ids.root), node(ids.settings)]
        );
        assert_eq!(
            tree.get_ancestors(&ObjectRef::value(ids.main_page, "name"), None, false),
            vec![node(ids.root), node(ids.pages), node(ids.main_page)]
        );
    }

    #[test]
    fn test_ancestors_from_array() {
        let SampleProject { tree, ids } = fixtures::sample_project();
        let button = node(ids.button);
        assert_eq!(
            tree.get_ancestors(&button, Some(ids.main_widgets), false),
            vec![button.clone()]
        );
        assert_eq!(
            tree.get_ancestors(&button, Some(ids.main_widgets), true),
            vec![node(ids.main_widgets), button.clone()]
        );
        assert_eq!(
            tree.get_ancestors(&node(ids.label), Some(ids.main_widgets), true),
            vec![node(ids.main_widgets), node(ids.container), node(ids.label)]
        );
        // the root is a composite, so the flag has no effect from there
        assert_eq!(
            tree.get_ancestors(&button, None, true),
            tree.get_ancestors(&button, None, false)
        );
    }

    #[test]
    fn test_human_readable_path() {
        let SampleProject { tree, ids } = fixtures::sample_project();
        assert_eq!(
            tree.get_human_readable_object_path(&node(ids.button)),
            "Pages / Page: Main / button"
        );
    }

    #[test]
    fn test_is_object_exists() {
        let SampleProject { mut tree, ids } = fixtures::sample_project();
        assert!(tree.is_object_exists(ids.button));
        assert!(tree.is_object_exists(ids.root));
        tree.remove(ids.button);
        assert!(!tree.is_object_exists(ids.button));
        tree.remove(ids.settings);
        assert!(!tree.is_object_exists(ids.settings));
        assert!(!tree.is_object_exists(ObjectId(9999)));
    }

    #[test]
    fn test_show_only_children_in_tree() {
        let SampleProject { tree, ids } = fixtures::sample_project();
        assert!(tree.is_show_only_children_in_tree(&node(ids.pages)));
        assert!(tree.is_show_only_children_in_tree(&node(ids.root)));
    }

    #[test]
    fn test_same_parent_and_ancestor_of_type() {
        let SampleProject { tree, ids } = fixtures::sample_project();
        assert!(tree
            .are_all_children_of_the_same_parent(&[node(ids.main_page), node(ids.details_page)]));
        assert!(!tree
            .are_all_children_of_the_same_parent(&[node(ids.main_page), node(ids.button)]));
        assert!(tree.are_all_children_of_the_same_parent(&[]));

        let page = tree.registry().find("Page").unwrap().clone();
        assert_eq!(
            tree.get_ancestor_of_type(&ObjectRef::value(ids.label, "name"), &page),
            Some(node(ids.main_page))
        );
        let derived = ClassInfo::derive(&page, "Unused", ClassInfoOverrides::default());
        assert_eq!(tree.get_ancestor_of_type(&node(ids.label), &derived), None);
    }

    #[test]
    fn test_descendants_preorder() {
        let SampleProject { tree, ids } = fixtures::sample_project();
        let all = tree.descendants(ids.main_page);
        assert_eq!(all[0], ids.main_page);
        assert_eq!(all[1], ids.main_widgets);
        assert!(all.contains(&ids.label));
        assert!(!all.contains(&ids.details_page));
    }
}
