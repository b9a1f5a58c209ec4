//! Metadata-driven property access.
//!
//! The schema is advisory here: [`ObjectTree::get_property`] reads whatever
//! is stored under a name, declared or not. Flags, labels and inherited
//! values are looked up through the node's class.

use crate::humanize::humanize;
use crate::model::id::ObjectId;
use crate::model::object::{ObjectRef, PropertyValue};
use crate::model::tree::ObjectTree;
use crate::schema::{ClassInfo, InheritedValue, PastePlace, PropertyInfo};
use serde_json::Value;
use std::sync::Arc;

/// Render a JSON number the way a user expects to read it: `3`, not `3.0`.
pub fn format_number(number: &serde_json::Number) -> String {
    if number.is_i64() || number.is_u64() {
        return number.to_string();
    }
    match number.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f),
        Some(f) => f.to_string(),
        None => number.to_string(),
    }
}

/// Display form of a stored scalar: strings verbatim, numbers via [`format_number`].
fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => format_number(n),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

impl ObjectTree {
    // ==================== Raw access ====================

    /// Whatever is stored under `name`, without consulting the schema.
    pub fn get_property(&self, object: ObjectId, name: &str) -> Option<&PropertyValue> {
        self.get(object)?.field(name)
    }

    /// Scalar stored under `name`, if any.
    pub fn get_scalar(&self, object: ObjectId, name: &str) -> Option<&Value> {
        self.get_property(object, name)?.as_scalar()
    }

    pub fn find_property_by_name(
        &self,
        object: ObjectId,
        name: &str,
    ) -> Option<&Arc<PropertyInfo>> {
        self.get(object)?.class.property(name)
    }

    /// Declared property whose slot currently holds `child`.
    pub fn find_property_by_child_object(
        &self,
        object: ObjectId,
        child: ObjectId,
    ) -> Option<&Arc<PropertyInfo>> {
        let node = self.get(object)?;
        node.class
            .properties
            .iter()
            .find(|p| node.field(&p.name).and_then(|v| v.as_child()) == Some(child))
    }

    // ==================== Flags ====================

    /// Defaults to visible.
    pub fn is_property_hidden(&self, object: ObjectId, property: &PropertyInfo) -> bool {
        property
            .hide_in_property_grid
            .as_ref()
            .is_some_and(|flag| flag.evaluate(self, object, property))
    }

    /// Defaults to enumerable.
    pub fn is_property_enumerable(&self, object: ObjectId, property: &PropertyInfo) -> bool {
        property
            .enumerable
            .as_ref()
            .map_or(true, |flag| flag.evaluate(self, object, property))
    }

    /// Value the object inherits for `name` through its class hook.
    ///
    /// `None` means "nothing inherited", which differs from inheriting a
    /// null or empty value.
    pub fn get_inherited_value(&self, object: ObjectId, name: &str) -> Option<InheritedValue> {
        let hook = self.get(object)?.class.get_inherited_value.clone()?;
        hook(self, object, name)
    }

    /// Display name of a property, or its humanized name.
    pub fn humanize_property_name(&self, object: ObjectId, name: &str) -> String {
        match self.find_property_by_name(object, name) {
            Some(property) => match &property.display_name {
                Some(display_name) => display_name.clone(),
                None => humanize(name),
            },
            None => humanize(name),
        }
    }

    // ==================== Labels ====================

    /// Property value as display text.
    ///
    /// Numbers and strings render directly, arrays as the comma-joined labels
    /// of their elements, child objects through [`object_to_string`](Self::object_to_string).
    /// Anything else renders as an empty string.
    pub fn get_property_as_string(&self, object: ObjectId, property: &PropertyInfo) -> String {
        match self.get_property(object, &property.name) {
            Some(PropertyValue::Scalar(Value::Number(n))) => format_number(n),
            Some(PropertyValue::Scalar(Value::String(s))) => s.clone(),
            Some(PropertyValue::Child(child)) => match self.as_array(*child) {
                Some(elements) => elements
                    .iter()
                    .map(|&e| self.label(e))
                    .collect::<Vec<_>>()
                    .join(", "),
                None => self.object_to_string(&ObjectRef::Node(*child)),
            },
            _ => String::new(),
        }
    }

    /// Own label of a node: class label hook, then a non-empty `name`, then the id.
    pub fn label(&self, object: ObjectId) -> String {
        let Some(node) = self.get(object) else {
            return String::new();
        };
        if let Some(label) = &node.class.label {
            return label(self, object);
        }
        match node.field("name").and_then(|v| v.as_scalar()) {
            Some(Value::String(name)) if !name.is_empty() => name.clone(),
            Some(Value::Number(n)) => format_number(n),
            _ => node.id.clone(),
        }
    }

    /// Label shown for any handle in navigation and paths.
    ///
    /// Elements of an array are passed through the `child_label` formatter of
    /// the property that holds the array, when it has one.
    pub fn object_to_string(&self, object: &ObjectRef) -> String {
        let label = match object {
            ObjectRef::Value { parent, key } => self
                .get_scalar(*parent, key)
                .map(scalar_to_string)
                .unwrap_or_default(),
            ObjectRef::Node(id) => match self.get(*id) {
                Some(node) if node.is_array() => {
                    let key = node.key.as_deref().unwrap_or_default();
                    let display_name = node
                        .parent
                        .and_then(|p| self.find_property_by_name(p, key))
                        .and_then(|p| p.display_name.clone());
                    display_name.unwrap_or_else(|| humanize(key))
                }
                Some(_) => self.label(*id),
                None => return String::new(),
            },
        };

        let Some(parent) = self.parent_of(object).and_then(|p| self.get(p)) else {
            return label;
        };
        if !parent.is_array() {
            return label;
        }
        let (Some(grandparent), Some(key)) = (parent.parent, parent.key.as_deref()) else {
            return label;
        };
        match self
            .find_property_by_name(grandparent, key)
            .and_then(|p| p.child_label.as_ref())
        {
            Some(child_label) => child_label(self, object, &label),
            None => label,
        }
    }

    // ==================== Placement ====================

    /// Where objects of `class` should be pasted when `object` is the target.
    ///
    /// The target's class hook decides when present; otherwise an array
    /// accepts objects of its element class and nothing else qualifies.
    pub fn find_paste_place_inside(
        &self,
        object: ObjectId,
        class: &ClassInfo,
        is_single_object: bool,
    ) -> Option<PastePlace> {
        let node = self.get(object)?;
        if let Some(hook) = &node.class.find_paste_place_inside {
            if !node.is_array() {
                return hook(self, object, class, is_single_object);
            }
        }
        if node.is_array() && class.is_subclass_of(&node.class) {
            return Some(PastePlace::Object(object));
        }
        None
    }
}
