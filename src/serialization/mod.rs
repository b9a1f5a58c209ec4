//! JSON persistence of object trees.
//!
//! Composite nodes map to JSON objects, arrays to JSON arrays and scalars are
//! stored verbatim. Loading goes through the same construction API as
//! interactive editing, so ids and element keys are minted fresh.
//!
//! # Example
//!
//! ```ignore
//! use project_model::serialization;
//!
//! let tree = serialization::load_tree(registry, &json, "Project", "root")?;
//! let page = tree.get_object_from_string_path(tree.root(), "/pages/0").unwrap();
//! let copy = serialization::clone_object(&mut tree, pages, page.node().unwrap())?;
//! ```

use crate::error::{ModelError, Result, ResultExt};
use crate::model::{ObjectId, ObjectTree, PropertyValue};
use crate::schema::{ClassInfo, ClassRegistry, PropertyType};
use serde_json::{Map, Value};
use std::sync::Arc;

/// JSON key naming the concrete class of an object whose class could not
/// be told from its slot or its class's `get_class` hook.
pub const CLASS_TAG: &str = "$class";

// ==================== Saving ====================

/// Class a loader would pick for `object` from its slot alone.
fn declared_class(tree: &ObjectTree, object: ObjectId) -> Option<Arc<ClassInfo>> {
    let node = tree.get(object)?;
    let parent = tree.get(node.parent?)?;
    if parent.is_array() {
        return Some(Arc::clone(&parent.class));
    }
    let type_class = node.property_info.as_ref()?.type_class.as_deref()?;
    tree.registry().find(type_class).cloned()
}

/// JSON form of a node and everything below it.
///
/// Computed properties are skipped. Scalars stored under undeclared names
/// are kept so that unknown data survives a round trip. Objects of a class
/// that loading would not pick again get a [`CLASS_TAG`] entry.
pub fn object_to_json(tree: &ObjectTree, object: ObjectId) -> Value {
    let Some(node) = tree.get(object) else {
        return Value::Null;
    };

    if let Some(elements) = node.elements() {
        return Value::Array(elements.iter().map(|&e| object_to_json(tree, e)).collect());
    }

    let mut map = Map::new();
    let Some(properties) = node.properties() else {
        return Value::Object(map);
    };

    for property in &node.class.properties {
        if property.computed {
            continue;
        }
        match properties.get(&property.name) {
            Some(PropertyValue::Scalar(value)) => {
                map.insert(property.name.clone(), value.clone());
            }
            Some(PropertyValue::Child(child)) => {
                map.insert(property.name.clone(), object_to_json(tree, *child));
            }
            None => {}
        }
    }

    let mut extra: Vec<(&String, &PropertyValue)> = properties
        .iter()
        .filter(|(name, _)| node.class.property(name).is_none())
        .collect();
    extra.sort_by(|a, b| a.0.cmp(b.0));
    for (name, value) in extra {
        match value {
            PropertyValue::Scalar(value) => {
                map.insert(name.clone(), value.clone());
            }
            PropertyValue::Child(child) => {
                map.insert(name.clone(), object_to_json(tree, *child));
            }
        }
    }

    let mut json = Value::Object(map);
    if let Some(declared) = declared_class(tree, object) {
        let resolved = resolve_class(tree.registry(), &declared, &json);
        if !resolved.is_ok_and(|c| Arc::ptr_eq(&c, &node.class)) {
            json[CLASS_TAG] = Value::String(node.class.name.clone());
        }
    }
    json
}

/// Serialize a whole tree to a JSON string.
pub fn tree_to_string(tree: &ObjectTree, pretty: bool) -> Result<String> {
    let json = object_to_json(tree, tree.root());
    let text = if pretty {
        serde_json::to_string_pretty(&json)?
    } else {
        serde_json::to_string(&json)?
    };
    Ok(text)
}

// ==================== Loading ====================

/// Concrete class for `json`: its [`CLASS_TAG`], else the declared
/// class's `get_class` hook, else the declared class.
fn resolve_class(
    registry: &ClassRegistry,
    declared: &Arc<ClassInfo>,
    json: &Value,
) -> Result<Arc<ClassInfo>> {
    if let Some(name) = json.get(CLASS_TAG).and_then(Value::as_str) {
        let class = class_by_name(registry, name)?;
        if !class.is_subclass_of(declared) {
            return Err(ModelError::Deserialize(format!(
                "class {} is not a {}",
                name, declared.name
            )));
        }
        return Ok(class);
    }
    let Some(get_class) = &declared.get_class else {
        return Ok(Arc::clone(declared));
    };
    match get_class(json) {
        Some(name) => registry
            .find(&name)
            .cloned()
            .ok_or(ModelError::UnknownClass(name)),
        None => Ok(Arc::clone(declared)),
    }
}

fn class_by_name(registry: &ClassRegistry, name: &str) -> Result<Arc<ClassInfo>> {
    registry
        .find(name)
        .cloned()
        .ok_or_else(|| ModelError::UnknownClass(name.to_string()))
}

/// Populate an empty composite node from `json`.
///
/// The class `before_load_hook` may rewrite the payload first. Declared
/// properties missing from the payload take their `default_value`.
fn fill_composite(tree: &mut ObjectTree, object: ObjectId, json: &Value) -> Result<()> {
    let class = tree
        .get(object)
        .map(|n| Arc::clone(&n.class))
        .ok_or_else(|| ModelError::Deserialize(format!("no object {}", object)))?;

    let mut json = json.clone();
    if let Some(hook) = &class.before_load_hook {
        hook(tree, object, &mut json);
    }
    let Value::Object(mut map) = json else {
        return Err(ModelError::Deserialize(format!(
            "expected a JSON object for class {}, found {}",
            class.name,
            json_kind(&json)
        )));
    };
    map.remove(CLASS_TAG);

    for property in &class.properties {
        let value = map.remove(&property.name);
        match property.property_type {
            PropertyType::Object => {
                let Some(value) = value.filter(|v| !v.is_null()) else {
                    continue;
                };
                let type_class = property.type_class.as_deref().ok_or_else(|| {
                    ModelError::Schema(format!("property '{}' has no type class", property.name))
                })?;
                let declared = class_by_name(tree.registry(), type_class)?;
                let child_class = resolve_class(tree.registry(), &declared, &value)?;
                let child = tree.create_object(object, &property.name, &child_class)?;
                fill_composite(tree, child, &value)
                    .with_context(|| format!("loading property '{}'", property.name))?;
            }
            PropertyType::Array => {
                let Some(value) = value.filter(|v| !v.is_null()) else {
                    continue;
                };
                let Value::Array(items) = value else {
                    return Err(ModelError::Deserialize(format!(
                        "property '{}' of {} expects a JSON array",
                        property.name, class.name
                    )));
                };
                let array = tree.create_array(object, &property.name)?;
                for (index, item) in items.iter().enumerate() {
                    load_into_array(tree, array, item, None)
                        .with_context(|| format!("loading {}[{}]", property.name, index))?;
                }
            }
            _ => {
                if let Some(value) = value.or_else(|| property.default_value.clone()) {
                    tree.set_scalar_raw(object, &property.name, value);
                }
            }
        }
    }

    for (name, value) in map {
        tracing::trace!(class = %class.name, property = %name, "keeping undeclared property");
        tree.set_scalar_raw(object, &name, value);
    }
    Ok(())
}

fn json_kind(json: &Value) -> &'static str {
    match json {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn load_element(
    tree: &mut ObjectTree,
    array: ObjectId,
    json: &Value,
    class: &Arc<ClassInfo>,
    index: Option<usize>,
) -> Result<ObjectId> {
    let index = index.unwrap_or_else(|| tree.as_array(array).map_or(0, |e| e.len()));
    let element = tree.insert_element(array, index, class)?;
    if let Err(err) = fill_composite(tree, element, json) {
        tree.remove(element);
        return Err(err);
    }
    Ok(element)
}

/// Load one element from `json` into `array` at `index`, or at the end.
///
/// The element class is the array's class, refined by its `get_class` hook.
pub fn load_into_array(
    tree: &mut ObjectTree,
    array: ObjectId,
    json: &Value,
    index: Option<usize>,
) -> Result<ObjectId> {
    let declared = tree
        .get(array)
        .filter(|n| n.is_array())
        .map(|n| Arc::clone(&n.class))
        .ok_or_else(|| ModelError::Deserialize(format!("{} is not an array", array)))?;
    let class = resolve_class(tree.registry(), &declared, json)?;
    load_element(tree, array, json, &class, index)
}

/// Load `json` into the Object or Array slot `property_name` of `parent`.
///
/// On failure the new node is detached and the slot keeps its old content.
pub fn load_object(
    tree: &mut ObjectTree,
    parent: ObjectId,
    property_name: &str,
    json: &Value,
) -> Result<ObjectId> {
    let property = tree
        .find_property_by_name(parent, property_name)
        .cloned()
        .ok_or_else(|| ModelError::UnknownProperty {
            class: tree.get(parent).map(|n| n.class.name.clone()).unwrap_or_default(),
            property: property_name.to_string(),
        })?;
    let type_class = property.type_class.as_deref().ok_or_else(|| {
        ModelError::Schema(format!("property '{}' has no type class", property.name))
    })?;
    let previous = tree.get_property(parent, property_name).cloned();

    match property.property_type {
        PropertyType::Array => {
            let Value::Array(items) = json else {
                return Err(ModelError::Deserialize(format!(
                    "property '{}' expects a JSON array",
                    property_name
                )));
            };
            let array = tree.create_array(parent, property_name)?;
            for (index, item) in items.iter().enumerate() {
                if let Err(err) = load_into_array(tree, array, item, None) {
                    rollback_slot(tree, parent, property_name, array, previous);
                    return Err(err.with_context(format!("loading {}[{}]", property_name, index)));
                }
            }
            Ok(array)
        }
        _ => {
            let declared = class_by_name(tree.registry(), type_class)?;
            let class = resolve_class(tree.registry(), &declared, json)?;
            let child = tree.create_object(parent, property_name, &class)?;
            if let Err(err) = fill_composite(tree, child, json) {
                rollback_slot(tree, parent, property_name, child, previous);
                return Err(err.with_context(format!("loading property '{}'", property_name)));
            }
            Ok(child)
        }
    }
}

/// Detach a node created by a failed load and give the slot back its old value.
fn rollback_slot(
    tree: &mut ObjectTree,
    parent: ObjectId,
    property_name: &str,
    created: ObjectId,
    previous: Option<PropertyValue>,
) {
    tree.remove(created);
    if let Some(previous) = previous {
        tree.restore_field(parent, property_name, previous);
    }
    tracing::debug!(property = property_name, "rolled back failed load");
}

/// Build a tree whose root is `json` loaded as `class_name`.
pub fn load_tree(
    registry: Arc<ClassRegistry>,
    json: &Value,
    class_name: &str,
    root_id: &str,
) -> Result<ObjectTree> {
    let declared = class_by_name(&registry, class_name)?;
    let class = resolve_class(&registry, &declared, json)?;
    let mut tree = ObjectTree::with_root_id(registry, class, root_id);
    let root = tree.root();
    fill_composite(&mut tree, root, json).context("loading document")?;
    tracing::debug!(nodes = tree.len(), class = class_name, "loaded tree");
    Ok(tree)
}

/// Parse and load a JSON document.
pub fn load_tree_from_str(
    registry: Arc<ClassRegistry>,
    text: &str,
    class_name: &str,
    root_id: &str,
) -> Result<ObjectTree> {
    let json: Value = serde_json::from_str(text)?;
    load_tree(registry, &json, class_name, root_id)
}

// ==================== Copying ====================

/// Independent copy of `object`, of the same class, appended to `target_array`.
///
/// The copy receives a fresh key and id from the target.
pub fn clone_object(
    tree: &mut ObjectTree,
    target_array: ObjectId,
    object: ObjectId,
) -> Result<ObjectId> {
    let node = tree
        .get(object)
        .ok_or_else(|| ModelError::Deserialize(format!("no object {}", object)))?;
    if node.is_array() {
        return Err(ModelError::Deserialize(format!(
            "{} is an array and cannot be cloned as an element",
            node.id
        )));
    }
    let class = Arc::clone(&node.class);
    let json = object_to_json(tree, object);
    load_element(tree, target_array, &json, &class, None)
}

/// Add an element built from `json`, passing it through the array
/// property's `intercept_add_object` hook first.
pub fn add_object(tree: &mut ObjectTree, array: ObjectId, json: Value) -> Result<ObjectId> {
    let intercept = tree
        .get(array)
        .and_then(|n| n.property_info.as_ref())
        .and_then(|p| p.intercept_add_object.clone());
    let json = match intercept {
        Some(intercept) => intercept(tree, array, json),
        None => json,
    };
    load_into_array(tree, array, &json, None)
}

/// Add a new element to `array` using the element class's `new_item` hook.
///
/// The hook may decline, in which case nothing is added. Without a hook the
/// class `default_value` (or an empty object) is used.
pub fn add_new_item(tree: &mut ObjectTree, array: ObjectId) -> Result<Option<ObjectId>> {
    let class = tree
        .get(array)
        .filter(|n| n.is_array())
        .map(|n| Arc::clone(&n.class))
        .ok_or_else(|| ModelError::Deserialize(format!("{} is not an array", array)))?;

    let json = match &class.new_item {
        Some(new_item) => match new_item(tree, array) {
            Some(json) => json,
            None => return Ok(None),
        },
        None => class
            .default_value
            .clone()
            .unwrap_or_else(|| Value::Object(Map::new())),
    };
    add_object(tree, array, json).map(Some)
}
