//! Declarative class schemas.
//!
//! Classes can be described in TOML instead of code:
//!
//! ```toml
//! [[class]]
//! name = "Widget"
//! label_property = "name"
//! discriminator = "type"
//!
//! [[class.property]]
//! name = "name"
//! type = "string"
//! unique = true
//!
//! [[class]]
//! name = "Container"
//! extends = "Widget"
//!
//! [[class.property]]
//! name = "widgets"
//! type = "array"
//! type_class = "Widget"
//! ```
//!
//! Behaviour that needs code (check hooks, custom matching of references)
//! is attached by deriving from the loaded classes.

use crate::error::{ModelError, Result, ResultExt};
use crate::model::ObjectTree;
use crate::schema::{
    ClassInfo, ClassInfoOverrides, ClassRegistry, EnumItem, PropertyGridGroup, PropertyInfo,
    PropertyType, ACTIONS_GROUP, DATA_GROUP, GENERAL_GROUP, GEOMETRY_GROUP, STYLE_GROUP,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

// ==================== Definitions ====================

/// A file of class declarations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaDefinition {
    #[serde(rename = "class", default)]
    pub classes: Vec<ClassDefinition>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassDefinition {
    pub name: String,

    /// Base class, declared in the same file or already registered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Scalar property used as the object's label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_property: Option<String>,

    /// JSON field naming the concrete class of a loaded object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,

    #[serde(rename = "property", default)]
    pub properties: Vec<PropertyDefinition>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub name: String,

    #[serde(rename = "type")]
    pub property_type: PropertyType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_class: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enumerable: Option<bool>,

    #[serde(default)]
    pub hidden: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_only_children_in_tree: Option<bool>,

    /// Prefix prepended to the labels of this array's elements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_label_prefix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    #[serde(default)]
    pub inheritable: bool,

    #[serde(default)]
    pub unique: bool,

    #[serde(default)]
    pub computed: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_items: Vec<EnumItem>,

    /// Where referenced objects live, for object reference properties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_path: Option<Vec<String>>,

    /// Built-in property grid group: general, geometry, style, data or actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

fn builtin_group(id: &str) -> Option<PropertyGridGroup> {
    [GENERAL_GROUP, GEOMETRY_GROUP, STYLE_GROUP, DATA_GROUP, ACTIONS_GROUP]
        .into_iter()
        .find(|g| g.id == id)
}

impl PropertyDefinition {
    fn to_property_info(&self, class_name: &str) -> Result<PropertyInfo> {
        if self.property_type.is_container() && self.type_class.is_none() {
            return Err(ModelError::Schema(format!(
                "property '{}' of {} needs a type_class",
                self.name, class_name
            )));
        }

        let mut property = PropertyInfo::new(self.name.clone(), self.property_type);
        property.type_class = self.type_class.clone();
        property.display_name = self.display_name.clone();
        property.enumerable = self.enumerable.map(Into::into);
        if self.hidden {
            property.hide_in_property_grid = Some(true.into());
        }
        property.show_only_children_in_tree = self.show_only_children_in_tree;
        property.default_value = self.default.clone();
        property.inheritable = self.inheritable;
        property.unique = self.unique;
        property.computed = self.computed;
        property.enum_items = self.enum_items.clone();
        property.referenced_object_collection_path = self.collection_path.clone();

        if let Some(group) = &self.group {
            property.property_grid_group = Some(builtin_group(group).ok_or_else(|| {
                ModelError::Schema(format!(
                    "property '{}' of {} uses unknown group '{}'",
                    self.name, class_name, group
                ))
            })?);
        }

        if let Some(prefix) = &self.child_label_prefix {
            let prefix = prefix.clone();
            property = property.with_child_label(move |_, _, label| format!("{}{}", prefix, label));
        }
        Ok(property)
    }
}

impl ClassDefinition {
    fn build(&self, base: Option<&Arc<ClassInfo>>) -> Result<ClassInfo> {
        let properties = self
            .properties
            .iter()
            .map(|p| p.to_property_info(&self.name))
            .collect::<Result<Vec<_>>>()?;

        let class = match base {
            Some(base) => ClassInfo::derive(
                base,
                self.name.clone(),
                ClassInfoOverrides {
                    properties: Some(properties),
                    ..Default::default()
                },
            ),
            None => ClassInfo::new(self.name.clone(), properties),
        };
        let class = match &self.discriminator {
            Some(field) => {
                let field = field.clone();
                class.with_get_class(move |json| {
                    json.get(&field).and_then(|v| v.as_str()).map(str::to_string)
                })
            }
            None => class,
        };

        Ok(match &self.label_property {
            Some(label_property) => {
                let label_property = label_property.clone();
                class.with_label(move |tree: &ObjectTree, object| {
                    match tree.get_scalar(object, &label_property) {
                        Some(serde_json::Value::String(s)) if !s.is_empty() => s.clone(),
                        _ => tree.get(object).map(|n| n.id.clone()).unwrap_or_default(),
                    }
                })
            }
            None => class,
        })
    }
}

// ==================== Loading ====================

impl SchemaDefinition {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a schema file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(ModelError::from)
            .with_context(|| format!("Failed to read schema file {:?}", path))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse schema file {:?}", path))
    }

    /// Register every declared class, bases before derived classes.
    ///
    /// A base may also be a class that is already in `registry`. Unknown
    /// bases, unknown type classes, duplicate names and inheritance cycles
    /// are schema errors.
    pub fn register_into(&self, registry: &mut ClassRegistry) -> Result<()> {
        let mut by_name: HashMap<&str, &ClassDefinition> = HashMap::new();
        for class in &self.classes {
            if by_name.insert(class.name.as_str(), class).is_some() {
                return Err(ModelError::Schema(format!(
                    "class {} is declared twice",
                    class.name
                )));
            }
        }

        let mut built: HashMap<String, Arc<ClassInfo>> = HashMap::new();
        for class in &self.classes {
            let mut visiting = Vec::new();
            self.build_class(class, &by_name, registry, &mut built, &mut visiting)?;
        }

        for class in &self.classes {
            for property in &class.properties {
                if let Some(type_class) = &property.type_class {
                    if registry.find(type_class).is_none() {
                        return Err(ModelError::Schema(format!(
                            "property '{}' of {} refers to unknown class {}",
                            property.name, class.name, type_class
                        )));
                    }
                }
            }
        }

        tracing::debug!(classes = self.classes.len(), "registered schema");
        Ok(())
    }

    fn build_class<'a>(
        &'a self,
        class: &'a ClassDefinition,
        by_name: &HashMap<&str, &'a ClassDefinition>,
        registry: &mut ClassRegistry,
        built: &mut HashMap<String, Arc<ClassInfo>>,
        visiting: &mut Vec<&'a str>,
    ) -> Result<Arc<ClassInfo>> {
        if let Some(class_info) = built.get(&class.name) {
            return Ok(Arc::clone(class_info));
        }
        if visiting.contains(&class.name.as_str()) {
            visiting.push(class.name.as_str());
            return Err(ModelError::Schema(format!(
                "inheritance cycle: {}",
                visiting.join(" -> ")
            )));
        }
        visiting.push(class.name.as_str());

        let base = match &class.extends {
            Some(base_name) => match by_name.get(base_name.as_str()) {
                Some(&base_def) => {
                    Some(self.build_class(base_def, by_name, registry, built, visiting)?)
                }
                None => Some(registry.find(base_name).cloned().ok_or_else(|| {
                    ModelError::Schema(format!(
                        "class {} extends unknown class {}",
                        class.name, base_name
                    ))
                })?),
            },
            None => None,
        };

        let class_info = registry.register(Arc::new(class.build(base.as_ref())?));
        built.insert(class.name.clone(), Arc::clone(&class_info));
        visiting.pop();
        Ok(class_info)
    }

    /// Build a fresh registry holding exactly the declared classes.
    pub fn into_registry(self) -> Result<ClassRegistry> {
        let mut registry = ClassRegistry::new();
        self.register_into(&mut registry)?;
        Ok(registry)
    }
}
