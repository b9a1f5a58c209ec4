//! Class descriptors and single-inheritance composition.
//!
//! A [`ClassInfo`] is immutable once it is wrapped in an `Arc` and
//! registered. Derived classes are built with [`ClassInfo::derive`], which
//! flattens the base schema into the derived one once, at construction time,
//! and keeps a pointer to the base for ancestry queries.

use crate::model::{Message, ObjectId, ObjectTree};
use crate::schema::property::{Flag, PropertyInfo};
use std::fmt;
use std::sync::Arc;

/// Value inherited from another object, together with the object it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct InheritedValue {
    pub value: serde_json::Value,
    pub source: ObjectId,
}

/// Replacement reported by an update hook: the value to store and the value it displaced.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueUpdate {
    pub old_value: serde_json::Value,
    pub new_value: serde_json::Value,
}

/// Where pasted objects of some class should go inside a target.
#[derive(Debug, Clone)]
pub enum PastePlace {
    /// An existing array (or object) that accepts the pasted objects.
    Object(ObjectId),
    /// An empty slot on `owner` that should be created to hold the pasted object.
    Property {
        owner: ObjectId,
        property: Arc<PropertyInfo>,
    },
}

pub type LabelFn = dyn Fn(&ObjectTree, ObjectId) -> String + Send + Sync;
pub type GetClassFn = dyn Fn(&serde_json::Value) -> Option<String> + Send + Sync;
pub type InheritedValueFn =
    dyn Fn(&ObjectTree, ObjectId, &str) -> Option<InheritedValue> + Send + Sync;
pub type BeforeLoadHookFn = dyn Fn(&ObjectTree, ObjectId, &mut serde_json::Value) + Send + Sync;
pub type UpdateObjectValueHookFn =
    dyn Fn(&ObjectTree, ObjectId, &str, &serde_json::Value) -> Option<ValueUpdate> + Send + Sync;
pub type AfterUpdateObjectHookFn = dyn Fn(
        &mut ObjectTree,
        ObjectId,
        &serde_json::Map<String, serde_json::Value>,
        &serde_json::Map<String, serde_json::Value>,
    ) + Send
    + Sync;
pub type FindPastePlaceFn =
    dyn Fn(&ObjectTree, ObjectId, &ClassInfo, bool) -> Option<PastePlace> + Send + Sync;
pub type NewItemFn = dyn Fn(&ObjectTree, ObjectId) -> Option<serde_json::Value> + Send + Sync;
pub type ClassCheckFn = dyn Fn(&ObjectTree, ObjectId) -> Vec<Message> + Send + Sync;

/// Resolved, inheritance-flattened schema of a class.
#[derive(Clone, Default)]
pub struct ClassInfo {
    pub name: String,
    pub properties: Vec<Arc<PropertyInfo>>,
    pub parent_class_info: Option<Arc<ClassInfo>>,

    pub get_class: Option<Arc<GetClassFn>>,
    pub label: Option<Arc<LabelFn>>,
    pub show_in_navigation: bool,
    pub hide_in_properties: bool,
    pub is_property_menu_supported: bool,
    pub default_navigation_key: Option<String>,
    pub new_item: Option<Arc<NewItemFn>>,
    pub get_inherited_value: Option<Arc<InheritedValueFn>>,
    pub default_value: Option<serde_json::Value>,
    pub find_paste_place_inside: Option<Arc<FindPastePlaceFn>>,
    pub icon: Option<String>,
    pub before_load_hook: Option<Arc<BeforeLoadHookFn>>,
    pub update_object_value_hook: Option<Arc<UpdateObjectValueHookFn>>,
    pub after_update_object_hook: Option<Arc<AfterUpdateObjectHookFn>>,
    pub creatable_from_palette: bool,
    pub check: Option<Arc<ClassCheckFn>>,
}

/// The fields a derived class may override. `None` keeps the base value.
#[derive(Clone, Default)]
pub struct ClassInfoOverrides {
    pub properties: Option<Vec<PropertyInfo>>,
    pub get_class: Option<Arc<GetClassFn>>,
    pub label: Option<Arc<LabelFn>>,
    pub show_in_navigation: Option<bool>,
    pub hide_in_properties: Option<bool>,
    pub is_property_menu_supported: Option<bool>,
    pub default_navigation_key: Option<String>,
    pub new_item: Option<Arc<NewItemFn>>,
    pub get_inherited_value: Option<Arc<InheritedValueFn>>,
    pub default_value: Option<serde_json::Value>,
    pub find_paste_place_inside: Option<Arc<FindPastePlaceFn>>,
    pub icon: Option<String>,
    pub before_load_hook: Option<Arc<BeforeLoadHookFn>>,
    pub update_object_value_hook: Option<Arc<UpdateObjectValueHookFn>>,
    pub after_update_object_hook: Option<Arc<AfterUpdateObjectHookFn>>,
    pub creatable_from_palette: Option<bool>,
    pub check: Option<Arc<ClassCheckFn>>,
}

impl ClassInfo {
    pub fn new(name: impl Into<String>, properties: Vec<PropertyInfo>) -> Self {
        Self {
            name: name.into(),
            properties: properties.into_iter().map(Arc::new).collect(),
            ..Default::default()
        }
    }

    pub fn with_label<F>(mut self, f: F) -> Self
    where
        F: Fn(&ObjectTree, ObjectId) -> String + Send + Sync + 'static,
    {
        self.label = Some(Arc::new(f));
        self
    }

    pub fn with_get_class<F>(mut self, f: F) -> Self
    where
        F: Fn(&serde_json::Value) -> Option<String> + Send + Sync + 'static,
    {
        self.get_class = Some(Arc::new(f));
        self
    }

    pub fn with_inherited_value<F>(mut self, f: F) -> Self
    where
        F: Fn(&ObjectTree, ObjectId, &str) -> Option<InheritedValue> + Send + Sync + 'static,
    {
        self.get_inherited_value = Some(Arc::new(f));
        self
    }

    pub fn with_before_load_hook<F>(mut self, f: F) -> Self
    where
        F: Fn(&ObjectTree, ObjectId, &mut serde_json::Value) + Send + Sync + 'static,
    {
        self.before_load_hook = Some(Arc::new(f));
        self
    }

    pub fn with_update_object_value_hook<F>(mut self, f: F) -> Self
    where
        F: Fn(&ObjectTree, ObjectId, &str, &serde_json::Value) -> Option<ValueUpdate>
            + Send
            + Sync
            + 'static,
    {
        self.update_object_value_hook = Some(Arc::new(f));
        self
    }

    pub fn with_after_update_object_hook<F>(mut self, f: F) -> Self
    where
        F: Fn(
                &mut ObjectTree,
                ObjectId,
                &serde_json::Map<String, serde_json::Value>,
                &serde_json::Map<String, serde_json::Value>,
            ) + Send
            + Sync
            + 'static,
    {
        self.after_update_object_hook = Some(Arc::new(f));
        self
    }

    pub fn with_find_paste_place_inside<F>(mut self, f: F) -> Self
    where
        F: Fn(&ObjectTree, ObjectId, &ClassInfo, bool) -> Option<PastePlace>
            + Send
            + Sync
            + 'static,
    {
        self.find_paste_place_inside = Some(Arc::new(f));
        self
    }

    pub fn with_new_item<F>(mut self, f: F) -> Self
    where
        F: Fn(&ObjectTree, ObjectId) -> Option<serde_json::Value> + Send + Sync + 'static,
    {
        self.new_item = Some(Arc::new(f));
        self
    }

    pub fn with_check<F>(mut self, f: F) -> Self
    where
        F: Fn(&ObjectTree, ObjectId) -> Vec<Message> + Send + Sync + 'static,
    {
        self.check = Some(Arc::new(f));
        self
    }

    pub fn with_default_value(mut self, value: serde_json::Value) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Compose a derived class from `base`.
    ///
    /// Properties overridden by name replace the base entry in place, new
    /// properties are appended in override order. The before-load hooks of
    /// base and derived class are chained (base first). Every other
    /// overridden field replaces the base field.
    pub fn derive(
        base: &Arc<ClassInfo>,
        name: impl Into<String>,
        overrides: ClassInfoOverrides,
    ) -> Self {
        let properties = match overrides.properties {
            Some(derived) => merge_properties(&base.properties, derived),
            None => base.properties.clone(),
        };

        let before_load_hook = match (&base.before_load_hook, overrides.before_load_hook) {
            (Some(base_hook), Some(derived_hook)) => {
                let base_hook = Arc::clone(base_hook);
                let chained: Arc<BeforeLoadHookFn> = Arc::new(
                    move |tree: &ObjectTree, object: ObjectId, json: &mut serde_json::Value| {
                        base_hook(tree, object, json);
                        derived_hook(tree, object, json);
                    },
                );
                Some(chained)
            }
            (base_hook, derived_hook) => derived_hook.or_else(|| base_hook.clone()),
        };

        Self {
            name: name.into(),
            properties,
            parent_class_info: Some(Arc::clone(base)),
            get_class: overrides.get_class.or_else(|| base.get_class.clone()),
            label: overrides.label.or_else(|| base.label.clone()),
            show_in_navigation: overrides
                .show_in_navigation
                .unwrap_or(base.show_in_navigation),
            hide_in_properties: overrides
                .hide_in_properties
                .unwrap_or(base.hide_in_properties),
            is_property_menu_supported: overrides
                .is_property_menu_supported
                .unwrap_or(base.is_property_menu_supported),
            default_navigation_key: overrides
                .default_navigation_key
                .or_else(|| base.default_navigation_key.clone()),
            new_item: overrides.new_item.or_else(|| base.new_item.clone()),
            get_inherited_value: overrides
                .get_inherited_value
                .or_else(|| base.get_inherited_value.clone()),
            default_value: overrides
                .default_value
                .or_else(|| base.default_value.clone()),
            find_paste_place_inside: overrides
                .find_paste_place_inside
                .or_else(|| base.find_paste_place_inside.clone()),
            icon: overrides.icon.or_else(|| base.icon.clone()),
            before_load_hook,
            update_object_value_hook: overrides
                .update_object_value_hook
                .or_else(|| base.update_object_value_hook.clone()),
            after_update_object_hook: overrides
                .after_update_object_hook
                .or_else(|| base.after_update_object_hook.clone()),
            creatable_from_palette: overrides
                .creatable_from_palette
                .unwrap_or(base.creatable_from_palette),
            check: overrides.check.or_else(|| base.check.clone()),
        }
    }

    /// Copy of this class with the named properties hidden in the property grid.
    ///
    /// `callback` replaces the fixed `true` with a per-object predicate.
    pub fn with_hidden_properties(mut self, names: &[&str], callback: Option<Flag>) -> Self {
        let flag = callback.unwrap_or(Flag::Fixed(true));
        for property in &mut self.properties {
            if names.contains(&property.name.as_str()) {
                let mut hidden = PropertyInfo::clone(property);
                hidden.hide_in_property_grid = Some(flag.clone());
                *property = Arc::new(hidden);
            }
        }
        self
    }

    /// Find a property descriptor by name.
    pub fn property(&self, name: &str) -> Option<&Arc<PropertyInfo>> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// True if `base` is this class or appears anywhere up its parent chain.
    pub fn is_subclass_of(&self, base: &ClassInfo) -> bool {
        let mut current = Some(self);
        while let Some(class_info) = current {
            if std::ptr::eq(class_info, base) {
                return true;
            }
            current = class_info.parent_class_info.as_deref();
        }
        false
    }

    /// Like [`is_subclass_of`](Self::is_subclass_of) but excludes the class itself.
    pub fn is_proper_subclass_of(&self, base: &ClassInfo) -> bool {
        self.parent_class_info
            .as_deref()
            .is_some_and(|parent| parent.is_subclass_of(base))
    }
}

/// Free-function form of the subclass test over optional descriptors.
pub fn is_subclass_of(class_info: Option<&ClassInfo>, base: &ClassInfo) -> bool {
    class_info.is_some_and(|c| c.is_subclass_of(base))
}

/// Free-function form of the proper-subclass test over optional descriptors.
pub fn is_proper_subclass_of(class_info: Option<&ClassInfo>, base: &ClassInfo) -> bool {
    class_info.is_some_and(|c| c.is_proper_subclass_of(base))
}

fn merge_properties(
    base: &[Arc<PropertyInfo>],
    derived: Vec<PropertyInfo>,
) -> Vec<Arc<PropertyInfo>> {
    let derived: Vec<Arc<PropertyInfo>> = derived.into_iter().map(Arc::new).collect();

    let mut merged: Vec<Arc<PropertyInfo>> = base
        .iter()
        .map(|b| {
            derived
                .iter()
                .find(|d| d.name == b.name)
                .unwrap_or(b)
                .clone()
        })
        .collect();

    for d in derived {
        if !merged.iter().any(|m| m.name == d.name) {
            merged.push(d);
        }
    }

    merged
}

impl fmt::Debug for ClassInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassInfo")
            .field("name", &self.name)
            .field(
                "properties",
                &self.properties.iter().map(|p| &p.name).collect::<Vec<_>>(),
            )
            .field(
                "parent_class_info",
                &self.parent_class_info.as_ref().map(|p| &p.name),
            )
            .finish_non_exhaustive()
    }
}
