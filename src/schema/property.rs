//! Property descriptors: one schema entry per named property of a class.

use crate::model::{Message, ObjectId, ObjectRef, ObjectTree};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Semantic type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    #[default]
    String,
    MultilineText,
    Json,
    #[serde(rename = "javascript")]
    JavaScript,
    Css,
    Number,
    NumberArray,
    Array,
    Object,
    Enum,
    Image,
    Color,
    RelativeFolder,
    ObjectReference,
    ConfigurationReference,
    Boolean,
    Guid,
    Any,
}

impl PropertyType {
    /// Object and Array properties hold child nodes; everything else is a scalar.
    pub fn is_container(self) -> bool {
        matches!(self, PropertyType::Object | PropertyType::Array)
    }
}

/// Predicate signature for computed flags.
pub type FlagFn = dyn Fn(&ObjectTree, ObjectId, &PropertyInfo) -> bool + Send + Sync;
/// Rewrites the label of an element shown inside this property's array.
pub type ChildLabelFn = dyn Fn(&ObjectTree, &ObjectRef, &str) -> String + Send + Sync;
/// Validation hook for an array property.
pub type PropertyCheckFn = dyn Fn(&ObjectTree, ObjectId) -> Vec<Message> + Send + Sync;
/// Decides whether a stored reference points at `name`.
pub type MatchReferenceFn = dyn Fn(&str, &str) -> bool + Send + Sync;
/// Turns a new referenced name into the stored reference value.
pub type ReplaceReferenceFn = dyn Fn(&str) -> String + Send + Sync;
/// Rewrites a JSON payload before it is added to this property's array.
pub type InterceptAddFn =
    dyn Fn(&ObjectTree, ObjectId, serde_json::Value) -> serde_json::Value + Send + Sync;

/// A property attribute that is either a plain boolean or computed per object.
#[derive(Clone)]
pub enum Flag {
    Fixed(bool),
    Computed(Arc<FlagFn>),
}

impl Flag {
    /// Build a computed flag from a closure.
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&ObjectTree, ObjectId, &PropertyInfo) -> bool + Send + Sync + 'static,
    {
        Flag::Computed(Arc::new(f))
    }

    /// Evaluate the flag. A fixed value short-circuits; a predicate runs on every call.
    pub fn evaluate(&self, tree: &ObjectTree, object: ObjectId, property: &PropertyInfo) -> bool {
        match self {
            Flag::Fixed(value) => *value,
            Flag::Computed(predicate) => predicate(tree, object, property),
        }
    }
}

impl From<bool> for Flag {
    fn from(value: bool) -> Self {
        Flag::Fixed(value)
    }
}

impl fmt::Debug for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flag::Fixed(value) => write!(f, "Fixed({})", value),
            Flag::Computed(_) => write!(f, "Computed(..)"),
        }
    }
}

/// One entry of an enum-typed property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumItem {
    pub id: serde_json::Value,
    #[serde(default)]
    pub label: Option<String>,
}

/// A titled group of properties in the property grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyGridGroup {
    pub id: &'static str,
    pub title: Option<&'static str>,
    pub position: Option<u32>,
}

pub const GENERAL_GROUP: PropertyGridGroup = PropertyGridGroup {
    id: "general",
    title: None,
    position: Some(0),
};

pub const GEOMETRY_GROUP: PropertyGridGroup = PropertyGridGroup {
    id: "geometry",
    title: Some("Position and size"),
    position: None,
};

pub const STYLE_GROUP: PropertyGridGroup = PropertyGridGroup {
    id: "style",
    title: Some("Style"),
    position: None,
};

pub const DATA_GROUP: PropertyGridGroup = PropertyGridGroup {
    id: "data",
    title: None,
    position: None,
};

pub const ACTIONS_GROUP: PropertyGridGroup = PropertyGridGroup {
    id: "actions",
    title: None,
    position: None,
};

/// Schema entry describing one named property.
///
/// `type_class` names the class of the child for Object properties and the
/// element class for Array properties. It is a registry name rather than a
/// pointer so that schemas may be recursive (a container widget holding
/// widgets).
#[derive(Clone, Default)]
pub struct PropertyInfo {
    pub name: String,
    pub property_type: PropertyType,

    pub display_name: Option<String>,
    pub enum_items: Vec<EnumItem>,
    pub type_class: Option<String>,
    pub referenced_object_collection_path: Option<Vec<String>>,
    pub match_object_reference: Option<Arc<MatchReferenceFn>>,
    pub replace_object_reference: Option<Arc<ReplaceReferenceFn>>,
    pub computed: bool,
    pub hide_in_property_grid: Option<Flag>,
    pub read_only_in_property_grid: bool,
    pub property_grid_group: Option<PropertyGridGroup>,
    pub property_grid_collapsable: bool,
    pub enumerable: Option<Flag>,
    pub show_only_children_in_tree: Option<bool>,
    pub is_optional: bool,
    pub default_value: Option<serde_json::Value>,
    pub inheritable: bool,
    pub unique: bool,
    pub skip_search: bool,
    pub child_label: Option<Arc<ChildLabelFn>>,
    pub check: Option<Arc<PropertyCheckFn>>,
    pub intercept_add_object: Option<Arc<InterceptAddFn>>,
    pub resolution_dependable: bool,
}

impl PropertyInfo {
    pub fn new(name: impl Into<String>, property_type: PropertyType) -> Self {
        Self {
            name: name.into(),
            property_type,
            ..Default::default()
        }
    }

    /// Object-typed property holding a single child of `class_name`.
    pub fn object(name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self::new(name, PropertyType::Object).with_type_class(class_name)
    }

    /// Array-typed property holding elements of `class_name`.
    pub fn array(name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self::new(name, PropertyType::Array).with_type_class(class_name)
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_type_class(mut self, class_name: impl Into<String>) -> Self {
        self.type_class = Some(class_name.into());
        self
    }

    pub fn with_enum_items(mut self, items: Vec<EnumItem>) -> Self {
        self.enum_items = items;
        self
    }

    pub fn with_enumerable(mut self, enumerable: impl Into<Flag>) -> Self {
        self.enumerable = Some(enumerable.into());
        self
    }

    pub fn with_hidden(mut self, hidden: impl Into<Flag>) -> Self {
        self.hide_in_property_grid = Some(hidden.into());
        self
    }

    pub fn with_show_only_children_in_tree(mut self, show: bool) -> Self {
        self.show_only_children_in_tree = Some(show);
        self
    }

    pub fn with_default_value(mut self, value: serde_json::Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn with_group(mut self, group: PropertyGridGroup) -> Self {
        self.property_grid_group = Some(group);
        self
    }

    pub fn with_referenced_collection<S: Into<String>>(
        mut self,
        path: impl IntoIterator<Item = S>,
    ) -> Self {
        self.referenced_object_collection_path = Some(path.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_child_label<F>(mut self, f: F) -> Self
    where
        F: Fn(&ObjectTree, &ObjectRef, &str) -> String + Send + Sync + 'static,
    {
        self.child_label = Some(Arc::new(f));
        self
    }

    pub fn with_check<F>(mut self, f: F) -> Self
    where
        F: Fn(&ObjectTree, ObjectId) -> Vec<Message> + Send + Sync + 'static,
    {
        self.check = Some(Arc::new(f));
        self
    }

    pub fn with_match_object_reference<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str) -> bool + Send + Sync + 'static,
    {
        self.match_object_reference = Some(Arc::new(f));
        self
    }

    pub fn with_replace_object_reference<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.replace_object_reference = Some(Arc::new(f));
        self
    }

    pub fn with_intercept_add_object<F>(mut self, f: F) -> Self
    where
        F: Fn(&ObjectTree, ObjectId, serde_json::Value) -> serde_json::Value
            + Send
            + Sync
            + 'static,
    {
        self.intercept_add_object = Some(Arc::new(f));
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    pub fn inheritable(mut self) -> Self {
        self.inheritable = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only_in_property_grid = true;
        self
    }
}

impl fmt::Debug for PropertyInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyInfo")
            .field("name", &self.name)
            .field("property_type", &self.property_type)
            .field("display_name", &self.display_name)
            .field("type_class", &self.type_class)
            .field("enumerable", &self.enumerable)
            .field("hide_in_property_grid", &self.hide_in_property_grid)
            .field("show_only_children_in_tree", &self.show_only_children_in_tree)
            .finish_non_exhaustive()
    }
}
