//! Shared schema and project tree for unit tests.

use crate::model::{Message, ObjectId, ObjectTree};
use crate::schema::{
    ClassInfo, ClassInfoOverrides, ClassRegistry, InheritedValue, PropertyInfo, PropertyType,
};
use serde_json::json;
use std::sync::Arc;

/// Project / Settings / General / Page / Widget / ContainerWidget / Style.
pub fn registry() -> Arc<ClassRegistry> {
    let mut registry = ClassRegistry::new();

    registry.register(Arc::new(ClassInfo::new(
        "General",
        vec![PropertyInfo::new("title", PropertyType::String)],
    )));
    registry.register(Arc::new(ClassInfo::new(
        "Settings",
        vec![
            PropertyInfo::new("version", PropertyType::Number),
            PropertyInfo::object("general", "General"),
        ],
    )));

    let widget = registry.register(Arc::new(ClassInfo::new(
        "Widget",
        vec![
            PropertyInfo::new("name", PropertyType::String),
            PropertyInfo::new("left", PropertyType::Number),
            PropertyInfo::new("style", PropertyType::ObjectReference)
                .with_referenced_collection(["styles"]),
        ],
    )));
    registry.register(Arc::new(ClassInfo::derive(
        &widget,
        "ContainerWidget",
        ClassInfoOverrides {
            properties: Some(vec![PropertyInfo::array("widgets", "Widget")]),
            ..Default::default()
        },
    )));

    registry.register(Arc::new(
        ClassInfo::new(
            "Page",
            vec![
                PropertyInfo::new("name", PropertyType::String),
                PropertyInfo::array("widgets", "Widget"),
            ],
        )
        .with_check(|tree, object| {
            let named = tree
                .get(object)
                .and_then(|n| n.field("name"))
                .and_then(|v| v.as_scalar())
                .and_then(|v| v.as_str())
                .is_some_and(|s| !s.is_empty());
            if named {
                Vec::new()
            } else {
                vec![Message::error("Page has no name", Some(object.into()))]
            }
        }),
    ));

    let style = Arc::new(
        ClassInfo::new(
            "Style",
            vec![
                PropertyInfo::new("name", PropertyType::String).unique(),
                PropertyInfo::new("color", PropertyType::Color).inheritable(),
                PropertyInfo::new("inheritFrom", PropertyType::ObjectReference)
                    .with_referenced_collection(["styles"]),
            ],
        )
        .with_inherited_value(|tree, object, property_name| {
            let parent_name = tree.get_property(object, "inheritFrom")?.as_scalar()?.as_str()?;
            let inherit_property = tree.find_property_by_name(object, "inheritFrom")?;
            let source = tree.find_referenced_object(inherit_property, parent_name)?;
            let value = tree.get_property(source, property_name)?.as_scalar()?.clone();
            Some(InheritedValue { value, source })
        }),
    );
    registry.register(style);

    registry.register(Arc::new(ClassInfo::new(
        "Project",
        vec![
            PropertyInfo::new("name", PropertyType::String),
            PropertyInfo::object("settings", "Settings"),
            PropertyInfo::array("pages", "Page")
                .with_child_label(|_, _, label| format!("Page: {}", label)),
            PropertyInfo::array("styles", "Style").with_display_name("Style list"),
        ],
    )));

    Arc::new(registry)
}

#[derive(Debug, Clone, Copy)]
pub struct SampleIds {
    pub root: ObjectId,
    pub settings: ObjectId,
    pub general: ObjectId,
    pub pages: ObjectId,
    pub main_page: ObjectId,
    pub details_page: ObjectId,
    pub main_widgets: ObjectId,
    pub button: ObjectId,
    pub container: ObjectId,
    pub label: ObjectId,
    pub styles: ObjectId,
    pub default_style: ObjectId,
    pub accent_style: ObjectId,
}

pub struct SampleProject {
    pub tree: ObjectTree,
    pub ids: SampleIds,
}

/// ```text
/// root (Project "Demo")
/// +-- settings (version 3)
/// |   +-- general (title "Demo device")
/// +-- pages
/// |   +-- 1 Page "Main"
/// |   |   +-- widgets
/// |   |       +-- 1 Widget "button"
/// |   |       +-- 2 ContainerWidget "panel"
/// |   |           +-- widgets
/// |   |               +-- 1 Widget "label"
/// |   +-- 2 Page "Details" (no widgets array)
/// +-- styles
///     +-- 1 Style "default" (color red)
///     +-- 2 Style "accent" (inherits default)
/// ```
pub fn sample_project() -> SampleProject {
    let registry = registry();
    let class = |name: &str| registry.find(name).cloned().unwrap();

    let mut tree = ObjectTree::new(registry.clone(), class("Project"));
    let root = tree.root();
    tree.set_scalar_raw(root, "name", json!("Demo"));

    let settings = tree.create_object(root, "settings", &class("Settings")).unwrap();
    tree.set_scalar_raw(settings, "version", json!(3));
    let general = tree.create_object(settings, "general", &class("General")).unwrap();
    tree.set_scalar_raw(general, "title", json!("Demo device"));

    let pages = tree.create_array(root, "pages").unwrap();
    let main_page = tree.add_element(pages, &class("Page")).unwrap();
    tree.set_scalar_raw(main_page, "name", json!("Main"));
    let main_widgets = tree.create_array(main_page, "widgets").unwrap();
    let button = tree.add_element(main_widgets, &class("Widget")).unwrap();
    tree.set_scalar_raw(button, "name", json!("button"));
    tree.set_scalar_raw(button, "left", json!(10));
    tree.set_scalar_raw(button, "style", json!("accent"));
    let container = tree.add_element(main_widgets, &class("ContainerWidget")).unwrap();
    tree.set_scalar_raw(container, "name", json!("panel"));
    let inner = tree.create_array(container, "widgets").unwrap();
    let label = tree.add_element(inner, &class("Widget")).unwrap();
    tree.set_scalar_raw(label, "name", json!("label"));
    tree.set_scalar_raw(label, "style", json!("default"));

    let details_page = tree.add_element(pages, &class("Page")).unwrap();
    tree.set_scalar_raw(details_page, "name", json!("Details"));

    let styles = tree.create_array(root, "styles").unwrap();
    let default_style = tree.add_element(styles, &class("Style")).unwrap();
    tree.set_scalar_raw(default_style, "name", json!("default"));
    tree.set_scalar_raw(default_style, "color", json!("red"));
    let accent_style = tree.add_element(styles, &class("Style")).unwrap();
    tree.set_scalar_raw(accent_style, "name", json!("accent"));
    tree.set_scalar_raw(accent_style, "inheritFrom", json!("default"));

    SampleProject {
        tree,
        ids: SampleIds {
            root,
            settings,
            general,
            pages,
            main_page,
            details_page,
            main_widgets,
            button,
            container,
            label,
            styles,
            default_style,
            accent_style,
        },
    }
}
