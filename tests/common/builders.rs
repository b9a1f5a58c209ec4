//! Test data builders for creating project documents

use project_model::{serialization, ObjectTree};
use serde_json::{json, Value};

use super::editor_registry;

/// Builder for a widget, optionally holding child widgets
pub struct WidgetBuilder {
    name: String,
    left: Option<i64>,
    style: Option<String>,
    children: Option<Vec<WidgetBuilder>>,
}

impl WidgetBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            left: None,
            style: None,
            children: None,
        }
    }

    pub fn left(mut self, left: i64) -> Self {
        self.left = Some(left);
        self
    }

    pub fn style(mut self, style: &str) -> Self {
        self.style = Some(style.to_string());
        self
    }

    /// Turn the widget into a container holding `children`
    pub fn children(mut self, children: Vec<WidgetBuilder>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn build(self) -> Value {
        let mut widget = json!({ "name": self.name });
        if let Some(left) = self.left {
            widget["left"] = json!(left);
        }
        if let Some(style) = self.style {
            widget["style"] = json!(style);
        }
        if let Some(children) = self.children {
            widget["type"] = json!("Container");
            widget["widgets"] =
                Value::Array(children.into_iter().map(WidgetBuilder::build).collect());
        }
        widget
    }
}

/// Builder for a page
pub struct PageBuilder {
    name: String,
    widgets: Option<Vec<WidgetBuilder>>,
}

impl PageBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            widgets: None,
        }
    }

    pub fn widget(mut self, widget: WidgetBuilder) -> Self {
        self.widgets.get_or_insert_with(Vec::new).push(widget);
        self
    }

    pub fn build(self) -> Value {
        let mut page = json!({ "name": self.name });
        if let Some(widgets) = self.widgets {
            page["widgets"] = Value::Array(widgets.into_iter().map(WidgetBuilder::build).collect());
        }
        page
    }
}

/// Builder for a whole project document
pub struct ProjectBuilder {
    name: String,
    pages: Vec<PageBuilder>,
    styles: Vec<(String, String)>,
}

impl ProjectBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            pages: Vec::new(),
            styles: Vec::new(),
        }
    }

    pub fn page(mut self, page: PageBuilder) -> Self {
        self.pages.push(page);
        self
    }

    pub fn style(mut self, name: &str, color: &str) -> Self {
        self.styles.push((name.to_string(), color.to_string()));
        self
    }

    pub fn build_json(self) -> Value {
        json!({
            "name": self.name,
            "pages": self.pages.into_iter().map(PageBuilder::build).collect::<Vec<_>>(),
            "styles": self
                .styles
                .into_iter()
                .map(|(name, color)| json!({ "name": name, "color": color }))
                .collect::<Vec<_>>(),
        })
    }

    pub fn build(self) -> ObjectTree {
        serialization::load_tree(editor_registry(), &self.build_json(), "Project", "root")
            .expect("built project should load")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_builder() {
        let widget = WidgetBuilder::new("panel")
            .left(4)
            .children(vec![WidgetBuilder::new("inner")])
            .build();

        assert_eq!(widget["name"], json!("panel"));
        assert_eq!(widget["left"], json!(4));
        assert_eq!(widget["type"], json!("Container"));
        assert_eq!(widget["widgets"][0]["name"], json!("inner"));
    }
}
