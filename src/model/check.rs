//! Validation messages.
//!
//! Checks never stop a traversal; every problem becomes a [`Message`] and
//! callers decide what to do with the collected list.

use crate::model::id::ObjectId;
use crate::model::object::ObjectRef;
use crate::model::tree::ObjectTree;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    Info,
    Error,
    Warning,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            MessageType::Info => "info",
            MessageType::Error => "error",
            MessageType::Warning => "warning",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub message_type: MessageType,
    pub text: String,
    pub object: Option<ObjectRef>,
}

impl Message {
    pub fn new(
        message_type: MessageType,
        text: impl Into<String>,
        object: Option<ObjectRef>,
    ) -> Self {
        Self {
            message_type,
            text: text.into(),
            object,
        }
    }

    pub fn error(text: impl Into<String>, object: Option<ObjectRef>) -> Self {
        Self::new(MessageType::Error, text, object)
    }

    pub fn warning(text: impl Into<String>, object: Option<ObjectRef>) -> Self {
        Self::new(MessageType::Warning, text, object)
    }

    pub fn info(text: impl Into<String>, object: Option<ObjectRef>) -> Self {
        Self::new(MessageType::Info, text, object)
    }
}

impl ObjectTree {
    /// Messages for a single node.
    ///
    /// Arrays run the `check` of the property that holds them and report
    /// elements that repeat a value of a `unique` property. Composites run
    /// their class `check`.
    pub fn check_object(&self, object: ObjectId) -> Vec<Message> {
        let Some(node) = self.get(object) else {
            return Vec::new();
        };

        let Some(elements) = node.elements() else {
            return match &node.class.check {
                Some(check) => check(self, object),
                None => Vec::new(),
            };
        };

        let mut messages = match node.property_info.as_ref().and_then(|p| p.check.as_ref()) {
            Some(check) => check(self, object),
            None => Vec::new(),
        };

        for property in node.class.properties.iter().filter(|p| p.unique) {
            let mut seen: HashMap<String, ObjectId> = HashMap::new();
            for &element in elements {
                let Some(value) = self.get_scalar(element, &property.name) else {
                    continue;
                };
                let key = match value {
                    Value::String(s) => s.clone(),
                    Value::Null => continue,
                    other => other.to_string(),
                };
                if seen.insert(key.clone(), element).is_some() {
                    messages.push(Message::error(
                        format!(
                            "{} '{}' is not unique",
                            self.humanize_property_name(element, &property.name),
                            key
                        ),
                        Some(ObjectRef::value(element, property.name.clone())),
                    ));
                }
            }
        }
        messages
    }

    /// Messages for every node reachable from the root, parents first.
    pub fn check_tree(&self) -> Vec<Message> {
        let messages: Vec<Message> = self
            .descendants(self.root())
            .into_iter()
            .flat_map(|object| self.check_object(object))
            .collect();
        tracing::debug!(count = messages.len(), "checked tree");
        messages
    }
}
