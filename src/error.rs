//! Error handling for the project model
//!
//! Navigation and property queries never fail loudly: they return `Option`
//! and leave a `tracing` diagnostic. The errors below cover the paths that
//! can genuinely fail: loading documents and schemas, reading configuration
//! and structural mutations that would break the tree.

use thiserror::Error;

/// Main error type for project model operations
#[derive(Error, Debug)]
pub enum ModelError {
    /// Errors in a class schema (unknown base, cyclic inheritance, bad type)
    #[error("Schema error: {0}")]
    Schema(String),

    /// A class name that is not present in the registry
    #[error("Unknown class: {0}")]
    UnknownClass(String),

    /// A property name that the object's class does not declare
    #[error("Unknown property '{property}' on class {class}")]
    UnknownProperty { class: String, property: String },

    /// Errors while turning persisted JSON into objects
    #[error("Deserialization error: {0}")]
    Deserialize(String),

    /// Re-parenting that would detach or cycle the tree
    #[error("Invalid move: {0}")]
    InvalidMove(String),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ModelError>,
    },
}

impl ModelError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ModelError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for project model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
