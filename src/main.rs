//! `project-model` - inspect project documents through their class schema.
//!
//! **Usage:**
//! ```text
//! project-model --schema classes.toml [--class Project] document.json
//!               [--path /pages/0] [--id root.pages.1] [--check] [--json]
//! ```
//!
//! Without a query the navigation tree of the document is printed.

use anyhow::{bail, Context, Result};
use clap::Parser;
use project_model::{
    config::ModelConfig, serialization, ObjectRef, ObjectTree, SchemaDefinition,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Inspect a project document.
#[derive(Parser)]
#[command(name = "project-model", about = "Inspect project documents through their class schema")]
struct Args {
    /// JSON document to load.
    document: PathBuf,

    /// TOML schema declaring the document's classes.
    #[arg(long)]
    schema: PathBuf,

    /// Class of the document root.
    #[arg(long, default_value = "Project")]
    class: String,

    /// Resolve a slash-separated object path, e.g. `/pages/0/name`.
    #[arg(long)]
    path: Option<String>,

    /// Resolve a dotted object id, e.g. `root.pages.1`.
    #[arg(long)]
    id: Option<String>,

    /// Run validation checks over the whole document.
    #[arg(long)]
    check: bool,

    /// Print the loaded document back as JSON.
    #[arg(long)]
    json: bool,

    /// Config file (default: the app data directory).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ModelConfig::load(path)?,
        None => ModelConfig::load_or_default(),
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let registry = SchemaDefinition::load(&args.schema)?.into_registry()?;
    tracing::info!("Loaded {} classes from {:?}", registry.len(), args.schema);

    let text = std::fs::read_to_string(&args.document)
        .with_context(|| format!("Failed to read document {:?}", args.document))?;
    let tree = serialization::load_tree_from_str(
        Arc::new(registry),
        &text,
        &args.class,
        &config.root_id,
    )?;
    tracing::info!("Loaded {} objects from {:?}", tree.len(), args.document);

    let mut queried = false;

    if let Some(path) = &args.path {
        queried = true;
        match tree.get_object_from_string_path(tree.root(), path) {
            Some(object) => describe(&tree, &object),
            None => bail!("No object at path {}", path),
        }
    }

    if let Some(id) = &args.id {
        queried = true;
        match tree.get_object_from_object_id(tree.root(), id) {
            Some(object) => describe(&tree, &object),
            None => bail!("No object with id {}", id),
        }
    }

    if args.check {
        queried = true;
        let messages = tree.check_tree();
        for message in &messages {
            let location = message
                .object
                .as_ref()
                .and_then(|o| tree.get_object_path_as_string(o))
                .unwrap_or_default();
            println!("{:<7} {} {}", message.message_type, location, message.text);
        }
        println!("{} message(s)", messages.len());
    }

    if args.json {
        queried = true;
        println!("{}", serialization::tree_to_string(&tree, config.pretty_json)?);
    }

    if !queried {
        print_outline(&tree, &ObjectRef::Node(tree.root()), 0);
    }

    Ok(())
}

fn describe(tree: &ObjectTree, object: &ObjectRef) {
    let kind = tree.kind(object).map(|k| format!("{:?}", k)).unwrap_or_default();
    println!("id:    {}", tree.id_of(object).unwrap_or_default());
    println!("kind:  {}", kind);
    if let Some(class) = tree.class_of(object) {
        println!("class: {}", class.name);
    }
    println!("label: {}", tree.object_to_string(object));
    println!(
        "path:  {}",
        tree.get_object_path_as_string(object).unwrap_or_default()
    );

    let ancestors: Vec<String> = tree
        .get_ancestors(object, None, false)
        .iter()
        .map(|a| tree.object_to_string(a))
        .collect();
    println!("ancestors: {}", ancestors.join(" / "));
}

fn print_outline(tree: &ObjectTree, object: &ObjectRef, depth: usize) {
    println!("{}{}", "  ".repeat(depth), tree.object_to_string(object));
    for child in tree.get_children(object) {
        print_outline(tree, &child, depth + 1);
    }
}
