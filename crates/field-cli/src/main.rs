//! `field` CLI: inspect JSON documents through the field-core value model.
//!
//! ## Usage
//!
//! ```sh
//! # Tagged dump of a document (stdin → stdout)
//! echo '{"name":"Alice","age":30}' | field dump
//!
//! # Pretty dump from a file
//! field dump -i data.json --pretty
//!
//! # Navigate a dot path and coerce the result
//! field get users.1.age --as int -i data.json
//!
//! # List the keys of a map, or the indices of an array
//! field keys users.0 -i data.json
//!
//! # Debug logging to stderr
//! field -v get users -i data.json
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use field_core::Field;
use std::io::{self, Read};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "field",
    version,
    about = "Navigate and coerce JSON documents as Field trees"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the tagged dump of the whole document
    Dump {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Indent the output
        #[arg(long)]
        pretty: bool,
    },
    /// Navigate a dot-separated path and print the value found
    Get {
        /// Path such as `users.1.name`
        path: String,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// How to print the value
        #[arg(long = "as", value_enum, default_value_t = Coercion::Json)]
        coerce: Coercion,
    },
    /// List map keys or array indices at a path (the root if omitted)
    Keys {
        path: Option<String>,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Coercion {
    Int,
    Uint,
    Float,
    String,
    Bool,
    /// Tagged dump of the subtree
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Dump { input, pretty } => {
            let tree = read_tree(input.as_deref())?;
            let dump = if pretty {
                tree.to_json_pretty()
            } else {
                tree.to_json()
            };
            println!("{}", dump.context("Failed to dump document")?);
        }
        Commands::Get {
            path,
            input,
            coerce,
        } => {
            let tree = read_tree(input.as_deref())?;
            let found = tree
                .get_path(&path)
                .ok()
                .with_context(|| format!("Failed to navigate path: {path}"))?;
            let rendered = render(found, coerce)
                .with_context(|| format!("Failed to read value at path: {path}"))?;
            println!("{rendered}");
        }
        Commands::Keys { path, input } => {
            let tree = read_tree(input.as_deref())?;
            let path = path.unwrap_or_default();
            let found = tree
                .get_path(&path)
                .ok()
                .with_context(|| format!("Failed to navigate path: {path}"))?;
            match found {
                Field::Map(_) => found.keys().for_each(|key| println!("{key}")),
                Field::Array(items) => (0..items.len()).for_each(|index| println!("{index}")),
                other => bail!(
                    "Path '{}' holds a {}, which has no keys",
                    path,
                    other.field_type()
                ),
            }
        }
    }

    Ok(())
}

/// Install a stderr subscriber. `RUST_LOG` applies unless `--verbose` is set.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Read JSON text and decode it into a Field tree.
fn read_tree(path: Option<&str>) -> Result<Field> {
    let json = read_input(path)?;
    debug!(bytes = json.len(), "decoding input");
    let tree = Field::Bytes(json.into_bytes()).bytes_to_field();
    if let Some(err) = tree.error_ref() {
        return Err(err.clone()).context("Failed to decode JSON input");
    }
    Ok(tree)
}

fn render(field: &Field, coerce: Coercion) -> field_core::Result<String> {
    Ok(match coerce {
        Coercion::Int => field.int()?.to_string(),
        Coercion::Uint => field.uint()?.to_string(),
        Coercion::Float => field.float()?.to_string(),
        Coercion::String => field.string()?.into_owned(),
        Coercion::Bool => field.bool()?.to_string(),
        Coercion::Json => field.to_json()?,
    })
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
