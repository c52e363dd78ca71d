//! Rebuild `catalog.json` from the resource library.
//!
//! Usage:
//!   generate-catalog
//!   generate-catalog --root path/to/repo --catalog out/catalog.json
//!   generate-catalog --no-schema

use anyhow::{Context, Result};
use catalog_guard::{BuildOptions, LibraryLayout, MetaSchema, build_catalog, resolve_root};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "generate-catalog")]
#[command(about = "Rebuild catalog.json from the resource library")]
struct Cli {
    /// Repository root containing library/ (discovered when omitted).
    #[arg(long)]
    root: Option<PathBuf>,
    /// Output path; defaults to <root>/catalog.json.
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Metadata schema; defaults to <root>/schemas/instruction-meta.schema.json.
    #[arg(long)]
    schema: Option<PathBuf>,
    /// Include resources without checking their metadata against the schema.
    #[arg(long, conflicts_with = "schema")]
    no_schema: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let root = resolve_root(cli.root).context("locating library root")?;
    let mut layout = LibraryLayout::new(root);
    if let Some(catalog) = cli.catalog {
        layout = layout.with_catalog_path(catalog);
    }
    let explicit_schema = cli.schema.is_some();
    if let Some(schema) = cli.schema {
        layout = layout.with_schema_path(schema);
    }

    let schema_path = layout.schema_path();
    let schema = if cli.no_schema {
        None
    } else if explicit_schema || schema_path.is_file() {
        Some(MetaSchema::load(&schema_path)?)
    } else {
        log::warn!(
            "{} not found; building without schema checks",
            schema_path.display()
        );
        None
    };

    let outcome = build_catalog(
        &layout,
        BuildOptions {
            schema: schema.as_ref(),
        },
    );
    let catalog_path = layout.catalog_path();
    outcome.catalog.write(&catalog_path)?;
    println!("Catalog generated at {}", catalog_path.display());
    Ok(())
}
