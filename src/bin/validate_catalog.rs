//! Verify `catalog.json` against the resource library.
//!
//! Prints either a single success line or `Validation failed:` followed by
//! one line per discrepancy, and exits non-zero on failure.

use anyhow::{Context, Result};
use catalog_guard::{
    LibraryLayout, MetaSchema, PatternConfig, PatternSet, VerificationReport, VerifyOptions,
    resolve_root, verify_catalog,
};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "validate-catalog")]
#[command(about = "Check catalog.json against the resource library")]
struct Cli {
    /// Repository root containing library/ (discovered when omitted).
    #[arg(long)]
    root: Option<PathBuf>,
    /// Catalog to check; defaults to <root>/catalog.json.
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Metadata schema; defaults to <root>/schemas/instruction-meta.schema.json.
    #[arg(long)]
    schema: Option<PathBuf>,
    /// JSON file with alternate `injection` and `hidden` pattern lists.
    #[arg(long)]
    patterns: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<bool> {
    let cli = Cli::parse();
    let root = resolve_root(cli.root).context("locating library root")?;
    let mut layout = LibraryLayout::new(root);
    if let Some(catalog) = cli.catalog {
        layout = layout.with_catalog_path(catalog);
    }
    if let Some(schema) = cli.schema {
        layout = layout.with_schema_path(schema);
    }

    let report = match load_checks(&layout, cli.patterns) {
        Ok((schema, patterns)) => verify_catalog(
            &layout,
            VerifyOptions {
                schema: &schema,
                patterns: &patterns,
            },
        ),
        Err(err) => VerificationReport::fatal(format!("{err:#}")),
    };

    print!("{}", report.render());
    Ok(report.is_valid())
}

fn load_checks(
    layout: &LibraryLayout,
    patterns: Option<PathBuf>,
) -> Result<(MetaSchema, PatternSet)> {
    let schema = MetaSchema::load(&layout.schema_path()).context("Failed to load schema")?;
    let config = match patterns {
        Some(path) => PatternConfig::load(&path)?,
        None => PatternConfig::default(),
    };
    let patterns = PatternSet::from_config(&config).context("Failed to load patterns")?;
    Ok((schema, patterns))
}
