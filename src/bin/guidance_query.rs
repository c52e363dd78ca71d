//! Match a free-text query against the catalog's guidance and instructions.
//!
//! Usage:
//!   guidance-query "I need to install a new npm package"

use anyhow::{Context, Result};
use catalog_guard::guidance::tags;
use catalog_guard::{Catalog, LibraryLayout, match_query, resolve_root};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "guidance-query")]
#[command(about = "Show which instructions the catalog guidance selects for a query")]
struct Cli {
    /// Repository root containing library/ (discovered when omitted).
    #[arg(long)]
    root: Option<PathBuf>,
    /// Catalog to read; defaults to <root>/catalog.json.
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Queries to match; each is matched independently.
    #[arg(required = true)]
    queries: Vec<String>,
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
    let catalog = Catalog::load(&layout.catalog_path())?;

    for query in &cli.queries {
        println!("Query: \"{query}\"");
        let found = match_query(&catalog, query);
        if let Some(example) = &found.example {
            println!(
                "  Example match: {}",
                example.matching_instructions.join(", ")
            );
            if let Some(reasoning) = &example.reasoning {
                println!("  Reasoning: {reasoning}");
            }
        }
        for name in &found.keyword_matches {
            let tag_list = catalog
                .prompts
                .instructions
                .iter()
                .find(|inst| &inst.name == name)
                .map(|inst| tags(&inst.meta).collect::<Vec<_>>().join(", "))
                .unwrap_or_default();
            println!("  Tag/name match: {name} ({tag_list})");
        }
        if found.is_empty() {
            println!("  No direct matches found.");
        }
    }

    let sections = catalog
        .agent_guidance
        .as_object()
        .map(|map| map.len())
        .unwrap_or(0);
    println!(
        "Instructions: {}, guidance sections: {sections}",
        catalog.prompts.instructions.len()
    );
    Ok(())
}
