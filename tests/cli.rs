// CLI behavior guard rails for generate-catalog, validate-catalog, and
// guidance-query.
mod support;

use anyhow::{Context, Result};
use catalog_guard::ResourceKind;
use serde_json::json;
use std::fs;
use std::process::{Command, Output};

use support::Library;

fn run(bin: &str, library: &Library, args: &[&str]) -> Result<Output> {
    Command::new(bin)
        .arg("--root")
        .arg(library.root())
        .args(args)
        .env_remove("CATALOG_GUARD_ROOT")
        .output()
        .with_context(|| format!("failed to execute {bin}"))
}

fn generate(library: &Library) -> Result<Output> {
    run(env!("CARGO_BIN_EXE_generate-catalog"), library, &[])
}

fn validate(library: &Library, args: &[&str]) -> Result<Output> {
    run(env!("CARGO_BIN_EXE_validate-catalog"), library, args)
}

#[test]
fn generate_then_validate_passes() -> Result<()> {
    let library = Library::new()?;
    library.add_valid(ResourceKind::Instruction, "npm")?;

    let generated = generate(&library)?;
    assert!(generated.status.success());
    let stdout = String::from_utf8(generated.stdout)?;
    assert!(stdout.starts_with("Catalog generated at "), "{stdout}");
    assert!(library.layout().catalog_path().is_file());

    let validated = validate(&library, &[])?;
    assert!(validated.status.success());
    assert_eq!(
        String::from_utf8(validated.stdout)?,
        "Validation passed: catalog.json matches the library files\n"
    );
    Ok(())
}

#[test]
fn validate_lists_discrepancies_and_fails() -> Result<()> {
    let library = Library::new()?;
    library.add_valid(ResourceKind::Instruction, "npm")?;
    library.add_valid(ResourceKind::Instruction, "react")?;
    assert!(generate(&library)?.status.success());
    library.remove(ResourceKind::Instruction, "react")?;
    library.add_valid(ResourceKind::Prompt, "review")?;

    let output = validate(&library, &[])?;
    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert_eq!(
        stdout,
        "Validation failed:\n\
         - Instruction \"react\" in catalog but not found in filesystem\n\
         - Prompt \"review\" exists in filesystem but missing from catalog\n"
    );
    Ok(())
}

#[test]
fn validate_without_catalog_fails() -> Result<()> {
    let library = Library::new()?;
    let output = validate(&library, &[])?;
    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.starts_with("Validation failed:\n- "));
    assert!(stdout.contains("does not exist"));
    Ok(())
}

#[test]
fn validate_accepts_alternate_patterns() -> Result<()> {
    let library = Library::new()?;
    library.add(
        ResourceKind::Instruction,
        "cleanup",
        &support::valid_meta("cleanup", &[]),
        "Finish with rm -rf build/",
    )?;
    assert!(generate(&library)?.status.success());
    assert!(validate(&library, &[])?.status.success());

    let patterns = library.root().join("patterns.json");
    fs::write(
        &patterns,
        serde_json::to_string(&json!({"injection": [r"rm\s+-rf"], "hidden": []}))?,
    )?;
    let output = validate(&library, &["--patterns", patterns.to_str().unwrap()])?;
    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Injection pattern: rm -rf"), "{stdout}");
    Ok(())
}

#[test]
fn guidance_query_prints_matches() -> Result<()> {
    let library = Library::new()?;
    library.add_valid(ResourceKind::Instruction, "npm")?;
    library.write_guidance(&json!({
        "matchingExamples": [{
            "userQuery": "I need to install a new npm package",
            "matchingInstructions": ["npm"],
            "reasoning": "Package installation"
        }]
    }))?;
    assert!(generate(&library)?.status.success());

    let output = run(
        env!("CARGO_BIN_EXE_guidance-query"),
        &library,
        &["I need to install a new npm package"],
    )?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Example match: npm"), "{stdout}");
    assert!(stdout.contains("Reasoning: Package installation"));
    assert!(stdout.contains("Instructions: 1, guidance sections: 1"));
    Ok(())
}
