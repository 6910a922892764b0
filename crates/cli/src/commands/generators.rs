//! `generators` command implementation.

use anyhow::{Context, Result};
use generators::{Arity, GeneratorRegistry};

use crate::cli::GeneratorsArgs;

/// Execute the `generators` command
pub fn run_generators(args: &GeneratorsArgs) -> Result<()> {
    let catalog = GeneratorRegistry::with_builtins().catalog();

    if args.json {
        let json =
            serde_json::to_string_pretty(&catalog).context("Failed to serialize generator list")?;
        println!("{}", json);
        return Ok(());
    }

    let width = catalog.iter().map(|g| g.name.len()).max().unwrap_or(0) + 2;
    println!("Available generators ({}):\n", catalog.len());
    for generator in &catalog {
        let usage = match generator.arity {
            Arity::Zero => format!("fake:{{{}}}", generator.name),
            Arity::Range => format!("fake:{{{}:min,max}}", generator.name),
        };
        println!(
            "  {:<width$} {:<32} {}",
            generator.name,
            usage,
            generator.description,
            width = width
        );
    }
    println!();
    Ok(())
}
