//! Look up mobs by name or synonym from the command line.
//!
//! ```text
//! find_mob vindi tuna "a non-existent mob"
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use mob_catalog::config::DEFAULT_CONFIG_FILE;
use mob_catalog::{JsonFileStore, MobStore, find_mob, load_config};
use mob_data::{MobField, MobRecord};
use serde_json::Value;

#[derive(Parser)]
#[command(author, version, about = "Resolve names or synonyms to canonical mob records.")]
struct Cli {
    /// TOML configuration file used to locate the catalog.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Mob catalog JSON file (overrides the configuration).
    #[arg(long)]
    data: Option<PathBuf>,
    /// Names or synonyms to search for.
    #[arg(required = true)]
    terms: Vec<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = load_config(&cli.config);
    config.apply_env()?;
    let data_file = cli.data.unwrap_or(config.data_file);
    if !data_file.exists() {
        anyhow::bail!("the file '{}' was not found", data_file.display());
    }

    let catalog = JsonFileStore::new(&data_file)
        .load()
        .with_context(|| format!("while loading {}", data_file.display()))?;

    let rule = "-".repeat(30);
    for term in &cli.terms {
        println!("Searching for: '{term}'");
        match find_mob(&catalog, term) {
            Ok((name, record)) => print_match(name, record),
            Err(err) => println!("  {} {err}", "✗".bright_red()),
        }
        println!("{rule}");
    }
    Ok(())
}

fn print_match(name: &str, record: &MobRecord) {
    println!("  {} Found a match!", "✓".bright_green());
    println!("     Canonical Name: {}", name.bold().bright_blue());
    println!("     Location: {}", display_value(record.location()));
    println!("     Synonyms: {}", record.synonyms().join(", "));
    println!("     Track: {}", display_value(record.field(MobField::Track)));
    println!("     Coth: {}", display_value(record.field(MobField::Coth)));
    println!("     ET: {}", display_value(record.field(MobField::Et)));
}

/// Strings print bare, everything else as JSON; missing fields print as a dash.
fn display_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "-".to_string(),
    }
}
