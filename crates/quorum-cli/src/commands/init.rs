//! Initialize Quorum.

use super::get_paths;
use anyhow::{Context, Result};
use colored::Colorize;
use quorum_config::Config;
use quorum_db::Database;

pub fn run() -> Result<()> {
    let paths = get_paths()?;

    if paths.is_initialized() {
        println!("{} Quorum is already initialized.", "Note:".yellow().bold());
        println!("  Config: {}", paths.config_file.display());
        println!("  Database: {}", paths.database_file.display());
        return Ok(());
    }

    println!("{}", "Initializing Quorum...".cyan().bold());

    paths.ensure_dirs().context("Failed to create directories")?;
    println!("  {} Created directories", "✓".green());

    Config::create_default_file(&paths.config_file).context("Failed to create config file")?;
    println!(
        "  {} Created config: {}",
        "✓".green(),
        paths.config_file.display()
    );

    let _db = Database::open(&paths.database_file).context("Failed to initialize database")?;
    println!(
        "  {} Created database: {}",
        "✓".green(),
        paths.database_file.display()
    );

    println!();
    println!("{}", "Quorum initialized successfully!".green().bold());
    println!();
    println!("Next steps:");
    println!(
        "  1. Add an integration: {}",
        "quorum integration add --tenant <tenant> \"Board Minutes\" <folder-id> --kind minutes".cyan()
    );
    println!("  2. Crawl the index: {}", "quorum index --all".cyan());
    println!("  3. Check status: {}", "quorum status".cyan());

    Ok(())
}
