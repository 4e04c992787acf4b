//! Configuration commands.

use super::{get_config, get_paths};
use anyhow::Result;
use colored::Colorize;

pub fn show() -> Result<()> {
    let paths = get_paths()?;
    let config = get_config()?;

    println!("{}", "Configuration".cyan().bold());
    println!("{}", "─".repeat(50));
    println!("  Config file: {}", paths.config_file.display());
    println!();
    println!("  [storage]");
    println!("    base_url = {}", config.storage.base_url);
    println!("    timeout_seconds = {}", config.storage.timeout_seconds);
    println!();
    println!("  [ollama]");
    println!("    host = {}", config.ollama.host);
    println!("    model = {}", config.ollama.model);
    println!();
    println!("  [sync]");
    println!("    batch_size = {}", config.sync.batch_size);
    println!("    batch_delay_ms = {}", config.sync.batch_delay_ms);
    println!("    max_content_chars = {}", config.sync.max_content_chars);
    println!("    default_max_depth = {}", config.sync.default_max_depth);

    Ok(())
}
