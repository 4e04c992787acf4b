//! Full-text search command.

use super::get_database;
use anyhow::Result;
use colored::Colorize;

pub fn run(tenant: &str, query: &str, limit: i64) -> Result<()> {
    let db = get_database()?;
    let results = db.search_indexed(tenant, query, limit)?;

    if results.is_empty() {
        println!("{}", "No matching documents.".dimmed());
        return Ok(());
    }

    println!(
        "{} {} {}",
        "Results for".cyan().bold(),
        query.white().bold(),
        format!("({})", results.len()).dimmed()
    );
    println!("{}", "─".repeat(70));

    for doc in results {
        println!(
            "  {} {} {}",
            doc.file_name.white(),
            format!("[{}]", doc.integration_name).cyan(),
            doc.external_file_id.dimmed()
        );
    }

    Ok(())
}
