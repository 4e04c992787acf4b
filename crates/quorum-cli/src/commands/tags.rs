//! Tag ledger commands.

use super::get_database;
use anyhow::Result;
use colored::Colorize;

pub fn list(tenant: &str) -> Result<()> {
    let db = get_database()?;
    let tags = db.list_tags(tenant)?;

    if tags.is_empty() {
        println!("{}", "No tags found. Tags appear as documents are enriched.".dimmed());
        return Ok(());
    }

    println!("{} {}", "Tags for".cyan().bold(), tenant.cyan().bold());
    println!("{}", "─".repeat(50));

    for tag in tags {
        println!(
            "  {} {} ({})",
            "•".yellow(),
            tag.display_name.white(),
            tag.usage_count
        );
    }

    Ok(())
}

pub fn merge(tenant: &str, source: &str, target: &str) -> Result<()> {
    let db = get_database()?;

    let source_tag = db
        .get_tag_by_name(tenant, source)?
        .ok_or_else(|| anyhow::anyhow!("No tag named '{}' for tenant {}", source, tenant))?;
    let target_tag = db
        .get_tag_by_name(tenant, target)?
        .ok_or_else(|| anyhow::anyhow!("No tag named '{}' for tenant {}", target, tenant))?;

    let touched = db.merge_tags(tenant, &source_tag.id, &target_tag.id)?;

    println!(
        "{} Merged '{}' into '{}' ({} documents updated)",
        "✓".green(),
        source_tag.display_name,
        target_tag.display_name.white(),
        touched
    );

    Ok(())
}

pub fn delete(tenant: &str, name: &str) -> Result<()> {
    let db = get_database()?;

    let tag = db
        .get_tag_by_name(tenant, name)?
        .ok_or_else(|| anyhow::anyhow!("No tag named '{}' for tenant {}", name, tenant))?;

    db.delete_tag(&tag.id)?;

    println!("{} Deleted tag '{}'", "✓".green(), tag.display_name);
    Ok(())
}
