//! Folder integration management commands.

use super::{get_config, get_database};
use anyhow::Result;
use colored::Colorize;
use quorum_core::{FolderIntegration, IntegrationKind};

pub fn add(
    tenant: &str,
    name: &str,
    folder_id: &str,
    kind: &str,
    max_depth: Option<u32>,
) -> Result<()> {
    let kind = IntegrationKind::from_str(kind)
        .ok_or_else(|| anyhow::anyhow!("Unknown kind '{}'. Use 'general' or 'minutes'.", kind))?;

    let config = get_config()?;
    let db = get_database()?;

    let integration = FolderIntegration::new(tenant, name, folder_id, kind)
        .with_max_depth(max_depth.unwrap_or(config.sync.default_max_depth));
    db.create_integration(&integration)?;

    println!(
        "{} Added {} integration '{}' for tenant {}",
        "✓".green(),
        integration.kind,
        integration.name.white(),
        tenant.cyan()
    );
    println!("  ID: {}", integration.id.dimmed());

    Ok(())
}

pub fn list(tenant: &str) -> Result<()> {
    let db = get_database()?;
    let integrations = db.list_integrations(tenant)?;

    if integrations.is_empty() {
        println!(
            "{}",
            "No integrations found. Use 'quorum integration add' to create one.".dimmed()
        );
        return Ok(());
    }

    println!("{} {}", "Integrations for".cyan().bold(), tenant.cyan().bold());
    println!("{}", "─".repeat(70));

    for integration in integrations {
        let state = if integration.active {
            "active".green()
        } else {
            "inactive".dimmed()
        };
        println!(
            "  {} {} [{}] depth {} ({})",
            integration.id.dimmed(),
            integration.name.white(),
            integration.kind,
            integration.max_depth,
            state
        );
    }

    Ok(())
}

pub fn remove(id: &str) -> Result<()> {
    let db = get_database()?;
    db.delete_integration(id)?;

    println!("{} Removed integration {}", "✓".green(), id.dimmed());
    Ok(())
}
