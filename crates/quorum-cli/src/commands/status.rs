//! Tenant status command.

use super::get_database;
use anyhow::Result;
use colored::Colorize;
use quorum_db::TenantStats;

pub fn run(tenant: Option<String>) -> Result<()> {
    let db = get_database()?;

    let tenants = match tenant {
        Some(t) => vec![t],
        None => db.list_tenants()?,
    };

    if tenants.is_empty() {
        println!(
            "{}",
            "No tenants found. Use 'quorum integration add' to create one.".dimmed()
        );
        return Ok(());
    }

    for tenant_id in tenants {
        let stats = db.tenant_stats(&tenant_id)?;
        print_stats(&tenant_id, &stats);
    }

    Ok(())
}

fn print_stats(tenant_id: &str, stats: &TenantStats) {
    println!("{}", tenant_id.cyan().bold());
    println!("{}", "─".repeat(50));
    println!("  Integrations:       {}", stats.integrations);
    println!("  Indexed documents:  {}", stats.indexed_documents);
    println!(
        "  Meeting documents:  {} ({} approved)",
        stats.meeting_documents, stats.approved_meetings
    );
    println!("  Pending enrichment: {}", stats.pending_enrichment);
    println!("  Tags:               {}", stats.tags);
    println!();
}
