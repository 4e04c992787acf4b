//! Meeting document commands: list, approve, remove.

use super::get_database;
use anyhow::Result;
use colored::Colorize;
use quorum_core::DocumentStatus;

pub fn list(tenant: &str) -> Result<()> {
    let db = get_database()?;
    let meetings = db.list_meetings(tenant)?;

    if meetings.is_empty() {
        println!(
            "{}",
            "No meeting documents found. Run 'quorum sync' first.".dimmed()
        );
        return Ok(());
    }

    println!(
        "{} {}",
        "Meeting documents for".cyan().bold(),
        tenant.cyan().bold()
    );
    println!("{}", "─".repeat(70));

    for doc in meetings {
        let status = match doc.status {
            DocumentStatus::Approved => "approved".green(),
            DocumentStatus::Pending => "pending".yellow(),
        };
        let date = doc
            .meeting_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "????-??-??".to_string());
        let enriched = if doc.is_enriched() { "●".green() } else { "○".dimmed() };

        println!(
            "  {} {} {} {} ({})",
            enriched,
            date.white(),
            doc.file_name,
            status,
            doc.id.dimmed()
        );
    }

    Ok(())
}

pub fn approve(id: &str) -> Result<()> {
    let db = get_database()?;
    let doc = db.get_meeting(id)?;

    db.set_meeting_status(&doc.id, DocumentStatus::Approved)?;

    println!(
        "{} Approved '{}'. Future syncs will not modify it.",
        "✓".green(),
        doc.file_name.white()
    );

    Ok(())
}

pub fn remove(id: &str) -> Result<()> {
    let db = get_database()?;
    let doc = db.get_meeting(id)?;

    // Removing a document releases its tag usages
    db.decrement_tags(&doc.tenant_id, &doc.tags)?;
    db.delete_meeting(&doc.id)?;

    println!("{} Removed '{}'", "✓".green(), doc.file_name.white());

    Ok(())
}
