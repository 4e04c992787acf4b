//! Meeting-document pipeline command.

use super::{get_config, get_database};
use anyhow::Result;
use colored::Colorize;
use quorum_storage::DriveClient;
use quorum_sync::Indexer;
use std::sync::Arc;

pub async fn run(tenant: Option<String>, all: bool) -> Result<()> {
    let config = get_config()?;
    let db = get_database()?;

    let browser = DriveClient::from_config(&config.storage)?;
    if !browser.has_credentials() {
        println!(
            "{} No storage credentials configured; nothing to sync.",
            "Note:".yellow().bold()
        );
        return Ok(());
    }

    let indexer = Indexer::new(db, Arc::new(browser), config.sync.max_content_chars);

    let outcome = if all {
        indexer.sync_all_tenants().await?
    } else {
        let tenant = tenant
            .ok_or_else(|| anyhow::anyhow!("Pass --tenant <tenant> or --all"))?;
        indexer.sync_tenant(&tenant).await?
    };

    println!(
        "{} Synced {} meeting documents ({} skipped, {} errors)",
        "✓".green(),
        outcome.synced.to_string().white(),
        outcome.skipped,
        outcome.errors
    );

    Ok(())
}
