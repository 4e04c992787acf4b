//! Generic index crawl command.

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
            "{} No storage credentials configured; nothing to index.",
            "Note:".yellow().bold()
        );
        return Ok(());
    }

    let indexer = Indexer::new(db, Arc::new(browser), config.sync.max_content_chars);

    let outcome = if all {
        indexer.index_all_tenants().await?
    } else {
        let tenant = tenant
            .ok_or_else(|| anyhow::anyhow!("Pass --tenant <tenant> or --all"))?;
        indexer.index_tenant(&tenant).await?
    };

    println!(
        "{} Indexed {} documents ({} errors, {} pruned)",
        "✓".green(),
        outcome.indexed.to_string().white(),
        outcome.errors,
        outcome.deleted
    );

    Ok(())
}
