//! Enrichment scheduler command.

use super::{get_config, get_database};
use anyhow::Result;
use colored::Colorize;
use quorum_enrich::OllamaClient;
use quorum_sync::EnrichmentScheduler;
use std::sync::Arc;
use std::time::Duration;

pub async fn run(tenant: Option<String>, all: bool) -> Result<()> {
    let config = get_config()?;
    let db = get_database()?;

    let client = OllamaClient::from_config(&config.ollama)?;
    if !client.is_available().await {
        anyhow::bail!(
            "Ollama is not running at {}. Start it with 'ollama serve'.",
            config.ollama.host
        );
    }

    let scheduler = EnrichmentScheduler::new(
        db,
        Arc::new(client),
        config.sync.batch_size,
        Duration::from_millis(config.sync.batch_delay_ms),
    );

    let outcome = if all {
        scheduler.enrich_all_tenants().await?
    } else {
        let tenant = tenant
            .ok_or_else(|| anyhow::anyhow!("Pass --tenant <tenant> or --all"))?;
        scheduler.enrich_tenant(&tenant).await?
    };

    println!(
        "{} Enriched {} of {} documents ({} errors)",
        "✓".green(),
        outcome.processed.to_string().white(),
        outcome.total,
        outcome.errors
    );

    Ok(())
}
