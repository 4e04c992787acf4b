//! Quorum CLI - Multi-tenant document hub for member organizations.

mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Quorum - crawl, index, and enrich your organization's documents
#[derive(Parser)]
#[command(name = "quorum")]
#[command(version)]
#[command(about = "Multi-tenant document hub for member organizations", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize Quorum (create config and database)
    Init,

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Manage folder integrations
    #[command(subcommand)]
    Integration(IntegrationCommands),

    /// Crawl folders into the generic searchable index
    Index {
        /// Tenant to index
        #[arg(short, long)]
        tenant: Option<String>,

        /// Index every tenant with an active integration
        #[arg(long)]
        all: bool,
    },

    /// Run the meeting-document pipeline
    Sync {
        /// Tenant to sync
        #[arg(short, long)]
        tenant: Option<String>,

        /// Sync every tenant with an active integration
        #[arg(long)]
        all: bool,
    },

    /// Enrich pending meeting documents with AI analysis
    Enrich {
        /// Tenant to enrich
        #[arg(short, long)]
        tenant: Option<String>,

        /// Enrich every tenant with an active integration
        #[arg(long)]
        all: bool,
    },

    /// List a tenant's meeting documents
    Meetings {
        /// Tenant
        #[arg(short, long)]
        tenant: String,
    },

    /// Approve a meeting document (freezes it against future syncs)
    Approve {
        /// Meeting document ID
        id: String,
    },

    /// Remove a meeting document
    Remove {
        /// Meeting document ID
        id: String,
    },

    /// Manage tags
    #[command(subcommand)]
    Tags(TagCommands),

    /// Search a tenant's document index
    Search {
        /// Search query
        query: String,

        /// Tenant
        #[arg(short, long)]
        tenant: String,

        /// Maximum results
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Show per-tenant document and tag counts
    Status {
        /// Limit to one tenant
        #[arg(short, long)]
        tenant: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,
}

#[derive(Subcommand)]
enum IntegrationCommands {
    /// Add a folder integration
    Add {
        /// Tenant
        #[arg(short, long)]
        tenant: String,

        /// Display name
        name: String,

        /// External folder ID in the cloud drive
        folder_id: String,

        /// Integration kind: general or minutes
        #[arg(short, long, default_value = "general")]
        kind: String,

        /// Maximum crawl depth
        #[arg(long)]
        max_depth: Option<u32>,
    },

    /// List a tenant's integrations
    List {
        /// Tenant
        #[arg(short, long)]
        tenant: String,
    },

    /// Remove an integration
    Remove {
        /// Integration ID
        id: String,
    },
}

#[derive(Subcommand)]
enum TagCommands {
    /// List a tenant's tags with usage counts
    List {
        /// Tenant
        #[arg(short, long)]
        tenant: String,
    },

    /// Merge one tag into another (by normalized name)
    Merge {
        /// Tenant
        #[arg(short, long)]
        tenant: String,

        /// Tag to merge away
        source: String,

        /// Tag to keep
        target: String,
    },

    /// Delete a tag (by normalized name)
    Delete {
        /// Tenant
        #[arg(short, long)]
        tenant: String,

        /// Tag name
        name: String,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("info,quorum_sync=debug,quorum_db=debug,quorum_storage=debug,quorum_enrich=debug")
        })
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Init => commands::init::run(),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::show(),
        },
        Commands::Integration(cmd) => match cmd {
            IntegrationCommands::Add {
                tenant,
                name,
                folder_id,
                kind,
                max_depth,
            } => commands::integration::add(&tenant, &name, &folder_id, &kind, max_depth),
            IntegrationCommands::List { tenant } => commands::integration::list(&tenant),
            IntegrationCommands::Remove { id } => commands::integration::remove(&id),
        },
        Commands::Index { tenant, all } => commands::index::run(tenant, all).await,
        Commands::Sync { tenant, all } => commands::sync::run(tenant, all).await,
        Commands::Enrich { tenant, all } => commands::enrich::run(tenant, all).await,
        Commands::Meetings { tenant } => commands::meetings::list(&tenant),
        Commands::Approve { id } => commands::meetings::approve(&id),
        Commands::Remove { id } => commands::meetings::remove(&id),
        Commands::Tags(cmd) => match cmd {
            TagCommands::List { tenant } => commands::tags::list(&tenant),
            TagCommands::Merge {
                tenant,
                source,
                target,
            } => commands::tags::merge(&tenant, &source, &target),
            TagCommands::Delete { tenant, name } => commands::tags::delete(&tenant, &name),
        },
        Commands::Search {
            query,
            tenant,
            limit,
        } => commands::search::run(&tenant, &query, limit),
        Commands::Status { tenant } => commands::status::run(tenant),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
