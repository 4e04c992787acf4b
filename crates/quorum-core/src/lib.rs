//! Quorum Core - Domain types and capability traits for the Quorum document hub.

mod capabilities;
mod types;

pub use capabilities::{
    is_folder, EnrichmentAnalysis, Enricher, FileListing, RemoteEntry, StorageBrowser,
    FOLDER_MIME_TYPE,
};
pub use types::*;
