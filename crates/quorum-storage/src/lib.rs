//! Quorum Storage - HTTP client for the cloud drive API.
//!
//! Implements the [`StorageBrowser`](quorum_core::StorageBrowser) capability
//! against a Drive-style REST gateway: paginated folder listings and
//! plain-text export of document files.

mod client;
mod error;
mod types;

pub use client::DriveClient;
pub use error::{StorageError, StorageResult};
