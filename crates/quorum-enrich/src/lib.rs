//! Quorum Enrich - AI document analysis via Ollama.
//!
//! Implements the [`Enricher`](quorum_core::Enricher) capability: document
//! text goes in, a structured summary with task lists, suggested tags, and an
//! inferred meeting date comes out.

mod client;
mod error;
mod types;

pub use client::OllamaClient;
pub use error::{EnrichError, EnrichResult};
pub use types::{GenerateOptions, GenerateRequest, GenerateResponse};
