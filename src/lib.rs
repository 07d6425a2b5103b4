//! websearch: multi-provider web search with intent-based auto-routing.
//!
//! Thin application layer over [`websearch_router`]: configuration file
//! loading, command-line arguments and JSON output for the `websearch`
//! binary.
//!
//! # Architecture
//!
//! - **Config**: TOML/JSON file, environment credentials, repaired defaults
//! - **CLI**: `clap` arguments mapped onto a [`websearch_router::SearchRequest`]
//! - **Routing and search**: delegated to `websearch-router`
//! - **Report**: JSON documents for results, routing explanations and failures

pub mod cli;
pub mod config;
pub mod error;
pub mod report;

pub use error::{AppError, Result};
pub use websearch_router as router;
