//! # notefold-cli
//!
//! Startup entry point for the Notefold knowledge base:
//! - Configuration loading and directory setup
//! - Search index bootstrap
//! - Querying the local index snapshot

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod commands;
pub mod config;

pub use config::AppConfig;
