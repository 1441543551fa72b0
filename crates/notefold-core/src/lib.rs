//! Notefold Core: shared types, item sources, and errors.
//!
//! This crate provides the foundational types used across all Notefold crates.
//! It has no internal Notefold dependencies.
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`item`]: The [`Item`] model and the [`ItemSource`] trait
//! - [`source`]: Markdown directory item source

pub mod error;
pub mod item;
pub mod source;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use item::{Item, ItemId, ItemSource, MemoryItemSource};
pub use source::DirectoryItemSource;
