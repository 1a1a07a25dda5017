// src/models/mod.rs

//! Domain models for the novel tracker.
//!
//! This module contains the catalog records, the classified edit keys used
//! by the reconciler, and the configuration structures.

mod config;
pub mod field;
mod novel;

// Re-export all public types
pub use config::{Config, ImportConfig, LoggingConfig, StoreConfig};
pub use field::{DetailField, FieldKind, FieldPath, FieldValue, NovelField, OpinionField};
pub use novel::{Detail, MAX_RATING, Novel, NovelId, NovelStatus, Opinion};
