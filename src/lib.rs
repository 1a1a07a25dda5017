// src/lib.rs

//! Novel Tracker Library
//!
//! Normalizes spreadsheet rows into catalog records, reconciles edits into
//! partial updates, and talks to the Novel Store API.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
