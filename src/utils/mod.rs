//! Utility functions and helpers.

pub mod display;
pub mod http;
