//! # Carros Shared
//!
//! Common types used across the Carros crates.

pub mod config;
pub mod error;

// Re-exports
pub use config::*;
pub use error::*;
