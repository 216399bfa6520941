pub mod config;
pub mod db;
pub mod error;

// Retrieval engine
pub mod filter;

// HTTP surface
pub mod api;

// Command-line interface
pub mod cli;

// Re-exports
pub use config::Settings;
pub use error::{Error, Result};
