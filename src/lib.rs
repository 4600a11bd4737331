//! Sumi-Glean: a concurrent item gatherer
//!
//! This crate fetches a set of seed pages concurrently, streams each page's markup through
//! a token-driven matcher, and gathers the item records (id, image, link, title) it finds.

pub mod config;
pub mod crawler;
pub mod extractor;
pub mod output;
pub mod token;

use thiserror::Error;

/// Main error type for Sumi-Glean operations
#[derive(Debug, Error)]
pub enum GleanError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}")]
    Connect { url: String },

    #[error("Failed reading body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },

    #[error("Item channel closed before {url} finished")]
    ChannelClosed { url: String },

    #[error("Worker for {url} stopped before reporting an outcome")]
    WorkerAborted { url: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Sumi-Glean operations
pub type Result<T> = std::result::Result<T, GleanError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlReport, SeedFailure};
pub use extractor::{extract_items, Extractor, Item, MatchState};
pub use token::{StreamTokenizer, Token, TokenKind};
