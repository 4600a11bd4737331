//! Configuration module for Sumi-Glean
//!
//! This module handles loading, parsing, and validating the optional TOML configuration file.
//!
//! # Example
//!
//! ```no_run
//! use sumi_glean::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("glean.toml")).unwrap();
//! println!("Matching container tag: {}", config.matcher.container_tag);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlConfig, FetchConfig, MatcherConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
