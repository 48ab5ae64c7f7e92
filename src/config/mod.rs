//! Configuration module for the rocketseat-downloader.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Sync mode and scope definitions
//! - Configuration validation

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{
    AccountConfig, Config, HttpConfig, MediaConfig, OutputConfig, SessionConfig, SyncConfig,
    SESSION_FILE_NAME,
};
pub use modes::{SyncMode, SyncScope};
pub use validation::validate_config;
