//! Rocketseat Downloader - archive Rocketseat courses to disk
//!
//! This library walks the Rocketseat catalog and writes every lesson of the
//! selected specializations and courses to a local folder tree.
//!
//! # Features
//!
//! - Login with a persisted session (headers and cookies)
//! - Catalog and module listing
//! - Lesson resolution with a fallback chain over an unstable API
//! - Video download through `yt-dlp`, with lesson metadata and attachments
//! - Per-item text reports
//! - Optional mirroring to cloud storage through `rclone`
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use rocketseat_downloader::{Config, SessionStore, SkylabApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("config.toml"))?;
//!     let session = SessionStore::new(config.session_path())
//!         .load()?
//!         .ok_or("log in with the CLI first")?;
//!     let api = SkylabApi::new(&config.http, config.http_timeout(), session)?;
//!
//!     for item in api.list_catalog().await? {
//!         println!("{} ({})", item.title, item.kind);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod content;
pub mod deps;
pub mod download;
pub mod error;
pub mod fs;
pub mod output;
pub mod sync;

// Re-exports for convenience
pub use api::{SessionStore, SkylabApi};
pub use config::Config;
pub use content::{LessonResolver, ModuleResolver};
pub use download::{CourseDownloader, LessonArchiver, MediaFetcher, RunReport};
pub use error::{Error, Result};
pub use sync::SyncBridge;
