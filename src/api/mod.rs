//! Rocketseat API module.
//!
//! This module provides:
//! - HTTP client for the skylab REST API
//! - Session persistence
//! - Content lookup seams used by the resolvers
//! - API response types

pub mod client;
pub mod session;
pub mod source;
pub mod types;

pub use client::{RetryPolicy, SkylabApi};
pub use session::{SessionData, SessionStore, StoredCookie};
pub use source::{AttachmentSource, ContentSource, Fetched, Lookup};
pub use types::*;
