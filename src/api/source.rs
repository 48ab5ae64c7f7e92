//! Seams between the content walkers and the transport.
//!
//! The resolvers and the archiver only see these traits, so they can be driven
//! by the real [`SkylabApi`](crate::api::SkylabApi) or by in-memory fakes.

use async_trait::async_trait;
use serde_json::Value;

use crate::api::types::DownloadedFile;
use crate::error::Result;

/// A content lookup the walkers can ask for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Lookup {
    /// Journey progress (raw module node list) for a catalog item.
    Progress { slug: String },
    /// Rendered journey contents page (legacy cluster-slug scrape).
    JourneyPage { slug: String },
    /// Node detail by slug.
    Node { slug: String },
    /// Creators lookup, node slug passed as a query parameter.
    Creators { slug: String },
    /// Parent node detail, node slug passed as a query parameter.
    Parent { parent: String, slug: String },
    /// Rendered classroom page for a lesson or node.
    ClassroomPage { slug: String },
}

impl Lookup {
    /// Whether the lookup returns rendered HTML rather than JSON.
    pub fn is_page(&self) -> bool {
        matches!(self, Lookup::JourneyPage { .. } | Lookup::ClassroomPage { .. })
    }
}

/// Raw fetch result.
#[derive(Debug, Clone)]
pub enum Fetched {
    Json(Value),
    Page(String),
}

impl Fetched {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Fetched::Json(value) => Some(value),
            Fetched::Page(_) => None,
        }
    }

    pub fn as_page(&self) -> Option<&str> {
        match self {
            Fetched::Page(html) => Some(html),
            Fetched::Json(_) => None,
        }
    }
}

/// Source of structured and rendered content.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(&self, lookup: &Lookup) -> Result<Fetched>;
}

/// Source of authenticated attachment downloads.
#[async_trait]
pub trait AttachmentSource: Send + Sync {
    async fn download(&self, url: &str) -> Result<DownloadedFile>;
}
