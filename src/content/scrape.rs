//! Pattern extraction from rendered HTML pages.
//!
//! Used only when the structured endpoints give nothing back. These patterns
//! track the current web app markup and will break when it changes.

use std::sync::LazyLock;

use regex::Regex;

/// Minimum length for an id taken from a loose `"resource"` field.
pub const MIN_RESOURCE_ID_LEN: usize = 10;

/// Anchor preceding a classroom slug on the journey contents page.
const CLASSROOM_LINK: &str = r#"<a class="w-full" href="/classroom/"#;

static PLAYLIST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/([A-Za-z0-9_-]+)/playlist\.m3u8").expect("valid regex"));

static EMBED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"/embed/[^/"'\s<>]+/([A-Za-z0-9_-]+)"#).expect("valid regex")
});

static RESOURCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\\?"resource\\?"\s*:\s*\\?"([^"\\]+)"#).expect("valid regex")
});

/// Where a content id was found on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdSource {
    Playlist,
    Embed,
    ResourceField,
}

/// Find a video content id in a rendered lesson page.
///
/// Tries, in order: an HLS playlist URL (`.../<id>/playlist.m3u8`), an embed
/// frame URL (`/embed/<library>/<id>`), then an inline `"resource": "..."`
/// field whose last path segment is long enough to be an id.
pub fn extract_content_id(html: &str) -> Option<(String, IdSource)> {
    if let Some(caps) = PLAYLIST_RE.captures(html) {
        return Some((caps[1].to_string(), IdSource::Playlist));
    }

    if let Some(caps) = EMBED_RE.captures(html) {
        return Some((caps[1].to_string(), IdSource::Embed));
    }

    RESOURCE_RE.captures_iter(html).find_map(|caps| {
        let segment = caps[1].trim_end_matches('/').rsplit('/').next()?;
        (segment.chars().count() >= MIN_RESOURCE_ID_LEN)
            .then(|| (segment.to_string(), IdSource::ResourceField))
    })
}

/// Walks classroom links on a journey contents page, one per call.
///
/// The page text is never modified; a cursor marks where the next search
/// starts, so successive modules receive successive links.
#[derive(Debug, Clone)]
pub struct ClassroomLinkScanner {
    html: String,
    offset: usize,
}

impl ClassroomLinkScanner {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            offset: 0,
        }
    }

    /// Current cursor position in the page.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Return the next classroom slug after the cursor and advance past it.
    pub fn next_slug(&mut self) -> Option<String> {
        let window = &self.html[self.offset..];
        let start = window.find(CLASSROOM_LINK)? + CLASSROOM_LINK.len();
        let len = window[start..].find('"')?;

        let slug = window[start..start + len].to_string();
        self.offset += start + len;

        if slug.is_empty() {
            return self.next_slug();
        }
        Some(slug)
    }
}
