//! Lesson resolution with an ordered fallback chain.
//!
//! The node endpoint is unreliable: single-lesson nodes answer 401/404, some
//! nodes come back as `{}`, and the shape varies. Each [`LessonStrategy`] names
//! one lookup plus a pure parse of its response; the resolver tries them in
//! order and returns the first non-empty result.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::api::{ContentSource, Fetched, Lookup};
use crate::content::model::{LessonGroup, LessonRecord};
use crate::content::scrape::extract_content_id;
use crate::content::shapes::parse_container;
use crate::fs::naming::sanitize_string;

/// One step of the fallback chain.
pub trait LessonStrategy: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// The lookup to perform, or `None` if this step does not apply.
    fn lookup(&self, node_slug: &str, parent_slug: Option<&str>) -> Option<Lookup>;

    /// Turn the raw response into lesson groups. `None` means "try the next step".
    fn parse(&self, node_slug: &str, raw: &Fetched) -> Option<Vec<LessonGroup>>;
}

fn parse_structured(node_slug: &str, raw: &Fetched) -> Option<Vec<LessonGroup>> {
    parse_container(raw.as_json()?, node_slug)
}

/// Primary lookup: the node detail endpoint.
pub struct NodeDetail;

impl LessonStrategy for NodeDetail {
    fn name(&self) -> &'static str {
        "node"
    }

    fn lookup(&self, node_slug: &str, _parent_slug: Option<&str>) -> Option<Lookup> {
        Some(Lookup::Node {
            slug: node_slug.to_string(),
        })
    }

    fn parse(&self, node_slug: &str, raw: &Fetched) -> Option<Vec<LessonGroup>> {
        parse_structured(node_slug, raw)
    }
}

/// Second try: the creators lookup with the slug as a query parameter.
pub struct CreatorsLookup;

impl LessonStrategy for CreatorsLookup {
    fn name(&self) -> &'static str {
        "creators"
    }

    fn lookup(&self, node_slug: &str, _parent_slug: Option<&str>) -> Option<Lookup> {
        Some(Lookup::Creators {
            slug: node_slug.to_string(),
        })
    }

    fn parse(&self, node_slug: &str, raw: &Fetched) -> Option<Vec<LessonGroup>> {
        parse_structured(node_slug, raw)
    }
}

/// Third try: the parent node, asked about this slug. Needs a known parent.
pub struct ParentLookup;

impl LessonStrategy for ParentLookup {
    fn name(&self) -> &'static str {
        "parent"
    }

    fn lookup(&self, node_slug: &str, parent_slug: Option<&str>) -> Option<Lookup> {
        let parent = parent_slug.filter(|p| !p.is_empty() && *p != node_slug)?;
        Some(Lookup::Parent {
            parent: parent.to_string(),
            slug: node_slug.to_string(),
        })
    }

    fn parse(&self, node_slug: &str, raw: &Fetched) -> Option<Vec<LessonGroup>> {
        parse_structured(node_slug, raw)
    }
}

/// Last resort: scrape a video id from the rendered classroom page.
pub struct PageScrape;

impl LessonStrategy for PageScrape {
    fn name(&self) -> &'static str {
        "page"
    }

    fn lookup(&self, node_slug: &str, _parent_slug: Option<&str>) -> Option<Lookup> {
        Some(Lookup::ClassroomPage {
            slug: node_slug.to_string(),
        })
    }

    fn parse(&self, node_slug: &str, raw: &Fetched) -> Option<Vec<LessonGroup>> {
        let (content_id, found_in) = extract_content_id(raw.as_page()?)?;
        tracing::debug!("Found content id {} in page ({:?})", content_id, found_in);

        Some(vec![LessonGroup {
            title: node_slug.to_string(),
            lessons: vec![LessonRecord::from_resource(node_slug, &content_id)],
        }])
    }
}

/// The default chain: node, creators, parent, page.
pub fn default_strategies() -> Vec<Box<dyn LessonStrategy>> {
    vec![
        Box::new(NodeDetail),
        Box::new(CreatorsLookup),
        Box::new(ParentLookup),
        Box::new(PageScrape),
    ]
}

/// Path of the debug dump for a node.
pub fn debug_artifact_path(logs_dir: &Path, node_slug: &str) -> PathBuf {
    logs_dir.join(format!("{}_cluster_details.json", sanitize_string(node_slug)))
}

/// Resolves a node slug into lesson groups.
pub struct LessonResolver<'a> {
    source: &'a dyn ContentSource,
    strategies: Vec<Box<dyn LessonStrategy>>,
    logs_dir: Option<PathBuf>,
}

impl<'a> LessonResolver<'a> {
    /// Resolver with the default chain. Structured responses are dumped to
    /// `logs_dir` when one is given.
    pub fn new(source: &'a dyn ContentSource, logs_dir: Option<PathBuf>) -> Self {
        Self::with_strategies(source, default_strategies(), logs_dir)
    }

    pub fn with_strategies(
        source: &'a dyn ContentSource,
        strategies: Vec<Box<dyn LessonStrategy>>,
        logs_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            source,
            strategies,
            logs_dir,
        }
    }

    /// Resolve lesson groups for a node. An empty result means the node has
    /// nothing to download; it is never an error.
    pub async fn resolve(&self, node_slug: &str, parent_slug: Option<&str>) -> Vec<LessonGroup> {
        tracing::info!("Looking up lessons for node: {}", node_slug);

        for strategy in &self.strategies {
            let Some(lookup) = strategy.lookup(node_slug, parent_slug) else {
                tracing::debug!("Skipping {} lookup for {}", strategy.name(), node_slug);
                continue;
            };

            let raw = match self.source.fetch(&lookup).await {
                Ok(raw) => raw,
                Err(e) if e.is_access_or_missing() => {
                    tracing::debug!("{} lookup for {} unavailable: {}", strategy.name(), node_slug, e);
                    continue;
                }
                Err(e) => {
                    tracing::warn!("{} lookup for {} failed: {}", strategy.name(), node_slug, e);
                    continue;
                }
            };

            if let Fetched::Json(value) = &raw {
                self.write_debug_artifact(node_slug, value);
            }

            if let Some(groups) = strategy.parse(node_slug, &raw) {
                tracing::info!(
                    "Found {} groups with {} lessons via {} lookup",
                    groups.len(),
                    LessonGroup::lesson_count(&groups),
                    strategy.name()
                );
                return groups;
            }

            tracing::debug!("{} lookup for {} returned no lessons", strategy.name(), node_slug);
        }

        tracing::warn!("No lessons found for node {}", node_slug);
        Vec::new()
    }

    fn write_debug_artifact(&self, node_slug: &str, value: &Value) {
        let Some(logs_dir) = &self.logs_dir else {
            return;
        };

        let path = debug_artifact_path(logs_dir, node_slug);
        let result = fs::create_dir_all(logs_dir)
            .and_then(|_| {
                serde_json::to_string_pretty(value).map_err(std::io::Error::other)
            })
            .and_then(|content| fs::write(&path, content));

        if let Err(e) = result {
            tracing::warn!("Could not write debug dump {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::tempdir;

    /// In-memory content source that records every lookup it serves.
    #[derive(Default)]
    pub(crate) struct FakeSource {
        responses: HashMap<Lookup, std::result::Result<Fetched, u16>>,
        pub calls: Mutex<Vec<Lookup>>,
    }

    impl FakeSource {
        pub fn json(mut self, lookup: Lookup, value: Value) -> Self {
            self.responses.insert(lookup, Ok(Fetched::Json(value)));
            self
        }

        pub fn page(mut self, lookup: Lookup, html: &str) -> Self {
            self.responses.insert(lookup, Ok(Fetched::Page(html.to_string())));
            self
        }

        pub fn status(mut self, lookup: Lookup, status: u16) -> Self {
            self.responses.insert(lookup, Err(status));
            self
        }

        pub fn calls(&self) -> Vec<Lookup> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ContentSource for FakeSource {
        async fn fetch(&self, lookup: &Lookup) -> Result<Fetched> {
            self.calls.lock().unwrap().push(lookup.clone());
            match self.responses.get(lookup) {
                Some(Ok(fetched)) => Ok(fetched.clone()),
                Some(Err(status)) => Err(Error::Status {
                    status: *status,
                    url: format!("{:?}", lookup),
                }),
                None => Err(Error::Status {
                    status: 404,
                    url: format!("{:?}", lookup),
                }),
            }
        }
    }

    fn node(slug: &str) -> Lookup {
        Lookup::Node { slug: slug.into() }
    }

    fn creators(slug: &str) -> Lookup {
        Lookup::Creators { slug: slug.into() }
    }

    fn parent(parent: &str, slug: &str) -> Lookup {
        Lookup::Parent {
            parent: parent.into(),
            slug: slug.into(),
        }
    }

    fn page(slug: &str) -> Lookup {
        Lookup::ClassroomPage { slug: slug.into() }
    }

    fn group_shape(title: &str) -> Value {
        json!({"group": {"title": title, "lessons": [{"last": {"title": "L", "resource": "r-1"}}]}})
    }

    #[tokio::test]
    async fn test_primary_cluster_short_circuits() {
        let source = FakeSource::default().json(
            node("aws-cluster-1"),
            json!({"cluster": {"groups": [{"title": "G1", "lessons": [{"last": {"title": "L1", "resource": "abc123"}}]}]}}),
        );
        let resolver = LessonResolver::new(&source, None);

        let groups = resolver.resolve("aws-cluster-1", Some("aws")).await;

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].title, "G1");
        assert_eq!(groups[0].lessons[0].title, "L1");
        assert_eq!(groups[0].lessons[0].resource.as_deref(), Some("abc123"));
        assert_eq!(groups[0].lessons[0].group_title, "G1");
        assert_eq!(source.calls(), vec![node("aws-cluster-1")]);
    }

    #[tokio::test]
    async fn test_empty_primary_falls_back_to_creators() {
        let dir = tempdir().unwrap();
        let source = FakeSource::default()
            .json(node("n1"), json!({}))
            .json(creators("n1"), group_shape("From creators"));
        let resolver = LessonResolver::new(&source, Some(dir.path().to_path_buf()));

        let groups = resolver.resolve("n1", None).await;

        assert_eq!(groups[0].title, "From creators");
        assert_eq!(source.calls(), vec![node("n1"), creators("n1")]);

        let dumped: Value = serde_json::from_str(
            &fs::read_to_string(debug_artifact_path(dir.path(), "n1")).unwrap(),
        )
        .unwrap();
        assert_eq!(dumped, group_shape("From creators"));
    }

    #[tokio::test]
    async fn test_unauthorized_primary_behaves_like_empty() {
        for status in [401, 403, 404, 500] {
            let source = FakeSource::default()
                .status(node("n2"), status)
                .json(creators("n2"), group_shape("G"));
            let resolver = LessonResolver::new(&source, None);

            let groups = resolver.resolve("n2", None).await;
            assert_eq!(groups.len(), 1, "status {}", status);
            assert_eq!(source.calls(), vec![node("n2"), creators("n2")]);
        }
    }

    #[tokio::test]
    async fn test_parent_tried_before_page() {
        let source = FakeSource::default()
            .json(node("n3"), json!({}))
            .json(creators("n3"), json!({"cluster": {"groups": []}}))
            .json(parent("p3", "n3"), group_shape("From parent"))
            .page(page("n3"), "/zzz/playlist.m3u8");
        let resolver = LessonResolver::new(&source, None);

        let groups = resolver.resolve("n3", Some("p3")).await;

        assert_eq!(groups[0].title, "From parent");
        assert_eq!(
            source.calls(),
            vec![node("n3"), creators("n3"), parent("p3", "n3")]
        );
    }

    #[tokio::test]
    async fn test_parent_skipped_when_unknown() {
        let source = FakeSource::default();
        let resolver = LessonResolver::new(&source, None);

        let groups = resolver.resolve("n4", None).await;

        assert!(groups.is_empty());
        assert_eq!(source.calls(), vec![node("n4"), creators("n4"), page("n4")]);
    }

    #[tokio::test]
    async fn test_page_scrape_synthesizes_lesson() {
        let source = FakeSource::default()
            .json(node("lesson-x"), json!({}))
            .json(creators("lesson-x"), json!({}))
            .json(parent("p", "lesson-x"), json!({}))
            .page(
                page("lesson-x"),
                r#"<video src="https://vz.b-cdn.net/xyz789f01e/playlist.m3u8">"#,
            );
        let resolver = LessonResolver::new(&source, None);

        let groups = resolver.resolve("lesson-x", Some("p")).await;

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].lessons.len(), 1);
        let lesson = &groups[0].lessons[0];
        assert_eq!(lesson.resource.as_deref(), Some("xyz789f01e"));
        assert_eq!(lesson.title, "lesson-x");
        assert!(lesson.downloads.is_empty());
    }

    #[tokio::test]
    async fn test_nothing_matches_returns_empty() {
        let source = FakeSource::default()
            .json(node("n5"), json!({}))
            .page(page("n5"), "<html>no video here</html>");
        let resolver = LessonResolver::new(&source, None);

        assert!(resolver.resolve("n5", None).await.is_empty());
    }

    #[tokio::test]
    async fn test_debug_artifact_written_for_primary() {
        let dir = tempdir().unwrap();
        let body = json!({"cluster": {"groups": [{"title": "G", "lessons": [{"last": {"title": "L"}}]}]}});
        let source = FakeSource::default().json(node("a/b:c"), body.clone());
        let resolver = LessonResolver::new(&source, Some(dir.path().join("logs")));

        resolver.resolve("a/b:c", None).await;

        let path = dir.path().join("logs").join("abc_cluster_details.json");
        let dumped: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(dumped, body);
    }

    struct AlwaysOne;

    impl LessonStrategy for AlwaysOne {
        fn name(&self) -> &'static str {
            "always"
        }

        fn lookup(&self, node_slug: &str, _parent_slug: Option<&str>) -> Option<Lookup> {
            Some(Lookup::Node {
                slug: format!("{}-alt", node_slug),
            })
        }

        fn parse(&self, node_slug: &str, _raw: &Fetched) -> Option<Vec<LessonGroup>> {
            Some(vec![LessonGroup {
                title: node_slug.to_string(),
                lessons: vec![LessonRecord::from_resource(node_slug, "fixed-id-000")],
            }])
        }
    }

    #[tokio::test]
    async fn test_custom_strategy_appended() {
        let source = FakeSource::default().json(node("n6-alt"), json!({}));
        let mut strategies = default_strategies();
        strategies.push(Box::new(AlwaysOne));
        let resolver = LessonResolver::with_strategies(&source, strategies, None);

        let groups = resolver.resolve("n6", None).await;

        assert_eq!(groups[0].lessons[0].resource.as_deref(), Some("fixed-id-000"));
        assert_eq!(source.calls().last(), Some(&node("n6-alt")));
    }
}
