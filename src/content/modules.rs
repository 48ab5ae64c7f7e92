//! Module listing for a catalog item.

use serde_json::Value;

use crate::api::{ContentSource, Lookup};
use crate::content::model::ModuleNode;
use crate::content::scrape::ClassroomLinkScanner;
use crate::error::{Error, Result};

/// Expands a catalog item into its modules, resolving each one's cluster slug.
pub struct ModuleResolver<'a> {
    source: &'a dyn ContentSource,
}

impl<'a> ModuleResolver<'a> {
    pub fn new(source: &'a dyn ContentSource) -> Self {
        Self { source }
    }

    /// List modules for an item. Fetch or decode errors on the node list are
    /// returned; per-module resolution failures only leave `cluster_slug` unset.
    pub async fn list_modules(&self, item_slug: &str) -> Result<Vec<ModuleNode>> {
        let fetched = self
            .source
            .fetch(&Lookup::Progress {
                slug: item_slug.to_string(),
            })
            .await?;

        let nodes = fetched
            .as_json()
            .and_then(|v| v.get("nodes"))
            .and_then(Value::as_array)
            .ok_or_else(|| Error::Api(format!("No node list in progress for '{}'", item_slug)))?;

        let mut modules: Vec<ModuleNode> = nodes.iter().filter_map(ModuleNode::from_value).collect();
        tracing::debug!("Item {} has {} nodes", item_slug, modules.len());

        // Fetched at most once, and only if some container node has no slug.
        let mut scanner: Option<Option<ClassroomLinkScanner>> = None;

        for module in &mut modules {
            if !module.kind.is_container() {
                tracing::debug!("Node '{}' is a {}, not a lesson container", module.title, module.kind);
                continue;
            }

            if let Some(slug) = &module.slug {
                module.cluster_slug = Some(slug.clone());
                continue;
            }

            if scanner.is_none() {
                scanner = Some(self.fetch_contents_page(item_slug).await);
            }

            module.cluster_slug = scanner
                .as_mut()
                .and_then(Option::as_mut)
                .and_then(ClassroomLinkScanner::next_slug);

            match &module.cluster_slug {
                Some(slug) => tracing::debug!("Module '{}' resolved from page: {}", module.title, slug),
                None => tracing::warn!("Could not resolve a cluster for module '{}'", module.title),
            }
        }

        Ok(modules)
    }

    async fn fetch_contents_page(&self, item_slug: &str) -> Option<ClassroomLinkScanner> {
        let lookup = Lookup::JourneyPage {
            slug: item_slug.to_string(),
        };

        match self.source.fetch(&lookup).await {
            Ok(fetched) => match fetched.as_page() {
                Some(html) => Some(ClassroomLinkScanner::new(html)),
                None => {
                    tracing::warn!("Journey contents for {} was not a page", item_slug);
                    None
                }
            },
            Err(e) => {
                tracing::warn!("Failed to fetch journey contents for {}: {}", item_slug, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::lessons::tests::FakeSource;
    use crate::content::model::NodeKind;
    use serde_json::json;

    fn progress(slug: &str) -> Lookup {
        Lookup::Progress { slug: slug.into() }
    }

    fn contents(slug: &str) -> Lookup {
        Lookup::JourneyPage { slug: slug.into() }
    }

    #[tokio::test]
    async fn test_prefers_own_slug() {
        let source = FakeSource::default().json(
            progress("node"),
            json!({"nodes": [
                {"title": "Fundamentos", "type": "cluster", "slug": "fund-cluster", "course": {"title": "Node.js"}},
                {"title": "Rotas", "type": "group", "slug": "rotas-group"},
                {"title": "Desafio", "type": "challenge", "slug": "desafio-1"}
            ]}),
        );
        let resolver = ModuleResolver::new(&source);

        let modules = resolver.list_modules("node").await.unwrap();

        assert_eq!(modules.len(), 3);
        assert_eq!(modules[0].cluster_slug.as_deref(), Some("fund-cluster"));
        assert_eq!(modules[0].course_title(), "Node.js");
        assert_eq!(modules[1].cluster_slug.as_deref(), Some("rotas-group"));
        assert_eq!(modules[2].kind, NodeKind::Other("challenge".into()));
        assert!(modules[2].cluster_slug.is_none());
        assert_eq!(source.calls(), vec![progress("node")]);
    }

    #[tokio::test]
    async fn test_missing_slugs_scan_page_once() {
        let html = r#"
            <a class="w-full" href="/classroom/legacy-one">1</a>
            <a class="w-full" href="/classroom/legacy-two">2</a>
        "#;
        let source = FakeSource::default()
            .json(
                progress("react"),
                json!({"nodes": [
                    {"title": "A", "type": "cluster"},
                    {"title": "B", "type": "cluster", "slug": "own-slug"},
                    {"title": "C", "type": "group"},
                    {"title": "D", "type": "cluster"}
                ]}),
            )
            .page(contents("react"), html);
        let resolver = ModuleResolver::new(&source);

        let modules = resolver.list_modules("react").await.unwrap();
        let slugs: Vec<_> = modules.iter().map(|m| m.cluster_slug.as_deref()).collect();

        assert_eq!(
            slugs,
            vec![Some("legacy-one"), Some("own-slug"), Some("legacy-two"), None]
        );
        assert_eq!(source.calls(), vec![progress("react"), contents("react")]);
    }

    #[tokio::test]
    async fn test_page_failure_leaves_slug_unset() {
        let source = FakeSource::default()
            .json(
                progress("go"),
                json!({"nodes": [{"title": "A", "type": "cluster"}, {"title": "B", "type": "group"}]}),
            )
            .status(contents("go"), 500);
        let resolver = ModuleResolver::new(&source);

        let modules = resolver.list_modules("go").await.unwrap();

        assert!(modules.iter().all(|m| m.cluster_slug.is_none()));
        assert_eq!(source.calls(), vec![progress("go"), contents("go")]);
    }

    #[tokio::test]
    async fn test_progress_errors_propagate() {
        let source = FakeSource::default().status(progress("gone"), 404);
        let resolver = ModuleResolver::new(&source);
        assert!(resolver.list_modules("gone").await.is_err());

        let source = FakeSource::default().json(progress("odd"), json!({"items": []}));
        let resolver = ModuleResolver::new(&source);
        assert!(matches!(
            resolver.list_modules("odd").await,
            Err(Error::Api(_))
        ));
    }
}
