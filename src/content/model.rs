//! Course content model: modules, lesson groups and lessons.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Title used when a lesson arrives without one.
pub const UNTITLED: &str = "Sem título";

/// Title used when a group arrives without one.
pub const UNGROUPED: &str = "Sem Grupo";

/// Title used for an attachment without a title or name.
pub const DEFAULT_ATTACHMENT_TITLE: &str = "arquivo";

/// Kind of a journey node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    Cluster,
    Group,
    Other(String),
}

impl NodeKind {
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some("cluster") => NodeKind::Cluster,
            Some("group") => NodeKind::Group,
            Some(other) => NodeKind::Other(other.to_string()),
            None => NodeKind::Other(String::new()),
        }
    }

    /// Whether the node holds lesson groups.
    pub fn is_container(&self) -> bool {
        matches!(self, NodeKind::Cluster | NodeKind::Group)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Cluster => write!(f, "cluster"),
            NodeKind::Group => write!(f, "group"),
            NodeKind::Other(other) if other.is_empty() => write!(f, "unknown"),
            NodeKind::Other(other) => write!(f, "{}", other),
        }
    }
}

/// Course a module belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseRef {
    pub title: String,
    pub slug: Option<String>,
}

/// A module from the journey node list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleNode {
    pub title: String,
    pub kind: NodeKind,
    pub slug: Option<String>,
    pub parent_slug: Option<String>,
    pub course: Option<CourseRef>,
    /// Where this module's lesson groups live. Resolved once; `None` means skip.
    pub cluster_slug: Option<String>,
}

impl ModuleNode {
    /// Build a module from a raw journey node. Non-object values yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object()?;

        let course = value.get("course").filter(|c| c.is_object()).map(|c| CourseRef {
            title: str_field(c, "title").unwrap_or_else(|| "Sem Nome".to_string()),
            slug: str_field(c, "slug"),
        });

        let parent_slug = value
            .get("parent")
            .and_then(|p| str_field(p, "slug"))
            .or_else(|| str_field(value, "parentSlug"))
            .or_else(|| str_field(value, "parent_slug"));

        Some(Self {
            title: str_field(value, "title").unwrap_or_else(|| UNTITLED.to_string()),
            kind: NodeKind::from_raw(value.get("type").and_then(Value::as_str)),
            slug: str_field(value, "slug"),
            parent_slug,
            course,
            cluster_slug: None,
        })
    }

    /// Title of the course this module belongs to.
    pub fn course_title(&self) -> &str {
        self.course
            .as_ref()
            .map(|c| c.title.as_str())
            .unwrap_or("Sem Nome")
    }
}

/// A downloadable lesson attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub url: String,
    pub title: String,
}

impl Attachment {
    /// Read an attachment, accepting `file_url`, `fileUrl` or `url`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let url = str_field(value, "file_url")
            .or_else(|| str_field(value, "fileUrl"))
            .or_else(|| str_field(value, "url"))?;

        let title = str_field(value, "title")
            .or_else(|| str_field(value, "name"))
            .unwrap_or_else(|| DEFAULT_ATTACHMENT_TITLE.to_string());

        Some(Self { url, title })
    }
}

/// A single lesson, normalized from whichever shape the API returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonRecord {
    pub title: String,
    pub description: Option<String>,
    pub duration_seconds: Option<u64>,
    pub author_name: Option<String>,
    /// Content identifier or URL of the lesson video.
    pub resource: Option<String>,
    pub downloads: Vec<Attachment>,
    /// Title of the group this lesson was found in.
    pub group_title: String,
}

impl LessonRecord {
    /// Normalize a raw lesson object. Non-object values yield `None`.
    pub fn from_value(value: &Value, group_title: &str) -> Option<Self> {
        value.as_object()?;

        let duration_seconds = value.get("duration").and_then(|d| {
            d.as_u64()
                .or_else(|| d.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
                .or_else(|| d.as_str().and_then(|s| s.trim().parse().ok()))
        });

        let author_name = match value.get("author") {
            Some(Value::Object(_)) => value.get("author").and_then(|a| str_field(a, "name")),
            Some(Value::String(name)) if !name.trim().is_empty() => Some(name.clone()),
            _ => None,
        };

        let downloads = value
            .get("downloads")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Attachment::from_value).collect())
            .unwrap_or_default();

        Some(Self {
            title: str_field(value, "title").unwrap_or_else(|| UNTITLED.to_string()),
            description: str_field(value, "description"),
            duration_seconds,
            author_name,
            resource: str_field(value, "resource"),
            downloads,
            group_title: group_title.to_string(),
        })
    }

    /// A lesson known only by its video, as recovered from a rendered page.
    pub fn from_resource(title: &str, resource: &str) -> Self {
        Self {
            title: title.to_string(),
            description: None,
            duration_seconds: None,
            author_name: None,
            resource: Some(resource.to_string()),
            downloads: Vec::new(),
            group_title: title.to_string(),
        }
    }

    /// Identifier to hand to the video tool: the last path segment of a URL,
    /// or the resource itself.
    pub fn content_id(&self) -> Option<&str> {
        let resource = self.resource.as_deref()?.trim();
        let id = if resource.contains('/') {
            resource
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .unwrap_or(resource)
        } else {
            resource
        };
        (!id.is_empty()).then_some(id)
    }
}

/// An ordered set of lessons. Order drives the numeric filename prefixes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonGroup {
    pub title: String,
    pub lessons: Vec<LessonRecord>,
}

impl LessonGroup {
    pub fn lesson_count(groups: &[LessonGroup]) -> usize {
        groups.iter().map(|g| g.lessons.len()).sum()
    }
}

/// Read a non-empty string field.
pub(crate) fn str_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
