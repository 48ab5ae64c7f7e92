//! Lesson container shapes returned by the node endpoints.
//!
//! The API answers a node lookup with one of three layouts:
//!
//! - cluster: `{"cluster": {"groups": [{"title", "lessons": [{"last": {..}}]}]}}`
//! - group:   `{"group": {"title", "lessons": [{"last": {..}}]}}`
//! - lesson:  `{"lesson": {"last": {..}}}` or `{"lesson": {..}}`
//!
//! Lesson slots carry several versions; only `last` is kept.

use serde_json::Value;

use crate::content::model::{str_field, LessonGroup, LessonRecord, UNGROUPED};

/// A group as it appears on the wire, lessons still raw.
#[derive(Debug, Clone)]
pub struct RawGroup {
    pub title: String,
    pub lessons: Vec<Value>,
}

/// The three lesson container layouts.
#[derive(Debug, Clone)]
pub enum NodeContainer {
    Cluster { groups: Vec<RawGroup> },
    Group(RawGroup),
    SingleLesson { title: Option<String>, lesson: Value },
}

impl NodeContainer {
    /// Detect the container layout. Returns `None` for anything else,
    /// including `{}` and containers that are present but empty.
    pub fn parse(value: &Value) -> Option<Self> {
        if let Some(items) = value.as_array() {
            return items.iter().find_map(Self::parse);
        }

        if let Some(cluster) = truthy(value.get("cluster")) {
            let groups = cluster
                .get("groups")
                .and_then(Value::as_array)
                .map(|groups| groups.iter().filter_map(RawGroup::from_value).collect())
                .unwrap_or_default();
            return Some(NodeContainer::Cluster { groups });
        }

        if let Some(group) = truthy(value.get("group")) {
            return RawGroup::from_value(group).map(NodeContainer::Group);
        }

        if let Some(lesson) = truthy(value.get("lesson")) {
            let lesson = truthy(lesson.get("last")).unwrap_or(lesson);
            return Some(NodeContainer::SingleLesson {
                title: str_field(value, "title"),
                lesson: lesson.clone(),
            });
        }

        None
    }

    /// Normalize into lesson groups, dropping groups without lessons.
    pub fn into_groups(self, fallback_title: &str) -> Vec<LessonGroup> {
        match self {
            NodeContainer::Cluster { groups } => groups
                .into_iter()
                .filter_map(RawGroup::into_lesson_group)
                .collect(),
            NodeContainer::Group(group) => group.into_lesson_group().into_iter().collect(),
            NodeContainer::SingleLesson { title, lesson } => {
                let group_title = title
                    .or_else(|| str_field(&lesson, "title"))
                    .unwrap_or_else(|| fallback_title.to_string());

                LessonRecord::from_value(&lesson, &group_title)
                    .map(|record| LessonGroup {
                        title: group_title,
                        lessons: vec![record],
                    })
                    .into_iter()
                    .collect()
            }
        }
    }
}

impl RawGroup {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_object()?;
        Some(Self {
            title: str_field(value, "title").unwrap_or_else(|| UNGROUPED.to_string()),
            lessons: value
                .get("lessons")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
        })
    }

    fn into_lesson_group(self) -> Option<LessonGroup> {
        let lessons: Vec<LessonRecord> = self
            .lessons
            .iter()
            .filter_map(|slot| truthy(slot.get("last")))
            .filter_map(|last| LessonRecord::from_value(last, &self.title))
            .collect();

        if lessons.is_empty() {
            tracing::debug!("Group '{}' has no lessons, skipping", self.title);
            return None;
        }

        Some(LessonGroup {
            title: self.title,
            lessons,
        })
    }
}

/// Parse any container layout into non-empty lesson groups.
pub fn parse_container(value: &Value, fallback_title: &str) -> Option<Vec<LessonGroup>> {
    let groups = NodeContainer::parse(value)?.into_groups(fallback_title);
    (!groups.is_empty()).then_some(groups)
}

/// A value that is present and not null, false, empty or zero.
fn truthy(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
    })
}
