//! Course content discovery.
//!
//! This module provides:
//! - The content model (modules, groups, lessons)
//! - Parsing of the lesson container layouts
//! - Module and lesson resolution over a [`ContentSource`](crate::api::ContentSource)
//! - HTML pattern extraction used by the fallbacks

pub mod lessons;
pub mod model;
pub mod modules;
pub mod scrape;
pub mod shapes;

pub use lessons::{debug_artifact_path, default_strategies, LessonResolver, LessonStrategy};
pub use model::{Attachment, CourseRef, LessonGroup, LessonRecord, ModuleNode, NodeKind};
pub use modules::ModuleResolver;
pub use scrape::{extract_content_id, ClassroomLinkScanner, IdSource};
pub use shapes::{parse_container, NodeContainer};
