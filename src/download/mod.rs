//! Download module for course archiving.
//!
//! This module provides:
//! - The per-item batch driver
//! - Lesson archiving (metadata, video, attachments)
//! - Video retrieval through the external media tool
//! - Per-item run reports

pub mod archive;
pub mod course;
pub mod report;
pub mod video;

pub use archive::LessonArchiver;
pub use course::{CourseDownloader, ItemSummary};
pub use report::{ReportEntry, RunReport};
pub use video::MediaFetcher;
