//! Writing one lesson to disk: metadata, video and attachments.

use std::fs;
use std::path::{Path, PathBuf};

use url::Url;

use crate::api::AttachmentSource;
use crate::content::model::{Attachment, LessonRecord, DEFAULT_ATTACHMENT_TITLE};
use crate::download::report::RunReport;
use crate::download::video::MediaFetcher;
use crate::error::Result;
use crate::fs::naming::component_or;
use crate::fs::paths::{ensure_dir, LessonPaths};

/// Archives lessons into a module folder.
pub struct LessonArchiver<'a> {
    attachments: &'a dyn AttachmentSource,
    video: &'a MediaFetcher,
}

impl<'a> LessonArchiver<'a> {
    pub fn new(attachments: &'a dyn AttachmentSource, video: &'a MediaFetcher) -> Self {
        Self { attachments, video }
    }

    /// Archive one lesson and record the outcome in `report`.
    ///
    /// A lesson without a video resource still counts as a success. Errors
    /// become report failures and never propagate.
    pub async fn archive(
        &self,
        lesson: &LessonRecord,
        module_folder: &Path,
        group_index: usize,
        lesson_index: usize,
        report: &mut RunReport,
    ) {
        tracing::info!(
            "Lesson {}.{}: {} (group: {})",
            group_index,
            lesson_index,
            lesson.title,
            lesson.group_title
        );

        let paths = LessonPaths::new(
            module_folder,
            group_index,
            &lesson.group_title,
            lesson_index,
            &lesson.title,
        );

        match self.archive_inner(lesson, &paths).await {
            Ok(()) => report.add_success(&lesson.group_title, &lesson.title),
            Err(e) => report.add_failure(&lesson.group_title, &lesson.title, e),
        }
    }

    async fn archive_inner(&self, lesson: &LessonRecord, paths: &LessonPaths) -> Result<()> {
        ensure_dir(&paths.group_dir)?;
        fs::write(&paths.metadata, render_metadata(lesson))?;

        match lesson.content_id() {
            Some(content_id) => {
                if !self.video.fetch(content_id, &paths.video).await {
                    tracing::warn!("Video for '{}' could not be downloaded", lesson.title);
                }
            }
            None => tracing::info!("Lesson '{}' has no video resource", lesson.title),
        }

        if !lesson.downloads.is_empty() {
            ensure_dir(&paths.attachments_dir)?;
            for attachment in &lesson.downloads {
                if let Err(e) = self.save_attachment(attachment, &paths.attachments_dir).await {
                    tracing::warn!("Failed to download attachment '{}': {}", attachment.title, e);
                }
            }
        }

        Ok(())
    }

    async fn save_attachment(&self, attachment: &Attachment, dir: &Path) -> Result<PathBuf> {
        tracing::info!("Downloading attachment: {}", attachment.title);

        let file = self.attachments.download(&attachment.url).await?;
        let extension = url_extension(&attachment.url)
            .or_else(|| file.content_type.as_deref().and_then(mime_extension))
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default();

        let name = component_or(&attachment.title, DEFAULT_ATTACHMENT_TITLE);
        let path = dir.join(format!("{}{}", name, extension));
        fs::write(&path, &file.bytes)?;

        tracing::info!("Attachment saved: {}", path.display());
        Ok(path)
    }
}

/// Metadata text for a lesson. Labels are in Portuguese, like the course.
pub fn render_metadata(lesson: &LessonRecord) -> String {
    let mut text = format!("Grupo: {}\nAula: {}\n\n", lesson.group_title, lesson.title);

    if let Some(description) = &lesson.description {
        text.push_str(&format!("Descrição:\n{}\n\n", description));
    }
    if let Some(duration) = lesson.duration_seconds {
        text.push_str(&format!("Duração: {}min {}s\n", duration / 60, duration % 60));
    }
    if let Some(author) = &lesson.author_name {
        text.push_str(&format!("Autor: {}\n", author));
    }

    text
}

/// Extension of the last path segment of a URL, without the dot.
fn url_extension(raw: &str) -> Option<String> {
    let path = Url::parse(raw)
        .map(|url| url.path().to_string())
        .unwrap_or_else(|_| raw.split(['?', '#']).next().unwrap_or_default().to_string());

    let name = path.rsplit('/').next()?;
    let (stem, ext) = name.rsplit_once('.')?;
    let valid = !stem.is_empty()
        && !ext.is_empty()
        && ext.len() <= 8
        && ext.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then(|| ext.to_ascii_lowercase())
}

/// Preferred extension for a `Content-Type` value.
fn mime_extension(content_type: &str) -> Option<String> {
    let essence = content_type.split(';').next()?.trim();
    mime_guess::get_mime_extensions_str(essence)
        .and_then(|exts| exts.first())
        .map(|ext| ext.to_string())
}
