//! Batch driver for one catalog item.

use std::path::PathBuf;

use crate::api::{AttachmentSource, CatalogItem, ContentSource};
use crate::config::OutputConfig;
use crate::content::{LessonGroup, LessonResolver, ModuleNode, ModuleResolver};
use crate::download::archive::LessonArchiver;
use crate::download::report::RunReport;
use crate::download::video::MediaFetcher;
use crate::error::Result;
use crate::fs::paths::{item_folder, module_folder};
use crate::output::print_report;

/// Counters for one downloaded item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemSummary {
    pub title: String,
    pub folder: PathBuf,
    pub modules_selected: usize,
    pub modules_skipped: usize,
    pub groups_processed: usize,
    pub lessons_ok: usize,
    pub lessons_failed: usize,
}

/// Everything needed to download catalog items.
pub struct CourseDownloader<'a> {
    content: &'a dyn ContentSource,
    attachments: &'a dyn AttachmentSource,
    video: &'a MediaFetcher,
    output: &'a OutputConfig,
}

impl<'a> CourseDownloader<'a> {
    pub fn new(
        content: &'a dyn ContentSource,
        attachments: &'a dyn AttachmentSource,
        video: &'a MediaFetcher,
        output: &'a OutputConfig,
    ) -> Self {
        Self {
            content,
            attachments,
            video,
            output,
        }
    }

    /// Download one catalog item.
    ///
    /// `choose_modules` receives the resolved module list and returns the
    /// zero-based indices to download. The item report is always finished,
    /// also when module listing or selection fails.
    pub async fn download_item<F>(&self, item: &CatalogItem, choose_modules: F) -> Result<ItemSummary>
    where
        F: FnOnce(&[ModuleNode]) -> Result<Vec<usize>>,
    {
        tracing::info!("Downloading {}: {}", item.kind, item.title);

        let mut report = RunReport::new();
        report.start();

        let mut summary = ItemSummary {
            title: item.title.clone(),
            folder: item_folder(&self.output.root, &item.title),
            ..ItemSummary::default()
        };

        let result = self
            .download_modules(item, choose_modules, &mut report, &mut summary)
            .await;

        summary.lessons_ok = report.successes.len();
        summary.lessons_failed = report.failures.len();

        match report.finish(&self.output.reports_dir) {
            Ok((path, text)) => print_report(&text, &path),
            Err(e) => tracing::error!("Failed to write report for {}: {}", item.title, e),
        }

        result.map(|()| summary)
    }

    async fn download_modules<F>(
        &self,
        item: &CatalogItem,
        choose_modules: F,
        report: &mut RunReport,
        summary: &mut ItemSummary,
    ) -> Result<()>
    where
        F: FnOnce(&[ModuleNode]) -> Result<Vec<usize>>,
    {
        let modules = ModuleResolver::new(self.content).list_modules(&item.slug).await?;
        let selected = choose_modules(&modules)?;
        summary.modules_selected = selected.len();

        let resolver = LessonResolver::new(self.content, Some(self.output.logs_dir.clone()));
        let archiver = LessonArchiver::new(self.attachments, self.video);

        for module in selected.iter().filter_map(|&i| modules.get(i)) {
            tracing::info!("Module: {} (course: {})", module.title, module.course_title());

            let Some(cluster_slug) = &module.cluster_slug else {
                tracing::warn!("Module '{}' has no cluster, skipping", module.title);
                summary.modules_skipped += 1;
                continue;
            };

            let groups = resolver
                .resolve(cluster_slug, module.parent_slug.as_deref())
                .await;
            if groups.is_empty() {
                tracing::warn!("No groups found for module '{}', skipping", module.title);
                summary.modules_skipped += 1;
                continue;
            }

            let folder = module_folder(&summary.folder, module.course_title(), &module.title);
            self.archive_groups(&archiver, &groups, &folder, report).await;
            summary.groups_processed += groups.len();
        }

        Ok(())
    }

    async fn archive_groups(
        &self,
        archiver: &LessonArchiver<'_>,
        groups: &[LessonGroup],
        folder: &std::path::Path,
        report: &mut RunReport,
    ) {
        for (group_index, group) in groups.iter().enumerate() {
            tracing::info!("Group {}: {}", group_index + 1, group.title);
            for (lesson_index, lesson) in group.lessons.iter().enumerate() {
                archiver
                    .archive(lesson, folder, group_index + 1, lesson_index + 1, report)
                    .await;
            }
        }
    }
}
