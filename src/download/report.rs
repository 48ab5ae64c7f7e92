//! Per-item download report.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeDelta};

use crate::error::Result;

/// One processed lesson.
#[derive(Debug, Clone)]
pub struct ReportEntry {
    pub module: String,
    pub lesson: String,
    pub error: Option<String>,
    pub at: DateTime<Local>,
}

/// Accumulates lesson outcomes for one catalog item.
///
/// Lifecycle is `start`, any number of `add_*`, then `finish`.
#[derive(Debug, Default)]
pub struct RunReport {
    pub started_at: Option<DateTime<Local>>,
    pub finished_at: Option<DateTime<Local>>,
    pub successes: Vec<ReportEntry>,
    pub failures: Vec<ReportEntry>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the start of the run.
    pub fn start(&mut self) {
        let now = Local::now();
        self.started_at = Some(now);
        tracing::info!("Download started at {}", now.format("%d/%m/%Y %H:%M:%S"));
    }

    pub fn add_success(&mut self, module: &str, lesson: &str) {
        tracing::info!("Lesson done: {} - {}", module, lesson);
        self.successes.push(ReportEntry {
            module: module.to_string(),
            lesson: lesson.to_string(),
            error: None,
            at: Local::now(),
        });
    }

    pub fn add_failure(&mut self, module: &str, lesson: &str, error: impl ToString) {
        let error = error.to_string();
        tracing::error!("Lesson failed: {} - {}: {}", module, lesson, error);
        self.failures.push(ReportEntry {
            module: module.to_string(),
            lesson: lesson.to_string(),
            error: Some(error),
            at: Local::now(),
        });
    }

    pub fn total(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    /// Render the report text. Labels stay in Portuguese to match the archive.
    pub fn render(&self) -> String {
        let finished = self.finished_at.unwrap_or_else(Local::now);
        let elapsed = self
            .started_at
            .map(|start| finished - start)
            .unwrap_or_else(TimeDelta::zero);

        let mut lines = vec![
            "=== RELATÓRIO DE DOWNLOAD ===".to_string(),
            format!("Data: {}", finished.format("%d/%m/%Y %H:%M:%S")),
            format!("Duração total: {}", format_elapsed(elapsed)),
            format!("Total de aulas: {}", self.total()),
            format!("Aulas baixadas com sucesso: {}", self.successes.len()),
            format!("Aulas com erro: {}", self.failures.len()),
            String::new(),
            "=== AULAS BAIXADAS COM SUCESSO ===".to_string(),
        ];

        for entry in &self.successes {
            lines.push(format!("- Módulo: {}", entry.module));
            lines.push(format!("  Aula: {}", entry.lesson));
            lines.push(format!("  Horário: {}", entry.at.format("%H:%M:%S")));
        }

        if !self.failures.is_empty() {
            lines.push(String::new());
            lines.push("=== AULAS COM ERRO ===".to_string());
            for entry in &self.failures {
                lines.push(format!("- Módulo: {}", entry.module));
                lines.push(format!("  Aula: {}", entry.lesson));
                lines.push(format!("  Erro: {}", entry.error.as_deref().unwrap_or_default()));
                lines.push(format!("  Horário: {}", entry.at.format("%H:%M:%S")));
            }
        }

        lines.join("\n")
    }

    /// Close the report and write it under `reports_dir`.
    ///
    /// Returns the path of the written file and the rendered text.
    pub fn finish(&mut self, reports_dir: &Path) -> Result<(PathBuf, String)> {
        let finished = Local::now();
        self.finished_at = Some(finished);

        let text = self.render();
        fs::create_dir_all(reports_dir)?;
        let path = reports_dir.join(format!(
            "relatorio_{}.txt",
            finished.format("%Y%m%d_%H%M%S")
        ));
        fs::write(&path, &text)?;

        tracing::info!("Report saved to {}", path.display());
        Ok((path, text))
    }
}

/// `H:MM:SS` for a non-negative duration.
fn format_elapsed(elapsed: TimeDelta) -> String {
    let secs = elapsed.num_seconds().max(0);
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(TimeDelta::seconds(0)), "0:00:00");
        assert_eq!(format_elapsed(TimeDelta::seconds(3725)), "1:02:05");
        assert_eq!(format_elapsed(TimeDelta::seconds(-5)), "0:00:00");
    }

    #[test]
    fn test_render_counts_and_sections() {
        let mut report = RunReport::new();
        report.start();
        report.add_success("Rotas", "Introdução");
        report.add_success("Rotas", "Parâmetros");
        report.add_failure("Deploy", "Docker", "HTTP 500 from https://x");

        let text = report.render();

        assert!(text.starts_with("=== RELATÓRIO DE DOWNLOAD ==="));
        assert!(text.contains("Total de aulas: 3"));
        assert!(text.contains("Aulas baixadas com sucesso: 2"));
        assert!(text.contains("Aulas com erro: 1"));
        assert!(text.contains("- Módulo: Rotas\n  Aula: Parâmetros"));
        assert!(text.contains("=== AULAS COM ERRO ===\n- Módulo: Deploy\n  Aula: Docker\n  Erro: HTTP 500 from https://x"));
    }

    #[test]
    fn test_render_without_failures_omits_section() {
        let mut report = RunReport::new();
        report.start();
        report.add_success("G", "L");
        assert!(!report.render().contains("AULAS COM ERRO"));
    }

    #[test]
    fn test_finish_writes_file_even_when_empty() {
        let dir = tempdir().unwrap();
        let reports = dir.path().join("relatorios");

        let mut report = RunReport::new();
        report.start();
        let (path, text) = report.finish(&reports).unwrap();

        assert!(report.finished_at.is_some());
        assert!(path.starts_with(&reports));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("relatorio_") && name.ends_with(".txt"));
        assert_eq!(fs::read_to_string(&path).unwrap(), text);
        assert!(text.contains("Total de aulas: 0"));
    }
}
