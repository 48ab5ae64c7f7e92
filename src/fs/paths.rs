//! Output tree layout.
//!
//! `<root>/<Item>/<Course>/<Module>/<NN>. <Group>/<NN>. <Lesson>.{mp4,txt}`

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::fs::naming::{component_or, numbered_name, sanitize_string};

/// Fallback folder name for titles that sanitize to nothing.
const UNNAMED: &str = "sem-nome";

/// Folder holding everything downloaded for one catalog item.
pub fn item_folder(root: &Path, item_title: &str) -> PathBuf {
    root.join(component_or(item_title, UNNAMED))
}

/// Folder for one module of an item.
pub fn module_folder(item_folder: &Path, course_title: &str, module_title: &str) -> PathBuf {
    item_folder
        .join(component_or(course_title, UNNAMED))
        .join(component_or(module_title, UNNAMED))
}

/// Files written for one lesson, all derived from its numbered title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonPaths {
    pub group_dir: PathBuf,
    pub metadata: PathBuf,
    pub video: PathBuf,
    pub attachments_dir: PathBuf,
}

impl LessonPaths {
    pub fn new(
        module_folder: &Path,
        group_index: usize,
        group_title: &str,
        lesson_index: usize,
        lesson_title: &str,
    ) -> Self {
        let group_dir =
            module_folder.join(numbered_name(group_index, &sanitize_string(group_title)));
        let stem = numbered_name(lesson_index, &sanitize_string(lesson_title));

        Self {
            metadata: group_dir.join(format!("{}.txt", stem)),
            video: group_dir.join(format!("{}.mp4", stem)),
            attachments_dir: group_dir.join(format!("{}_arquivos", stem)),
            group_dir,
        }
    }
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_folder() {
        let item = item_folder(Path::new("Cursos"), "Formação: Node.js");
        assert_eq!(item, PathBuf::from("Cursos/Formação Node.js"));

        let module = module_folder(&item, "Node.js", "Fundamentos/Intro");
        assert_eq!(
            module,
            PathBuf::from("Cursos/Formação Node.js/Node.js/FundamentosIntro")
        );
    }

    #[test]
    fn test_empty_titles_fall_back() {
        let module = module_folder(Path::new("root"), "???", "");
        assert_eq!(module, PathBuf::from("root/sem-nome/sem-nome"));
    }

    #[test]
    fn test_lesson_paths() {
        let paths = LessonPaths::new(Path::new("m"), 2, "Rotas", 7, "Parâmetros: query");

        assert_eq!(paths.group_dir, PathBuf::from("m/02. Rotas"));
        assert_eq!(paths.metadata, PathBuf::from("m/02. Rotas/07. Parâmetros query.txt"));
        assert_eq!(paths.video, PathBuf::from("m/02. Rotas/07. Parâmetros query.mp4"));
        assert_eq!(
            paths.attachments_dir,
            PathBuf::from("m/02. Rotas/07. Parâmetros query_arquivos")
        );
    }

    #[test]
    fn test_ensure_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        ensure_dir(&nested).unwrap();
    }
}
