//! Filesystem module.
//!
//! Provides:
//! - Output tree layout
//! - Folder and file name sanitizing

pub mod naming;
pub mod paths;

pub use naming::{component_or, numbered_name, sanitize_path_component, sanitize_string};
pub use paths::{ensure_dir, item_folder, module_folder, LessonPaths};
