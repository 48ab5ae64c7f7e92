//! Output module for console output and progress.
//!
//! Provides:
//! - Colored console output
//! - Spinners for network waits
//! - Item reports and run summaries

pub mod console;
pub mod progress;
pub mod stats;

pub use console::{
    print_banner, print_config_summary, print_error, print_info, print_missing_tools,
    print_success, print_warning,
};
pub use progress::create_spinner;
pub use stats::{print_item_summary, print_report, print_run_summary};
