//! Run summaries.

use std::path::Path;

use console::style;

use crate::download::ItemSummary;

/// Print a finished item report and where it was saved.
pub fn print_report(text: &str, path: &Path) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", text);
    println!("{}", style("═".repeat(50)).dim());
    println!("Report saved to: {}", path.display());
}

/// Print counters for one downloaded item.
pub fn print_item_summary(summary: &ItemSummary) {
    println!();
    println!("{}", style(format!("Summary for {}:", summary.title)).bold());
    println!("  Folder:           {}", summary.folder.display());
    println!("  Modules selected: {}", summary.modules_selected);
    println!("  Modules skipped:  {}", summary.modules_skipped);
    println!("  Groups processed: {}", summary.groups_processed);
    println!("  Lessons ok:       {}", style(summary.lessons_ok).green());
    if summary.lessons_failed > 0 {
        println!("  Lessons failed:   {}", style(summary.lessons_failed).red());
    } else {
        println!("  Lessons failed:   0");
    }
}

/// Print the closing line for the whole run.
pub fn print_run_summary(items_done: usize, items_failed: usize) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!(
        "Items downloaded: {}, failed: {}",
        style(items_done).green(),
        if items_failed > 0 {
            style(items_failed).red()
        } else {
            style(items_failed).dim()
        }
    );
    println!("{}", style("═".repeat(50)).dim());
}
