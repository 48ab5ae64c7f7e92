//! Console output utilities.

use console::style;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     Rocketseat Downloader                             ║
║     Courses, lessons and attachments, archived        ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print configuration summary.
pub fn print_config_summary(output_root: &str, session_file: &str, sync_target: Option<&str>) {
    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Output:  {}", output_root);
    println!("  Session: {}", session_file);
    match sync_target {
        Some(target) => println!("  Sync:    {}", target),
        None => println!("  Sync:    disabled"),
    }
    println!();
}

/// Print the tools that are missing and where to get them.
pub fn print_missing_tools(missing: &[String], hint: impl Fn(&str) -> Option<&'static str>) {
    print_error("Required tools were not found on PATH:");
    for tool in missing {
        match hint(tool.as_str()) {
            Some(url) => eprintln!("  - {} ({})", style(tool).bold(), url),
            None => eprintln!("  - {}", style(tool).bold()),
        }
    }
}
