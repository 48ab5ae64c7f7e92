//! Startup check for the external tools the downloader shells out to.

use crate::error::{Error, Result};

/// Tools that must be on `PATH` before anything is downloaded.
pub const REQUIRED_TOOLS: &[&str] = &["yt-dlp", "ffmpeg"];

/// Where to get each required tool.
pub fn install_hint(tool: &str) -> Option<&'static str> {
    match tool {
        "yt-dlp" => Some("https://github.com/yt-dlp/yt-dlp#installation"),
        "ffmpeg" => Some("https://ffmpeg.org/download.html"),
        _ => None,
    }
}

/// Tools from `tools` that cannot be found on `PATH`.
pub fn missing_tools(tools: &[&str]) -> Vec<String> {
    tools
        .iter()
        .filter(|tool| which::which(tool).is_err())
        .map(|tool| tool.to_string())
        .collect()
}

/// Fail with [`Error::MissingDependencies`] if any of `tools` is missing.
pub fn check_dependencies(tools: &[&str]) -> Result<()> {
    let missing = missing_tools(tools);
    if missing.is_empty() {
        tracing::debug!("Found required tools: {}", tools.join(", "));
        Ok(())
    } else {
        Err(Error::MissingDependencies(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tool_reported() {
        let err = check_dependencies(&["definitely-not-a-real-tool-7f3a"]).unwrap_err();
        match err {
            Error::MissingDependencies(missing) => {
                assert_eq!(missing, vec!["definitely-not-a-real-tool-7f3a".to_string()])
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_list_passes() {
        assert!(check_dependencies(&[]).is_ok());
    }

    #[test]
    fn test_install_hints() {
        for tool in REQUIRED_TOOLS {
            assert!(install_hint(tool).is_some());
        }
        assert!(install_hint("rclone").is_none());
    }
}
