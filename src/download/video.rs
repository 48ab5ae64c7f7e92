//! Video retrieval through the external media tool.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use crate::config::MediaConfig;

/// Maximum characters of tool stdout kept in the log on failure.
const STDOUT_LOG_LIMIT: usize = 2000;

/// Runs the video tool against the CDN playlist of a content id.
#[derive(Debug, Clone)]
pub struct MediaFetcher {
    config: MediaConfig,
}

impl MediaFetcher {
    pub fn new(config: MediaConfig) -> Self {
        Self { config }
    }

    /// HLS playlist URL for a content id.
    pub fn playlist_url(&self, content_id: &str) -> String {
        format!("https://{}/{}/playlist.m3u8", self.config.cdn_domain, content_id)
    }

    /// Arguments passed to the tool, not including the program name.
    pub fn build_args(&self, content_id: &str, destination: &Path) -> Vec<String> {
        vec![
            self.playlist_url(content_id),
            "--merge-output-format".to_string(),
            "mp4".to_string(),
            "--concurrent-fragments".to_string(),
            self.config.concurrent_fragments.to_string(),
            "--add-header".to_string(),
            format!("Referer: {}", self.config.referer),
            "--add-header".to_string(),
            format!("Origin: {}", self.config.origin),
            "-o".to_string(),
            destination.to_string_lossy().into_owned(),
        ]
    }

    /// Download a video to `destination`.
    ///
    /// Returns `true` if the file already exists or the tool succeeded.
    /// Failures are logged, never raised.
    pub async fn fetch(&self, content_id: &str, destination: &Path) -> bool {
        if destination.exists() {
            tracing::info!("Video already exists: {}", destination.display());
            return true;
        }

        tracing::info!("Downloading video {} -> {}", content_id, destination.display());

        let output = Command::new(&self.config.tool)
            .args(self.build_args(content_id, destination))
            .stdin(Stdio::null())
            .output()
            .await;

        let output = match output {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::error!("{} not found on PATH", self.config.tool);
                return false;
            }
            Err(e) => {
                tracing::error!("Failed to run {}: {}", self.config.tool, e);
                return false;
            }
        };

        if output.status.success() {
            tracing::info!("Video saved: {}", destination.display());
            return true;
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stdout: String = stdout.chars().take(STDOUT_LOG_LIMIT).collect();

        tracing::error!(
            "{} exited with {} for {}",
            self.config.tool,
            output.status,
            content_id
        );
        if !stderr.trim().is_empty() {
            tracing::error!("stderr: {}", stderr.trim());
        }
        if !stdout.trim().is_empty() {
            tracing::debug!("stdout: {}", stdout.trim());
        }

        false
    }
}
