//! Mirroring the output tree to cloud storage through the sync tool.

use std::path::Path;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

use crate::config::{SyncConfig, SyncMode};

/// Runs the sync tool for a local folder. Failures are logged, never raised.
#[derive(Debug, Clone)]
pub struct SyncBridge {
    config: SyncConfig,
}

impl SyncBridge {
    pub fn new(config: SyncConfig) -> Self {
        Self { config }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// `remote:dest[/subpath]` target for a sync run.
    pub fn target(&self, remote_subpath: Option<&str>) -> String {
        let remote = self.config.remote.trim().trim_end_matches(':');
        let mut dest = self.config.dest_path.trim_matches('/').to_string();

        if let Some(sub) = remote_subpath.map(|s| s.trim_matches('/')).filter(|s| !s.is_empty()) {
            if !dest.is_empty() {
                dest.push('/');
            }
            dest.push_str(sub);
        }

        format!("{}:{}", remote, dest)
    }

    /// Arguments passed to the tool, not including the program name.
    pub fn build_args(&self, local: &Path, remote_subpath: Option<&str>) -> Vec<String> {
        let cfg = &self.config;
        let mut args = vec![
            cfg.mode.as_arg().to_string(),
            local.to_string_lossy().into_owned(),
            self.target(remote_subpath),
            "--transfers".to_string(),
            cfg.transfers.to_string(),
            "--checkers".to_string(),
            cfg.checkers.to_string(),
            "--drive-chunk-size".to_string(),
            cfg.chunk_size.clone(),
            "--retries".to_string(),
            cfg.retries.to_string(),
            "--low-level-retries".to_string(),
            cfg.low_level_retries.to_string(),
            "--fast-list".to_string(),
            "--stats".to_string(),
            cfg.stats.clone(),
        ];

        if let Some(bwlimit) = cfg.bwlimit.as_deref().filter(|b| !b.trim().is_empty()) {
            args.push("--bwlimit".to_string());
            args.push(bwlimit.trim().to_string());
        }
        if cfg.progress {
            args.push("--progress".to_string());
        }
        if cfg.mode == SyncMode::Move && cfg.delete_empty_dirs {
            args.push("--delete-empty-src-dirs".to_string());
        }
        args.extend(cfg.extra_args.iter().cloned());

        args
    }

    /// Mirror `local` to the configured remote. Does nothing when disabled.
    pub async fn sync(&self, local: &Path, remote_subpath: Option<&str>) {
        if !self.config.enabled {
            return;
        }
        if !local.exists() {
            tracing::warn!("Nothing to sync, {} does not exist", local.display());
            return;
        }

        let args = self.build_args(local, remote_subpath);
        tracing::info!(
            "Running {} {} -> {}",
            self.config.tool,
            self.config.mode,
            self.target(remote_subpath)
        );
        tracing::debug!("{} {}", self.config.tool, args.join(" "));

        let child = Command::new(&self.config.tool)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn();

        let mut child = match child {
            Ok(child) => child,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::error!("{} not found on PATH, skipping sync", self.config.tool);
                return;
            }
            Err(e) => {
                tracing::error!("Failed to start {}: {}", self.config.tool, e);
                return;
            }
        };

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        tokio::join!(relay(stdout, false), relay(stderr, true));

        match child.wait().await {
            Ok(status) if status.success() => {
                tracing::info!("Sync finished for {}", local.display())
            }
            Ok(status) => tracing::error!("{} exited with {}", self.config.tool, status),
            Err(e) => tracing::error!("Failed waiting for {}: {}", self.config.tool, e),
        }
    }
}

/// Forward a child stream to the log, one line at a time.
async fn relay<R: AsyncRead + Unpin>(stream: Option<R>, is_stderr: bool) {
    let Some(stream) = stream else {
        return;
    };

    let mut lines = BufReader::new(stream).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => {}
            Ok(Some(line)) if is_stderr => tracing::warn!("[sync] {}", line),
            Ok(Some(line)) => tracing::info!("[sync] {}", line),
            Ok(None) => break,
            Err(e) => {
                tracing::debug!("Stopped reading sync output: {}", e);
                break;
            }
        }
    }
}
