//! Configuration structures and loading logic.

use crate::config::modes::{SyncMode, SyncScope};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the persisted session file inside the session directory.
pub const SESSION_FILE_NAME: &str = ".session.json";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub account: AccountConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub media: MediaConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub sync: SyncConfig,
}

/// Account credentials, only needed when no session is stored yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Login email.
    #[serde(default)]
    pub email: Option<String>,

    /// Login password.
    #[serde(default)]
    pub password: Option<String>,
}

/// Session persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Directory holding the session file.
    #[serde(default = "default_session_dir")]
    pub directory: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            directory: default_session_dir(),
        }
    }
}

/// HTTP transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,

    /// Base URL of the JSON API.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Base URL of the web application (HTML pages, Referer).
    #[serde(default = "default_web_base")]
    pub web_base: String,

    /// Browser user agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            api_base: default_api_base(),
            web_base: default_web_base(),
            user_agent: default_user_agent(),
        }
    }
}

/// External video tool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Video tool executable.
    #[serde(default = "default_video_tool")]
    pub tool: String,

    /// CDN host serving the HLS playlists.
    #[serde(default = "default_cdn_domain")]
    pub cdn_domain: String,

    /// Referer header the CDN expects.
    #[serde(default = "default_referer")]
    pub referer: String,

    /// Origin header the CDN expects.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Number of HLS fragments fetched concurrently by the tool.
    #[serde(default = "default_fragments")]
    pub concurrent_fragments: u32,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            tool: default_video_tool(),
            cdn_domain: default_cdn_domain(),
            referer: default_referer(),
            origin: default_origin(),
            concurrent_fragments: default_fragments(),
        }
    }
}

/// Output folder layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Root folder for archived courses.
    #[serde(default = "default_output_root")]
    pub root: PathBuf,

    /// Folder for per-node JSON debug dumps.
    #[serde(default = "default_logs_dir")]
    pub logs_dir: PathBuf,

    /// Folder for run reports.
    #[serde(default = "default_reports_dir")]
    pub reports_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: default_output_root(),
            logs_dir: default_logs_dir(),
            reports_dir: default_reports_dir(),
        }
    }
}

/// Cloud sync (rclone) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Whether to mirror the archive after downloading.
    #[serde(default)]
    pub enabled: bool,

    /// Sync tool executable.
    #[serde(default = "default_sync_tool")]
    pub tool: String,

    /// Configured remote name (without the trailing colon).
    #[serde(default)]
    pub remote: String,

    /// Destination folder on the remote.
    #[serde(default = "default_remote_path")]
    pub dest_path: String,

    #[serde(default)]
    pub mode: SyncMode,

    #[serde(default)]
    pub scope: SyncScope,

    #[serde(default = "default_transfers")]
    pub transfers: u32,

    #[serde(default = "default_checkers")]
    pub checkers: u32,

    /// Value for `--drive-chunk-size` (e.g. `64M`).
    #[serde(default = "default_chunk_size")]
    pub chunk_size: String,

    #[serde(default = "default_retries")]
    pub retries: u32,

    #[serde(default = "default_low_level_retries")]
    pub low_level_retries: u32,

    /// Interval for `--stats` (e.g. `30s`).
    #[serde(default = "default_stats")]
    pub stats: String,

    /// Optional `--bwlimit` value.
    #[serde(default)]
    pub bwlimit: Option<String>,

    /// Extra raw arguments appended to the command line.
    #[serde(default)]
    pub extra_args: Vec<String>,

    /// Pass `--progress` to the tool.
    #[serde(default)]
    pub progress: bool,

    /// Remove emptied source folders after a move.
    #[serde(default)]
    pub delete_empty_dirs: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            tool: default_sync_tool(),
            remote: String::new(),
            dest_path: default_remote_path(),
            mode: SyncMode::default(),
            scope: SyncScope::default(),
            transfers: default_transfers(),
            checkers: default_checkers(),
            chunk_size: default_chunk_size(),
            retries: default_retries(),
            low_level_retries: default_low_level_retries(),
            stats: default_stats(),
            bwlimit: None,
            extra_args: Vec::new(),
            progress: false,
            delete_empty_dirs: false,
        }
    }
}

fn default_session_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_timeout() -> f64 {
    30.0
}

fn default_api_base() -> String {
    "https://skylab-api.rocketseat.com.br".to_string()
}

fn default_web_base() -> String {
    "https://app.rocketseat.com.br".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36".to_string()
}

fn default_video_tool() -> String {
    "yt-dlp".to_string()
}

fn default_cdn_domain() -> String {
    "vz-dc851587-83d.b-cdn.net".to_string()
}

fn default_referer() -> String {
    "https://iframe.mediadelivery.net/".to_string()
}

fn default_origin() -> String {
    "https://iframe.mediadelivery.net".to_string()
}

fn default_fragments() -> u32 {
    10
}

fn default_output_root() -> PathBuf {
    PathBuf::from("Cursos")
}

fn default_logs_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_reports_dir() -> PathBuf {
    PathBuf::from("relatorios")
}

fn default_sync_tool() -> String {
    "rclone".to_string()
}

fn default_remote_path() -> String {
    "Cursos".to_string()
}

fn default_transfers() -> u32 {
    4
}

fn default_checkers() -> u32 {
    8
}

fn default_chunk_size() -> String {
    "64M".to_string()
}

fn default_retries() -> u32 {
    3
}

fn default_low_level_retries() -> u32 {
    10
}

fn default_stats() -> String {
    "30s".to_string()
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Path of the persisted session file.
    pub fn session_path(&self) -> PathBuf {
        self.session.directory.join(SESSION_FILE_NAME)
    }

    /// HTTP request timeout. Values no `Duration` can hold fall back to the default.
    pub fn http_timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.http.timeout_seconds.max(0.0))
            .unwrap_or_else(|_| Duration::from_secs_f64(default_timeout()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.session_path(), PathBuf::from("./.session.json"));
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
        assert_eq!(config.media.tool, "yt-dlp");
        assert_eq!(config.media.concurrent_fragments, 10);
        assert_eq!(config.output.root, PathBuf::from("Cursos"));
        assert!(!config.sync.enabled);
        assert_eq!(config.sync.mode, SyncMode::Sync);
    }

    #[test]
    fn test_oversized_timeout_does_not_panic() {
        let mut config = Config::default();
        config.http.timeout_seconds = 1e20;
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config: Config = toml::from_str(
            r#"
            [http]
            timeout_seconds = 12.5

            [media]
            cdn_domain = "cdn.example.net"

            [sync]
            enabled = true
            remote = "gdrive"
            mode = "move"
            scope = "all"
            extra_args = ["--dry-run"]
            "#,
        )
        .unwrap();

        assert_eq!(config.http_timeout(), Duration::from_secs_f64(12.5));
        assert_eq!(config.media.cdn_domain, "cdn.example.net");
        assert_eq!(config.media.tool, "yt-dlp");
        assert!(config.sync.enabled);
        assert_eq!(config.sync.mode, SyncMode::Move);
        assert_eq!(config.sync.scope, SyncScope::All);
        assert_eq!(config.sync.extra_args, vec!["--dry-run".to_string()]);
        assert_eq!(config.sync.transfers, 4);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
