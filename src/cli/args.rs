//! Command-line argument definitions using clap.

use clap::builder::BoolishValueParser;
use clap::Parser;
use std::path::PathBuf;

use crate::config::{Config, SyncMode, SyncScope};

/// Rocketseat course archiver CLI.
#[derive(Parser, Debug)]
#[command(
    name = "rocketseat-downloader",
    version,
    about = "Archive Rocketseat courses, lessons and attachments",
    long_about = "A CLI tool to archive Rocketseat specializations and courses.\n\n\
                  Videos are fetched with yt-dlp, lesson metadata and attachments are written\n\
                  next to them, and the result can be mirrored to cloud storage with rclone."
)]
pub struct Args {
    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Login email, only used when no session is stored.
    #[arg(long, env = "ROCKETSEAT_EMAIL")]
    pub email: Option<String>,

    /// Login password, only used when no session is stored.
    #[arg(long, env = "ROCKETSEAT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Directory holding the session file.
    #[arg(long, env = "SESSION_DIR")]
    pub session_dir: Option<PathBuf>,

    /// HTTP timeout in seconds.
    #[arg(long, env = "HTTP_TIMEOUT")]
    pub timeout: Option<f64>,

    /// Video CDN host.
    #[arg(long, env = "CDN_DOMAIN")]
    pub cdn_domain: Option<String>,

    /// Root folder for downloaded courses.
    #[arg(short, long = "output")]
    pub output_dir: Option<PathBuf>,

    /// Download every catalog item and every module without prompting.
    #[arg(long, conflicts_with_all = ["items", "modules"])]
    pub all: bool,

    /// Pre-answer the catalog prompt (`0` or e.g. `1,3`).
    #[arg(long)]
    pub items: Option<String>,

    /// Pre-answer every module prompt (`0` or e.g. `2,4`).
    #[arg(long)]
    pub modules: Option<String>,

    /// Mirror the archive with rclone after downloading.
    #[arg(
        long = "sync",
        env = "RCLONE_ENABLED",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub sync_enabled: Option<bool>,

    /// rclone remote name.
    #[arg(long = "sync-remote", env = "RCLONE_REMOTE")]
    pub sync_remote: Option<String>,

    /// Destination folder on the remote.
    #[arg(long = "sync-dest", env = "RCLONE_DEST_PATH")]
    pub sync_dest: Option<String>,

    /// rclone transfer mode.
    #[arg(long = "sync-mode", env = "RCLONE_MODE")]
    pub sync_mode: Option<SyncMode>,

    /// Mirror each item folder (`item`) or the whole root once (`all`).
    #[arg(long = "sync-scope", env = "RCLONE_SCOPE")]
    pub sync_scope: Option<SyncScope>,

    #[arg(long = "sync-transfers", env = "RCLONE_TRANSFERS")]
    pub sync_transfers: Option<u32>,

    #[arg(long = "sync-checkers", env = "RCLONE_CHECKERS")]
    pub sync_checkers: Option<u32>,

    #[arg(long = "sync-chunk-size", env = "RCLONE_CHUNK_SIZE")]
    pub sync_chunk_size: Option<String>,

    #[arg(long = "sync-retries", env = "RCLONE_RETRIES")]
    pub sync_retries: Option<u32>,

    #[arg(long = "sync-low-level-retries", env = "RCLONE_LOW_LEVEL_RETRIES")]
    pub sync_low_level_retries: Option<u32>,

    #[arg(long = "sync-bwlimit", env = "RCLONE_BWLIMIT")]
    pub sync_bwlimit: Option<String>,

    #[arg(long = "sync-stats", env = "RCLONE_STATS")]
    pub sync_stats: Option<String>,

    /// Extra arguments for rclone, separated by spaces.
    #[arg(long = "sync-extra-args", env = "RCLONE_EXTRA_ARGS", allow_hyphen_values = true)]
    pub sync_extra_args: Option<String>,

    /// Pass `--progress` to rclone.
    #[arg(
        long = "sync-progress",
        env = "RCLONE_PROGRESS",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub sync_progress: Option<bool>,

    /// Remove emptied source folders after a move.
    #[arg(
        long = "sync-delete-empty-dirs",
        env = "RCLONE_DELETE_EMPTY_DIRS",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub sync_delete_empty_dirs: Option<bool>,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

/// Answers given up front for the selection prompts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreAnswers {
    pub all: bool,
    pub items: Option<String>,
    pub modules: Option<String>,
}

impl Args {
    /// Selection answers taken from the command line.
    pub fn pre_answers(&self) -> PreAnswers {
        PreAnswers {
            all: self.all,
            items: self.items.clone(),
            modules: self.modules.clone(),
        }
    }

    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(self, config: &mut Config) {
        // Account
        if let Some(email) = self.email {
            config.account.email = Some(email);
        }

        if let Some(password) = self.password {
            config.account.password = Some(password);
        }

        // Session and HTTP
        if let Some(dir) = self.session_dir {
            config.session.directory = dir;
        }

        if let Some(timeout) = self.timeout {
            config.http.timeout_seconds = timeout;
        }

        if let Some(domain) = self.cdn_domain {
            config.media.cdn_domain = domain;
        }

        if let Some(root) = self.output_dir {
            config.output.root = root;
        }

        // Sync
        let sync = &mut config.sync;

        if let Some(enabled) = self.sync_enabled {
            sync.enabled = enabled;
        }

        if let Some(remote) = self.sync_remote {
            sync.remote = remote;
        }

        if let Some(dest) = self.sync_dest {
            sync.dest_path = dest;
        }

        if let Some(mode) = self.sync_mode {
            sync.mode = mode;
        }

        if let Some(scope) = self.sync_scope {
            sync.scope = scope;
        }

        if let Some(transfers) = self.sync_transfers {
            sync.transfers = transfers;
        }

        if let Some(checkers) = self.sync_checkers {
            sync.checkers = checkers;
        }

        if let Some(chunk_size) = self.sync_chunk_size {
            sync.chunk_size = chunk_size;
        }

        if let Some(retries) = self.sync_retries {
            sync.retries = retries;
        }

        if let Some(retries) = self.sync_low_level_retries {
            sync.low_level_retries = retries;
        }

        if let Some(bwlimit) = self.sync_bwlimit {
            sync.bwlimit = Some(bwlimit).filter(|b| !b.trim().is_empty());
        }

        if let Some(stats) = self.sync_stats {
            sync.stats = stats;
        }

        if let Some(extra) = self.sync_extra_args {
            sync.extra_args = extra.split_whitespace().map(str::to_string).collect();
        }

        if let Some(progress) = self.sync_progress {
            sync.progress = progress;
        }

        if let Some(delete) = self.sync_delete_empty_dirs {
            sync.delete_empty_dirs = delete;
        }
    }
}
