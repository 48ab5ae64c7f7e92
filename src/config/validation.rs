//! Configuration validation logic.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::loader::{Config, SyncConfig};
use crate::error::{Error, Result};

static HOST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?)+$")
        .expect("valid regex")
});

static SIZE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)?[KkMmGgTt]?$").expect("valid regex"));

static INTERVAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(ms|s|m|h)?$").expect("valid regex"));

// A single size or a timetable such as "08:00,512k 19:00,off"
static BWLIMIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z.:,\-| ]+$").expect("valid regex"));

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_timeout(config.http.timeout_seconds)?;
    validate_base_url("http.api_base", &config.http.api_base)?;
    validate_base_url("http.web_base", &config.http.web_base)?;
    validate_cdn_domain(&config.media.cdn_domain)?;
    validate_tool("media.tool", &config.media.tool)?;

    if config.media.concurrent_fragments == 0 {
        return Err(Error::ConfigValidation {
            field: "media.concurrent_fragments".to_string(),
            message: "Must be at least 1".to_string(),
        });
    }

    validate_folder("output.root", &config.output.root)?;
    validate_folder("output.logs_dir", &config.output.logs_dir)?;
    validate_folder("output.reports_dir", &config.output.reports_dir)?;

    if config.sync.enabled {
        validate_sync(&config.sync)?;
    }

    Ok(())
}

/// Upper bound for the HTTP timeout, one day.
pub const MAX_TIMEOUT_SECONDS: f64 = 86_400.0;

/// Validate the HTTP timeout.
pub fn validate_timeout(seconds: f64) -> Result<()> {
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(Error::ConfigValidation {
            field: "http.timeout_seconds".to_string(),
            message: format!("Timeout must be a positive number of seconds (got {})", seconds),
        });
    }
    if seconds > MAX_TIMEOUT_SECONDS {
        return Err(Error::ConfigValidation {
            field: "http.timeout_seconds".to_string(),
            message: format!(
                "Timeout must be at most {} seconds (got {})",
                MAX_TIMEOUT_SECONDS, seconds
            ),
        });
    }
    Ok(())
}

fn validate_base_url(field: &str, value: &str) -> Result<()> {
    let parsed = url::Url::parse(value).map_err(|e| Error::ConfigValidation {
        field: field.to_string(),
        message: format!("Invalid URL '{}': {}", value, e),
    })?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: format!("Unsupported scheme '{}'", parsed.scheme()),
        });
    }

    Ok(())
}

/// Validate the CDN host. It must be a bare host name, no scheme or path.
pub fn validate_cdn_domain(domain: &str) -> Result<()> {
    if domain.is_empty() {
        return Err(Error::MissingConfig("media.cdn_domain".to_string()));
    }

    if !HOST_RE.is_match(domain) {
        return Err(Error::ConfigValidation {
            field: "media.cdn_domain".to_string(),
            message: format!(
                "'{}' is not a bare host name (drop any scheme or path)",
                domain
            ),
        });
    }

    Ok(())
}

fn validate_tool(field: &str, tool: &str) -> Result<()> {
    if tool.trim().is_empty() {
        return Err(Error::MissingConfig(field.to_string()));
    }
    Ok(())
}

fn validate_folder(field: &str, path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(Error::MissingConfig(field.to_string()));
    }
    Ok(())
}

/// Validate the sync tool settings. Only called when sync is enabled.
pub fn validate_sync(sync: &SyncConfig) -> Result<()> {
    validate_tool("sync.tool", &sync.tool)?;

    let remote = sync.remote.trim().trim_end_matches(':');
    if remote.is_empty() {
        return Err(Error::MissingConfig(
            "sync.remote (required when sync is enabled)".to_string(),
        ));
    }

    if remote.contains(':') || remote.contains('/') {
        return Err(Error::ConfigValidation {
            field: "sync.remote".to_string(),
            message: format!("'{}' should be a remote name only, e.g. 'gdrive'", sync.remote),
        });
    }

    for (field, value) in [
        ("sync.transfers", sync.transfers),
        ("sync.checkers", sync.checkers),
    ] {
        if value == 0 {
            return Err(Error::ConfigValidation {
                field: field.to_string(),
                message: "Must be at least 1".to_string(),
            });
        }
    }

    if !SIZE_RE.is_match(&sync.chunk_size) {
        return Err(Error::ConfigValidation {
            field: "sync.chunk_size".to_string(),
            message: format!("Invalid size '{}', expected e.g. 64M", sync.chunk_size),
        });
    }

    if !INTERVAL_RE.is_match(&sync.stats) {
        return Err(Error::ConfigValidation {
            field: "sync.stats".to_string(),
            message: format!("Invalid interval '{}', expected e.g. 30s", sync.stats),
        });
    }

    if let Some(bwlimit) = &sync.bwlimit {
        if bwlimit.trim().is_empty() || !BWLIMIT_RE.is_match(bwlimit) {
            return Err(Error::ConfigValidation {
                field: "sync.bwlimit".to_string(),
                message: format!("Invalid bandwidth limit '{}'", bwlimit),
            });
        }
    }

    Ok(())
}
