//! Persisted authenticated session.
//!
//! The session is the set of default headers (user agent, referer,
//! authorization) and cookies the client sends. It is stored whole as JSON at a
//! single path and loaded whole on startup. There is no expiry handling: a stale
//! session simply makes later API calls fail.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A cookie bound to the URL it was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCookie {
    pub name: String,
    pub value: String,
    pub url: String,
}

/// Serializable authenticated transport state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub cookies: Vec<StoredCookie>,
}

impl SessionData {
    /// Set a default header, replacing any previous value.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name.to_string(), value.into());
    }

    /// Get a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Set a cookie, replacing one with the same name and URL.
    pub fn set_cookie(&mut self, name: &str, value: impl Into<String>, url: &str) {
        let value = value.into();
        match self
            .cookies
            .iter_mut()
            .find(|c| c.name == name && c.url == url)
        {
            Some(existing) => existing.value = value,
            None => self.cookies.push(StoredCookie {
                name: name.to_string(),
                value,
                url: url.to_string(),
            }),
        }
    }

    /// Whether the session carries an authorization header.
    pub fn is_authenticated(&self) -> bool {
        self.header("authorization").is_some()
    }
}

/// Loads and stores [`SessionData`] at a fixed path.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored session.
    ///
    /// Returns `Ok(None)` when no session file exists. A file that exists but
    /// cannot be decoded is an error.
    pub fn load(&self) -> Result<Option<SessionData>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::Session {
                    path: self.path.display().to_string(),
                    message: e.to_string(),
                })
            }
        };

        let session = serde_json::from_str(&content).map_err(|e| Error::Session {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;

        tracing::debug!("Loaded session from {}", self.path.display());
        Ok(Some(session))
    }

    /// Store the session, replacing any previous file.
    pub fn save(&self, session: &SessionData) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, content)?;
        tracing::debug!("Saved session to {}", self.path.display());
        Ok(())
    }
}
