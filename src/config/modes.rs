//! Sync mode and scope definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the sync tool transfers the local archive to the remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Make the remote identical to the local folder (default).
    #[default]
    Sync,
    /// Copy new and changed files, never delete on the remote.
    Copy,
    /// Copy then delete the local files.
    Move,
}

impl SyncMode {
    /// Subcommand name passed to the sync tool.
    pub fn as_arg(&self) -> &'static str {
        match self {
            SyncMode::Sync => "sync",
            SyncMode::Copy => "copy",
            SyncMode::Move => "move",
        }
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_arg())
    }
}

impl FromStr for SyncMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sync" => Ok(SyncMode::Sync),
            "copy" => Ok(SyncMode::Copy),
            "move" => Ok(SyncMode::Move),
            _ => Err(format!("Unknown sync mode: {}", s)),
        }
    }
}

/// Which part of the archive is mirrored after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncScope {
    /// Mirror each downloaded item's folder separately (default).
    #[default]
    Item,
    /// Mirror the whole output root once.
    All,
}

impl fmt::Display for SyncScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncScope::Item => write!(f, "item"),
            SyncScope::All => write!(f, "all"),
        }
    }
}

impl FromStr for SyncScope {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "item" | "course" => Ok(SyncScope::Item),
            "all" | "root" => Ok(SyncScope::All),
            _ => Err(format!("Unknown sync scope: {}", s)),
        }
    }
}
