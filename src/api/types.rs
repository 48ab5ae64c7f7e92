//! API request and response type definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Login request body for `/sessions`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Login response from `/sessions`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(rename = "type")]
    pub token_type: String,
    pub token: String,
    pub refresh_token: String,
}

impl LoginResponse {
    /// Authorization header value, e.g. `Bearer <token>`.
    pub fn authorization(&self) -> String {
        let mut chars = self.token_type.chars();
        let scheme: String = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
            None => "Bearer".to_string(),
        };
        format!("{} {}", scheme, self.token)
    }
}

/// Account information from `/account`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfo {
    #[serde(default)]
    pub name: String,
}

/// Catalog listing response.
#[derive(Debug, Deserialize)]
pub struct CatalogResponse {
    #[serde(default)]
    pub items: Vec<CatalogItem>,
}

/// Kind of a top-level catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum CatalogKind {
    Specialization,
    Course,
    Extra,
    #[default]
    Unknown,
    Other(String),
}

impl From<String> for CatalogKind {
    fn from(value: String) -> Self {
        match value.to_uppercase().as_str() {
            "SPECIALIZATION" => CatalogKind::Specialization,
            "COURSE" => CatalogKind::Course,
            "EXTRA" => CatalogKind::Extra,
            "" => CatalogKind::Unknown,
            _ => CatalogKind::Other(value),
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogKind::Specialization => write!(f, "specialization"),
            CatalogKind::Course => write!(f, "course"),
            CatalogKind::Extra => write!(f, "extra"),
            CatalogKind::Unknown => write!(f, "unknown"),
            CatalogKind::Other(other) => write!(f, "{}", other.to_lowercase()),
        }
    }
}

/// A top-level catalog entry (specialization, course or extra).
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogItem {
    pub slug: String,
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: CatalogKind,
}

/// An attachment download: raw bytes plus the reported content type.
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}
