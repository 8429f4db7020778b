use std::{collections::HashMap, path::PathBuf};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::fields::FOLDER_MIME;

/// File metadata as returned by the files endpoints.
///
/// Only the fields requested through `fields` are populated; everything else
/// keeps its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub parents: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trashed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starred: Option<bool>,
}

impl DriveFile {
    pub fn is_folder(&self) -> bool {
        self.mime_type == FOLDER_MIME
    }

    /// Size in bytes. The service encodes sizes as decimal strings.
    pub fn size_bytes(&self) -> Option<u64> {
        self.size.as_deref().and_then(|s| s.parse().ok())
    }

    pub fn modified_at(&self) -> Option<DateTime<FixedOffset>> {
        self.modified_time.as_deref().and_then(parse_time)
    }

    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        self.created_time.as_deref().and_then(parse_time)
    }
}

/// Parses an RFC 3339 timestamp as used by the service.
pub fn parse_time(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).ok()
}

/// One page of a files listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileList {
    pub next_page_token: Option<String>,
    pub files: Vec<DriveFile>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub display_name: Option<String>,
    pub email_address: Option<String>,
    pub permission_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageQuota {
    pub limit: Option<String>,
    pub usage: Option<String>,
    pub usage_in_drive: Option<String>,
    pub usage_in_drive_trash: Option<String>,
}

/// Account and service information from the about endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct About {
    pub kind: Option<String>,
    pub user: Option<User>,
    pub storage_quota: Option<StorageQuota>,
    pub max_upload_size: Option<String>,
    pub app_installed: Option<bool>,
    pub import_formats: Option<HashMap<String, Vec<String>>>,
    pub export_formats: Option<HashMap<String, Vec<String>>>,
    pub max_import_sizes: Option<HashMap<String, String>>,
    pub folder_color_palette: Option<Vec<String>>,
}

/// Download progress events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Starting { total: u64 },
    Chunk { current: u64, total: u64 },
    Complete { total: u64 },
}

/// How to handle existing files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwriteMode {
    Skip,
    Force,
}

/// Result of a finished download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Downloaded {
    pub path: PathBuf,
    pub bytes: u64,
    pub skipped: bool,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_drive_file_from_json() {
        let file: DriveFile = serde_json::from_value(json!({
            "id": "abc",
            "name": "notes.txt",
            "mimeType": "text/plain",
            "parents": ["root-id"],
            "size": "1024",
            "modifiedTime": "2024-03-01T10:15:30.000Z",
            "kind": "drive#file"
        }))
        .unwrap();

        assert_eq!(file.id, "abc");
        assert_eq!(file.parents, vec!["root-id".to_string()]);
        assert_eq!(file.size_bytes(), Some(1024));
        assert!(!file.is_folder());
        assert_eq!(
            file.modified_at().map(|t| t.timestamp()),
            Some(1_709_288_130)
        );
        assert!(file.created_at().is_none());
    }

    #[test]
    fn test_drive_file_partial_fields() {
        let file: DriveFile = serde_json::from_value(json!({ "id": "only-id" })).unwrap();
        assert_eq!(file.id, "only-id");
        assert!(file.parents.is_empty());
        assert!(file.size_bytes().is_none());
    }

    #[test]
    fn test_folder_detection() {
        let folder = DriveFile {
            mime_type: FOLDER_MIME.to_string(),
            ..Default::default()
        };
        assert!(folder.is_folder());
    }

    #[test]
    fn test_parse_time() {
        assert!(parse_time("2021-01-01T00:00:00Z").is_some());
        assert!(parse_time("yesterday").is_none());
    }

    #[test]
    fn test_file_list_from_json() {
        let list: FileList = serde_json::from_value(json!({
            "nextPageToken": "tok",
            "files": [{ "id": "1" }, { "id": "2" }]
        }))
        .unwrap();
        assert_eq!(list.next_page_token.as_deref(), Some("tok"));
        assert_eq!(list.files.len(), 2);

        let last: FileList = serde_json::from_value(json!({ "files": [] })).unwrap();
        assert!(last.next_page_token.is_none());
    }

    #[test]
    fn test_about_from_json() {
        let about: About = serde_json::from_value(json!({
            "kind": "drive#about",
            "user": { "displayName": "Ada", "emailAddress": "ada@example.com" },
            "storageQuota": { "limit": "100", "usage": "42" }
        }))
        .unwrap();

        let user = about.user.unwrap();
        assert_eq!(user.display_name.as_deref(), Some("Ada"));
        assert_eq!(about.storage_quota.unwrap().usage.as_deref(), Some("42"));
    }
}
