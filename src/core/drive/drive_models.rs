use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Folder alias that restricts a file to the calling application's private area.
pub const APP_DATA_FOLDER: &str = "appDataFolder";

/// Boundary marker separating the metadata and content parts of an upload.
///
/// Kept as one literal for every request. A payload that contains this string
/// is rejected by the encoder instead of producing a corrupt body.
pub const MULTIPART_BOUNDARY: &str = "foo_bar_baz";

/// The one logical document this store manages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSpec {
    pub name: String,
    pub description: String,
    pub mime_type: String,
    pub parent_scope: String,
}

impl Default for DocumentSpec {
    fn default() -> Self {
        Self {
            name: "data.json".to_string(),
            description: "Backup data for my app".to_string(),
            mime_type: "application/json".to_string(),
            parent_scope: APP_DATA_FOLDER.to_string(),
        }
    }
}

impl DocumentSpec {
    /// Search expression matching the document by its exact name.
    pub fn name_query(&self) -> String {
        // Drive query literals escape single quotes with a backslash
        format!("name = '{}'", self.name.replace('\'', "\\'"))
    }
}

/// Where the remote API lives. Metadata calls and media uploads use different roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveEndpoints {
    pub api_base: String,
    pub upload_base: String,
}

impl Default for DriveEndpoints {
    fn default() -> Self {
        Self {
            api_base: "https://www.googleapis.com/drive/v3".to_string(),
            upload_base: "https://www.googleapis.com/upload/drive/v3".to_string(),
        }
    }
}

/// Metadata part of a multipart upload.
///
/// `parents` must only be sent on creation; the API rejects it on update.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub name: String,
    pub description: String,
    pub mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parents: Option<Vec<String>>,
}

impl DocumentMetadata {
    pub fn for_create(spec: &DocumentSpec) -> Self {
        Self {
            parents: Some(vec![spec.parent_scope.clone()]),
            ..Self::for_update(spec)
        }
    }

    pub fn for_update(spec: &DocumentSpec) -> Self {
        Self {
            name: spec.name.clone(),
            description: spec.description.clone(),
            mime_type: spec.mime_type.clone(),
            parents: None,
        }
    }
}

/// The remote service's record for the stored document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteDocument {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<DateTime<Utc>>,
    /// Anything else the server sent back, untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RemoteDocument {
    #[cfg(test)]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            mime_type: None,
            description: None,
            parents: Vec::new(),
            modified_time: None,
            extra: Map::new(),
        }
    }
}

/// Body of a `files.list` response.
#[derive(Debug, Deserialize)]
pub(crate) struct FileList {
    #[serde(default)]
    pub files: Vec<RemoteDocument>,
}

/// Basic profile returned alongside a token, when the provider was asked for one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// Explicit authentication context passed into every store call.
#[derive(Clone)]
pub struct Session {
    token: String,
    profile: UserProfile,
}

impl Session {
    pub(crate) fn new(token: String, profile: UserProfile) -> Self {
        Self { token, profile }
    }

    pub fn bearer_token(&self) -> &str {
        &self.token
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        self.profile = profile;
        self
    }

    pub(crate) fn authorization_header(&self) -> String {
        format!("Bearer {}", self.bearer_token())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("profile", &self.profile)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_metadata_carries_parent_scope() {
        let spec = DocumentSpec::default();
        let value = serde_json::to_value(DocumentMetadata::for_create(&spec)).unwrap();
        assert_eq!(value["parents"], json!(["appDataFolder"]));
        assert_eq!(value["mimeType"], "application/json");
    }

    #[test]
    fn test_update_metadata_omits_parent_scope() {
        let spec = DocumentSpec::default();
        let value = serde_json::to_value(DocumentMetadata::for_update(&spec)).unwrap();
        assert!(value.get("parents").is_none());
        assert_eq!(value["name"], "data.json");
    }

    #[test]
    fn test_remote_document_keeps_unknown_fields() {
        let doc: RemoteDocument = serde_json::from_value(json!({
            "kind": "drive#file",
            "id": "abc123",
            "name": "data.json",
            "mimeType": "application/json",
            "modifiedTime": "2024-03-01T10:00:00.000Z"
        }))
        .unwrap();

        assert_eq!(doc.id, "abc123");
        assert_eq!(doc.mime_type.as_deref(), Some("application/json"));
        assert!(doc.modified_time.is_some());
        assert_eq!(doc.extra["kind"], "drive#file");
    }

    #[test]
    fn test_name_query_escapes_quotes() {
        let spec = DocumentSpec {
            name: "it's.json".to_string(),
            ..DocumentSpec::default()
        };
        assert_eq!(spec.name_query(), "name = 'it\\'s.json'");
        assert_eq!(DocumentSpec::default().name_query(), "name = 'data.json'");
    }

    #[test]
    fn test_session_debug_hides_token() {
        let session = Session::new("secret-token".to_string(), UserProfile::default());
        let printed = format!("{:?}", session);
        assert!(!printed.contains("secret-token"));
        assert_eq!(session.authorization_header(), "Bearer secret-token");
    }
}
