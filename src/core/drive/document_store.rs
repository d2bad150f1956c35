use serde::Serialize;
use std::path::{Path, PathBuf};

use super::drive_errors::StoreError;
use super::drive_models::{
    DocumentMetadata, DocumentSpec, DriveEndpoints, FileList, RemoteDocument, Session,
    UserProfile,
};
use super::drive_transport::{DriveRequest, HttpMethod, HttpTransport, LocalFileTransfer};
use super::multipart;

/// Stores exactly one JSON document in the application's private cloud folder.
///
/// Nothing is cached between calls: callers locate the document first and pass
/// the result into `fetch_content` / `upsert_content`.
pub struct RemoteDocumentStore<H: HttpTransport, F: LocalFileTransfer> {
    http: H,
    files: F,
    endpoints: DriveEndpoints,
    spec: DocumentSpec,
    mirror_path: PathBuf,
}

impl<H, F> RemoteDocumentStore<H, F>
where
    H: HttpTransport,
    F: LocalFileTransfer,
{
    pub fn new(
        http: H,
        files: F,
        endpoints: DriveEndpoints,
        spec: DocumentSpec,
        mirror_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            http,
            files,
            endpoints,
            spec,
            mirror_path: mirror_path.into(),
        }
    }

    pub fn mirror_path(&self) -> &Path {
        &self.mirror_path
    }

    pub fn spec(&self) -> &DocumentSpec {
        &self.spec
    }

    /// Produces the session every other call requires.
    pub fn authorize(&self, token: impl Into<String>) -> Result<Session, StoreError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(StoreError::Auth("empty bearer token".to_string()));
        }
        Ok(Session::new(token, UserProfile::default()))
    }

    /// Finds the document by name inside the private folder. No match is `Ok(None)`.
    pub async fn locate(&self, session: &Session) -> Result<Option<RemoteDocument>, StoreError> {
        let url = format!("{}/files", self.endpoints.api_base);
        let request = DriveRequest::new(HttpMethod::Get, url)
            .query("q", self.spec.name_query())
            .query("spaces", self.spec.parent_scope.clone())
            .header("Authorization", session.authorization_header());

        let list: FileList = self.http.send(request).await?.into_json()?;
        let found = list.files.into_iter().next();

        match &found {
            Some(doc) => tracing::debug!(file_id = %doc.id, "Located remote document"),
            None => tracing::debug!(name = %self.spec.name, "No remote document found"),
        }
        Ok(found)
    }

    /// Downloads the located document into the mirror file and returns its text.
    pub async fn fetch_content(
        &self,
        session: &Session,
        document: Option<&RemoteDocument>,
    ) -> Result<String, StoreError> {
        let document = document.ok_or_else(|| {
            StoreError::InvalidArgument("no remote document was supplied".to_string())
        })?;
        if document.id.trim().is_empty() {
            return Err(StoreError::InvalidArgument(
                "remote document has no identifier".to_string(),
            ));
        }

        let request = DriveRequest::new(
            HttpMethod::Get,
            format!("{}/files/{}", self.endpoints.api_base, document.id),
        )
        .query("alt", "media")
        .header("Authorization", session.authorization_header());

        let written = self.files.download_to(request, &self.mirror_path).await?;
        tracing::info!(
            file_id = %document.id,
            bytes = written,
            path = %self.mirror_path.display(),
            "Downloaded remote document"
        );

        self.files.read_text(&self.mirror_path).await
    }

    /// Creates the document (no `existing`) or replaces the content of `existing`.
    pub async fn upsert_content<T>(
        &self,
        session: &Session,
        content: &T,
        existing: Option<&RemoteDocument>,
    ) -> Result<RemoteDocument, StoreError>
    where
        T: Serialize + ?Sized,
    {
        let content_json = serde_json::to_string(content)?;

        let (method, url, metadata) = match existing {
            Some(doc) => {
                if doc.id.trim().is_empty() {
                    return Err(StoreError::InvalidArgument(
                        "remote document has no identifier".to_string(),
                    ));
                }
                (
                    HttpMethod::Patch,
                    format!("{}/files/{}", self.endpoints.upload_base, doc.id),
                    DocumentMetadata::for_update(&self.spec),
                )
            }
            None => (
                HttpMethod::Post,
                format!("{}/files", self.endpoints.upload_base),
                DocumentMetadata::for_create(&self.spec),
            ),
        };

        let body = multipart::encode_body(&metadata, &content_json)?;
        let request = DriveRequest::new(method, url)
            .query("uploadType", "multipart")
            .header("Authorization", session.authorization_header())
            .header("Content-Type", multipart::content_type())
            // String::len is the UTF-8 byte length, which is what goes on the wire
            .header("Content-Length", body.len().to_string())
            .body(body);

        let document: RemoteDocument = self.http.send(request).await?.into_json()?;
        tracing::info!(
            file_id = %document.id,
            created = existing.is_none(),
            "Uploaded remote document"
        );
        Ok(document)
    }
}

// ============================================================================
// TESTS
// ============================================================================
