use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;

use super::drive_errors::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
}

/// A fully described HTTP request. The store builds these; a transport only executes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl DriveRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn query(mut self, name: &str, value: impl Into<String>) -> Self {
        self.query.push((name.to_string(), value.into()));
        self
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    pub fn body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }

    #[cfg(test)]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[cfg(test)]
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct DriveResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl DriveResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Applies the store's response policy: 2xx bodies decode as `T`, anything else
    /// becomes a `RemoteApi` error carrying the server's payload.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T, StoreError> {
        if !self.is_success() {
            return Err(remote_api_error(self.status, &self.body));
        }
        serde_json::from_slice(&self.body).map_err(|e| StoreError::MalformedResponse(e.to_string()))
    }
}

/// Wraps a failure body verbatim. Bodies that are not JSON are kept as a JSON string.
pub fn remote_api_error(status: u16, body: &[u8]) -> StoreError {
    let body = serde_json::from_slice::<Value>(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()));
    StoreError::RemoteApi { status, body }
}

/// Executes requests against the remote file-hosting API.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: DriveRequest) -> Result<DriveResponse, StoreError>;
}

/// Moves bytes between the remote API and local storage.
#[async_trait]
pub trait LocalFileTransfer: Send + Sync {
    /// Streams the body of `request` into `destination`, replacing whatever was there.
    /// Returns the number of bytes written.
    async fn download_to(
        &self,
        request: DriveRequest,
        destination: &Path,
    ) -> Result<u64, StoreError>;

    async fn read_text(&self, path: &Path) -> Result<String, StoreError>;
}
