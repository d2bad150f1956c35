use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, ClientBuilder, Method};

use crate::core::drive::{DriveRequest, DriveResponse, HttpMethod, HttpTransport, StoreError};

/// Executes store requests with `reqwest`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, StoreError> {
        Self::from_builder(Client::builder())
    }

    /// Client that ignores proxy settings, for talking to a server on loopback.
    #[cfg(test)]
    pub fn direct() -> Result<Self, StoreError> {
        Self::from_builder(Client::builder().no_proxy())
    }

    fn from_builder(builder: ClientBuilder) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "User-Agent",
            HeaderValue::from_static("AppDataBackup/0.1"),
        );

        let client = builder
            .default_headers(headers)
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        Ok(Self { client })
    }

    /// Turns a store request into a ready-to-send reqwest builder.
    pub fn build(&self, request: DriveRequest) -> Result<reqwest::RequestBuilder, StoreError> {
        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Patch => Method::PATCH,
        };

        let mut headers = HeaderMap::new();
        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| StoreError::InvalidArgument(e.to_string()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| StoreError::InvalidArgument(e.to_string()))?;
            headers.insert(name, value);
        }

        let mut builder = self
            .client
            .request(method, &request.url)
            .headers(headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        Ok(builder)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: DriveRequest) -> Result<DriveResponse, StoreError> {
        let url = request.url.clone();
        let response = self
            .build(request)?
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?
            .to_vec();

        tracing::debug!(%url, status, bytes = body.len(), "Drive API response");
        Ok(DriveResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_maps_method_query_and_headers() {
        let transport = ReqwestTransport::new().unwrap();
        let request = DriveRequest::new(HttpMethod::Patch, "https://drive.test/files/abc123")
            .query("uploadType", "multipart")
            .header("Authorization", "Bearer tok")
            .header("Content-Length", "4")
            .body("data".to_string());

        let built = transport.build(request).unwrap().build().unwrap();
        assert_eq!(built.method(), &Method::PATCH);
        assert_eq!(
            built.url().as_str(),
            "https://drive.test/files/abc123?uploadType=multipart"
        );
        assert_eq!(built.headers()["authorization"], "Bearer tok");
        assert_eq!(built.headers()["content-length"], "4");
    }

    #[test]
    fn test_build_encodes_name_query() {
        let transport = ReqwestTransport::new().unwrap();
        let request = DriveRequest::new(HttpMethod::Get, "https://drive.test/files")
            .query("q", "name = 'data.json'")
            .query("spaces", "appDataFolder");

        let built = transport.build(request).unwrap().build().unwrap();
        let pairs: Vec<(String, String)> = built
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("q".to_string(), "name = 'data.json'".to_string()),
                ("spaces".to_string(), "appDataFolder".to_string()),
            ]
        );
    }

    #[test]
    fn test_invalid_header_is_rejected() {
        let transport = ReqwestTransport::new().unwrap();
        let request = DriveRequest::new(HttpMethod::Get, "https://drive.test/files")
            .header("Authorization", "Bearer bad\nvalue");
        assert!(matches!(
            transport.build(request),
            Err(StoreError::InvalidArgument(_))
        ));
    }
}
