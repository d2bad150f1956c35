use async_trait::async_trait;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::core::drive::{remote_api_error, DriveRequest, LocalFileTransfer, StoreError};
use crate::infra::google_drive::ReqwestTransport;

/// Streams downloads into the local mirror file and reads it back.
pub struct MirrorFileTransfer {
    transport: ReqwestTransport,
}

impl MirrorFileTransfer {
    pub fn new(transport: ReqwestTransport) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl LocalFileTransfer for MirrorFileTransfer {
    async fn download_to(
        &self,
        request: DriveRequest,
        destination: &Path,
    ) -> Result<u64, StoreError> {
        let mut response = self
            .transport
            .build(request)?
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .bytes()
                .await
                .map_err(|e| StoreError::Transport(e.to_string()))?;
            return Err(remote_api_error(status.as_u16(), &body));
        }

        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StoreError::from_io(parent, e))?;
            }
        }

        // File::create truncates, so the mirror never keeps stale bytes
        let mut file = fs::File::create(destination)
            .await
            .map_err(|e| StoreError::from_io(destination, e))?;

        let mut written = 0u64;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?
        {
            file.write_all(&chunk)
                .await
                .map_err(|e| StoreError::from_io(destination, e))?;
            written += chunk.len() as u64;
        }
        file.flush()
            .await
            .map_err(|e| StoreError::from_io(destination, e))?;

        Ok(written)
    }

    async fn read_text(&self, path: &Path) -> Result<String, StoreError> {
        fs::read_to_string(path)
            .await
            .map_err(|e| StoreError::from_io(path, e))
    }
}
