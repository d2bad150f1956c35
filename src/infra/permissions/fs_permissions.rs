use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::core::permissions::{
    PermissionError, PermissionPlatform, PermissionRationale, PermissionStatus, StoragePermission,
};

/// Storage permissions as the local file system sees them, for the directory
/// holding the mirror file.
pub struct FsPermissionPlatform {
    dir: PathBuf,
}

impl FsPermissionPlatform {
    pub fn for_mirror(mirror_path: &Path) -> Self {
        let dir = mirror_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self { dir }
    }

    async fn writable(&self) -> bool {
        match fs::metadata(&self.dir).await {
            Ok(meta) => meta.is_dir() && !meta.permissions().readonly(),
            Err(_) => false,
        }
    }

    async fn readable(&self) -> bool {
        fs::read_dir(&self.dir).await.is_ok()
    }
}

#[async_trait]
impl PermissionPlatform for FsPermissionPlatform {
    async fn check(&self, permission: StoragePermission) -> bool {
        match permission {
            StoragePermission::Read => self.readable().await,
            StoragePermission::Write => self.writable().await,
        }
    }

    async fn request(
        &self,
        permission: StoragePermission,
        rationale: &PermissionRationale,
    ) -> Result<PermissionStatus, PermissionError> {
        tracing::info!(
            dir = %self.dir.display(),
            "{}: {}",
            rationale.title,
            rationale.message
        );

        if !fs::try_exists(&self.dir)
            .await
            .map_err(|e| PermissionError::Request(e.to_string()))?
        {
            fs::create_dir_all(&self.dir)
                .await
                .map_err(|e| PermissionError::Request(e.to_string()))?;
        }

        Ok(if self.check(permission).await {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        })
    }
}
