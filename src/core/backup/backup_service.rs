use serde::Serialize;
use thiserror::Error;

use crate::core::drive::{
    HttpTransport, LocalFileTransfer, RemoteDocument, RemoteDocumentStore, StoreError,
};
use crate::core::session::{AuthError, AuthProvider, SessionBootstrap};

#[derive(Debug, Error)]
pub enum BackupError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The two user-facing actions: fetch the backup, or create/update it.
///
/// Each action is one linear chain: sign in, locate, then fetch or upsert.
/// A failed step ends the chain and its error is returned to the caller.
pub struct BackupService<P, H, F>
where
    P: AuthProvider,
    H: HttpTransport,
    F: LocalFileTransfer,
{
    bootstrap: SessionBootstrap<P>,
    store: RemoteDocumentStore<H, F>,
}

impl<P, H, F> BackupService<P, H, F>
where
    P: AuthProvider,
    H: HttpTransport,
    F: LocalFileTransfer,
{
    pub fn new(bootstrap: SessionBootstrap<P>, store: RemoteDocumentStore<H, F>) -> Self {
        Self { bootstrap, store }
    }

    pub fn store(&self) -> &RemoteDocumentStore<H, F> {
        &self.store
    }

    /// Returns the stored text, or `None` when nothing has been backed up yet.
    pub async fn fetch_document(&self) -> Result<Option<String>, BackupError> {
        let session = self.bootstrap.sign_in(&self.store).await.map_err(|e| {
            tracing::error!("Sign-in failed, skipping fetch: {}", e);
            e
        })?;

        let Some(document) = self.store.locate(&session).await? else {
            tracing::info!(name = %self.store.spec().name, "File not found, nothing to fetch");
            return Ok(None);
        };

        let content = self
            .store
            .fetch_content(&session, Some(&document))
            .await
            .map_err(|e| {
                tracing::error!(file_id = %document.id, "Failed to fetch backup: {}", e);
                e
            })?;
        Ok(Some(content))
    }

    /// Uploads `content`, updating the existing document when one is found.
    pub async fn save_document<T>(&self, content: &T) -> Result<RemoteDocument, BackupError>
    where
        T: Serialize + Sync + ?Sized,
    {
        let session = self.bootstrap.sign_in(&self.store).await.map_err(|e| {
            tracing::error!("Sign-in failed, skipping upload: {}", e);
            e
        })?;

        let existing = self.store.locate(&session).await?;
        let document = self
            .store
            .upsert_content(&session, content, existing.as_ref())
            .await
            .map_err(|e| {
                tracing::error!("Failed to upload backup: {}", e);
                e
            })?;
        Ok(document)
    }
}
