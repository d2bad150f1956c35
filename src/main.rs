// This is the entry point of the backup tool.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (HTTP, files, OAuth, permissions)
// - `app/` = Configuration and command line actions
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Kick off the storage permission check
// 4. Run the requested action

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with several mod.rs files that all look the same.
#[path = "app/app_layer.rs"]
mod app;
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;

use anyhow::{Context, Result};
use clap::Parser;

use crate::app::commands::{self, Cli};
use crate::app::config::{AppConfig, AuthConfig};
use crate::core::backup::BackupService;
use crate::core::drive::RemoteDocumentStore;
use crate::core::permissions::StoragePermissionGate;
use crate::core::session::SessionBootstrap;
use crate::infra::google_auth::{
    GoogleAuthProvider, RefreshTokenProvider, ServiceAccountProvider, StaticTokenProvider,
};
use crate::infra::google_drive::ReqwestTransport;
use crate::infra::local_files::MirrorFileTransfer;
use crate::infra::permissions::FsPermissionPlatform;

async fn build_provider(auth: AuthConfig) -> Result<GoogleAuthProvider> {
    Ok(match auth {
        AuthConfig::StaticToken(token) => {
            GoogleAuthProvider::Static(StaticTokenProvider::new(token))
        }
        AuthConfig::RefreshToken(credentials) => {
            GoogleAuthProvider::RefreshToken(RefreshTokenProvider::new(credentials))
        }
        AuthConfig::ServiceAccountKeyFile(path) => GoogleAuthProvider::ServiceAccount(
            ServiceAccountProvider::from_file(&path)
                .await
                .context("Failed to load service account key")?,
        ),
        AuthConfig::ServiceAccountJson(json) => GoogleAuthProvider::ServiceAccount(
            ServiceAccountProvider::from_json(&json)
                .context("Failed to parse service account JSON")?,
        ),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    // Runs on its own task; nothing below waits for it.
    let _permission_check =
        StoragePermissionGate::new(FsPermissionPlatform::for_mirror(&config.mirror_path)).spawn();

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================

    let provider = build_provider(config.auth.clone()).await?;
    tracing::info!(provider = provider.kind(), "Using Google credentials");

    let transport = ReqwestTransport::new().context("Failed to create HTTP client")?;
    let store = RemoteDocumentStore::new(
        transport.clone(),
        MirrorFileTransfer::new(transport),
        config.endpoints.clone(),
        config.document.clone(),
        config.mirror_path.clone(),
    );
    let bootstrap = SessionBootstrap::with_request(provider, config.sign_in.clone());
    let service = BackupService::new(bootstrap, store);

    if let Err(e) = commands::run(&service, cli.command).await {
        tracing::error!("{:#}", e);
        if let Some(hint) = commands::failure_hint(&e) {
            tracing::info!("{}", hint);
        }
        return Err(e);
    }
    Ok(())
}
