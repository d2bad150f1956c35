use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::backup::{BackupError, BackupService};
use crate::core::drive::{HttpTransport, LocalFileTransfer, StoreError};
use crate::core::session::AuthProvider;

/// Back up and restore one JSON document in Google Drive's private app-data folder.
#[derive(Debug, Parser)]
#[command(name = "appdata_backup", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Get data from Google Drive
    Fetch,
    /// Create data or update data
    Save {
        /// JSON file to upload. Without it a sample memo list is uploaded.
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

/// One entry of the sample memo list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoRecord {
    pub id: u64,
    pub text: String,
    pub name: String,
}

pub fn sample_records() -> Vec<MemoRecord> {
    vec![
        MemoRecord {
            id: 1,
            text: "transaction memo list".to_string(),
            name: "dang".to_string(),
        },
        MemoRecord {
            id: 2,
            text: "transaction memo list".to_string(),
            name: "dang 2".to_string(),
        },
    ]
}

/// Display form of fetched content: pretty JSON when it parses, raw text otherwise.
pub fn render_document(text: &str) -> String {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|v| serde_json::to_string_pretty(&v).ok())
        .unwrap_or_else(|| text.to_string())
}

/// Extra line for the user when a command fails below the API level.
pub fn failure_hint(err: &anyhow::Error) -> Option<&'static str> {
    err.chain().find_map(|cause| {
        let store = match cause.downcast_ref::<BackupError>() {
            Some(BackupError::Store(e)) => e,
            Some(BackupError::Auth(_)) => return None,
            None => cause.downcast_ref::<StoreError>()?,
        };
        match store {
            StoreError::PermissionDenied(_) => {
                Some("Check that the mirror folder is readable and writable")
            }
            e if e.is_transport() => Some("Check your network connection and try again"),
            _ => None,
        }
    })
}

async fn load_input(path: &Path) -> Result<serde_json::Value> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

pub async fn run<P, H, F>(service: &BackupService<P, H, F>, command: Command) -> Result<()>
where
    P: AuthProvider,
    H: HttpTransport,
    F: LocalFileTransfer,
{
    match command {
        Command::Fetch => {
            match service
                .fetch_document()
                .await
                .context("Failed to get data from Google Drive")?
            {
                Some(text) => {
                    tracing::debug!(
                        path = %service.store().mirror_path().display(),
                        "Read backup from mirror file"
                    );
                    println!("{}", render_document(&text));
                }
                None => println!("No backup found"),
            }
        }
        Command::Save { input } => {
            let document = match input {
                Some(path) => {
                    let content = load_input(&path).await?;
                    service.save_document(&content).await
                }
                None => service.save_document(&sample_records()).await,
            }
            .context("Failed to save data to Google Drive")?;
            println!("✅ Saved backup (file id {})", document.id);
        }
    }
    Ok(())
}
