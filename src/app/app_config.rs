use anyhow::{bail, Result};
use std::path::PathBuf;

use crate::core::drive::{DocumentSpec, DriveEndpoints};
use crate::core::session::{SignInRequest, APP_DATA_SCOPE};
use crate::infra::google_auth::OAuthClientCredentials;

/// Which identity provider to sign in with.
#[derive(Debug, Clone)]
pub enum AuthConfig {
    StaticToken(String),
    RefreshToken(OAuthClientCredentials),
    ServiceAccountKeyFile(String),
    ServiceAccountJson(String),
}

/// Everything the binary reads from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub endpoints: DriveEndpoints,
    pub document: DocumentSpec,
    pub mirror_path: PathBuf,
    pub sign_in: SignInRequest,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let default_endpoints = DriveEndpoints::default();
        let endpoints = DriveEndpoints {
            api_base: lookup("DRIVE_API_BASE")
                .unwrap_or(default_endpoints.api_base)
                .trim_end_matches('/')
                .to_string(),
            upload_base: lookup("DRIVE_UPLOAD_BASE")
                .unwrap_or(default_endpoints.upload_base)
                .trim_end_matches('/')
                .to_string(),
        };

        let default_document = DocumentSpec::default();
        let document = DocumentSpec {
            name: lookup("BACKUP_FILE_NAME").unwrap_or(default_document.name),
            description: lookup("BACKUP_FILE_DESCRIPTION").unwrap_or(default_document.description),
            ..default_document
        };

        let mirror_path = lookup("BACKUP_MIRROR_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data").join(&document.name));

        let scopes = lookup("GOOGLE_OAUTH_SCOPES")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| vec![APP_DATA_SCOPE.to_string()]);

        let sign_in = SignInRequest {
            scopes,
            ..SignInRequest::default()
        };

        Ok(Self {
            endpoints,
            document,
            mirror_path,
            sign_in,
            auth: Self::auth_from_lookup(&lookup)?,
        })
    }

    fn auth_from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<AuthConfig> {
        if let Some(token) = lookup("GOOGLE_ACCESS_TOKEN") {
            return Ok(AuthConfig::StaticToken(token));
        }

        match (
            lookup("GOOGLE_CLIENT_ID"),
            lookup("GOOGLE_CLIENT_SECRET"),
            lookup("GOOGLE_REFRESH_TOKEN"),
        ) {
            (Some(client_id), Some(client_secret), Some(refresh_token)) => {
                return Ok(AuthConfig::RefreshToken(OAuthClientCredentials {
                    client_id,
                    client_secret,
                    refresh_token,
                }));
            }
            (None, None, None) => {}
            _ => bail!(
                "GOOGLE_CLIENT_ID, GOOGLE_CLIENT_SECRET and GOOGLE_REFRESH_TOKEN \
                 must be set together"
            ),
        }

        if let Some(path) = lookup("GOOGLE_SERVICE_ACCOUNT_KEY") {
            return Ok(AuthConfig::ServiceAccountKeyFile(path));
        }
        if let Some(json) = lookup("GOOGLE_SERVICE_ACCOUNT_JSON") {
            return Ok(AuthConfig::ServiceAccountJson(json));
        }

        bail!(
            "No Google credentials configured. Set GOOGLE_ACCESS_TOKEN, the GOOGLE_CLIENT_ID / \
             GOOGLE_CLIENT_SECRET / GOOGLE_REFRESH_TOKEN trio, or GOOGLE_SERVICE_ACCOUNT_KEY."
        )
    }
}
