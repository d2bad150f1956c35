use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::core::session::{AuthError, AuthProvider, SignInRequest, SignedInUser};

const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URI: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// OAuth client registration plus the refresh token granted by an earlier
/// offline-access consent.
#[derive(Debug, Clone)]
pub struct OAuthClientCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    email: Option<String>,
    name: Option<String>,
}

/// Signs in as the end user by redeeming their refresh token.
pub struct RefreshTokenProvider {
    credentials: OAuthClientCredentials,
    client: Client,
    token_uri: String,
    userinfo_uri: String,
}

impl RefreshTokenProvider {
    pub fn new(credentials: OAuthClientCredentials) -> Self {
        Self {
            credentials,
            client: Client::new(),
            token_uri: TOKEN_URI.to_string(),
            userinfo_uri: USERINFO_URI.to_string(),
        }
    }

    fn form(&self, request: &SignInRequest) -> Vec<(&'static str, String)> {
        let mut form = vec![
            ("grant_type", "refresh_token".to_string()),
            ("client_id", self.credentials.client_id.clone()),
            ("client_secret", self.credentials.client_secret.clone()),
            ("refresh_token", self.credentials.refresh_token.clone()),
        ];
        if !request.scopes.is_empty() {
            form.push(("scope", request.scopes.join(" ")));
        }
        form
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<UserInfo, AuthError> {
        let response = self
            .client
            .get(&self.userinfo_uri)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AuthError::Provider(format!(
                "Profile request failed ({}): {}",
                status, text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))
    }
}

#[async_trait]
impl AuthProvider for RefreshTokenProvider {
    async fn sign_in(&self, request: &SignInRequest) -> Result<SignedInUser, AuthError> {
        if !request.offline_access {
            tracing::debug!("Offline access not requested; refresh token is used regardless");
        }

        let response = self
            .client
            .post(&self.token_uri)
            .form(&self.form(request))
            .send()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AuthError::Provider(format!(
                "Token refresh failed ({}): {}",
                status, text
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        let mut user = SignedInUser {
            access_token: token.access_token,
            ..SignedInUser::default()
        };
        if request.fetch_basic_profile {
            let profile = self.fetch_profile(&user.access_token).await?;
            user.email = profile.email;
            user.display_name = profile.name;
        }
        Ok(user)
    }
}

/// Hands out a token obtained elsewhere, e.g. pasted from an OAuth playground.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl AuthProvider for StaticTokenProvider {
    async fn sign_in(&self, _request: &SignInRequest) -> Result<SignedInUser, AuthError> {
        Ok(SignedInUser {
            access_token: self.token.clone(),
            ..SignedInUser::default()
        })
    }
}
