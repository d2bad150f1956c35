use async_trait::async_trait;
use thiserror::Error;

use crate::core::drive::{
    HttpTransport, LocalFileTransfer, RemoteDocumentStore, Session, UserProfile,
};

/// Scope granting access to the application's private data folder only.
pub const APP_DATA_SCOPE: &str = "https://www.googleapis.com/auth/drive.appdata";

#[derive(Debug, Error)]
pub enum AuthError {
    /// Whatever the identity provider reported, passed through untouched.
    #[error("Sign-in failed: {0}")]
    Provider(String),
    #[error("Sign-in returned no access token")]
    NoToken,
    #[error("Invalid credentials: {0}")]
    Credentials(String),
}

/// How the identity provider should be configured for a sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInRequest {
    pub scopes: Vec<String>,
    pub fetch_basic_profile: bool,
    pub offline_access: bool,
}

impl Default for SignInRequest {
    fn default() -> Self {
        Self {
            scopes: vec![APP_DATA_SCOPE.to_string()],
            fetch_basic_profile: true,
            offline_access: true,
        }
    }
}

/// What a successful sign-in hands back.
#[derive(Debug, Clone, Default)]
pub struct SignedInUser {
    pub access_token: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// Identity provider that can produce a bearer token on demand.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, request: &SignInRequest) -> Result<SignedInUser, AuthError>;
}

/// Signs in and turns the resulting token into a store session.
pub struct SessionBootstrap<P: AuthProvider> {
    provider: P,
    request: SignInRequest,
}

impl<P: AuthProvider> SessionBootstrap<P> {
    #[cfg(test)]
    pub fn new(provider: P) -> Self {
        Self::with_request(provider, SignInRequest::default())
    }

    pub fn with_request(provider: P, request: SignInRequest) -> Self {
        Self { provider, request }
    }

    pub async fn sign_in<H, F>(
        &self,
        store: &RemoteDocumentStore<H, F>,
    ) -> Result<Session, AuthError>
    where
        H: HttpTransport,
        F: LocalFileTransfer,
    {
        let user = self.provider.sign_in(&self.request).await?;
        if user.access_token.trim().is_empty() {
            tracing::warn!("Identity provider returned an empty access token");
            return Err(AuthError::NoToken);
        }

        let session = store
            .authorize(user.access_token)
            .map_err(|_| AuthError::NoToken)?
            .with_profile(UserProfile {
                email: user.email,
                display_name: user.display_name,
            });

        tracing::info!(
            email = session.profile().email.as_deref().unwrap_or("unknown"),
            "Signed in"
        );
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::drive::{DocumentSpec, DriveEndpoints, DriveRequest, DriveResponse, StoreError};
    use std::path::Path;
    use std::sync::Mutex;

    struct UnusedHttp;

    #[async_trait]
    impl HttpTransport for UnusedHttp {
        async fn send(&self, _request: DriveRequest) -> Result<DriveResponse, StoreError> {
            Err(StoreError::Transport("not expected".into()))
        }
    }

    #[async_trait]
    impl LocalFileTransfer for UnusedHttp {
        async fn download_to(&self, _r: DriveRequest, _d: &Path) -> Result<u64, StoreError> {
            Err(StoreError::Transport("not expected".into()))
        }

        async fn read_text(&self, _path: &Path) -> Result<String, StoreError> {
            Err(StoreError::Transport("not expected".into()))
        }
    }

    struct MockProvider {
        result: Result<SignedInUser, String>,
        seen: Mutex<Option<SignInRequest>>,
    }

    #[async_trait]
    impl AuthProvider for MockProvider {
        async fn sign_in(&self, request: &SignInRequest) -> Result<SignedInUser, AuthError> {
            *self.seen.lock().unwrap() = Some(request.clone());
            self.result.clone().map_err(AuthError::Provider)
        }
    }

    fn store() -> RemoteDocumentStore<UnusedHttp, UnusedHttp> {
        RemoteDocumentStore::new(
            UnusedHttp,
            UnusedHttp,
            DriveEndpoints::default(),
            DocumentSpec::default(),
            "data.json",
        )
    }

    #[tokio::test]
    async fn test_sign_in_configures_provider_and_installs_token() {
        let provider = MockProvider {
            result: Ok(SignedInUser {
                access_token: "ya29.token".to_string(),
                email: Some("me@example.com".to_string()),
                display_name: None,
            }),
            seen: Mutex::new(None),
        };
        let bootstrap = SessionBootstrap::new(provider);

        let session = bootstrap.sign_in(&store()).await.unwrap();
        assert_eq!(session.bearer_token(), "ya29.token");
        assert_eq!(session.profile().email.as_deref(), Some("me@example.com"));

        let seen = bootstrap.provider.seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen.scopes, vec![APP_DATA_SCOPE.to_string()]);
        assert!(seen.fetch_basic_profile);
        assert!(seen.offline_access);
    }

    #[tokio::test]
    async fn test_empty_token_is_refused() {
        let bootstrap = SessionBootstrap::new(MockProvider {
            result: Ok(SignedInUser::default()),
            seen: Mutex::new(None),
        });
        assert!(matches!(
            bootstrap.sign_in(&store()).await,
            Err(AuthError::NoToken)
        ));
    }

    #[tokio::test]
    async fn test_provider_error_propagates_unmodified() {
        let bootstrap = SessionBootstrap::new(MockProvider {
            result: Err("user cancelled".to_string()),
            seen: Mutex::new(None),
        });
        match bootstrap.sign_in(&store()).await {
            Err(AuthError::Provider(msg)) => assert_eq!(msg, "user cancelled"),
            other => panic!("unexpected {:?}", other.map(|s| s.profile().clone())),
        }
    }
}
