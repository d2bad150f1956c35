// =============================================================================
// GOOGLE AUTH MODULE
// =============================================================================
//
// Identity providers that produce a bearer token for the Drive app-data scope.
//
// **Authentication Options:**
// 1. **Static token**: a token obtained out of band, used as-is
// 2. **Refresh token** (offline access): redeems a user's refresh token and
//    optionally fetches their basic profile
// 3. **Service account**: JWT bearer grant signed with the account's key

pub mod refresh_token;
pub mod service_account;

pub use refresh_token::{OAuthClientCredentials, RefreshTokenProvider, StaticTokenProvider};
pub use service_account::ServiceAccountProvider;

use async_trait::async_trait;

use crate::core::session::{AuthError, AuthProvider, SignInRequest, SignedInUser};

/// Whichever provider the configuration selected.
pub enum GoogleAuthProvider {
    Static(StaticTokenProvider),
    RefreshToken(RefreshTokenProvider),
    ServiceAccount(ServiceAccountProvider),
}

impl GoogleAuthProvider {
    pub fn kind(&self) -> &'static str {
        match self {
            GoogleAuthProvider::Static(_) => "static token",
            GoogleAuthProvider::RefreshToken(_) => "refresh token",
            GoogleAuthProvider::ServiceAccount(_) => "service account",
        }
    }
}

#[async_trait]
impl AuthProvider for GoogleAuthProvider {
    async fn sign_in(&self, request: &SignInRequest) -> Result<SignedInUser, AuthError> {
        match self {
            GoogleAuthProvider::Static(p) => p.sign_in(request).await,
            GoogleAuthProvider::RefreshToken(p) => p.sign_in(request).await,
            GoogleAuthProvider::ServiceAccount(p) => p.sign_in(request).await,
        }
    }
}
