use serde_json::Value;
use thiserror::Error;

/// Errors raised by the remote document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Network, socket or local file-system failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status. `body` is its JSON error payload verbatim.
    #[error("Remote API error ({status}): {body}")]
    RemoteApi { status: u16, body: Value },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not authorized: {0}")]
    Auth(String),

    /// A local mirror read or write was refused by the operating system.
    #[error("Permission denied for {0}")]
    PermissionDenied(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// True for failures of the transport or device I/O stack, as opposed to API-level failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, StoreError::Transport(_) | StoreError::PermissionDenied(_))
    }

    /// Maps an I/O error on `path`, keeping permission refusals distinguishable.
    pub fn from_io(path: &std::path::Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::PermissionDenied {
            StoreError::PermissionDenied(path.display().to_string())
        } else {
            StoreError::Transport(format!("{}: {}", path.display(), err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_io_permission_errors_stay_transport_class() {
        let err = StoreError::from_io(
            Path::new("/tmp/data.json"),
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, StoreError::PermissionDenied(_)));
        assert!(err.is_transport());

        let err = StoreError::from_io(
            Path::new("/tmp/data.json"),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(matches!(err, StoreError::Transport(_)));
        assert!(!StoreError::InvalidArgument("x".into()).is_transport());
    }
}
