use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoragePermission {
    Read,
    Write,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

#[derive(Debug, Error)]
pub enum PermissionError {
    #[error("Permission request failed: {0}")]
    Request(String),
}

/// Prompt shown to the user when a permission is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRationale {
    pub title: String,
    pub message: String,
}

impl PermissionRationale {
    pub fn for_permission(permission: StoragePermission) -> Self {
        match permission {
            StoragePermission::Read => Self {
                title: "Read your android storage Permission".to_string(),
                message: "Read your android storage to save your data".to_string(),
            },
            StoragePermission::Write => Self {
                title: "Write your android storage Permission".to_string(),
                message: "Write your android storage to save your data".to_string(),
            },
        }
    }
}

/// Device-level permission model.
#[async_trait]
pub trait PermissionPlatform: Send + Sync {
    async fn check(&self, permission: StoragePermission) -> bool;
    async fn request(
        &self,
        permission: StoragePermission,
        rationale: &PermissionRationale,
    ) -> Result<PermissionStatus, PermissionError>;
}

/// Startup check of shared-storage access.
///
/// Missing permissions are requested once and the outcome is logged. Nothing
/// waits on the gate: a denial shows up later as a failed mirror read or write.
pub struct StoragePermissionGate<P: PermissionPlatform> {
    platform: P,
}

impl<P: PermissionPlatform + 'static> StoragePermissionGate<P> {
    pub fn new(platform: P) -> Self {
        Self { platform }
    }

    /// Runs the gate on its own task.
    pub fn spawn(self) -> tokio::task::JoinHandle<Vec<(StoragePermission, PermissionStatus)>> {
        tokio::spawn(async move { self.run().await })
    }

    /// Checks write then read access, requesting whichever is missing.
    pub async fn run(&self) -> Vec<(StoragePermission, PermissionStatus)> {
        let mut outcomes = Vec::new();
        for permission in [StoragePermission::Write, StoragePermission::Read] {
            let granted = self.platform.check(permission).await;
            tracing::debug!(?permission, granted, "Checked storage permission");
            if granted {
                outcomes.push((permission, PermissionStatus::Granted));
                continue;
            }

            let rationale = PermissionRationale::for_permission(permission);
            let status = match self.platform.request(permission, &rationale).await {
                Ok(PermissionStatus::Granted) => {
                    tracing::info!(?permission, "Storage permission granted");
                    PermissionStatus::Granted
                }
                Ok(PermissionStatus::Denied) => {
                    tracing::warn!(?permission, "Storage permission denied");
                    PermissionStatus::Denied
                }
                Err(e) => {
                    tracing::warn!(?permission, "Storage permission request failed: {}", e);
                    PermissionStatus::Denied
                }
            };
            outcomes.push((permission, status));
        }
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashmap::DashMap;

    struct MockPlatform {
        held: DashMap<StoragePermission, bool>,
        grant_on_request: bool,
        requests: DashMap<StoragePermission, usize>,
    }

    impl MockPlatform {
        fn new(read: bool, write: bool, grant_on_request: bool) -> Self {
            let held = DashMap::new();
            held.insert(StoragePermission::Read, read);
            held.insert(StoragePermission::Write, write);
            Self {
                held,
                grant_on_request,
                requests: DashMap::new(),
            }
        }
    }

    #[async_trait]
    impl PermissionPlatform for MockPlatform {
        async fn check(&self, permission: StoragePermission) -> bool {
            self.held.get(&permission).map(|v| *v).unwrap_or(false)
        }

        async fn request(
            &self,
            permission: StoragePermission,
            rationale: &PermissionRationale,
        ) -> Result<PermissionStatus, PermissionError> {
            assert!(!rationale.title.is_empty());
            *self.requests.entry(permission).or_insert(0) += 1;
            if self.grant_on_request {
                self.held.insert(permission, true);
                Ok(PermissionStatus::Granted)
            } else {
                Ok(PermissionStatus::Denied)
            }
        }
    }

    #[test]
    fn test_rationale_names_android_storage() {
        assert_eq!(
            PermissionRationale::for_permission(StoragePermission::Read),
            PermissionRationale {
                title: "Read your android storage Permission".to_string(),
                message: "Read your android storage to save your data".to_string(),
            }
        );
        assert_eq!(
            PermissionRationale::for_permission(StoragePermission::Write),
            PermissionRationale {
                title: "Write your android storage Permission".to_string(),
                message: "Write your android storage to save your data".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_held_permissions_are_not_requested() {
        let gate = StoragePermissionGate::new(MockPlatform::new(true, true, false));
        let outcomes = gate.run().await;

        assert!(outcomes.iter().all(|(_, s)| *s == PermissionStatus::Granted));
        assert!(gate.platform.requests.is_empty());
    }

    #[tokio::test]
    async fn test_missing_permission_requested_once() {
        let gate = StoragePermissionGate::new(MockPlatform::new(true, false, true));
        let outcomes = gate.run().await;

        assert_eq!(
            outcomes,
            vec![
                (StoragePermission::Write, PermissionStatus::Granted),
                (StoragePermission::Read, PermissionStatus::Granted),
            ]
        );
        assert_eq!(
            gate.platform
                .requests
                .get(&StoragePermission::Write)
                .map(|v| *v),
            Some(1)
        );
        assert!(gate.platform.requests.get(&StoragePermission::Read).is_none());
    }

    #[tokio::test]
    async fn test_denial_is_reported_not_retried() {
        let gate = StoragePermissionGate::new(MockPlatform::new(false, false, false));
        let outcomes = gate.spawn().await.unwrap();

        assert_eq!(
            outcomes,
            vec![
                (StoragePermission::Write, PermissionStatus::Denied),
                (StoragePermission::Read, PermissionStatus::Denied),
            ]
        );
    }
}
