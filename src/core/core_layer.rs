// The core module contains the platform-agnostic logic.
// Every external collaborator (HTTP, local files, identity provider,
// device permissions) is a trait here and implemented in `infra/`.

#[path = "drive/mod.rs"]
pub mod drive;

#[path = "session/session_bootstrap.rs"]
pub mod session;

#[path = "permissions/permission_gate.rs"]
pub mod permissions;

#[path = "backup/backup_service.rs"]
pub mod backup;
