// The infra module contains implementations of core traits.
// Each external collaborator gets its own submodule.

#[path = "google_drive/mod.rs"]
pub mod google_drive;

#[path = "local_files/mod.rs"]
pub mod local_files;

#[path = "google_auth/mod.rs"]
pub mod google_auth;

#[path = "permissions/fs_permissions.rs"]
pub mod permissions;
