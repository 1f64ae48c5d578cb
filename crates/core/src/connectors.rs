//! Collaborator traits consumed by the reconciliation engine.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::access::{GroupId, NewUserProfile, UserId};
use crate::models::directory::DirectoryMember;

/// Read-only view of the authoritative directory.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Raw member tokens of the group named `group` under `base_dn`.
    ///
    /// Tokens may be short usernames or full distinguished names.
    /// Fails with [`SyncError::Directory`](crate::error::SyncError::Directory).
    async fn resolve_group_members(&self, base_dn: &str, group: &str) -> Result<Vec<String>>;

    /// Profile of the account `identifier`, or `None` when no usable entry exists.
    async fn resolve_account(&self, base_dn: &str, identifier: &str)
        -> Result<Option<DirectoryMember>>;
}

/// Downstream system whose groups are kept in line with the directory.
#[async_trait]
pub trait AccessSystem: Send + Sync {
    async fn find_or_create_group(&self, name: &str) -> Result<GroupId>;

    /// Exact-match lookup by username.
    async fn find_user_id(&self, identifier: &str) -> Result<Option<UserId>>;

    async fn create_user(&self, profile: &NewUserProfile) -> Result<UserId>;

    /// Set the group's members to exactly `user_ids`. Members not listed are removed.
    async fn replace_group_membership(&self, group_id: &GroupId, user_ids: &[UserId])
        -> Result<()>;
}
