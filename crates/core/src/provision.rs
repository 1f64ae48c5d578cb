//! Downstream account provisioning.

use tracing::info;

use crate::connectors::AccessSystem;
use crate::error::{Result, SyncError};
use crate::models::access::{NewUserProfile, UserId};
use crate::models::directory::DirectoryMember;
use crate::password::generate_initial_secret;

/// Result of ensuring one member has a downstream account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provisioned {
    pub user_id: UserId,
    pub created: bool,
}

/// Return the downstream id for `member`, creating the account if it does not exist.
///
/// Existing accounts are returned untouched: profile fields are only written
/// at creation time.
pub async fn ensure_user(
    access: &dyn AccessSystem,
    member: &DirectoryMember,
    secret_length: usize,
) -> Result<Provisioned> {
    let existing = access
        .find_user_id(&member.identifier)
        .await
        .map_err(|e| provisioning_error(member, e))?;

    if let Some(user_id) = existing {
        info!(user = %member.identifier, user_id = %user_id, "found existing user");
        return Ok(Provisioned {
            user_id,
            created: false,
        });
    }

    let profile = NewUserProfile {
        identifier: member.identifier.clone(),
        given_name: member.given_name.clone(),
        surname: member.surname.clone(),
        initial_secret: generate_initial_secret(secret_length),
    };
    let user_id = access
        .create_user(&profile)
        .await
        .map_err(|e| provisioning_error(member, e))?;

    info!(user = %member.identifier, user_id = %user_id, "created user");
    Ok(Provisioned {
        user_id,
        created: true,
    })
}

fn provisioning_error(member: &DirectoryMember, cause: SyncError) -> SyncError {
    SyncError::Provisioning {
        identifier: member.identifier.clone(),
        reason: cause.to_string(),
    }
}
