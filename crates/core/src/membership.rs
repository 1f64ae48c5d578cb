//! Group membership resolution against the directory.

use tracing::{debug, warn};

use crate::connectors::DirectoryClient;
use crate::error::Result;
use crate::models::directory::DirectoryMember;

/// Members of one directory group, plus what was left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedMembership {
    /// Resolved members in directory order.
    pub members: Vec<DirectoryMember>,
    /// Tokens dropped because they were distinguished names or blank.
    pub dropped_tokens: Vec<String>,
    /// Candidates whose account lookup failed or found nothing.
    pub skipped: Vec<String>,
}

/// Whether a raw `memberUid` token is a distinguished name rather than a username.
///
/// Some directories store `uid=bob,ou=people,dc=x` where a bare `bob` belongs.
/// A DN always starts with an `attr=` RDN; POSIX usernames cannot contain `=`.
pub fn is_distinguished_name(token: &str) -> bool {
    match token.trim().split_once('=') {
        Some((attr, _)) => {
            !attr.is_empty()
                && attr
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
        }
        None => false,
    }
}

/// Split raw member tokens into username candidates and dropped tokens.
pub fn candidate_identifiers(tokens: &[String]) -> (Vec<String>, Vec<String>) {
    let mut candidates = Vec::with_capacity(tokens.len());
    let mut dropped = Vec::new();
    for token in tokens {
        let trimmed = token.trim();
        if trimmed.is_empty() || is_distinguished_name(trimmed) {
            dropped.push(token.clone());
        } else {
            candidates.push(trimmed.to_string());
        }
    }
    (candidates, dropped)
}

/// Resolve the members of `group` to directory profiles.
///
/// A failed group search is returned as an error; the caller skips the group.
/// A failed or empty account search only drops that one member.
pub async fn resolve_members(
    directory: &dyn DirectoryClient,
    base_dn: &str,
    group: &str,
) -> Result<ResolvedMembership> {
    let tokens = directory.resolve_group_members(base_dn, group).await?;
    let (candidates, dropped_tokens) = candidate_identifiers(&tokens);

    debug!(
        group,
        tokens = tokens.len(),
        candidates = candidates.len(),
        "directory group membership read"
    );
    for token in &dropped_tokens {
        debug!(group, token = %token, "ignoring non-username member token");
    }

    let mut resolution = ResolvedMembership {
        members: Vec::with_capacity(candidates.len()),
        dropped_tokens,
        skipped: Vec::new(),
    };

    for identifier in candidates {
        match directory.resolve_account(base_dn, &identifier).await {
            Ok(Some(member)) => resolution.members.push(member),
            Ok(None) => {
                warn!(group, user = %identifier, "no directory account found, skipping member");
                resolution.skipped.push(identifier);
            }
            Err(e) => {
                warn!(group, user = %identifier, error = %e, "account lookup failed, skipping member");
                resolution.skipped.push(identifier);
            }
        }
    }

    Ok(resolution)
}
