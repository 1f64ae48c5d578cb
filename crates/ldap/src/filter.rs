//! Search filters for POSIX group and account entries.

use ldap3::ldap_escape;

/// Attributes requested for a group entry.
pub const GROUP_ATTRS: &[&str] = &["cn", "memberUid"];

/// Attributes requested for an account entry.
pub const ACCOUNT_ATTRS: &[&str] = &["uid", "givenName", "sn", "mail"];

/// Filter matching the `posixGroup` entry named `group`.
pub fn group_filter(group: &str) -> String {
    format!("(&(objectClass=posixGroup)(cn={}))", ldap_escape(group))
}

/// Filter matching the `posixAccount` entry with username `uid`.
pub fn account_filter(uid: &str) -> String {
    format!("(&(objectClass=posixAccount)(uid={}))", ldap_escape(uid))
}
