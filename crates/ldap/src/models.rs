//! Typed views of the directory entries grpsync reads.

use grpsync_core::models::directory::DirectoryMember;
use ldap3::SearchEntry;

/// A `posixGroup` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosixGroupEntry {
    pub dn: String,
    pub cn: String,
    /// Raw `memberUid` values. May contain distinguished names.
    pub member_uids: Vec<String>,
}

impl PosixGroupEntry {
    pub fn from_search_entry(entry: &SearchEntry) -> Self {
        Self {
            dn: entry.dn.clone(),
            cn: first_attr(entry, "cn"),
            member_uids: attr_values(entry, "memberUid"),
        }
    }
}

/// A `posixAccount` entry. `uid` is required; everything else may be absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosixAccountEntry {
    pub dn: String,
    pub uid: String,
    pub given_name: Option<String>,
    pub sn: Option<String>,
    pub mail: Option<String>,
}

impl PosixAccountEntry {
    /// Parse an account entry. Returns `None` when `uid` is missing or empty.
    pub fn from_search_entry(entry: &SearchEntry) -> Option<Self> {
        let uid = first_attr(entry, "uid");
        if uid.trim().is_empty() {
            return None;
        }
        Some(Self {
            dn: entry.dn.clone(),
            uid,
            given_name: optional_attr(entry, "givenName"),
            sn: optional_attr(entry, "sn"),
            mail: optional_attr(entry, "mail"),
        })
    }

    pub fn into_member(self) -> Option<DirectoryMember> {
        DirectoryMember::new(
            self.uid,
            self.given_name.unwrap_or_default(),
            self.sn.unwrap_or_default(),
            self.mail,
        )
    }
}

/// All values of an attribute. Attribute names are matched case-insensitively.
fn attr_values(entry: &SearchEntry, attr: &str) -> Vec<String> {
    entry
        .attrs
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(attr))
        .map(|(_, values)| values.clone())
        .unwrap_or_default()
}

/// Extract the first value of an attribute, returning empty string if missing.
fn first_attr(entry: &SearchEntry, attr: &str) -> String {
    optional_attr(entry, attr).unwrap_or_default()
}

/// Extract the first value of an attribute as Option.
fn optional_attr(entry: &SearchEntry, attr: &str) -> Option<String> {
    attr_values(entry, attr).into_iter().next()
}
