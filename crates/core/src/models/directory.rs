//! Directory-side identities.

use serde::{Deserialize, Serialize};

/// A resolved directory account that belongs to a reconciled group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryMember {
    /// Short username (`uid`). Never empty.
    pub identifier: String,
    pub given_name: String,
    pub surname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mail: Option<String>,
}

impl DirectoryMember {
    /// Build a member, rejecting records without an identifier.
    pub fn new(
        identifier: impl Into<String>,
        given_name: impl Into<String>,
        surname: impl Into<String>,
        mail: Option<String>,
    ) -> Option<Self> {
        let identifier = identifier.into();
        if identifier.trim().is_empty() {
            return None;
        }
        Some(Self {
            identifier,
            given_name: given_name.into(),
            surname: surname.into(),
            mail: mail.filter(|m| !m.is_empty()),
        })
    }
}
