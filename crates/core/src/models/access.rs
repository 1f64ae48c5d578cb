//! Access-system identifiers and account templates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::password::InitialSecret;

/// Identifier the access system assigned to a user group. Opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub String);

/// Identifier the access system assigned to a user account. Opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Profile handed to the access system when an account has to be created.
///
/// The access-system client adds its own fixed template (role, locale,
/// timeouts, baseline group) on top of these fields.
#[derive(Debug, Clone)]
pub struct NewUserProfile {
    pub identifier: String,
    pub given_name: String,
    pub surname: String,
    pub initial_secret: InitialSecret,
}
