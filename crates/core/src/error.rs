//! Error types for grpsync.

use thiserror::Error;

/// Top-level error type for all grpsync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A directory search failed at the protocol or query level.
    #[error("directory search error: {0}")]
    Directory(String),

    /// Transport or API failure reported by the access-system client.
    #[error("access system error: {0}")]
    AccessSystem(String),

    #[error("provisioning failed for {identifier}: {reason}")]
    Provisioning { identifier: String, reason: String },

    #[error("membership replacement failed for group {group}: {reason}")]
    MembershipReplacement { group: String, reason: String },

    /// A provisioning failure escalated to the whole pass.
    #[error("reconciliation pass aborted in group {group}: {reason}")]
    Aborted { group: String, reason: String },
}

/// A convenience Result alias that defaults to [`SyncError`].
pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = SyncError::Config("missing field".into());
        assert_eq!(err.to_string(), "configuration error: missing field");
    }

    #[test]
    fn io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = SyncError::from(io_err);
        assert!(matches!(err, SyncError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn directory_error_display() {
        let err = SyncError::Directory("no such object".into());
        assert_eq!(err.to_string(), "directory search error: no such object");
    }

    #[test]
    fn provisioning_error_names_identifier() {
        let err = SyncError::Provisioning {
            identifier: "alice".into(),
            reason: "timeout".into(),
        };
        assert_eq!(err.to_string(), "provisioning failed for alice: timeout");
    }

    #[test]
    fn replacement_error_names_group() {
        let err = SyncError::MembershipReplacement {
            group: "ops".into(),
            reason: "permission denied".into(),
        };
        assert!(err.to_string().contains("group ops"));
        assert!(err.to_string().contains("permission denied"));
    }
}
