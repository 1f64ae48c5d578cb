use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::access::{GroupId, UserId};

/// Terminal state of one group in one reconciliation pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GroupOutcome {
    /// Membership was replaced with the computed target.
    Synced,
    /// Nothing was changed for this group (directory lookup or group lookup failed).
    Skipped { reason: String },
    /// Provisioning stopped part-way; accounts may have been created but
    /// membership was not replaced.
    Partial { reason: String },
    /// The replace-membership call was rejected; pre-pass membership is kept.
    ReplaceFailed { reason: String },
}

impl GroupOutcome {
    pub fn is_synced(&self) -> bool {
        matches!(self, Self::Synced)
    }
}

/// Per-group result of a reconciliation pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroupReport {
    pub group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    /// Target membership. Only meaningful when the outcome is `Synced` or `ReplaceFailed`.
    pub members: Vec<UserId>,
    pub outcome: GroupOutcome,
}

/// Summary of a reconciliation pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SyncSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    pub groups: Vec<GroupReport>,
    pub users_created: u32,
    pub users_found: u32,
    pub members_skipped: u32,
    pub errors: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}

impl SyncSummary {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            groups: Vec::new(),
            users_created: 0,
            users_found: 0,
            members_skipped: 0,
            errors: 0,
            error_details: None,
        }
    }

    pub fn groups_synced(&self) -> usize {
        self.groups.iter().filter(|g| g.outcome.is_synced()).count()
    }

    pub fn groups_skipped(&self) -> usize {
        self.groups
            .iter()
            .filter(|g| matches!(g.outcome, GroupOutcome::Skipped { .. }))
            .count()
    }

    /// Groups that were attempted but ended `Partial` or `ReplaceFailed`.
    pub fn groups_failed(&self) -> usize {
        self.groups
            .iter()
            .filter(|g| {
                matches!(
                    g.outcome,
                    GroupOutcome::Partial { .. } | GroupOutcome::ReplaceFailed { .. }
                )
            })
            .count()
    }

    /// True when every processed group reached `Synced`.
    pub fn is_clean(&self) -> bool {
        self.groups.iter().all(|g| g.outcome.is_synced())
    }

    /// Record an error, incrementing the error count and appending
    /// the scope and message to the error details string.
    pub fn record_error(&mut self, scope: &str, error: &dyn std::fmt::Display) {
        self.errors += 1;
        let details = self.error_details.get_or_insert_with(String::new);
        details.push_str(&format!("{scope}: {error}\n"));
    }
}

impl Default for SyncSummary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(group: &str, outcome: GroupOutcome) -> GroupReport {
        GroupReport {
            group: group.to_string(),
            group_id: None,
            members: vec![],
            outcome,
        }
    }

    #[test]
    fn outcome_serialization_tagged() {
        let json = serde_json::to_string(&GroupOutcome::Synced).unwrap();
        assert_eq!(json, r#"{"status":"synced"}"#);

        let json = serde_json::to_string(&GroupOutcome::ReplaceFailed {
            reason: "denied".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"status":"replace_failed","reason":"denied"}"#);
    }

    #[test]
    fn counts_by_outcome() {
        let mut summary = SyncSummary::new();
        summary.groups.push(report("a", GroupOutcome::Synced));
        summary.groups.push(report(
            "b",
            GroupOutcome::Skipped {
                reason: "ldap down".into(),
            },
        ));
        summary.groups.push(report(
            "c",
            GroupOutcome::Partial {
                reason: "create failed".into(),
            },
        ));
        summary.groups.push(report(
            "d",
            GroupOutcome::ReplaceFailed {
                reason: "denied".into(),
            },
        ));

        assert_eq!(summary.groups_synced(), 1);
        assert_eq!(summary.groups_skipped(), 1);
        assert_eq!(summary.groups_failed(), 2);
        assert!(!summary.is_clean());
    }

    #[test]
    fn empty_summary_is_clean() {
        let summary = SyncSummary::default();
        assert!(summary.is_clean());
        assert_eq!(summary.errors, 0);
        assert!(summary.error_details.is_none());
    }

    #[test]
    fn record_error_appends_lines() {
        let mut summary = SyncSummary::new();
        summary.record_error("ops", &"directory unreachable");
        summary.record_error("ops/alice", &"create failed");
        assert_eq!(summary.errors, 2);
        assert_eq!(
            summary.error_details.as_deref(),
            Some("ops: directory unreachable\nops/alice: create failed\n")
        );
    }
}
