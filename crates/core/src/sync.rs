//! Reconciliation engine: drives one pass over all configured groups.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::config::{ProvisioningFailurePolicy, SyncOptions};
use crate::connectors::{AccessSystem, DirectoryClient};
use crate::error::{Result, SyncError};
use crate::membership::resolve_members;
use crate::models::access::{GroupId, UserId};
use crate::models::sync::{GroupOutcome, GroupReport, SyncSummary};
use crate::provision::ensure_user;

/// Engine that makes access-system group membership match the directory.
pub struct ReconciliationEngine<D: DirectoryClient, A: AccessSystem> {
    directory: Arc<D>,
    access: Arc<A>,
    base_dn: String,
    options: SyncOptions,
}

impl<D: DirectoryClient, A: AccessSystem> ReconciliationEngine<D, A> {
    pub fn new(directory: Arc<D>, access: Arc<A>, base_dn: &str, options: SyncOptions) -> Self {
        Self {
            directory,
            access,
            base_dn: base_dn.to_string(),
            options,
        }
    }

    /// Reconcile every group in `groups`, in order.
    ///
    /// Group failures are recorded in the summary and never stop the pass,
    /// except a provisioning failure under [`ProvisioningFailurePolicy::AbortRun`],
    /// which is returned as [`SyncError::Aborted`].
    pub async fn run(&self, groups: &[String]) -> Result<SyncSummary> {
        let mut summary = SyncSummary::new();
        info!(run_id = %summary.run_id, groups = groups.len(), "starting reconciliation pass");

        for group in groups {
            self.reconcile_group(group, &mut summary).await?;
        }

        summary.finished_at = Some(Utc::now());
        info!(
            run_id = %summary.run_id,
            groups_synced = summary.groups_synced(),
            groups_skipped = summary.groups_skipped(),
            groups_failed = summary.groups_failed(),
            users_created = summary.users_created,
            errors = summary.errors,
            "reconciliation pass completed"
        );
        Ok(summary)
    }

    async fn reconcile_group(&self, group: &str, summary: &mut SyncSummary) -> Result<()> {
        info!(group, "beginning update of group");

        // The group shell is created before membership is known.
        let group_id = match self.access.find_or_create_group(group).await {
            Ok(id) => id,
            Err(e) => {
                error!(group, error = %e, "failed to find or create access-system group");
                summary.record_error(group, &e);
                push_report(summary, group, None, Vec::new(), skipped(&e));
                return Ok(());
            }
        };
        info!(group, group_id = %group_id, "access-system group resolved");

        // Directory failures are expected and tolerated: skip the group.
        let resolved = match resolve_members(self.directory.as_ref(), &self.base_dn, group).await
        {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!(group, error = %e, "directory lookup failed, skipping group");
                summary.record_error(group, &e);
                push_report(summary, group, Some(group_id), Vec::new(), skipped(&e));
                return Ok(());
            }
        };
        summary.members_skipped += resolved.skipped.len() as u32;

        let mut target: Vec<UserId> = Vec::with_capacity(resolved.members.len());
        for member in &resolved.members {
            match ensure_user(
                self.access.as_ref(),
                member,
                self.options.initial_secret_length,
            )
            .await
            {
                Ok(provisioned) => {
                    if provisioned.created {
                        summary.users_created += 1;
                    } else {
                        summary.users_found += 1;
                    }
                    target.push(provisioned.user_id);
                }
                // Access-system failures are unexpected: the configured policy
                // decides how far they reach.
                Err(e) => {
                    let scope = format!("{group}/{}", member.identifier);
                    summary.record_error(&scope, &e);
                    match self.options.on_provisioning_error {
                        ProvisioningFailurePolicy::SkipMember => {
                            warn!(group, user = %member.identifier, error = %e, "provisioning failed, leaving member out");
                            summary.members_skipped += 1;
                        }
                        ProvisioningFailurePolicy::AbortGroup => {
                            error!(group, user = %member.identifier, error = %e, "provisioning failed, group left partially processed");
                            push_report(summary, group, Some(group_id), target, partial(&e));
                            return Ok(());
                        }
                        ProvisioningFailurePolicy::AbortRun => {
                            error!(group, user = %member.identifier, error = %e, "provisioning failed, aborting pass");
                            push_report(summary, group, Some(group_id), target, partial(&e));
                            return Err(SyncError::Aborted {
                                group: group.to_string(),
                                reason: e.to_string(),
                            });
                        }
                    }
                }
            }
        }

        info!(group, group_id = %group_id, members = target.len(), "replacing group membership");
        match self
            .access
            .replace_group_membership(&group_id, &target)
            .await
        {
            Ok(()) => {
                push_report(summary, group, Some(group_id), target, GroupOutcome::Synced);
            }
            Err(e) => {
                let e = SyncError::MembershipReplacement {
                    group: group.to_string(),
                    reason: e.to_string(),
                };
                error!(group, error = %e, "membership replacement failed");
                summary.record_error(group, &e);
                let outcome = GroupOutcome::ReplaceFailed {
                    reason: e.to_string(),
                };
                push_report(summary, group, Some(group_id), target, outcome);
            }
        }
        Ok(())
    }
}

fn skipped(e: &SyncError) -> GroupOutcome {
    GroupOutcome::Skipped {
        reason: e.to_string(),
    }
}

fn partial(e: &SyncError) -> GroupOutcome {
    GroupOutcome::Partial {
        reason: e.to_string(),
    }
}

fn push_report(
    summary: &mut SyncSummary,
    group: &str,
    group_id: Option<GroupId>,
    members: Vec<UserId>,
    outcome: GroupOutcome,
) {
    summary.groups.push(GroupReport {
        group: group.to_string(),
        group_id,
        members,
        outcome,
    });
}
