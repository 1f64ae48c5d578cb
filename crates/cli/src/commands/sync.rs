use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use grpsync_core::config::GrpsyncConfig;
use grpsync_core::models::sync::{GroupOutcome, SyncSummary};
use grpsync_core::sync::ReconciliationEngine;
use grpsync_ldap::client::LdapDirectory;
use grpsync_zabbix::client::ZabbixClient;
use tracing::{error, info, warn};

/// Run the `sync` command: reconcile every configured group once.
pub async fn run(config_path: &str, json: bool) -> anyhow::Result<()> {
    let config = GrpsyncConfig::load(Path::new(config_path))?;
    config.validate()?;

    info!(
        config = %config_path,
        groups = config.groups.len(),
        "loaded configuration"
    );

    // No Zabbix session is opened until the directory is reachable.
    let directory = Arc::new(LdapDirectory::connect(&config.ldap).await?);
    let zabbix = match ZabbixClient::connect(&config.zabbix).await {
        Ok(client) => Arc::new(client),
        Err(e) => {
            if let Err(unbind_err) = directory.unbind().await {
                warn!(error = %unbind_err, "failed to close LDAP connection");
            }
            return Err(e.into());
        }
    };

    let engine = ReconciliationEngine::new(
        directory.clone(),
        zabbix.clone(),
        &config.ldap.base_dn,
        config.sync.clone(),
    );

    let start = Instant::now();
    let result = engine.run(&config.groups).await;

    if let Err(e) = directory.unbind().await {
        warn!(error = %e, "failed to close LDAP connection");
    }
    if let Err(e) = zabbix.logout().await {
        warn!(error = %e, "failed to close Zabbix session");
    }

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            error!("Reconciliation aborted: {e}");
            println!("Reconciliation aborted: {e}");
            return Err(e.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary, start.elapsed());
    }

    if !summary.is_clean() {
        anyhow::bail!(
            "{} of {} groups were not synced",
            summary.groups.len() - summary.groups_synced(),
            summary.groups.len()
        );
    }

    Ok(())
}

fn print_summary(summary: &SyncSummary, elapsed: Duration) {
    println!(
        "Reconciliation finished in {:.1}s (run {})",
        elapsed.as_secs_f64(),
        summary.run_id
    );
    for report in &summary.groups {
        let id = report
            .group_id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        let status = match &report.outcome {
            GroupOutcome::Synced => format!("synced, {} members", report.members.len()),
            GroupOutcome::Skipped { reason } => format!("skipped: {reason}"),
            GroupOutcome::Partial { reason } => format!("partial: {reason}"),
            GroupOutcome::ReplaceFailed { reason } => format!("not updated: {reason}"),
        };
        println!("  {} ({id}): {status}", report.group);
    }
    println!("  Groups synced:   {}", summary.groups_synced());
    println!("  Groups skipped:  {}", summary.groups_skipped());
    println!("  Groups failed:   {}", summary.groups_failed());
    println!("  Users created:   {}", summary.users_created);
    println!("  Users found:     {}", summary.users_found);
    println!("  Members skipped: {}", summary.members_skipped);
    println!("  Errors:          {}", summary.errors);

    if let Some(ref details) = summary.error_details {
        println!("  Error details:");
        for line in details.lines() {
            println!("    {}", line);
        }
    }
}
