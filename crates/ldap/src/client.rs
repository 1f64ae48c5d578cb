//! LDAP client wrapper for POSIX directory lookups.

use std::time::Duration;

use async_trait::async_trait;
use grpsync_core::config::LdapConfig;
use grpsync_core::connectors::DirectoryClient;
use grpsync_core::error::{Result, SyncError};
use grpsync_core::models::directory::DirectoryMember;
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, Scope, SearchEntry};
use tracing::{debug, info, warn};

use crate::filter::{account_filter, group_filter, ACCOUNT_ATTRS, GROUP_ATTRS};
use crate::models::{PosixAccountEntry, PosixGroupEntry};

/// Directory client bound once and reused for every search in a pass.
pub struct LdapDirectory {
    ldap: Ldap,
    server: String,
    timeout: Duration,
}

impl LdapDirectory {
    /// Open the connection and bind. Anonymous when no bind DN is configured.
    pub async fn connect(config: &LdapConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let settings = LdapConnSettings::new()
            .set_conn_timeout(timeout)
            .set_starttls(config.starttls)
            .set_no_tls_verify(!config.tls_verify);
        let (conn, mut ldap) = LdapConnAsync::with_settings(settings, &config.server)
            .await
            .map_err(|e| SyncError::Directory(format!("LDAP connect failed: {e}")))?;

        ldap3::drive!(conn);

        if let Some(ref bind_dn) = config.bind_dn {
            let password = config.bind_password.as_deref().unwrap_or_default();
            ldap.with_timeout(timeout)
                .simple_bind(bind_dn, password)
                .await
                .map_err(|e| SyncError::Directory(format!("LDAP bind failed: {e}")))?
                .success()
                .map_err(|e| SyncError::Directory(format!("LDAP bind rejected: {e}")))?;
            debug!(server = %config.server, bind_dn = %bind_dn, "LDAP bind successful");
        } else {
            debug!(server = %config.server, "using anonymous LDAP session");
        }

        info!(server = %config.server, "connected to LDAP directory");
        Ok(Self {
            ldap,
            server: config.server.clone(),
            timeout,
        })
    }

    /// Close the connection.
    pub async fn unbind(&self) -> Result<()> {
        let mut ldap = self.ldap.clone();
        ldap.unbind()
            .await
            .map_err(|e| SyncError::Directory(format!("LDAP unbind failed: {e}")))?;
        debug!(server = %self.server, "LDAP connection closed");
        Ok(())
    }

    async fn search(&self, base_dn: &str, filter: &str, attrs: &[&str]) -> Result<Vec<SearchEntry>> {
        let mut ldap = self.ldap.clone();
        let (results, _) = ldap
            .with_timeout(self.timeout)
            .search(base_dn, Scope::Subtree, filter, attrs.to_vec())
            .await
            .map_err(|e| SyncError::Directory(format!("LDAP search failed: {e}")))?
            .success()
            .map_err(|e| SyncError::Directory(format!("LDAP search error: {e}")))?;

        Ok(results.into_iter().map(SearchEntry::construct).collect())
    }
}

#[async_trait]
impl DirectoryClient for LdapDirectory {
    async fn resolve_group_members(&self, base_dn: &str, group: &str) -> Result<Vec<String>> {
        let entries = self.search(base_dn, &group_filter(group), GROUP_ATTRS).await?;
        if entries.is_empty() {
            warn!(group, base_dn, "no posixGroup entry found");
        }

        let members = entries
            .iter()
            .map(PosixGroupEntry::from_search_entry)
            .flat_map(|g| {
                debug!(group, dn = %g.dn, members = g.member_uids.len(), "posixGroup entry read");
                g.member_uids
            })
            .collect();
        Ok(members)
    }

    async fn resolve_account(
        &self,
        base_dn: &str,
        identifier: &str,
    ) -> Result<Option<DirectoryMember>> {
        let entries = self
            .search(base_dn, &account_filter(identifier), ACCOUNT_ATTRS)
            .await?;
        if entries.len() > 1 {
            warn!(user = identifier, count = entries.len(), "multiple posixAccount entries, using the first");
        }

        let member = entries
            .iter()
            .filter_map(PosixAccountEntry::from_search_entry)
            .find_map(PosixAccountEntry::into_member);
        Ok(member)
    }
}
