//! TOML-based configuration system for grpsync.

use crate::error::{Result, SyncError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Shortest initial secret the provisioning step is allowed to generate.
pub const MIN_INITIAL_SECRET_LENGTH: usize = 12;

/// Top-level grpsync configuration, deserialized from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrpsyncConfig {
    /// Group names to reconcile, in processing order.
    pub groups: Vec<String>,
    pub ldap: LdapConfig,
    pub zabbix: ZabbixConfig,
    #[serde(default)]
    pub sync: SyncOptions,
}

/// LDAP directory connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LdapConfig {
    /// LDAP URL, e.g. `ldap://ldap.example.com:389` or `ldaps://...:636`.
    pub server: String,
    pub base_dn: String,
    /// Bind DN. An anonymous bind is used when absent.
    #[serde(default)]
    pub bind_dn: Option<String>,
    #[serde(default)]
    pub bind_password: Option<String>,
    #[serde(default)]
    pub starttls: bool,
    #[serde(default = "default_true")]
    pub tls_verify: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Zabbix API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZabbixConfig {
    /// Frontend base URL; the JSON-RPC endpoint is `<url>/api_jsonrpc.php`.
    pub url: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// API token. Takes precedence over `user`/`password` when set.
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub user_defaults: ZabbixUserDefaults,
}

/// Profile template applied to every account created in Zabbix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZabbixUserDefaults {
    #[serde(default = "default_home_url")]
    pub url: String,
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default)]
    pub autologin: u8,
    #[serde(default = "default_autologout")]
    pub autologout: String,
    #[serde(default = "default_refresh")]
    pub refresh: String,
    #[serde(default = "default_rows_per_page")]
    pub rows_per_page: u32,
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Role assigned to new accounts. `1` is the built-in non-privileged "User role".
    #[serde(default = "default_role_id")]
    pub role_id: String,
    /// User group every new account joins in addition to the reconciled ones.
    #[serde(default = "default_baseline_group_id")]
    pub baseline_group_id: String,
}

impl Default for ZabbixUserDefaults {
    fn default() -> Self {
        Self {
            url: default_home_url(),
            lang: default_lang(),
            autologin: 0,
            autologout: default_autologout(),
            refresh: default_refresh(),
            rows_per_page: default_rows_per_page(),
            theme: default_theme(),
            role_id: default_role_id(),
            baseline_group_id: default_baseline_group_id(),
        }
    }
}

/// What the engine does when creating or looking up a downstream account fails.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProvisioningFailurePolicy {
    /// Stop the current group without replacing its membership.
    #[default]
    AbortGroup,
    /// Leave the member out of the target set and keep going.
    SkipMember,
    /// Stop the whole pass.
    AbortRun,
}

/// Reconciliation behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncOptions {
    #[serde(default)]
    pub on_provisioning_error: ProvisioningFailurePolicy,
    #[serde(default = "default_initial_secret_length")]
    pub initial_secret_length: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            on_provisioning_error: ProvisioningFailurePolicy::default(),
            initial_secret_length: default_initial_secret_length(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_home_url() -> String {
    "/zabbix/dashboard.php".into()
}

fn default_lang() -> String {
    "en_GB".into()
}

fn default_autologout() -> String {
    "900".into()
}

fn default_refresh() -> String {
    "300".into()
}

fn default_rows_per_page() -> u32 {
    50
}

fn default_theme() -> String {
    "default".into()
}

fn default_role_id() -> String {
    "1".into()
}

fn default_baseline_group_id() -> String {
    "20".into()
}

fn default_initial_secret_length() -> usize {
    24
}

impl GrpsyncConfig {
    /// Load configuration from a TOML file at the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| SyncError::Config(format!("failed to parse config: {e}")))
    }

    /// Serialize the configuration back to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| SyncError::Config(format!("failed to serialize config: {e}")))
    }

    /// Validate the configuration, returning an error for invalid combinations.
    ///
    /// Runs before any network connection is opened.
    pub fn validate(&self) -> Result<()> {
        if self.groups.is_empty() {
            return Err(SyncError::Config(
                "groups must list at least one group".into(),
            ));
        }

        let mut seen = HashSet::new();
        for group in &self.groups {
            if group.trim().is_empty() {
                return Err(SyncError::Config("groups must not contain empty names".into()));
            }
            if !seen.insert(group.as_str()) {
                return Err(SyncError::Config(format!(
                    "groups contains duplicate entry: {group}"
                )));
            }
        }

        // LDAP validation
        if self.ldap.server.is_empty() {
            return Err(SyncError::Config("ldap.server must not be empty".into()));
        }
        if self.ldap.base_dn.is_empty() {
            return Err(SyncError::Config("ldap.base_dn must not be empty".into()));
        }
        if self.ldap.bind_dn.is_some() && self.ldap.bind_password.is_none() {
            return Err(SyncError::Config(
                "ldap.bind_password is required when ldap.bind_dn is set".into(),
            ));
        }

        // Zabbix validation
        if self.zabbix.url.is_empty() {
            return Err(SyncError::Config("zabbix.url must not be empty".into()));
        }
        if self.zabbix.api_token.is_none()
            && (self.zabbix.user.is_none() || self.zabbix.password.is_none())
        {
            return Err(SyncError::Config(
                "zabbix.api_token or both zabbix.user and zabbix.password are required".into(),
            ));
        }
        if self.zabbix.user_defaults.baseline_group_id.is_empty() {
            return Err(SyncError::Config(
                "zabbix.user_defaults.baseline_group_id must not be empty".into(),
            ));
        }

        if self.sync.initial_secret_length < MIN_INITIAL_SECRET_LENGTH {
            return Err(SyncError::Config(format!(
                "sync.initial_secret_length must be at least {MIN_INITIAL_SECRET_LENGTH}"
            )));
        }

        Ok(())
    }

    /// Generate a sensible default configuration.
    pub fn generate_default() -> Self {
        Self {
            groups: vec!["zabbix-users".into()],
            ldap: LdapConfig {
                server: "ldap://localhost:389".into(),
                base_dn: "dc=example,dc=com".into(),
                bind_dn: None,
                bind_password: None,
                starttls: false,
                tls_verify: true,
                timeout_secs: default_timeout_secs(),
            },
            zabbix: ZabbixConfig {
                url: "http://localhost/zabbix".into(),
                user: Some("Admin".into()),
                password: Some("zabbix".into()),
                api_token: None,
                timeout_secs: default_timeout_secs(),
                user_defaults: ZabbixUserDefaults::default(),
            },
            sync: SyncOptions::default(),
        }
    }
}
