//! Typed reqwest wrapper for the Zabbix JSON-RPC API.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use grpsync_core::config::{ZabbixConfig, ZabbixUserDefaults};
use grpsync_core::connectors::AccessSystem;
use grpsync_core::error::{Result, SyncError};
use grpsync_core::models::access::{GroupId, NewUserProfile, UserId};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::models::{
    GetParams, LoginParams, NameFilter, RpcRequest, RpcResponse, UserCreate, UserGroupCreate,
    UserGroupIds, UserGroupMembersUpdate, UserGroupRef, UserIds, UserRef, UsernameFilter,
    ZabbixUser, ZabbixUserGroup, JSONRPC_VERSION,
};

const API_PATH: &str = "api_jsonrpc.php";

/// First release that accepts `Authorization: Bearer`. Older servers only read
/// the token from the request body.
const BEARER_AUTH_SINCE: (u32, u32) = (6, 4);

/// JSON-RPC client for one Zabbix frontend.
pub struct ZabbixClient {
    http: reqwest::Client,
    endpoint: String,
    auth_token: Option<String>,
    /// True when the token came from `user.login` and must be logged out.
    owns_session: bool,
    /// Send the token in the `auth` body field instead of a bearer header.
    body_auth: bool,
    user_defaults: ZabbixUserDefaults,
    next_id: AtomicU64,
}

impl ZabbixClient {
    /// Build an unauthenticated client. No request is sent.
    pub fn new(config: &ZabbixConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SyncError::AccessSystem(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: format!("{}/{API_PATH}", config.url.trim_end_matches('/')),
            auth_token: None,
            owns_session: false,
            body_auth: false,
            user_defaults: config.user_defaults.clone(),
            next_id: AtomicU64::new(1),
        })
    }

    /// Build the client, detect the server version and authenticate.
    ///
    /// A configured API token is used as-is; otherwise `user.login` opens a session.
    pub async fn connect(config: &ZabbixConfig) -> Result<Self> {
        let mut client = Self::new(config)?;

        let version = client.api_version().await?;
        client.body_auth = !supports_bearer_auth(&version);
        debug!(
            endpoint = %client.endpoint,
            version = %version,
            body_auth = client.body_auth,
            "detected Zabbix API version"
        );

        if let Some(ref token) = config.api_token {
            client.auth_token = Some(token.clone());
            debug!(endpoint = %client.endpoint, "using Zabbix API token");
        } else {
            let (Some(user), Some(password)) = (&config.user, &config.password) else {
                return Err(SyncError::Config(
                    "zabbix.user and zabbix.password are required without zabbix.api_token"
                        .into(),
                ));
            };
            let session: String = client
                .send(
                    "user.login",
                    LoginParams {
                        username: user,
                        password,
                    },
                    false,
                )
                .await?;
            client.auth_token = Some(session);
            client.owns_session = true;
            debug!(endpoint = %client.endpoint, user = %user, "Zabbix login successful");
        }

        info!(endpoint = %client.endpoint, version = %version, "connected to Zabbix API");
        Ok(client)
    }

    /// The JSON-RPC endpoint this client posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// API version reported by the server. Sent without credentials.
    pub async fn api_version(&self) -> Result<String> {
        self.send("apiinfo.version", Vec::<String>::new(), false)
            .await
    }

    /// End the session opened by `connect`. No-op for API tokens.
    pub async fn logout(&self) -> Result<()> {
        if !self.owns_session {
            return Ok(());
        }
        let _: bool = self.call("user.logout", Vec::<String>::new()).await?;
        debug!(endpoint = %self.endpoint, "Zabbix session closed");
        Ok(())
    }

    async fn call<P: Serialize, T: DeserializeOwned>(&self, method: &str, params: P) -> Result<T> {
        self.send(method, params, true).await
    }

    async fn send<P: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
        authenticated: bool,
    ) -> Result<T> {
        let token = if authenticated {
            self.auth_token.as_deref()
        } else {
            None
        };

        let request = RpcRequest {
            jsonrpc: JSONRPC_VERSION,
            method,
            params,
            auth: token.filter(|_| self.body_auth),
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
        };

        let mut req = self.http.post(&self.endpoint).json(&request);
        if let Some(token) = token.filter(|_| !self.body_auth) {
            req = req.bearer_auth(token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| SyncError::AccessSystem(format!("{method} request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::AccessSystem(format!(
                "{method} failed ({status}): {body}"
            )));
        }

        let body = resp
            .json::<RpcResponse<T>>()
            .await
            .map_err(|e| SyncError::AccessSystem(format!("{method} parse failed: {e}")))?;

        if let Some(err) = body.error {
            return Err(SyncError::AccessSystem(format!("{method} failed: {err}")));
        }
        body.result
            .ok_or_else(|| SyncError::AccessSystem(format!("{method} returned no result")))
    }
}

/// Whether a server reporting `version` reads the bearer header.
///
/// Unparseable versions are treated as current releases.
fn supports_bearer_auth(version: &str) -> bool {
    let mut parts = version.trim().split('.').map(str::parse::<u32>);
    match (parts.next(), parts.next()) {
        (Some(Ok(major)), Some(Ok(minor))) => (major, minor) >= BEARER_AUTH_SINCE,
        _ => true,
    }
}

fn first_id(ids: Vec<String>, method: &str) -> Result<String> {
    ids.into_iter()
        .next()
        .ok_or_else(|| SyncError::AccessSystem(format!("{method} returned no id")))
}

#[async_trait]
impl AccessSystem for ZabbixClient {
    async fn find_or_create_group(&self, name: &str) -> Result<GroupId> {
        let groups: Vec<ZabbixUserGroup> = self
            .call(
                "usergroup.get",
                GetParams {
                    output: &["usrgrpid", "name"],
                    filter: NameFilter { name: [name] },
                },
            )
            .await?;

        if let Some(group) = groups.into_iter().find(|g| g.name == name) {
            debug!(group = name, group_id = %group.usrgrpid, "found existing user group");
            return Ok(GroupId(group.usrgrpid));
        }

        let created: UserGroupIds = self
            .call("usergroup.create", UserGroupCreate { name })
            .await?;
        let id = first_id(created.usrgrpids, "usergroup.create")?;
        info!(group = name, group_id = %id, "created user group");
        Ok(GroupId(id))
    }

    async fn find_user_id(&self, identifier: &str) -> Result<Option<UserId>> {
        let users: Vec<ZabbixUser> = self
            .call(
                "user.get",
                GetParams {
                    output: &["userid", "username"],
                    filter: UsernameFilter {
                        username: [identifier],
                    },
                },
            )
            .await?;

        Ok(users
            .into_iter()
            .find(|u| u.username == identifier)
            .map(|u| UserId(u.userid)))
    }

    async fn create_user(&self, profile: &NewUserProfile) -> Result<UserId> {
        let defaults = &self.user_defaults;
        let params = UserCreate {
            username: &profile.identifier,
            name: &profile.given_name,
            surname: &profile.surname,
            passwd: profile.initial_secret.expose(),
            url: &defaults.url,
            lang: &defaults.lang,
            autologin: defaults.autologin,
            autologout: &defaults.autologout,
            refresh: &defaults.refresh,
            rows_per_page: defaults.rows_per_page,
            theme: &defaults.theme,
            roleid: &defaults.role_id,
            usrgrps: vec![UserGroupRef {
                usrgrpid: defaults.baseline_group_id.clone(),
            }],
        };

        let created: UserIds = self.call("user.create", params).await?;
        let id = first_id(created.userids, "user.create")?;
        Ok(UserId(id))
    }

    async fn replace_group_membership(&self, group_id: &GroupId, user_ids: &[UserId]) -> Result<()> {
        let params = UserGroupMembersUpdate {
            usrgrpid: &group_id.0,
            users: user_ids
                .iter()
                .map(|id| UserRef {
                    userid: id.0.clone(),
                })
                .collect(),
        };

        let _: UserGroupIds = self.call("usergroup.update", params).await?;
        debug!(group_id = %group_id, members = user_ids.len(), "user group membership replaced");
        Ok(())
    }
}
