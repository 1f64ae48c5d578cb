//! Zabbix JSON-RPC request/response structs.

use serde::{Deserialize, Serialize};

pub const JSONRPC_VERSION: &str = "2.0";

/// A JSON-RPC 2.0 request envelope.
#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest<'a, P: Serialize> {
    pub jsonrpc: &'static str,
    pub method: &'a str,
    pub params: P,
    /// Session or API token in the request body, for servers older than 6.4.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<&'a str>,
    pub id: u64,
}

/// A JSON-RPC 2.0 response envelope. Exactly one of `result` / `error` is set.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse<T> {
    pub result: Option<T>,
    #[serde(default)]
    pub error: Option<RpcError>,
    #[serde(default)]
    pub id: Option<u64>,
}

/// Error object returned by the Zabbix API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<String>,
}

impl std::fmt::Display for RpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code)?;
        if let Some(ref data) = self.data {
            write!(f, ": {data}")?;
        }
        Ok(())
    }
}

/// Parameters for `user.login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginParams<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Exact-match filter used by `*.get` calls.
#[derive(Debug, Clone, Serialize)]
pub struct GetParams<'a, F: Serialize> {
    pub output: &'a [&'a str],
    pub filter: F,
}

#[derive(Debug, Clone, Serialize)]
pub struct NameFilter<'a> {
    pub name: [&'a str; 1],
}

#[derive(Debug, Clone, Serialize)]
pub struct UsernameFilter<'a> {
    pub username: [&'a str; 1],
}

/// A user group as returned by `usergroup.get`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ZabbixUserGroup {
    pub usrgrpid: String,
    pub name: String,
}

/// A user as returned by `user.get`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ZabbixUser {
    pub userid: String,
    pub username: String,
}

/// Parameters for `usergroup.create`.
#[derive(Debug, Clone, Serialize)]
pub struct UserGroupCreate<'a> {
    pub name: &'a str,
}

/// Result of `usergroup.create` / `usergroup.update`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserGroupIds {
    pub usrgrpids: Vec<String>,
}

/// Result of `user.create`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserIds {
    pub userids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserGroupRef {
    pub usrgrpid: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserRef {
    pub userid: String,
}

/// Parameters for `user.create`.
#[derive(Debug, Clone, Serialize)]
pub struct UserCreate<'a> {
    pub username: &'a str,
    pub name: &'a str,
    pub surname: &'a str,
    pub passwd: &'a str,
    pub url: &'a str,
    pub lang: &'a str,
    pub autologin: u8,
    pub autologout: &'a str,
    pub refresh: &'a str,
    pub rows_per_page: u32,
    pub theme: &'a str,
    pub roleid: &'a str,
    pub usrgrps: Vec<UserGroupRef>,
}

/// Parameters for `usergroup.update` that replace the member list.
#[derive(Debug, Clone, Serialize)]
pub struct UserGroupMembersUpdate<'a> {
    pub usrgrpid: &'a str,
    pub users: Vec<UserRef>,
}
