//! grpsync Zabbix -- user group and account management over the Zabbix JSON-RPC API.
//!
//! [`client::ZabbixClient`] implements
//! [`grpsync_core::connectors::AccessSystem`].

pub mod client;
pub mod models;
