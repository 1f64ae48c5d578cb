//! grpsync core -- reconciliation engine, configuration, and error types.
//!
//! The engine keeps access-system group membership in line with POSIX groups
//! in an LDAP directory. Directory and access-system access go through the
//! traits in [`connectors`].

pub mod config;
pub mod connectors;
pub mod error;
pub mod membership;
pub mod models;
pub mod password;
pub mod provision;
pub mod sync;

#[cfg(test)]
mod testing;
