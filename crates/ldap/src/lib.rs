//! grpsync LDAP -- directory lookups for POSIX groups and accounts.
//!
//! Implements [`grpsync_core::connectors::DirectoryClient`] over a single
//! `ldap3` connection held for the whole reconciliation pass.

pub mod client;
pub mod filter;
pub mod models;
