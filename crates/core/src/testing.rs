//! In-memory collaborators shared by the engine tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::connectors::{AccessSystem, DirectoryClient};
use crate::error::{Result, SyncError};
use crate::models::access::{GroupId, NewUserProfile, UserId};
use crate::models::directory::DirectoryMember;

pub fn member(identifier: &str, given_name: &str, surname: &str) -> DirectoryMember {
    DirectoryMember::new(identifier, given_name, surname, None).unwrap()
}

#[derive(Default)]
pub struct FakeDirectory {
    groups: HashMap<String, Vec<String>>,
    failing_groups: HashSet<String>,
    accounts: HashMap<String, DirectoryMember>,
    failing_accounts: HashSet<String>,
    pub account_lookups: Mutex<Vec<String>>,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(mut self, name: &str, tokens: &[&str]) -> Self {
        self.groups.insert(
            name.to_string(),
            tokens.iter().map(|t| t.to_string()).collect(),
        );
        self
    }

    pub fn with_failing_group(mut self, name: &str) -> Self {
        self.failing_groups.insert(name.to_string());
        self
    }

    pub fn with_account(mut self, member: DirectoryMember) -> Self {
        self.accounts.insert(member.identifier.clone(), member);
        self
    }

    pub fn with_failing_account(mut self, identifier: &str) -> Self {
        self.failing_accounts.insert(identifier.to_string());
        self
    }
}

#[async_trait]
impl DirectoryClient for FakeDirectory {
    async fn resolve_group_members(&self, _base_dn: &str, group: &str) -> Result<Vec<String>> {
        if self.failing_groups.contains(group) {
            return Err(SyncError::Directory(format!("search for {group} failed")));
        }
        Ok(self.groups.get(group).cloned().unwrap_or_default())
    }

    async fn resolve_account(
        &self,
        _base_dn: &str,
        identifier: &str,
    ) -> Result<Option<DirectoryMember>> {
        self.account_lookups
            .lock()
            .unwrap()
            .push(identifier.to_string());
        if self.failing_accounts.contains(identifier) {
            return Err(SyncError::Directory(format!(
                "search for {identifier} failed"
            )));
        }
        Ok(self.accounts.get(identifier).cloned())
    }
}

/// A stored downstream account.
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub id: UserId,
    pub identifier: String,
    pub given_name: String,
    pub surname: String,
    pub secret: String,
}

#[derive(Default)]
pub struct FakeAccessSystem {
    next_id: Mutex<u64>,
    pub groups: Mutex<Vec<(GroupId, String)>>,
    pub users: Mutex<Vec<StoredUser>>,
    pub memberships: Mutex<HashMap<GroupId, Vec<UserId>>>,
    pub replace_calls: Mutex<Vec<(GroupId, Vec<UserId>)>>,
    pub groups_created: Mutex<u32>,
    pub users_created: Mutex<u32>,
    failing_group_lookups: HashSet<String>,
    failing_user_lookups: HashSet<String>,
    failing_creates: HashSet<String>,
    failing_replacements: HashSet<String>,
}

impl FakeAccessSystem {
    pub fn new() -> Self {
        Self {
            next_id: Mutex::new(100),
            ..Default::default()
        }
    }

    fn allocate(&self) -> String {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        next.to_string()
    }

    pub fn with_group(self, id: &str, name: &str, members: &[&str]) -> Self {
        let gid = GroupId::from(id);
        self.groups.lock().unwrap().push((gid.clone(), name.to_string()));
        self.memberships
            .lock()
            .unwrap()
            .insert(gid, members.iter().map(|m| UserId::from(*m)).collect());
        self
    }

    pub fn with_user(self, id: &str, identifier: &str, surname: &str) -> Self {
        self.users.lock().unwrap().push(StoredUser {
            id: UserId::from(id),
            identifier: identifier.to_string(),
            given_name: String::new(),
            surname: surname.to_string(),
            secret: String::new(),
        });
        self
    }

    pub fn with_failing_group_lookup(mut self, name: &str) -> Self {
        self.failing_group_lookups.insert(name.to_string());
        self
    }

    pub fn with_failing_lookup(mut self, identifier: &str) -> Self {
        self.failing_user_lookups.insert(identifier.to_string());
        self
    }

    pub fn with_failing_create(mut self, identifier: &str) -> Self {
        self.failing_creates.insert(identifier.to_string());
        self
    }

    /// Replacement fails for the group with this id.
    pub fn with_failing_replacement(mut self, group_id: &str) -> Self {
        self.failing_replacements.insert(group_id.to_string());
        self
    }

    pub fn user(&self, identifier: &str) -> Option<StoredUser> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.identifier == identifier)
            .cloned()
    }

    pub fn group_id(&self, name: &str) -> Option<GroupId> {
        self.groups
            .lock()
            .unwrap()
            .iter()
            .find(|(_, n)| n == name)
            .map(|(id, _)| id.clone())
    }

    pub fn members_of(&self, name: &str) -> Vec<UserId> {
        let id = self.group_id(name).expect("group should exist");
        self.memberships
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn replace_call_count(&self) -> usize {
        self.replace_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl AccessSystem for FakeAccessSystem {
    async fn find_or_create_group(&self, name: &str) -> Result<GroupId> {
        if self.failing_group_lookups.contains(name) {
            return Err(SyncError::AccessSystem(format!("usergroup.get {name} failed")));
        }
        if let Some(id) = self.group_id(name) {
            return Ok(id);
        }
        let id = GroupId(self.allocate());
        self.groups.lock().unwrap().push((id.clone(), name.to_string()));
        *self.groups_created.lock().unwrap() += 1;
        Ok(id)
    }

    async fn find_user_id(&self, identifier: &str) -> Result<Option<UserId>> {
        if self.failing_user_lookups.contains(identifier) {
            return Err(SyncError::AccessSystem(format!("user.get {identifier} failed")));
        }
        Ok(self.user(identifier).map(|u| u.id))
    }

    async fn create_user(&self, profile: &NewUserProfile) -> Result<UserId> {
        if self.failing_creates.contains(&profile.identifier) {
            return Err(SyncError::AccessSystem(format!(
                "user.create {} failed",
                profile.identifier
            )));
        }
        let id = UserId(self.allocate());
        self.users.lock().unwrap().push(StoredUser {
            id: id.clone(),
            identifier: profile.identifier.clone(),
            given_name: profile.given_name.clone(),
            surname: profile.surname.clone(),
            secret: profile.initial_secret.expose().to_string(),
        });
        *self.users_created.lock().unwrap() += 1;
        Ok(id)
    }

    async fn replace_group_membership(&self, group_id: &GroupId, user_ids: &[UserId]) -> Result<()> {
        self.replace_calls
            .lock()
            .unwrap()
            .push((group_id.clone(), user_ids.to_vec()));
        if self.failing_replacements.contains(&group_id.0) {
            return Err(SyncError::AccessSystem("usergroup.update rejected".into()));
        }
        self.memberships
            .lock()
            .unwrap()
            .insert(group_id.clone(), user_ids.to_vec());
        Ok(())
    }
}
