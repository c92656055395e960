use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use tracing::debug;

use dirguard_auth::{DirectoryError, DirectoryLookup, Group, GroupRef, Principal};
use dirguard_core::{GroupId, UserId};

/// Mutation failure on the in-memory directory.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryMutationError {
    #[error("user not found: {0}")]
    UnknownUser(UserId),
    #[error("group not found: {0}")]
    UnknownGroup(GroupId),
    #[error("directory state poisoned")]
    Poisoned,
}

#[derive(Debug, Default)]
struct State {
    users: HashMap<UserId, BTreeSet<GroupId>>,
    groups: HashMap<GroupId, String>,
}

/// In-memory directory for tests/dev.
///
/// Lookups always read current state, so membership edits are visible to the
/// very next access check. `set_failure` makes every lookup fail with the
/// given error until cleared.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    state: RwLock<State>,
    failure: RwLock<Option<DirectoryError>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_group(&self, id: GroupId, display_name: impl Into<String>) -> Result<(), DirectoryMutationError> {
        let mut state = self.state.write().map_err(|_| DirectoryMutationError::Poisoned)?;
        state.groups.insert(id, display_name.into());
        Ok(())
    }

    pub fn rename_group(&self, id: &GroupId, display_name: impl Into<String>) -> Result<(), DirectoryMutationError> {
        let mut state = self.state.write().map_err(|_| DirectoryMutationError::Poisoned)?;
        let name = state
            .groups
            .get_mut(id)
            .ok_or_else(|| DirectoryMutationError::UnknownGroup(id.clone()))?;
        *name = display_name.into();
        Ok(())
    }

    /// Delete a group and drop it from every member.
    pub fn remove_group(&self, id: &GroupId) -> Result<(), DirectoryMutationError> {
        let mut state = self.state.write().map_err(|_| DirectoryMutationError::Poisoned)?;
        if state.groups.remove(id).is_none() {
            return Err(DirectoryMutationError::UnknownGroup(id.clone()));
        }
        for memberships in state.users.values_mut() {
            memberships.remove(id);
        }
        Ok(())
    }

    pub fn add_user(&self, id: UserId) -> Result<(), DirectoryMutationError> {
        let mut state = self.state.write().map_err(|_| DirectoryMutationError::Poisoned)?;
        state.users.entry(id).or_default();
        Ok(())
    }

    pub fn remove_user(&self, id: &UserId) -> Result<(), DirectoryMutationError> {
        let mut state = self.state.write().map_err(|_| DirectoryMutationError::Poisoned)?;
        state
            .users
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DirectoryMutationError::UnknownUser(id.clone()))
    }

    pub fn add_user_to_group(&self, user: &UserId, group: &GroupId) -> Result<(), DirectoryMutationError> {
        let mut state = self.state.write().map_err(|_| DirectoryMutationError::Poisoned)?;
        if !state.groups.contains_key(group) {
            return Err(DirectoryMutationError::UnknownGroup(group.clone()));
        }
        let memberships = state
            .users
            .get_mut(user)
            .ok_or_else(|| DirectoryMutationError::UnknownUser(user.clone()))?;
        memberships.insert(group.clone());
        Ok(())
    }

    pub fn remove_user_from_group(&self, user: &UserId, group: &GroupId) -> Result<(), DirectoryMutationError> {
        let mut state = self.state.write().map_err(|_| DirectoryMutationError::Poisoned)?;
        let memberships = state
            .users
            .get_mut(user)
            .ok_or_else(|| DirectoryMutationError::UnknownUser(user.clone()))?;
        memberships.remove(group);
        Ok(())
    }

    /// Make every subsequent lookup fail (or recover with `None`).
    pub fn set_failure(&self, failure: Option<DirectoryError>) -> Result<(), DirectoryMutationError> {
        let mut slot = self.failure.write().map_err(|_| DirectoryMutationError::Poisoned)?;
        *slot = failure;
        Ok(())
    }

    fn injected_failure(&self) -> Result<(), DirectoryError> {
        let slot = self
            .failure
            .read()
            .map_err(|_| DirectoryError::Unavailable("directory state poisoned".to_string()))?;
        match slot.as_ref() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl DirectoryLookup for InMemoryDirectory {
    async fn get_principal(&self, id: &UserId) -> Result<Option<Principal>, DirectoryError> {
        self.injected_failure()?;
        let state = self
            .state
            .read()
            .map_err(|_| DirectoryError::Unavailable("directory state poisoned".to_string()))?;

        let Some(memberships) = state.users.get(id) else {
            debug!(user = %id, "principal not in directory");
            return Ok(None);
        };

        let mut groups = Vec::with_capacity(memberships.len());
        for group_id in memberships {
            let display_name = state
                .groups
                .get(group_id)
                .ok_or_else(|| DirectoryError::Malformed(format!("dangling membership to group {group_id}")))?;
            groups.push(GroupRef {
                id: group_id.clone(),
                display_name: display_name.clone(),
            });
        }

        Ok(Some(Principal { id: id.clone(), groups }))
    }

    async fn get_group(&self, id: &GroupId) -> Result<Option<Group>, DirectoryError> {
        self.injected_failure()?;
        let state = self
            .state
            .read()
            .map_err(|_| DirectoryError::Unavailable("directory state poisoned".to_string()))?;

        Ok(state.groups.get(id).map(|display_name| Group {
            id: id.clone(),
            display_name: display_name.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uid(s: &str) -> UserId {
        UserId::new(s).unwrap()
    }

    fn gid(s: &str) -> GroupId {
        GroupId::new(s).unwrap()
    }

    #[tokio::test]
    async fn lookup_reflects_memberships() {
        let dir = InMemoryDirectory::new();
        dir.add_group(gid("1"), "lldap_admin").unwrap();
        dir.add_group(gid("2"), "users").unwrap();
        dir.add_user(uid("alice")).unwrap();
        dir.add_user_to_group(&uid("alice"), &gid("1")).unwrap();
        dir.add_user_to_group(&uid("alice"), &gid("2")).unwrap();

        let alice = dir.get_principal(&uid("Alice")).await.unwrap().unwrap();
        assert_eq!(alice.group_names(), vec!["lldap_admin".to_string(), "users".to_string()]);

        dir.remove_user_from_group(&uid("alice"), &gid("1")).unwrap();
        let alice = dir.get_principal(&uid("alice")).await.unwrap().unwrap();
        assert_eq!(alice.group_names(), vec!["users".to_string()]);
    }

    #[tokio::test]
    async fn unknown_entities_are_none() {
        let dir = InMemoryDirectory::new();
        assert_eq!(dir.get_principal(&uid("nobody")).await.unwrap(), None);
        assert_eq!(dir.get_group(&gid("404")).await.unwrap(), None);
    }

    #[test]
    fn membership_requires_known_entities() {
        let dir = InMemoryDirectory::new();
        dir.add_user(uid("bob")).unwrap();
        assert_eq!(
            dir.add_user_to_group(&uid("bob"), &gid("7")),
            Err(DirectoryMutationError::UnknownGroup(gid("7")))
        );
        dir.add_group(gid("7"), "staff").unwrap();
        assert_eq!(
            dir.add_user_to_group(&uid("carol"), &gid("7")),
            Err(DirectoryMutationError::UnknownUser(uid("carol")))
        );
    }

    #[tokio::test]
    async fn removing_group_drops_memberships() {
        let dir = InMemoryDirectory::new();
        dir.add_group(gid("5"), "temp").unwrap();
        dir.add_user(uid("dave")).unwrap();
        dir.add_user_to_group(&uid("dave"), &gid("5")).unwrap();
        dir.remove_group(&gid("5")).unwrap();

        let dave = dir.get_principal(&uid("dave")).await.unwrap().unwrap();
        assert!(dave.groups.is_empty());

        dir.remove_user(&uid("dave")).unwrap();
        assert_eq!(dir.get_principal(&uid("dave")).await.unwrap(), None);
        assert_eq!(dir.remove_user(&uid("dave")), Err(DirectoryMutationError::UnknownUser(uid("dave"))));
    }

    #[tokio::test]
    async fn injected_failure_surfaces_and_clears() {
        let dir = InMemoryDirectory::new();
        dir.set_failure(Some(DirectoryError::Timeout)).unwrap();
        assert_eq!(dir.get_group(&gid("1")).await, Err(DirectoryError::Timeout));

        dir.set_failure(None).unwrap();
        assert_eq!(dir.get_group(&gid("1")).await, Ok(None));
    }
}
