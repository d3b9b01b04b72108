//! Durable role -> menu key permission map.
//!
//! The whole map is one JSON record (`{ "role": ["key", ...] }`) under a single
//! storage key. Reads never fail: a missing or unparsable record is replaced
//! by the defaults, which are persisted as the new baseline. Writes overwrite
//! a role's set outright and persist immediately.
//!
//! Several stores may share one backend (e.g. two sessions). There is no
//! versioning, so a concurrent writer can silently overwrite another's change
//! (last writer wins).

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::bootstrap::{bootstrap, default_permissions, is_bootstrapped};
use crate::catalog::MenuCatalog;
use crate::constants::PERMISSIONS_KEY;
use crate::db::KvBackend;
use crate::engine::{AccessPolicy, PermissionSource};
use crate::error::Result;
use crate::keys::{MenuKey, RoleId};

/// Mapping of role -> granted menu keys. An absent role holds nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionMap(BTreeMap<RoleId, BTreeSet<MenuKey>>);

impl PermissionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, role: &str) -> Option<&BTreeSet<MenuKey>> {
        self.0.get(role)
    }

    /// The role's keys, empty if the role is unknown
    pub fn permissions(&self, role: &str) -> BTreeSet<MenuKey> {
        self.get(role).cloned().unwrap_or_default()
    }

    /// Replace the role's keys
    pub fn set<R, I, K>(&mut self, role: R, keys: I)
    where
        R: Into<RoleId>,
        I: IntoIterator<Item = K>,
        K: Into<MenuKey>,
    {
        self.0.insert(role.into(), keys.into_iter().map(Into::into).collect());
    }

    pub fn remove(&mut self, role: &str) -> bool {
        self.0.remove(role).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

impl PermissionSource for PermissionMap {
    fn granted(&self, role: &RoleId) -> BTreeSet<MenuKey> {
        PermissionMap::permissions(self, role.as_str())
    }
}

/// Persistent permission map over a key-value backend
pub struct PermissionStore<B> {
    backend: B,
    defaults: PermissionMap,
}

impl<B: KvBackend> PermissionStore<B> {
    /// Store seeded with the standard defaults
    pub fn new(backend: B) -> Self {
        Self::with_policy(backend, &AccessPolicy::default(), &MenuCatalog::standard())
    }

    /// Store seeded from `policy` and `catalog`
    pub fn with_policy(backend: B, policy: &AccessPolicy, catalog: &MenuCatalog) -> Self {
        Self::with_defaults(backend, default_permissions(policy, catalog))
    }

    pub fn with_defaults(backend: B, defaults: PermissionMap) -> Self {
        PermissionStore { backend, defaults }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The map applied to fresh storage
    pub fn defaults(&self) -> &PermissionMap {
        &self.defaults
    }

    /// Whether a permission record exists (seeded or written)
    pub fn is_initialized(&self) -> Result<bool> {
        is_bootstrapped(&self.backend)
    }

    /// Read the persisted map, seeding the defaults when absent or unparsable
    pub fn load(&self) -> PermissionMap {
        match self.read_record() {
            Ok(Some(map)) => map,
            Ok(None) => {
                if let Err(e) = bootstrap(&self.backend, &self.defaults) {
                    warn!(error = %e, "failed to persist default menu permissions");
                }
                self.defaults.clone()
            }
            Err(e) => {
                warn!(error = %e, "permission record unreadable, using defaults");
                self.defaults.clone()
            }
        }
    }

    /// The full map, for management views
    pub fn all_permissions(&self) -> PermissionMap {
        self.load()
    }

    /// The role's keys; unknown roles and unreadable storage yield nothing
    pub fn get_permissions(&self, role: &str) -> BTreeSet<MenuKey> {
        match self.load_or_seed() {
            Ok(map) => map.permissions(role),
            Err(e) => {
                warn!(error = %e, role, "permission lookup failed, denying");
                BTreeSet::new()
            }
        }
    }

    /// Overwrite the role's keys and persist
    pub fn set_permissions<R, I, K>(&self, role: R, keys: I) -> Result<()>
    where
        R: Into<RoleId>,
        I: IntoIterator<Item = K>,
        K: Into<MenuKey>,
    {
        let role = role.into();
        let mut map = self.load_or_seed()?;
        map.set(role.clone(), keys);
        self.persist(&map)?;
        debug!(role = %role, keys = map.permissions(role.as_str()).len(), "updated menu permissions");
        Ok(())
    }

    /// Drop one role's entry. Defaults are not re-applied afterwards.
    pub fn remove_role(&self, role: &str) -> Result<bool> {
        let mut map = self.load_or_seed()?;
        let removed = map.remove(role);
        if removed {
            self.persist(&map)?;
            debug!(role, "removed menu permissions");
        }
        Ok(removed)
    }

    /// Delete the record so the next load seeds the defaults again
    pub fn reset(&self) -> Result<()> {
        self.backend.delete(PERMISSIONS_KEY)?;
        Ok(())
    }

    fn read_record(&self) -> Result<Option<PermissionMap>> {
        let Some(raw) = self.backend.get(PERMISSIONS_KEY)? else {
            return Ok(None);
        };
        match PermissionMap::from_json(&raw) {
            Ok(map) => Ok(Some(map)),
            Err(e) => {
                warn!(error = %e, "unparsable permission record, restoring defaults");
                Ok(None)
            }
        }
    }

    fn load_or_seed(&self) -> Result<PermissionMap> {
        if let Some(map) = self.read_record()? {
            return Ok(map);
        }
        bootstrap(&self.backend, &self.defaults)?;
        Ok(self.defaults.clone())
    }

    fn persist(&self, map: &PermissionMap) -> Result<()> {
        self.backend.put(PERMISSIONS_KEY, &map.to_json()?)
    }
}

impl<B: KvBackend> PermissionSource for PermissionStore<B> {
    fn granted(&self, role: &RoleId) -> BTreeSet<MenuKey> {
        self.get_permissions(role.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryBackend;
    use crate::keys::key_set;

    #[test]
    fn test_fresh_store_seeds_once() {
        let store = PermissionStore::new(MemoryBackend::new());
        assert!(!store.is_initialized().unwrap());
        let map = store.load();
        assert_eq!(&map, store.defaults());
        assert!(store.is_initialized().unwrap());
    }

    #[test]
    fn test_malformed_record_restores_defaults() {
        let backend = MemoryBackend::new();
        backend.put(PERMISSIONS_KEY, "{\"user\": \"business\"").unwrap();
        let store = PermissionStore::new(backend);
        assert_eq!(&store.load(), store.defaults());
        let raw = store.backend().get(PERMISSIONS_KEY).unwrap().unwrap();
        assert_eq!(&PermissionMap::from_json(&raw).unwrap(), store.defaults());
    }

    #[test]
    fn test_wrong_shape_restores_defaults() {
        let backend = MemoryBackend::new();
        backend.put(PERMISSIONS_KEY, "[\"admin\"]").unwrap();
        let store = PermissionStore::new(backend);
        assert_eq!(&store.load(), store.defaults());
    }

    #[test]
    fn test_set_overwrites() {
        let store = PermissionStore::new(MemoryBackend::new());
        store.set_permissions("guest", ["system"]).unwrap();
        store.set_permissions("guest", ["api", "api.list"]).unwrap();
        assert_eq!(store.get_permissions("guest"), key_set(["api", "api.list"]));
    }

    #[test]
    fn test_first_write_keeps_defaults() {
        let store = PermissionStore::new(MemoryBackend::new());
        store.set_permissions("auditor", ["system.casbin"]).unwrap();
        assert_eq!(store.get_permissions("admin").len(), 13);
        assert_eq!(store.get_permissions("auditor"), key_set(["system.casbin"]));
    }

    #[test]
    fn test_remove_role_does_not_reseed() {
        let store = PermissionStore::new(MemoryBackend::new());
        store.load();
        assert!(store.remove_role("user").unwrap());
        assert!(!store.remove_role("user").unwrap());
        assert!(store.get_permissions("user").is_empty());
        assert!(store.load().get("user").is_none());
    }

    #[test]
    fn test_reset_reseeds() {
        let store = PermissionStore::new(MemoryBackend::new());
        store.set_permissions("user", Vec::<MenuKey>::new()).unwrap();
        store.reset().unwrap();
        assert!(!store.is_initialized().unwrap());
        assert_eq!(store.get_permissions("user").len(), 6);
    }

    #[test]
    fn test_unknown_role_is_empty() {
        let store = PermissionStore::new(MemoryBackend::new());
        assert!(store.get_permissions("nobody").is_empty());
    }
}
