//! Default permission map and one-time seeding

use tracing::info;

use crate::catalog::MenuCatalog;
use crate::constants::PERMISSIONS_KEY;
use crate::db::KvBackend;
use crate::engine::AccessPolicy;
use crate::error::Result;
use crate::store::PermissionMap;

/// Check if a permission record has ever been persisted
pub fn is_bootstrapped<B: KvBackend + ?Sized>(backend: &B) -> Result<bool> {
    Ok(backend.get(PERMISSIONS_KEY)?.is_some())
}

/// The map applied to fresh storage.
///
/// The super-role receives every cataloged key; each seeded role receives the base menus.
pub fn default_permissions(policy: &AccessPolicy, catalog: &MenuCatalog) -> PermissionMap {
    let mut map = PermissionMap::new();
    map.set(policy.super_role.clone(), catalog.all_keys());
    for role in &policy.seeded_roles {
        map.set(role.clone(), policy.base_menus.iter().cloned());
    }
    map
}

/// Persist `defaults` as the baseline record
pub(crate) fn bootstrap<B: KvBackend + ?Sized>(backend: &B, defaults: &PermissionMap) -> Result<()> {
    backend.put(PERMISSIONS_KEY, &defaults.to_json()?)?;
    info!(roles = defaults.len(), "seeded default menu permissions");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{BASE_MENUS, SEEDED_ROLES};
    use crate::db::MemoryBackend;

    #[test]
    fn test_default_permissions() {
        let map = default_permissions(&AccessPolicy::default(), &MenuCatalog::standard());
        assert_eq!(map.len(), SEEDED_ROLES.len() + 1);

        let admin = map.permissions("admin");
        assert_eq!(admin.len(), 13);
        assert!(admin.contains("system.menu-permission"));
        assert!(admin.contains("system.role-permission"));

        for role in SEEDED_ROLES {
            let keys = map.permissions(role);
            assert_eq!(keys.len(), BASE_MENUS.len());
            assert!(!keys.iter().any(|k| k.as_str().starts_with("system")));
        }
    }

    #[test]
    fn test_bootstrap_persists() {
        let backend = MemoryBackend::new();
        assert!(!is_bootstrapped(&backend).unwrap());
        let defaults = default_permissions(&AccessPolicy::default(), &MenuCatalog::standard());
        bootstrap(&backend, &defaults).unwrap();
        assert!(is_bootstrapped(&backend).unwrap());
        let raw = backend.get(PERMISSIONS_KEY).unwrap().unwrap();
        assert_eq!(PermissionMap::from_json(&raw).unwrap(), defaults);
    }
}
