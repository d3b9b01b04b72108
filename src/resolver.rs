//! Route node -> menu key resolution.
//!
//! Two tiers, in order:
//! 1. the node's name, looked up as a [`RouteId`];
//! 2. the node's path, matched exactly or with a trailing `/index`, with paths
//!    under `/system/` synthesized as `system.<rest>` (slashes become dots).
//!
//! A node matching neither has no key and is judged by its declared roles.

use serde::{Deserialize, Serialize};

use crate::constants::KEY_SEPARATOR;
use crate::keys::MenuKey;
use crate::route::RouteNode;

const SYSTEM_PREFIX: &str = "/system/";
const INDEX_SUFFIX: &str = "/index";

// Path fallback table
const PATH_KEYS: &[(&str, &str)] = &[
    ("/business", "business"),
    ("/role", "role"),
    ("/user", "user"),
    ("/role-permission", "role-permission"),
    ("/api", "api"),
    ("/api/list", "api.list"),
    ("/system", "system"),
];

/// Stable identifiers of the routes that carry a menu key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouteId {
    Business,
    Role,
    User,
    RolePermission,
    Api,
    ApiList,
    System,
    Department,
    Casbin,
    MenuPermission,
}

impl RouteId {
    pub const ALL: [RouteId; 10] = [
        RouteId::Business,
        RouteId::Role,
        RouteId::User,
        RouteId::RolePermission,
        RouteId::Api,
        RouteId::ApiList,
        RouteId::System,
        RouteId::Department,
        RouteId::Casbin,
        RouteId::MenuPermission,
    ];

    /// Route name as declared in the route tree
    pub const fn name(self) -> &'static str {
        match self {
            RouteId::Business => "Business",
            RouteId::Role => "Role",
            RouteId::User => "User",
            RouteId::RolePermission => "RolePermission",
            RouteId::Api => "API",
            RouteId::ApiList => "APIList",
            RouteId::System => "System",
            RouteId::Department => "Department",
            RouteId::Casbin => "Casbin",
            RouteId::MenuPermission => "MenuPermission",
        }
    }

    pub const fn menu_key(self) -> &'static str {
        match self {
            RouteId::Business => "business",
            RouteId::Role => "role",
            RouteId::User => "user",
            RouteId::RolePermission => "role-permission",
            RouteId::Api => "api",
            RouteId::ApiList => "api.list",
            RouteId::System => "system",
            RouteId::Department => "system.department",
            RouteId::Casbin => "system.casbin",
            RouteId::MenuPermission => "system.menu-permission",
        }
    }

    pub fn from_name(name: &str) -> Option<RouteId> {
        RouteId::ALL.into_iter().find(|id| id.name() == name)
    }
}

/// Resolve a node to its menu key, or None when it has none
pub fn resolve(node: &RouteNode) -> Option<MenuKey> {
    node.name
        .as_deref()
        .and_then(RouteId::from_name)
        .map(|id| MenuKey::from(id.menu_key()))
        .or_else(|| resolve_path(&node.path))
}

/// Path tier on its own
pub fn resolve_path(path: &str) -> Option<MenuKey> {
    let lookup = |p: &str| PATH_KEYS.iter().find(|(k, _)| *k == p).map(|(_, v)| MenuKey::from(*v));
    if let Some(key) = lookup(path) {
        return Some(key);
    }
    // system.* synthesis runs before the `/index` strip
    if let Some(rest) = path.strip_prefix(SYSTEM_PREFIX) {
        let rest = rest.trim_matches('/');
        if rest.is_empty() {
            return None;
        }
        return Some(MenuKey::new(format!("system{}{}", KEY_SEPARATOR, rest.replace('/', "."))));
    }
    path.strip_suffix(INDEX_SUFFIX).and_then(lookup)
}
