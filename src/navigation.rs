//! Assembling the mounted route table for a caller

use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::MenuCatalog;
use crate::db::KvBackend;
use crate::engine::{AccessPolicy, AuthorizationEngine, Decision};
use crate::error::{MenuGateError, Result};
use crate::filter::RouteFilter;
use crate::keys::{MenuKey, RoleId, RoleSet};
use crate::route::RouteNode;
use crate::routes::{constant_routes, dynamic_routes};
use crate::store::{PermissionMap, PermissionStore};

/// Routes to hand to the router for one caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteTable {
    /// Dynamic routes this caller may reach
    pub accessible: Vec<RouteNode>,
    /// Constant routes followed by `accessible`
    pub routes: Vec<RouteNode>,
}

/// Permission store, policy and route configuration bundled together
pub struct Navigator<B> {
    store: PermissionStore<B>,
    policy: AccessPolicy,
    catalog: MenuCatalog,
    constant: Vec<RouteNode>,
    dynamic: Vec<RouteNode>,
}

impl<B: KvBackend> Navigator<B> {
    /// Standard policy, catalog and console routes
    pub fn new(backend: B) -> Self {
        Self::with_policy(backend, AccessPolicy::default(), MenuCatalog::standard())
    }

    pub fn with_policy(backend: B, policy: AccessPolicy, catalog: MenuCatalog) -> Self {
        Navigator {
            store: PermissionStore::with_policy(backend, &policy, &catalog),
            policy,
            catalog,
            constant: constant_routes(),
            dynamic: dynamic_routes(),
        }
    }

    /// Replace the route configuration
    pub fn with_routes(mut self, constant: Vec<RouteNode>, dynamic: Vec<RouteNode>) -> Self {
        self.constant = constant;
        self.dynamic = dynamic;
        self
    }

    pub fn store(&self) -> &PermissionStore<B> {
        &self.store
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    pub fn catalog(&self) -> &MenuCatalog {
        &self.catalog
    }

    pub fn dynamic_routes(&self) -> &[RouteNode] {
        &self.dynamic
    }

    /// Engine over one consistent snapshot of the permission map
    pub fn engine(&self) -> AuthorizationEngine<PermissionMap> {
        AuthorizationEngine::with_policy(self.store.load(), self.policy.clone())
    }

    /// Dynamic routes visible to `roles`
    pub fn accessible_routes(&self, roles: &RoleSet) -> Vec<RouteNode> {
        // seeds fresh storage, whoever the caller is
        let snapshot = self.store.load();
        if roles.contains(&self.policy.super_role) {
            return self.dynamic.clone();
        }
        let engine = AuthorizationEngine::with_policy(snapshot, self.policy.clone());
        RouteFilter::new(&engine).filter(&self.dynamic, roles)
    }

    pub fn generate_routes(&self, roles: &RoleSet) -> RouteTable {
        let accessible = self.accessible_routes(roles);
        let routes = self.constant.iter().chain(accessible.iter()).cloned().collect();
        info!(
            roles = ?roles,
            top_level = accessible.len(),
            "generated navigable routes"
        );
        RouteTable { accessible, routes }
    }

    pub fn is_authorized(&self, roles: &RoleSet, node: &RouteNode) -> bool {
        self.engine().is_authorized(roles, node)
    }

    pub fn explain(&self, roles: &RoleSet, node: &RouteNode) -> Decision {
        self.engine().explain(roles, node)
    }

    /// Overwrite a role's menus, rejecting keys outside the catalog
    pub fn set_menu_permissions(&self, role: &str, keys: &[String]) -> Result<()> {
        if role.trim().is_empty() {
            return Err(MenuGateError::InvalidRole(role.to_string()));
        }
        if let Some(unknown) = keys.iter().find(|k| !self.catalog.contains(k)) {
            return Err(MenuGateError::UnknownMenuKey(unknown.clone()));
        }
        debug!(role, count = keys.len(), "assigning menu permissions");
        self.store
            .set_permissions(RoleId::from(role), keys.iter().map(|k| MenuKey::from(k.as_str())))
    }
}
