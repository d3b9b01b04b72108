//! Per-node authorization.
//!
//! Evaluation order, first match wins:
//! 1. no roles -> deny
//! 2. super-role present -> allow
//! 3. node resolves to a base menu key -> allow
//! 4. node resolves to no key -> legacy declared-roles check
//! 5. some role holds the key, or the key's immediate parent -> allow
//! 6. deny
//!
//! Parent inheritance is one level only: `a.b.c` is reached through `a.b`, never `a`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::constants::{BASE_MENUS, SEEDED_ROLES, SUPER_ROLE};
use crate::keys::{MenuKey, RoleId, RoleSet};
use crate::resolver::resolve;
use crate::route::RouteNode;

/// Anything that can say which menu keys a role holds
pub trait PermissionSource {
    fn granted(&self, role: &RoleId) -> BTreeSet<MenuKey>;
}

impl<S: PermissionSource + ?Sized> PermissionSource for &S {
    fn granted(&self, role: &RoleId) -> BTreeSet<MenuKey> {
        (**self).granted(role)
    }
}

/// Fixed parts of the authorization policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessPolicy {
    pub super_role: RoleId,
    /// Keys any non-empty role set may reach, ahead of the permission map
    pub base_menus: BTreeSet<MenuKey>,
    /// Roles given the base menus when storage is first seeded
    pub seeded_roles: Vec<RoleId>,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        AccessPolicy {
            super_role: SUPER_ROLE.into(),
            base_menus: BASE_MENUS.iter().map(|k| MenuKey::from(*k)).collect(),
            seeded_roles: SEEDED_ROLES.iter().map(|r| RoleId::from(*r)).collect(),
        }
    }
}

/// Why a node was allowed or denied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Decision {
    NoRoles,
    SuperRole,
    BaseMenu { key: MenuKey },
    Legacy { allowed: bool },
    Granted { role: RoleId, key: MenuKey },
    Inherited { role: RoleId, key: MenuKey, parent: MenuKey },
    Denied { key: MenuKey },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        match self {
            Decision::NoRoles | Decision::Denied { .. } => false,
            Decision::Legacy { allowed } => *allowed,
            Decision::SuperRole | Decision::BaseMenu { .. } | Decision::Granted { .. } | Decision::Inherited { .. } => true,
        }
    }
}

/// Decides access to single route nodes
#[derive(Debug, Clone)]
pub struct AuthorizationEngine<S> {
    source: S,
    policy: AccessPolicy,
}

impl<S: PermissionSource> AuthorizationEngine<S> {
    pub fn new(source: S) -> Self {
        Self::with_policy(source, AccessPolicy::default())
    }

    pub fn with_policy(source: S, policy: AccessPolicy) -> Self {
        AuthorizationEngine { source, policy }
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    #[inline]
    pub fn is_authorized(&self, roles: &RoleSet, node: &RouteNode) -> bool {
        self.explain(roles, node).is_allowed()
    }

    pub fn explain(&self, roles: &RoleSet, node: &RouteNode) -> Decision {
        let decision = self.decide(roles, node);
        trace!(node = node.identity(), ?decision, "menu authorization");
        decision
    }

    fn decide(&self, roles: &RoleSet, node: &RouteNode) -> Decision {
        if roles.is_empty() {
            return Decision::NoRoles;
        }
        if roles.contains(&self.policy.super_role) {
            return Decision::SuperRole;
        }
        let Some(key) = resolve(node) else {
            return Decision::Legacy { allowed: legacy_allows(roles, node) };
        };
        if self.policy.base_menus.contains(&key) {
            return Decision::BaseMenu { key };
        }
        // BTreeSet iteration is sorted, so the reported role is stable
        for role in roles {
            let granted = self.source.granted(role);
            if granted.contains(&key) {
                return Decision::Granted { role: role.clone(), key };
            }
            if let Some(parent) = key.parent().filter(|p| granted.contains(*p)) {
                let parent = MenuKey::from(parent);
                return Decision::Inherited { role: role.clone(), key, parent };
            }
        }
        Decision::Denied { key }
    }
}

/// Declared-roles check: unset means open, otherwise any overlap
fn legacy_allows(roles: &RoleSet, node: &RouteNode) -> bool {
    match &node.meta.roles {
        None => true,
        Some(required) => required.iter().any(|r| roles.contains(r)),
    }
}
