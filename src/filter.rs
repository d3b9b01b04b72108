//! Route tree pruning.
//!
//! A node survives if it is authorized itself, or if any descendant is; in
//! the second case it is kept only as a container for those descendants.
//! Children are always filtered, whatever the parent's own outcome.
//! Sibling order is preserved at every level.

use tracing::debug;

use crate::engine::{AuthorizationEngine, PermissionSource};
use crate::keys::RoleSet;
use crate::route::RouteNode;

/// Prunes route forests with an [`AuthorizationEngine`]
pub struct RouteFilter<'e, S> {
    engine: &'e AuthorizationEngine<S>,
}

impl<'e, S: PermissionSource> RouteFilter<'e, S> {
    pub fn new(engine: &'e AuthorizationEngine<S>) -> Self {
        RouteFilter { engine }
    }

    /// The sub-forest of `nodes` visible to `roles`
    pub fn filter(&self, nodes: &[RouteNode], roles: &RoleSet) -> Vec<RouteNode> {
        let out = self.filter_level(nodes, roles);
        debug!(
            input = nodes.iter().map(RouteNode::count).sum::<usize>(),
            kept = out.iter().map(RouteNode::count).sum::<usize>(),
            "filtered route tree"
        );
        out
    }

    fn filter_level(&self, nodes: &[RouteNode], roles: &RoleSet) -> Vec<RouteNode> {
        nodes
            .iter()
            .filter_map(|node| {
                let authorized = self.engine.is_authorized(roles, node);
                let children = self.filter_level(&node.children, roles);
                (authorized || !children.is_empty()).then(|| node.with_children(children))
            })
            .collect()
    }
}

/// One-shot convenience over [`RouteFilter`]
pub fn filter_routes<S: PermissionSource>(
    engine: &AuthorizationEngine<S>,
    nodes: &[RouteNode],
    roles: &RoleSet,
) -> Vec<RouteNode> {
    RouteFilter::new(engine).filter(nodes, roles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::AccessPolicy;
    use crate::keys::role_set;
    use crate::resolver::RouteId;
    use crate::store::PermissionMap;

    fn names(nodes: &[RouteNode]) -> Vec<&str> {
        nodes.iter().map(RouteNode::identity).collect()
    }

    fn tree() -> Vec<RouteNode> {
        vec![
            RouteNode::new("/business").child(RouteNode::new("index").route(RouteId::Business)),
            RouteNode::new("/system")
                .route(RouteId::System)
                .child(RouteNode::new("department").route(RouteId::Department))
                .child(RouteNode::new("casbin").route(RouteId::Casbin))
                .child(RouteNode::new("menu-permission").route(RouteId::MenuPermission)),
            RouteNode::new("/reports").named("Reports").roles(["auditor"]),
        ]
    }

    #[test]
    fn test_container_kept_for_authorized_child() {
        let mut grants = PermissionMap::new();
        grants.set("ops", ["system.casbin"]);
        let engine = AuthorizationEngine::new(grants);
        let out = filter_routes(&engine, &tree(), &role_set(["ops"]));
        assert_eq!(names(&out), vec!["/business", "System"]);
        assert_eq!(names(&out[1].children), vec!["Casbin"]);
    }

    #[test]
    fn test_authorized_parent_keeps_empty_children() {
        let mut grants = PermissionMap::new();
        grants.set("lead", ["system"]);
        let policy = AccessPolicy { base_menus: Default::default(), ..AccessPolicy::default() };
        let engine = AuthorizationEngine::with_policy(grants, policy);
        let forest = vec![RouteNode::new("/system").route(RouteId::System).child(RouteNode::new("/x").roles(["nobody"]))];
        let out = filter_routes(&engine, &forest, &role_set(["lead"]));
        assert_eq!(out.len(), 1);
        assert!(out[0].children.is_empty());
    }

    #[test]
    fn test_unauthorized_leaf_dropped() {
        let engine = AuthorizationEngine::new(PermissionMap::new());
        let out = filter_routes(&engine, &tree(), &role_set(["guest"]));
        assert_eq!(names(&out), vec!["/business"]);
        assert_eq!(names(&out[0].children), vec!["Business"]);
    }

    #[test]
    fn test_empty_roles_empty_forest() {
        let engine = AuthorizationEngine::new(PermissionMap::new());
        assert!(filter_routes(&engine, &tree(), &RoleSet::new()).is_empty());
    }
}
