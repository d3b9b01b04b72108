//! Navigable route tree

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::keys::RoleId;
use crate::resolver::RouteId;

/// Presentation data plus the legacy per-node role requirement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Consulted only when the node resolves to no menu key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<BTreeSet<RoleId>>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub affix: bool,
}

/// One node of a route forest. Children keep their declared order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteNode {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    #[serde(default)]
    pub meta: RouteMeta,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteNode>,
}

impl RouteNode {
    pub fn new(path: impl Into<String>) -> Self {
        RouteNode {
            path: path.into(),
            name: None,
            redirect: None,
            hidden: false,
            meta: RouteMeta::default(),
            children: Vec::new(),
        }
    }

    /// Name the node after a known route
    pub fn route(self, id: RouteId) -> Self {
        self.named(id.name())
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.meta.title = Some(title.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.meta.icon = Some(icon.into());
        self
    }

    /// Legacy declared-roles requirement
    pub fn roles<I, T>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<RoleId>,
    {
        self.meta.roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    pub fn redirect(mut self, to: impl Into<String>) -> Self {
        self.redirect = Some(to.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn affix(mut self) -> Self {
        self.meta.affix = true;
        self
    }

    pub fn child(mut self, node: RouteNode) -> Self {
        self.children.push(node);
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = RouteNode>) -> Self {
        self.children.extend(nodes);
        self
    }

    /// Name if present, else path
    pub fn identity(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.path)
    }

    /// Copy of this node carrying `children` instead of its own
    pub fn with_children(&self, children: Vec<RouteNode>) -> Self {
        RouteNode {
            path: self.path.clone(),
            name: self.name.clone(),
            redirect: self.redirect.clone(),
            hidden: self.hidden,
            meta: self.meta.clone(),
            children,
        }
    }

    /// Number of nodes in this subtree, itself included
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(RouteNode::count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let node = RouteNode::new("/system")
            .route(RouteId::System)
            .redirect("/system/department")
            .title("System")
            .child(RouteNode::new("department").route(RouteId::Department))
            .child(RouteNode::new("menu-permission").route(RouteId::MenuPermission).roles(["admin"]));
        assert_eq!(node.identity(), "System");
        assert_eq!(node.children.len(), 2);
        assert_eq!(node.count(), 3);
        assert!(node.children[1].meta.roles.as_ref().unwrap().contains("admin"));
    }

    #[test]
    fn test_identity_falls_back_to_path() {
        assert_eq!(RouteNode::new("/business").identity(), "/business");
    }

    #[test]
    fn test_json_round_shape() {
        let raw = r#"{"path":"/api","name":"API","meta":{"title":"APIs"},"children":[{"path":"list","name":"APIList"}]}"#;
        let node: RouteNode = serde_json::from_str(raw).unwrap();
        assert_eq!(node.children[0].name.as_deref(), Some("APIList"));
        assert!(node.meta.roles.is_none());
        assert!(!node.hidden);
    }
}
