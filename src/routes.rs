//! Statically declared route forests of the admin console

use crate::resolver::RouteId;
use crate::route::RouteNode;

/// Routes mounted for everyone, before any authorization
pub fn constant_routes() -> Vec<RouteNode> {
    vec![
        RouteNode::new("/login").hidden(),
        RouteNode::new("/404").hidden(),
        RouteNode::new("/").redirect("/dashboard").child(
            RouteNode::new("dashboard")
                .named("Dashboard")
                .title("Home")
                .icon("dashboard")
                .affix(),
        ),
    ]
}

/// Routes filtered per caller
pub fn dynamic_routes() -> Vec<RouteNode> {
    vec![
        RouteNode::new("/business").child(
            RouteNode::new("index")
                .route(RouteId::Business)
                .title("Business lines")
                .icon("component"),
        ),
        RouteNode::new("/role").child(
            RouteNode::new("index")
                .route(RouteId::Role)
                .title("Roles")
                .icon("peoples"),
        ),
        RouteNode::new("/user").child(
            RouteNode::new("index")
                .route(RouteId::User)
                .title("Users")
                .icon("user"),
        ),
        RouteNode::new("/api")
            .route(RouteId::Api)
            .redirect("/api/list")
            .title("APIs")
            .icon("api")
            .child(
                RouteNode::new("list")
                    .route(RouteId::ApiList)
                    .title("API list")
                    .icon("list"),
            ),
        RouteNode::new("/role-permission").child(
            RouteNode::new("index")
                .route(RouteId::RolePermission)
                .title("API authorization")
                .icon("lock"),
        ),
        RouteNode::new("/system")
            .route(RouteId::System)
            .redirect("/system/department")
            .title("System")
            .icon("setting")
            .children([
                RouteNode::new("department")
                    .route(RouteId::Department)
                    .title("Departments")
                    .icon("tree"),
                RouteNode::new("casbin")
                    .route(RouteId::Casbin)
                    .title("Casbin policies")
                    .icon("lock"),
                RouteNode::new("menu-permission")
                    .route(RouteId::MenuPermission)
                    .title("Menu permissions")
                    .icon("tree-table")
                    .roles(["admin"]),
            ]),
        // catch-all, must stay last
        RouteNode::new("*").redirect("/404").hidden(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve;

    #[test]
    fn test_every_named_route_resolves() {
        fn walk(nodes: &[RouteNode]) {
            for n in nodes {
                if n.name.is_some() {
                    assert!(resolve(n).is_some(), "{} has no menu key", n.identity());
                }
                walk(&n.children);
            }
        }
        walk(&dynamic_routes());
    }

    #[test]
    fn test_catch_all_is_last() {
        let routes = dynamic_routes();
        assert_eq!(routes.last().map(|n| n.path.as_str()), Some("*"));
        assert_eq!(routes.len(), 7);
    }
}
