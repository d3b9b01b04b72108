//! The labelled tree of every assignable menu key

use serde::Serialize;

use crate::keys::MenuKey;

/// One assignable menu key, optionally grouping child keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    pub key: MenuKey,
    pub label: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuEntry>,
}

impl MenuEntry {
    pub fn leaf(key: &str, label: &str) -> Self {
        MenuEntry { key: key.into(), label: label.to_string(), children: Vec::new() }
    }

    pub fn group(key: &str, label: &str, children: Vec<MenuEntry>) -> Self {
        MenuEntry { key: key.into(), label: label.to_string(), children }
    }
}

/// Ordered catalog of menu keys an administrator can assign to roles
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MenuCatalog {
    entries: Vec<MenuEntry>,
}

impl MenuCatalog {
    pub fn new(entries: Vec<MenuEntry>) -> Self {
        MenuCatalog { entries }
    }

    /// The menus shipped with the admin console
    pub fn standard() -> Self {
        MenuCatalog::new(vec![
            MenuEntry::leaf("business", "Business lines"),
            MenuEntry::leaf("role", "Roles"),
            MenuEntry::leaf("user", "Users"),
            MenuEntry::leaf("role-permission", "API authorization"),
            MenuEntry::group("api", "APIs", vec![MenuEntry::leaf("api.list", "API list")]),
            MenuEntry::group(
                "system",
                "System",
                vec![
                    MenuEntry::leaf("system.user", "User management"),
                    MenuEntry::leaf("system.role", "Role management"),
                    MenuEntry::leaf("system.role-permission", "Role permissions"),
                    MenuEntry::leaf("system.department", "Departments"),
                    MenuEntry::leaf("system.casbin", "Casbin policies"),
                    MenuEntry::leaf("system.menu-permission", "Menu permissions"),
                ],
            ),
        ])
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    /// Every key, depth-first, parents before their children
    pub fn all_keys(&self) -> Vec<MenuKey> {
        fn walk(entries: &[MenuEntry], out: &mut Vec<MenuKey>) {
            for e in entries {
                out.push(e.key.clone());
                walk(&e.children, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.entries, &mut out);
        out
    }

    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.find(key).map(|e| e.label.as_str())
    }

    fn find(&self, key: &str) -> Option<&MenuEntry> {
        let mut stack: Vec<&MenuEntry> = self.entries.iter().collect();
        while let Some(e) = stack.pop() {
            if e.key.as_str() == key {
                return Some(e);
            }
            stack.extend(e.children.iter());
        }
        None
    }
}

impl Default for MenuCatalog {
    fn default() -> Self {
        MenuCatalog::standard()
    }
}
