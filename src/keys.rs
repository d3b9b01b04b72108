//! Dotted menu keys and role identifiers.
//!
//! A menu key is a string of `.`-separated segments (`system.casbin`).
//! The text before the last separator is the key's parent; a key without a
//! separator has none. Keys are case-sensitive and compared as plain strings.

use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::KEY_SEPARATOR;

/// Canonical hierarchical permission key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuKey(String);

impl MenuKey {
    pub fn new(key: impl Into<String>) -> Self {
        MenuKey(key.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The key one level up: `a.b.c` -> `a.b`, `a` -> None
    #[inline]
    pub fn parent(&self) -> Option<&str> {
        parent_of(&self.0)
    }
}

/// Parent of a raw dotted key (text before the last separator)
#[inline]
pub fn parent_of(key: &str) -> Option<&str> {
    key.rsplit_once(KEY_SEPARATOR).map(|(parent, _)| parent)
}

impl Borrow<str> for MenuKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for MenuKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MenuKey {
    fn from(s: &str) -> Self {
        MenuKey(s.to_string())
    }
}

impl From<String> for MenuKey {
    fn from(s: String) -> Self {
        MenuKey(s)
    }
}

impl fmt::Display for MenuKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque role identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(String);

impl RoleId {
    pub fn new(role: impl Into<String>) -> Self {
        RoleId(role.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RoleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoleId {
    fn from(s: &str) -> Self {
        RoleId(s.to_string())
    }
}

impl From<String> for RoleId {
    fn from(s: String) -> Self {
        RoleId(s)
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The caller's roles, as supplied by authentication
pub type RoleSet = BTreeSet<RoleId>;

/// Build a role set from anything string-like
pub fn role_set<I, T>(roles: I) -> RoleSet
where
    I: IntoIterator<Item = T>,
    T: Into<RoleId>,
{
    roles.into_iter().map(Into::into).collect()
}

/// Build a menu key set from anything string-like
pub fn key_set<I, T>(keys: I) -> BTreeSet<MenuKey>
where
    I: IntoIterator<Item = T>,
    T: Into<MenuKey>,
{
    keys.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent() {
        assert_eq!(MenuKey::from("system.casbin").parent(), Some("system"));
        assert_eq!(MenuKey::from("a.b.c").parent(), Some("a.b"));
        assert_eq!(MenuKey::from("business").parent(), None);
    }

    #[test]
    fn test_set_lookup_by_str() {
        let keys = key_set(["api", "api.list"]);
        assert!(keys.contains("api.list"));
        assert!(!keys.contains("API.list"));
    }

    #[test]
    fn test_json_shape() {
        let keys = key_set(["system", "api"]);
        assert_eq!(serde_json::to_string(&keys).unwrap(), r#"["api","system"]"#);
        let roles: RoleSet = serde_json::from_str(r#"["guest","admin","guest"]"#).unwrap();
        assert_eq!(roles, role_set(["admin", "guest"]));
    }
}
