//! menugate - navigation authorization
//!
//! Decides which route nodes a caller may reach from their role set and a
//! durable role -> menu key permission map, and prunes the route tree to match.
//!
//! - Menu keys are dotted (`system.casbin`); holding a key's immediate parent
//!   grants the key.
//! - The super-role bypasses every check; base menus are open to any
//!   non-empty role set; nodes without a menu key fall back to their declared roles.
//! - The permission map is seeded once with defaults and then only changes
//!   through explicit writes.

pub mod bootstrap;
pub mod catalog;
pub mod constants;
pub mod db;
pub mod engine;
pub mod error;
pub mod filter;
pub mod keys;
pub mod navigation;
pub mod resolver;
pub mod route;
pub mod routes;
pub mod settings;
pub mod store;

pub use bootstrap::{default_permissions, is_bootstrapped};
pub use catalog::{MenuCatalog, MenuEntry};
pub use constants::{BASE_MENUS, PERMISSIONS_KEY, SEEDED_ROLES, SUPER_ROLE};
pub use db::{KvBackend, LmdbBackend, MemoryBackend};
pub use engine::{AccessPolicy, AuthorizationEngine, Decision, PermissionSource};
pub use error::{MenuGateError, Result};
pub use filter::{filter_routes, RouteFilter};
pub use keys::{key_set, role_set, MenuKey, RoleId, RoleSet};
pub use navigation::{Navigator, RouteTable};
pub use resolver::{resolve, resolve_path, RouteId};
pub use route::{RouteMeta, RouteNode};
pub use routes::{constant_routes, dynamic_routes};
pub use settings::Settings;
pub use store::{PermissionMap, PermissionStore};
