//! Built-in identifiers and storage constants

/// The distinguished role that bypasses every check.
pub const SUPER_ROLE: &str = "admin";

/// Keys every authenticated non-admin role set may reach, regardless of the permission map.
pub const BASE_MENUS: &[&str] = &["business", "role", "user", "role-permission", "api", "api.list"];

/// Non-admin roles that receive the base menus when the store is seeded.
pub const SEEDED_ROLES: &[&str] = &[
    "user",
    "test_role",
    "member",
    "member_mcp",
    "shop_mcp",
    "guest",
    "operator",
    "manager",
];

/// Storage key holding the serialized permission map.
pub const PERMISSIONS_KEY: &str = "roleMenuPermissions";

/// Separator between menu key segments.
pub const KEY_SEPARATOR: char = '.';

// LMDB sizing
pub const MAP_SIZE: usize = 16 << 20;
pub const MAX_DBS: u32 = 1;
pub const KV_DB_NAME: &str = "kv";
