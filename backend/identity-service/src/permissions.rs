//! Permission-name catalog.
//!
//! Permission checks are exact string-set membership against these names;
//! there is no hierarchy or wildcard matching.

// Users
pub const USER_READ: &str = "user.read";
pub const USER_UPDATE: &str = "user.update";
pub const USER_LIST: &str = "user.list";

// Roles
pub const ROLE_CREATE: &str = "role.create";
pub const ROLE_READ: &str = "role.read";
pub const ROLE_UPDATE: &str = "role.update";
pub const ROLE_DELETE: &str = "role.delete";
pub const ROLE_LIST: &str = "role.list";

// Permissions
pub const PERMISSION_CREATE: &str = "permission.create";
pub const PERMISSION_READ: &str = "permission.read";
pub const PERMISSION_UPDATE: &str = "permission.update";
pub const PERMISSION_DELETE: &str = "permission.delete";
pub const PERMISSION_LIST: &str = "permission.list";

// Role <-> permission administration
pub const ROLE_PERMISSION_TOGGLE: &str = "role-permission.toggle";
pub const ROLE_PERMISSION_LIST: &str = "role-permission.list";
pub const ROLE_PERMISSION_READ: &str = "role-permission.read";

// User <-> role administration
pub const USER_ROLE_TOGGLE: &str = "user-role.toggle";
pub const USER_ROLE_READ: &str = "user-role.read";
pub const USER_ROLE_LIST: &str = "user-role.list";

// Sessions
pub const SESSION_DELETE_EXPIRED: &str = "session.delete-expired";
pub const SESSION_REVOKE: &str = "session.revoke";
pub const SESSION_LIST: &str = "session.list";
pub const SESSION_LOGOUT_ALL: &str = "session.logout-all-devices";
