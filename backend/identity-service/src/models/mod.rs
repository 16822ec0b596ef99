//! Data models
pub mod role;
pub mod session;
pub mod user;

pub use role::{Permission, Role};
pub use session::{DeviceInfo, RefreshSession, SessionInfo};
pub use user::{PublicUser, User};
