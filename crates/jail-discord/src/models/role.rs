//! Role payload

use jail_core::{Permissions, Snowflake};
use serde::{Deserialize, Serialize};

/// `Role` object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleModel {
    pub id: Snowflake,
    pub name: String,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub permissions: Permissions,
}
