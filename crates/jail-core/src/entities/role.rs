//! Role entity - represents a guild role with permissions

use serde::{Deserialize, Serialize};

use crate::value_objects::{Permissions, Snowflake};

/// Role entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: Snowflake,
    pub guild_id: Snowflake,
    pub name: String,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub permissions: Permissions,
}

impl Role {
    /// Create a new Role
    pub fn new(
        id: Snowflake,
        guild_id: Snowflake,
        name: impl Into<String>,
        permissions: Permissions,
    ) -> Self {
        Self {
            id,
            guild_id,
            name: name.into(),
            position: 0,
            permissions,
        }
    }

    /// Create the @everyone role for a guild
    pub fn everyone(guild_id: Snowflake, permissions: Permissions) -> Self {
        Self::new(guild_id, guild_id, "@everyone", permissions)
    }

    /// The @everyone role shares its id with the guild
    #[inline]
    pub fn is_everyone(&self) -> bool {
        self.id == self.guild_id
    }

    /// Check if this role grants a specific permission
    #[inline]
    pub fn has_permission(&self, permission: Permissions) -> bool {
        self.permissions.has(permission)
    }

    /// Compare role positions for hierarchy (higher position = more authority)
    #[inline]
    pub fn is_higher_than(&self, other: &Role) -> bool {
        self.position > other.position
    }
}

/// Join role names for log messages, falling back to the raw id
pub fn role_names(roles: &[Role], ids: &[Snowflake]) -> String {
    ids.iter()
        .map(|id| {
            roles
                .iter()
                .find(|r| r.id == *id)
                .map_or_else(|| id.to_string(), |r| r.name.clone())
        })
        .collect::<Vec<_>>()
        .join(", ")
}
