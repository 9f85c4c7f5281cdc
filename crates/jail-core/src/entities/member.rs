//! Member entity - represents a user's membership in a guild

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Guild member entity
///
/// `role_ids` never contains the implicit @everyone role (whose id equals
/// the guild id); Discord omits it from member payloads and so do we.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildMember {
    pub guild_id: Snowflake,
    pub user_id: Snowflake,
    pub username: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub role_ids: Vec<Snowflake>,
    #[serde(default = "Utc::now")]
    pub joined_at: DateTime<Utc>,
}

impl GuildMember {
    /// Create a new GuildMember with no roles
    pub fn new(guild_id: Snowflake, user_id: Snowflake, username: impl Into<String>) -> Self {
        Self {
            guild_id,
            user_id,
            username: username.into(),
            nickname: None,
            role_ids: Vec::new(),
            joined_at: Utc::now(),
        }
    }

    /// Builder-style helper to attach roles
    #[must_use]
    pub fn with_roles(mut self, role_ids: impl IntoIterator<Item = Snowflake>) -> Self {
        for role_id in role_ids {
            self.add_role(role_id);
        }
        self
    }

    /// Get display name (nickname if set, otherwise username)
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.username)
    }

    /// Discord mention markup for this member
    pub fn mention(&self) -> String {
        format!("<@{}>", self.user_id)
    }

    /// Check if member has a specific role
    #[inline]
    pub fn has_role(&self, role_id: Snowflake) -> bool {
        self.role_ids.contains(&role_id)
    }

    /// Check if member has any of the given roles
    pub fn has_any_role(&self, role_ids: &[Snowflake]) -> bool {
        role_ids.iter().any(|id| self.has_role(*id))
    }

    /// Add a role to the member
    pub fn add_role(&mut self, role_id: Snowflake) {
        if role_id != self.guild_id && !self.has_role(role_id) {
            self.role_ids.push(role_id);
        }
    }

    /// Remove a role from the member
    pub fn remove_role(&mut self, role_id: Snowflake) {
        self.role_ids.retain(|&id| id != role_id);
    }

    /// Roles that would have to go for the member to hold only `keep`
    ///
    /// The @everyone role is never returned.
    pub fn roles_except(&self, keep: &[Snowflake]) -> Vec<Snowflake> {
        self.role_ids
            .iter()
            .copied()
            .filter(|id| *id != self.guild_id && !keep.contains(id))
            .collect()
    }

    /// Number of roles, counting the implicit @everyone role
    #[inline]
    pub fn effective_role_count(&self) -> usize {
        self.role_ids.iter().filter(|id| **id != self.guild_id).count() + 1
    }

    /// Account creation time, derived from the user id
    pub fn account_created_at(&self) -> DateTime<Utc> {
        self.user_id.created_at()
    }

    /// Account age at `now`
    pub fn account_age(&self, now: DateTime<Utc>) -> Duration {
        now - self.account_created_at()
    }
}
