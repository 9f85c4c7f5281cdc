//! User profile - free-text fields shown on a user's card

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Profile text of a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: Snowflake,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub pronouns: Option<String>,
}

impl UserProfile {
    pub fn new(user_id: Snowflake) -> Self {
        Self {
            user_id,
            ..Default::default()
        }
    }

    /// Lowercased bio and pronouns joined by a space
    pub fn searchable_text(&self) -> String {
        let bio = self.bio.as_deref().unwrap_or_default();
        let pronouns = self.pronouns.as_deref().unwrap_or_default();
        format!("{bio} {pronouns}").to_lowercase()
    }
}
