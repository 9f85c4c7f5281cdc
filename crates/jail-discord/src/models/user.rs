//! User payload

use jail_core::Snowflake;
use serde::{Deserialize, Serialize};

/// `User` object as returned by the REST API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserModel {
    pub id: Snowflake,
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

/// Response of `GET /users/{id}/profile`
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfileModel {
    pub user: ProfileUserModel,
    #[serde(default)]
    pub user_profile: Option<ProfileDetailsModel>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileUserModel {
    pub id: Snowflake,
    #[serde(default)]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileDetailsModel {
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub pronouns: Option<String>,
}
