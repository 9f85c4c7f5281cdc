//! Guild member payload

use chrono::{DateTime, Utc};
use jail_core::Snowflake;
use serde::{Deserialize, Serialize};

use super::UserModel;

/// `Guild Member` object; `user` is absent in some gateway payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberModel {
    #[serde(default)]
    pub user: Option<UserModel>,
    #[serde(default)]
    pub nick: Option<String>,
    #[serde(default)]
    pub roles: Vec<Snowflake>,
    #[serde(default)]
    pub joined_at: Option<DateTime<Utc>>,
}
