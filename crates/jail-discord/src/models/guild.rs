//! Guild payload

use jail_core::Snowflake;
use serde::{Deserialize, Serialize};

/// The fields of `Guild` the service reads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildModel {
    pub id: Snowflake,
    pub owner_id: Snowflake,
}
