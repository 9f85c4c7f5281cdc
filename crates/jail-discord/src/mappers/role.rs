//! Role entity <- model mapper

use jail_core::entities::Role;
use jail_core::value_objects::Snowflake;

use crate::models::RoleModel;

/// Convert a role payload into a Role entity of `guild_id`
pub fn role_from_model(guild_id: Snowflake, model: RoleModel) -> Role {
    Role {
        id: model.id,
        guild_id,
        name: model.name,
        position: model.position,
        permissions: model.permissions,
    }
}
