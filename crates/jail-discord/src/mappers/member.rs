//! GuildMember entity <- model mapper

use chrono::Utc;
use jail_core::entities::GuildMember;
use jail_core::value_objects::Snowflake;

use crate::models::MemberModel;

/// Convert a member payload into a GuildMember entity
///
/// Returns `None` when the payload carries no user object.
pub fn member_from_model(guild_id: Snowflake, model: MemberModel) -> Option<GuildMember> {
    let user = model.user?;
    let mut member = GuildMember {
        guild_id,
        user_id: user.id,
        username: user.username,
        nickname: model.nick,
        role_ids: Vec::with_capacity(model.roles.len()),
        joined_at: model.joined_at.unwrap_or_else(Utc::now),
    };
    for role_id in model.roles {
        member.add_role(role_id);
    }
    Some(member)
}
