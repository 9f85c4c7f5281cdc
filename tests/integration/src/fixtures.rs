//! Test fixtures
//!
//! A small guild laid out like production: a log channel, one purge category
//! with a text channel and a thread, a channel outside the category, and
//! the jail, gate, default and moderator roles.

use std::path::Path;
use std::sync::Arc;

use chrono::{Duration, Utc};
use jail_common::{JailConfig, PurgeConfig, TranscriptConfig};
use jail_core::{Channel, GuildMember, Permissions, Role, Snowflake};
use jail_service::services::TranscriptStore;
use jail_service::ServiceContext;

use crate::mock_client::MockGuildClient;

pub const GUILD: Snowflake = Snowflake::new(1_000);
pub const OTHER_GUILD: Snowflake = Snowflake::new(1_001);

pub const JAIL_ROLE: Snowflake = Snowflake::new(2_001);
pub const ALT_JAIL_ROLE: Snowflake = Snowflake::new(2_002);
pub const GATE_ROLE: Snowflake = Snowflake::new(2_003);
pub const DEFAULT_ROLE: Snowflake = Snowflake::new(2_004);
pub const MOD_ROLE: Snowflake = Snowflake::new(2_005);
pub const TRUSTED_ROLE: Snowflake = Snowflake::new(2_006);
pub const ARTIST_ROLE: Snowflake = Snowflake::new(2_007);

pub const LOG_CHANNEL: Snowflake = Snowflake::new(3_001);
pub const PURGE_CATEGORY: Snowflake = Snowflake::new(3_002);
pub const GENERAL: Snowflake = Snowflake::new(3_003);
pub const GENERAL_THREAD: Snowflake = Snowflake::new(3_004);
pub const OFF_TOPIC: Snowflake = Snowflake::new(3_005);
pub const BOT_COMMANDS: Snowflake = Snowflake::new(3_006);

pub const OWNER: Snowflake = Snowflake::new(5_000);
pub const MODERATOR: Snowflake = Snowflake::new(5_001);
pub const GATEKEEPER: Snowflake = Snowflake::new(5_002);
pub const REGULAR: Snowflake = Snowflake::new(5_003);

/// Jail settings pointing at the fixture guild
pub fn jail_config() -> JailConfig {
    JailConfig {
        jail_role_id: JAIL_ROLE,
        alt_jail_role_id: ALT_JAIL_ROLE,
        log_channel_id: LOG_CHANNEL,
        gate_role_id: GATE_ROLE,
        default_member_role_id: DEFAULT_ROLE,
        allowed_guild_ids: vec![GUILD],
        purge_category_ids: vec![PURGE_CATEGORY],
        ..JailConfig::default()
    }
}

pub fn transcript_config(dir: &Path) -> TranscriptConfig {
    TranscriptConfig {
        dir: dir.to_path_buf(),
        ..TranscriptConfig::default()
    }
}

/// Service context over `client` writing transcripts to `dir`
pub fn service_context(client: Arc<MockGuildClient>, dir: &Path) -> ServiceContext {
    ServiceContext::new(
        client,
        jail_config(),
        PurgeConfig::default(),
        TranscriptStore::new(&transcript_config(dir)),
    )
}

/// Member with an old account and the given roles
pub fn member(user_id: Snowflake, username: &str, roles: &[Snowflake]) -> GuildMember {
    GuildMember::new(GUILD, user_id, username).with_roles(roles.iter().copied())
}

/// Member whose account was created `days` ago
pub fn fresh_account(offset: u64, username: &str, days: i64) -> GuildMember {
    let created = Snowflake::from_datetime(Utc::now() - Duration::days(days));
    GuildMember::new(GUILD, Snowflake::new(created.into_inner() + offset), username)
}

/// The fixture guild with its roles, channels and staff
///
/// `OWNER` owns the guild but is not a member until a test adds them.
pub fn standard_guild() -> Arc<MockGuildClient> {
    let client = MockGuildClient::new(GUILD);
    client.set_owner(OWNER);

    client.add_role(Role::everyone(GUILD, Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES));
    client.add_role(Role::new(JAIL_ROLE, GUILD, "Jailed", Permissions::empty()));
    client.add_role(Role::new(ALT_JAIL_ROLE, GUILD, "Jailed (alt)", Permissions::empty()));
    client.add_role(Role::new(GATE_ROLE, GUILD, "Gatekeeper", Permissions::empty()));
    client.add_role(Role::new(DEFAULT_ROLE, GUILD, "Member", Permissions::empty()));
    client.add_role(Role::new(MOD_ROLE, GUILD, "Moderator", Permissions::BAN_MEMBERS));
    client.add_role(Role::new(TRUSTED_ROLE, GUILD, "Trusted", Permissions::empty()));
    client.add_role(Role::new(ARTIST_ROLE, GUILD, "Artist", Permissions::empty()));

    client.add_channel(Channel::new_text(LOG_CHANNEL, GUILD, "jail-log"));
    client.add_channel(Channel::new_category(PURGE_CATEGORY, GUILD, "Community"));
    client.add_channel(Channel::new_text(GENERAL, GUILD, "general").in_category(PURGE_CATEGORY));
    client.add_channel(Channel::new_thread(GENERAL_THREAD, GUILD, GENERAL, "introductions"));
    client.add_channel(Channel::new_text(OFF_TOPIC, GUILD, "staff-only"));
    client.add_channel(Channel::new_text(BOT_COMMANDS, GUILD, "bot-commands"));

    client.add_member(member(MODERATOR, "mod", &[MOD_ROLE, DEFAULT_ROLE]));
    client.add_member(member(GATEKEEPER, "gatekeeper", &[GATE_ROLE]));
    client.add_member(member(REGULAR, "regular", &[DEFAULT_ROLE]));

    Arc::new(client)
}

/// Ids for a batch of ordinary members starting at `first`
pub fn member_ids(first: u64, count: u64) -> Vec<Snowflake> {
    (first..first + count).map(Snowflake::new).collect()
}
