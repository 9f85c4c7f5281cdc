//! Jail and unjail flows against the in-memory guild
//!
//! Run with: cargo test -p integration-tests --test moderation_tests

use std::time::Duration;

use integration_tests::*;
use jail_core::{DomainError, Snowflake};
use jail_service::dto::{JailRequest, UnjailRequest};
use jail_service::services::{JailService, UnjailService};
use jail_service::ServiceError;

fn jail_request(user_ids: Vec<Snowflake>, reason: &str) -> JailRequest {
    JailRequest {
        actor_id: MODERATOR,
        user_ids,
        reason: reason.to_string(),
        channel_id: Some(BOT_COMMANDS),
    }
}

fn unjail_request(user_ids: Vec<Snowflake>, reason: &str) -> UnjailRequest {
    UnjailRequest {
        actor_id: MODERATOR,
        user_ids,
        reason: reason.to_string(),
        channel_id: Some(BOT_COMMANDS),
    }
}

// ============================================================================
// Jail
// ============================================================================

#[tokio::test]
async fn test_jail_leaves_only_jail_role_and_purges_category() {
    let guild = standard_guild();
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    let spammer = member(Snowflake::new(7_001), "spammer", &[DEFAULT_ROLE, TRUSTED_ROLE, ARTIST_ROLE]);
    guild.add_member(spammer.clone());
    let bystander = guild.member(REGULAR).unwrap();

    guild.seed_message(GENERAL, &spammer, "free nitro http://scam.example");
    guild.seed_message(GENERAL, &bystander, "hello");
    guild.seed_message(GENERAL_THREAD, &spammer, "dm me");
    guild.seed_message(OFF_TOPIC, &spammer, "outside the purge category");

    let report = JailService::new(&ctx)
        .jail(GUILD, jail_request(vec![spammer.user_id], "scam links"))
        .await
        .unwrap();

    assert_eq!(report.jailed.len(), 1);
    assert!(report.failures.is_empty());
    let jailed = &report.jailed[0];
    assert_eq!(jailed.messages_purged, 2);
    assert_eq!(jailed.roles_removed.len(), 3);
    assert!(jailed.logged);

    // Jail invariant: the jail role and nothing else
    assert_eq!(guild.roles_of(spammer.user_id), vec![JAIL_ROLE]);

    // Purge hits the category channel and its thread only
    assert_eq!(guild.messages_in(GENERAL).len(), 1);
    assert!(guild.messages_in(GENERAL_THREAD).is_empty());
    assert_eq!(guild.messages_in(OFF_TOPIC).len(), 1);

    // Log entry carries the transcript
    let logged = guild.sent_to(LOG_CHANNEL);
    assert_eq!(logged.len(), 1);
    assert!(logged[0].content.starts_with("🔒 User Jailed:"));
    assert!(logged[0].content.contains("• Reason: scam links"));
    let attachment = logged[0].attachment.as_ref().unwrap();
    assert_eq!(attachment.filename, "7001_purged_messages.txt");
    let text = String::from_utf8(attachment.data.clone()).unwrap();
    assert!(text.contains("spammer (7001): free nitro http://scam.example"));
    assert!(text.contains("spammer (7001): dm me"));

    let transcript = jailed.transcript.as_ref().unwrap();
    assert!(std::path::Path::new(transcript).exists());
}

#[tokio::test]
async fn test_jail_batch_reports_already_jailed_with_prior_links() {
    let guild = standard_guild();
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    let ids = member_ids(8_000, 20);
    for (i, id) in ids.iter().enumerate() {
        let roles: &[Snowflake] = match i {
            0..=3 => &[JAIL_ROLE],
            4 => &[ALT_JAIL_ROLE],
            _ => &[DEFAULT_ROLE, TRUSTED_ROLE],
        };
        guild.add_member(member(*id, &format!("user{i}"), roles));
    }

    // Four earlier jail entries for the first member; only three are linked
    let moderator = guild.member(MODERATOR).unwrap();
    let repeat = guild.member(ids[0]).unwrap();
    for _ in 0..4 {
        let entry = jail_service::services::audit_log::jailed_entry(&repeat, &moderator, chrono::Utc::now(), "again");
        guild.seed_message(LOG_CHANNEL, &moderator, &entry);
    }

    let report = JailService::new(&ctx)
        .jail(GUILD, jail_request(ids.clone(), "raid"))
        .await
        .unwrap();

    assert_eq!(report.jailed.len(), 15);
    assert_eq!(report.already_jailed.len(), 5);
    assert!(report.failures.is_empty());
    assert_eq!(report.targets_dropped, 0);

    let repeat_entry = report
        .already_jailed
        .iter()
        .find(|a| a.user_id == ids[0])
        .unwrap();
    assert_eq!(repeat_entry.prior_log_links.len(), 3);
    assert!(repeat_entry.prior_log_links[0].starts_with("https://discord.com/channels/1000/3001/"));
    assert!(report
        .already_jailed
        .iter()
        .filter(|a| a.user_id != ids[0])
        .all(|a| a.prior_log_links.is_empty()));

    for id in &ids[5..] {
        assert_eq!(guild.roles_of(*id), vec![JAIL_ROLE]);
    }
    // Already jailed members are left untouched
    assert_eq!(guild.roles_of(ids[4]), vec![ALT_JAIL_ROLE]);
}

#[tokio::test]
async fn test_jail_caps_targets_and_dedups() {
    let guild = standard_guild();
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    let mut ids = member_ids(9_000, 22);
    for id in &ids {
        guild.add_member(member(*id, "bulk", &[DEFAULT_ROLE]));
    }
    ids.insert(1, ids[0]);

    let report = JailService::new(&ctx)
        .jail(GUILD, jail_request(ids.clone(), "raid"))
        .await
        .unwrap();

    assert_eq!(report.jailed.len(), 20);
    assert_eq!(report.targets_dropped, 2);
    assert_eq!(guild.roles_of(Snowflake::new(9_021)), vec![DEFAULT_ROLE]);
}

#[tokio::test]
async fn test_jail_reports_unknown_members_per_target() {
    let guild = standard_guild();
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    let report = JailService::new(&ctx)
        .jail(GUILD, jail_request(vec![REGULAR, Snowflake::new(404)], "spam"))
        .await
        .unwrap();

    assert_eq!(report.jailed.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].user_id, Snowflake::new(404));
    assert_eq!(report.failures[0].code, "UNKNOWN_MEMBER");
    assert!(report.reply().contains("is not a member of this guild."));
}

#[tokio::test]
async fn test_jail_requires_moderator() {
    let guild = standard_guild();
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    let mut request = jail_request(vec![MODERATOR], "revenge");
    request.actor_id = REGULAR;

    let err = JailService::new(&ctx).jail(GUILD, request).await.unwrap_err();

    assert!(matches!(err, ServiceError::PermissionDenied { .. }));
    assert_eq!(err.status_code(), 403);
    assert_eq!(guild.roles_of(MODERATOR), vec![DEFAULT_ROLE, MOD_ROLE]);
    assert!(guild.sent_to(LOG_CHANNEL).is_empty());
}

#[tokio::test]
async fn test_gate_role_counts_as_moderator() {
    let guild = standard_guild();
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    let mut request = jail_request(vec![REGULAR], "spam");
    request.actor_id = GATEKEEPER;

    let report = JailService::new(&ctx).jail(GUILD, request).await.unwrap();
    assert_eq!(report.jailed.len(), 1);
}

#[tokio::test]
async fn test_guild_owner_without_roles_can_jail() {
    let guild = standard_guild();
    guild.add_member(member(OWNER, "owner", &[]));
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    let mut request = jail_request(vec![REGULAR], "spam");
    request.actor_id = OWNER;

    let report = JailService::new(&ctx).jail(GUILD, request).await.unwrap();
    assert_eq!(report.jailed.len(), 1);
    assert_eq!(guild.roles_of(REGULAR), vec![JAIL_ROLE]);
}

#[tokio::test]
async fn test_missing_permission_on_one_member_spares_the_rest() {
    let guild = standard_guild();
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    let targets = member_ids(7_101, 3);
    for (i, id) in targets.iter().enumerate() {
        guild.add_member(member(*id, &format!("raider{i}"), &[DEFAULT_ROLE]));
    }
    let protected = targets[1];
    guild.fail_role_ops(protected, [DomainError::MissingPermission("MANAGE_ROLES".into())]);

    let report = JailService::new(&ctx)
        .jail(GUILD, jail_request(targets.clone(), "raid"))
        .await
        .unwrap();

    assert_eq!(report.jailed.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].user_id, protected);
    assert_eq!(report.failures[0].code, "MISSING_PERMISSIONS");

    // The jail role is granted first, so the failed member is untouched
    assert_eq!(guild.roles_of(protected), vec![DEFAULT_ROLE]);
    assert_eq!(guild.roles_of(targets[0]), vec![JAIL_ROLE]);
    assert_eq!(guild.roles_of(targets[2]), vec![JAIL_ROLE]);
}

#[tokio::test]
async fn test_failed_strip_still_leaves_jail_role() {
    let guild = standard_guild();
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    let target = Snowflake::new(7_200);
    guild.add_member(member(target, "booster", &[DEFAULT_ROLE, TRUSTED_ROLE]));
    guild.fail_role_change(target, TRUSTED_ROLE, [DomainError::MissingPermission("MANAGE_ROLES".into())]);

    let report = JailService::new(&ctx)
        .jail(GUILD, jail_request(vec![target], "spam"))
        .await
        .unwrap();

    assert!(report.jailed.is_empty());
    assert_eq!(report.failures[0].code, "MISSING_PERMISSIONS");
    assert_eq!(guild.roles_of(target), vec![JAIL_ROLE, TRUSTED_ROLE]);
}

#[tokio::test]
async fn test_jail_rejects_guild_outside_allow_list() {
    let guild = standard_guild();
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    let err = JailService::new(&ctx)
        .jail(OTHER_GUILD, jail_request(vec![REGULAR], "spam"))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::GuildNotAllowed(id) if id == OTHER_GUILD));
    assert_eq!(guild.roles_of(REGULAR), vec![DEFAULT_ROLE]);
}

#[tokio::test]
async fn test_jail_requires_reason() {
    let guild = standard_guild();
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    let err = JailService::new(&ctx)
        .jail(GUILD, jail_request(vec![REGULAR], "   "))
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "VALIDATION_ERROR");
    assert_eq!(guild.roles_of(REGULAR), vec![DEFAULT_ROLE]);
}

#[tokio::test]
async fn test_jail_without_jail_role_fails_before_changes() {
    let guild = standard_guild();
    guild.state().roles.retain(|r| r.id != JAIL_ROLE);
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    let err = JailService::new(&ctx)
        .jail(GUILD, jail_request(vec![REGULAR], "spam"))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::ConfigurationMissing(_)));
    assert_eq!(guild.roles_of(REGULAR), vec![DEFAULT_ROLE]);
}

#[tokio::test]
async fn test_jail_without_log_channel_still_jails() {
    let guild = standard_guild();
    guild.state().channels.retain(|c| c.id != LOG_CHANNEL);
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    let report = JailService::new(&ctx)
        .jail(GUILD, jail_request(vec![REGULAR], "spam"))
        .await
        .unwrap();

    assert_eq!(report.jailed.len(), 1);
    assert!(!report.jailed[0].logged);
    assert_eq!(guild.roles_of(REGULAR), vec![JAIL_ROLE]);
}

// ============================================================================
// Purge with retry
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_purge_retries_through_rate_limits() {
    let guild = standard_guild();
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    let spammer = guild.member(REGULAR).unwrap();
    guild.seed_message(GENERAL, &spammer, "buy followers");
    guild.fail_purges(
        GENERAL,
        [
            DomainError::RateLimited {
                retry_after: Some(Duration::from_secs(1)),
            },
            DomainError::RateLimited {
                retry_after: Some(Duration::from_secs(2)),
            },
        ],
    );

    let start = tokio::time::Instant::now();
    let report = JailService::new(&ctx)
        .jail(GUILD, jail_request(vec![REGULAR], "spam"))
        .await
        .unwrap();

    assert_eq!(guild.purge_attempts(GENERAL, REGULAR), 3);
    assert_eq!(report.jailed[0].messages_purged, 1);
    assert!(guild.messages_in(GENERAL).is_empty());
    assert!(start.elapsed() >= Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_purge_gives_up_but_member_is_still_jailed() {
    let guild = standard_guild();
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    let spammer = guild.member(REGULAR).unwrap();
    guild.seed_message(GENERAL, &spammer, "buy followers");
    guild.seed_message(GENERAL_THREAD, &spammer, "still here");
    guild.fail_purges(GENERAL, (0..4).map(|_| DomainError::RateLimited { retry_after: None }));
    guild.fail_purges(GENERAL_THREAD, [DomainError::MissingPermission("MANAGE_MESSAGES".into())]);

    let report = JailService::new(&ctx)
        .jail(GUILD, jail_request(vec![REGULAR], "spam"))
        .await
        .unwrap();

    assert_eq!(guild.purge_attempts(GENERAL, REGULAR), 4);
    assert_eq!(guild.purge_attempts(GENERAL_THREAD, REGULAR), 1);
    assert_eq!(report.jailed.len(), 1);
    assert_eq!(report.jailed[0].messages_purged, 0);
    assert!(report.jailed[0].transcript.is_none());
    assert_eq!(guild.roles_of(REGULAR), vec![JAIL_ROLE]);

    // No transcript, so the log entry goes out without a file
    let logged = guild.sent_to(LOG_CHANNEL);
    assert_eq!(logged.len(), 1);
    assert!(logged[0].attachment.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_purge_keeps_messages_deleted_before_a_rate_limit() {
    let guild = standard_guild();
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    let spammer = guild.member(REGULAR).unwrap();
    for content in ["first ad", "second ad", "third ad"] {
        guild.seed_message(GENERAL, &spammer, content);
    }
    guild.interrupt_purges(
        GENERAL,
        [DomainError::RateLimited {
            retry_after: Some(Duration::from_millis(10)),
        }],
    );

    let report = JailService::new(&ctx)
        .jail(GUILD, jail_request(vec![REGULAR], "spam"))
        .await
        .unwrap();

    assert_eq!(guild.purge_attempts(GENERAL, REGULAR), 2);
    assert_eq!(report.jailed[0].messages_purged, 3);
    assert!(guild.messages_in(GENERAL).is_empty());

    let logged = guild.sent_to(LOG_CHANNEL);
    let text = String::from_utf8(logged[0].attachment.as_ref().unwrap().data.clone()).unwrap();
    for content in ["first ad", "second ad", "third ad"] {
        assert!(text.contains(content), "transcript is missing {content:?}");
    }
}

#[tokio::test]
async fn test_purge_keeps_messages_deleted_before_a_permission_error() {
    let guild = standard_guild();
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    let spammer = guild.member(REGULAR).unwrap();
    guild.seed_message(GENERAL, &spammer, "gone before the error");
    guild.seed_message(GENERAL, &spammer, "left behind");
    guild.interrupt_purges(GENERAL, [DomainError::MissingPermission("MANAGE_MESSAGES".into())]);

    let report = JailService::new(&ctx)
        .jail(GUILD, jail_request(vec![REGULAR], "spam"))
        .await
        .unwrap();

    assert_eq!(guild.purge_attempts(GENERAL, REGULAR), 1);
    assert_eq!(report.jailed[0].messages_purged, 1);
    assert!(report.jailed[0].transcript.is_some());
    let remaining = guild.messages_in(GENERAL);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].content, "left behind");
}

// ============================================================================
// Unjail
// ============================================================================

#[tokio::test]
async fn test_unjail_restores_default_role() {
    let guild = standard_guild();
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    let jailed = Snowflake::new(7_100);
    guild.add_member(member(jailed, "reformed", &[JAIL_ROLE, ALT_JAIL_ROLE]));

    let report = UnjailService::new(&ctx)
        .unjail(GUILD, unjail_request(vec![jailed], "appeal accepted"))
        .await
        .unwrap();

    assert_eq!(report.released.len(), 1);
    assert!(report.released[0].default_role_granted);
    assert_eq!(report.released[0].roles_removed.len(), 2);
    assert_eq!(guild.roles_of(jailed), vec![DEFAULT_ROLE]);

    let logged = guild.sent_to(LOG_CHANNEL);
    assert_eq!(logged.len(), 1);
    assert!(logged[0].content.starts_with("🔓 User Released:"));
    assert!(logged[0].content.contains("• Reason for releasing: appeal accepted"));
}

#[tokio::test]
async fn test_unjail_of_member_never_jailed_is_noop() {
    let guild = standard_guild();
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    let report = UnjailService::new(&ctx)
        .unjail(GUILD, unjail_request(vec![REGULAR], "mistake"))
        .await
        .unwrap();

    assert!(report.released.is_empty());
    assert_eq!(report.not_jailed, vec![REGULAR]);
    assert_eq!(guild.roles_of(REGULAR), vec![DEFAULT_ROLE]);
    assert!(guild.sent_to(LOG_CHANNEL).is_empty());
}

#[tokio::test]
async fn test_jail_then_unjail_round_trip() {
    let guild = standard_guild();
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    JailService::new(&ctx)
        .jail(GUILD, jail_request(vec![REGULAR], "spam"))
        .await
        .unwrap();
    assert_eq!(guild.roles_of(REGULAR), vec![JAIL_ROLE]);

    UnjailService::new(&ctx)
        .unjail(GUILD, unjail_request(vec![REGULAR], "cleared"))
        .await
        .unwrap();
    assert_eq!(guild.roles_of(REGULAR), vec![DEFAULT_ROLE]);
    assert_eq!(guild.sent_to(LOG_CHANNEL).len(), 2);
}
