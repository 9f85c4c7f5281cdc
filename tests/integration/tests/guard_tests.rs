//! Passive guards, jailcheck and the profile scan
//!
//! Run with: cargo test -p integration-tests --test guard_tests

use std::time::Duration;

use integration_tests::*;
use jail_core::{GuildEvent, MemberJoinedEvent, MemberUpdatedEvent, Snowflake, UserProfile};
use jail_service::dto::{ActorRequest, ReportDelivery};
use jail_service::services::{spawn_event, EventOutcome, GuardService, JailCheckService, ProfileScanService};

fn actor() -> ActorRequest {
    ActorRequest {
        actor_id: MODERATOR,
        channel_id: Some(BOT_COMMANDS),
    }
}

// ============================================================================
// Auto-jail on join
// ============================================================================

#[tokio::test]
async fn test_fresh_account_without_roles_is_jailed_on_join() {
    let guild = standard_guild();
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    let newcomer = fresh_account(1, "newcomer", 10);
    guild.add_member(newcomer.clone());

    let outcome = GuardService::new(&ctx)
        .handle(&GuildEvent::MemberJoined(MemberJoinedEvent::new(newcomer.clone())))
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        EventOutcome::AutoJailed { user_id, account_age_days } if user_id == newcomer.user_id && account_age_days == 10
    ));
    assert_eq!(guild.roles_of(newcomer.user_id), vec![JAIL_ROLE]);

    let logged = guild.sent_to(LOG_CHANNEL);
    assert_eq!(logged.len(), 1);
    assert!(logged[0].content.starts_with("🚫 Spam Prevention:"));
    assert!(logged[0].content.contains("• Account Age: 10 days"));
}

#[tokio::test]
async fn test_old_account_is_left_alone() {
    let guild = standard_guild();
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    let veteran = fresh_account(2, "veteran", 400);
    guild.add_member(veteran.clone());

    let outcome = GuardService::new(&ctx)
        .handle(&GuildEvent::MemberJoined(MemberJoinedEvent::new(veteran.clone())))
        .await
        .unwrap();

    assert_eq!(outcome, EventOutcome::NoChange);
    assert!(guild.roles_of(veteran.user_id).is_empty());
    assert!(guild.sent_to(LOG_CHANNEL).is_empty());
}

#[tokio::test]
async fn test_fresh_account_with_roles_is_left_alone() {
    let guild = standard_guild();
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    let invited = fresh_account(3, "invited", 5).with_roles([DEFAULT_ROLE]);
    guild.add_member(invited.clone());

    let outcome = GuardService::new(&ctx)
        .handle(&GuildEvent::MemberJoined(MemberJoinedEvent::new(invited.clone())))
        .await
        .unwrap();

    assert_eq!(outcome, EventOutcome::NoChange);
    assert_eq!(guild.roles_of(invited.user_id), vec![DEFAULT_ROLE]);
}

#[tokio::test]
async fn test_events_outside_allow_list_are_ignored() {
    let guild = standard_guild();
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    let mut stranger = fresh_account(4, "stranger", 1);
    stranger.guild_id = OTHER_GUILD;

    let outcome = GuardService::new(&ctx)
        .handle(&GuildEvent::MemberJoined(MemberJoinedEvent::new(stranger)))
        .await
        .unwrap();

    assert_eq!(outcome, EventOutcome::Ignored);
    assert!(guild.sent_to(LOG_CHANNEL).is_empty());
}

#[tokio::test]
async fn test_spawned_event_jails_in_background() {
    let guild = standard_guild();
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    let newcomer = fresh_account(5, "newcomer", 2);
    guild.add_member(newcomer.clone());

    spawn_event(ctx, GuildEvent::MemberJoined(MemberJoinedEvent::new(newcomer.clone())))
        .await
        .unwrap();

    assert_eq!(guild.roles_of(newcomer.user_id), vec![JAIL_ROLE]);
}

// ============================================================================
// Auto-strip on role change
// ============================================================================

#[tokio::test]
async fn test_gaining_jail_role_strips_everything_else() {
    let guild = standard_guild();
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    let before = member(Snowflake::new(7_200), "hoarder", &[DEFAULT_ROLE, TRUSTED_ROLE]);
    let after = before.clone().with_roles([JAIL_ROLE]);
    guild.add_member(after.clone());

    let outcome = GuardService::new(&ctx)
        .handle(&GuildEvent::MemberUpdated(MemberUpdatedEvent::new(before, after.clone())))
        .await
        .unwrap();

    match outcome {
        EventOutcome::RolesStripped { user_id, mut roles_removed } => {
            roles_removed.sort();
            assert_eq!(user_id, after.user_id);
            assert_eq!(roles_removed, vec![DEFAULT_ROLE, TRUSTED_ROLE]);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(guild.roles_of(after.user_id), vec![JAIL_ROLE]);

    let logged = guild.sent_to(LOG_CHANNEL);
    assert_eq!(logged.len(), 1);
    assert!(logged[0].content.starts_with("🔒 Automatic Role Removal:"));
    assert!(logged[0].content.contains("Member"));
    assert!(logged[0].content.contains("Trusted"));
}

#[tokio::test]
async fn test_role_change_without_jail_role_is_ignored() {
    let guild = standard_guild();
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    let before = member(Snowflake::new(7_201), "artist", &[DEFAULT_ROLE]);
    let after = before.clone().with_roles([ARTIST_ROLE]);
    guild.add_member(after.clone());

    let outcome = GuardService::new(&ctx)
        .handle(&GuildEvent::MemberUpdated(MemberUpdatedEvent::new(before, after.clone())))
        .await
        .unwrap();

    assert_eq!(outcome, EventOutcome::Ignored);
    assert_eq!(guild.roles_of(after.user_id), vec![DEFAULT_ROLE, ARTIST_ROLE]);
}

#[tokio::test]
async fn test_jail_role_alone_needs_no_change() {
    let guild = standard_guild();
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    let before = member(Snowflake::new(7_202), "quiet", &[]);
    let after = before.clone().with_roles([JAIL_ROLE]);
    guild.add_member(after.clone());

    let outcome = GuardService::new(&ctx)
        .handle(&GuildEvent::MemberUpdated(MemberUpdatedEvent::new(before, after)))
        .await
        .unwrap();

    assert_eq!(outcome, EventOutcome::NoChange);
    assert!(guild.sent_to(LOG_CHANNEL).is_empty());
}

// ============================================================================
// Jailcheck
// ============================================================================

#[tokio::test]
async fn test_jailcheck_enforces_jail_role_holders_only() {
    let guild = standard_guild();
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    let drifted = Snowflake::new(7_300);
    let drifted_more = Snowflake::new(7_301);
    let clean = Snowflake::new(7_302);
    guild.add_member(member(drifted, "drifted", &[JAIL_ROLE, DEFAULT_ROLE]));
    guild.add_member(member(drifted_more, "drifted_more", &[JAIL_ROLE, TRUSTED_ROLE, ARTIST_ROLE]));
    guild.add_member(member(clean, "clean", &[JAIL_ROLE]));

    let report = JailCheckService::new(&ctx).jailcheck(GUILD, actor()).await.unwrap();

    assert_eq!(report.members_checked, 3);
    assert_eq!(report.members_processed, 2);
    assert_eq!(report.roles_removed, 3);
    assert_eq!(report.failures, 0);

    for id in [drifted, drifted_more, clean] {
        assert_eq!(guild.roles_of(id), vec![JAIL_ROLE]);
    }
    // Members without the jail role keep theirs
    assert_eq!(guild.roles_of(REGULAR), vec![DEFAULT_ROLE]);

    let logged = guild.sent_to(LOG_CHANNEL);
    assert_eq!(logged.len(), 2);
    assert!(logged
        .iter()
        .all(|m| m.content.starts_with("🔒 Manual Jail Role Enforcement:") && m.content.contains("Initiated by: mod")));
}

#[tokio::test]
async fn test_jailcheck_requires_moderator() {
    let guild = standard_guild();
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    let err = JailCheckService::new(&ctx)
        .jailcheck(
            GUILD,
            ActorRequest {
                actor_id: REGULAR,
                channel_id: None,
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 403);
}

// ============================================================================
// Profile scan
// ============================================================================

#[tokio::test]
async fn test_scan_flags_keywords_and_skips_jailed_members() {
    let guild = standard_guild();
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    let promoter = Snowflake::new(7_400);
    guild.add_member(member(promoter, "CryptoKing", &[DEFAULT_ROLE]));
    guild.set_profile(UserProfile {
        user_id: promoter,
        bio: Some("DM me for crypto signals".into()),
        pronouns: None,
    });

    let jailed = Snowflake::new(7_401);
    guild.add_member(member(jailed, "NFTguy", &[ALT_JAIL_ROLE]));

    let report = ProfileScanService::new(&ctx).scan(GUILD, actor()).await.unwrap();

    // Staff, regular and the promoter; the jailed member is skipped
    assert_eq!(report.members_scanned, 4);
    assert_eq!(report.flagged.len(), 1);
    assert_eq!(report.flagged[0].user_id, promoter);
    assert_eq!(report.flagged[0].keywords, vec!["CRYPTO", "DM"]);
    assert_eq!(report.delivery, ReportDelivery::Attachment);
    assert_eq!(report.delivered_to, Some(LOG_CHANNEL));

    let posted = guild.sent_to(LOG_CHANNEL);
    assert_eq!(posted.len(), 1);
    let attachment = posted[0].attachment.as_ref().unwrap();
    assert_eq!(attachment.filename, "suspicious_profiles_report.txt");
    let text = String::from_utf8(attachment.data.clone()).unwrap();
    assert!(text.contains("• CryptoKing (ID: 7400): CRYPTO, DM"));
}

#[tokio::test]
async fn test_scan_falls_back_to_inline_report() {
    let guild = standard_guild();
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    guild.add_member(member(Snowflake::new(7_500), "free_nitro", &[]));
    guild.fail_sends(
        LOG_CHANNEL,
        [jail_core::DomainError::HttpError {
            status: 413,
            message: "Request entity too large".into(),
        }],
    );

    let report = ProfileScanService::new(&ctx).scan(GUILD, actor()).await.unwrap();

    assert_eq!(report.delivery, ReportDelivery::Inline);
    let posted = guild.sent_to(LOG_CHANNEL);
    assert_eq!(posted.len(), 1);
    assert!(posted[0].attachment.is_none());
    assert!(posted[0].content.contains("free_nitro"));
}

#[tokio::test]
async fn test_scan_uses_invoking_channel_without_log_channel() {
    let guild = standard_guild();
    guild.state().channels.retain(|c| c.id != LOG_CHANNEL);
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    guild.add_member(member(Snowflake::new(7_600), "bitcoin_bob", &[]));

    let report = ProfileScanService::new(&ctx).scan(GUILD, actor()).await.unwrap();

    assert_eq!(report.delivered_to, Some(BOT_COMMANDS));
    assert_eq!(guild.sent_to(BOT_COMMANDS).len(), 1);
}

#[tokio::test]
async fn test_scan_with_no_hits_posts_nothing() {
    let guild = standard_guild();
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    let report = tokio::time::timeout(
        Duration::from_secs(5),
        ProfileScanService::new(&ctx).scan(GUILD, actor()),
    )
    .await
    .unwrap()
    .unwrap();

    assert!(report.flagged.is_empty());
    assert_eq!(report.delivery, ReportDelivery::NotNeeded);
    assert!(guild.sent_to(LOG_CHANNEL).is_empty());
}
