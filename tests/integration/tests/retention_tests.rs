//! Transcript retention after a real jail
//!
//! Run with: cargo test -p integration-tests --test retention_tests

use chrono::{Duration, Utc};
use integration_tests::*;
use jail_core::Snowflake;
use jail_service::dto::JailRequest;
use jail_service::services::JailService;

#[tokio::test]
async fn test_transcripts_expire_after_retention() {
    let guild = standard_guild();
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild.clone(), dir.path());

    let spammer = member(Snowflake::new(7_900), "spammer", &[DEFAULT_ROLE]);
    guild.add_member(spammer.clone());
    guild.seed_message(GENERAL, &spammer, "join my server");

    let report = JailService::new(&ctx)
        .jail(
            GUILD,
            JailRequest {
                actor_id: MODERATOR,
                user_ids: vec![spammer.user_id],
                reason: "advertising".into(),
                channel_id: None,
            },
        )
        .await
        .unwrap();
    let transcript = report.jailed[0].transcript.clone().unwrap();
    assert!(std::path::Path::new(&transcript).exists());

    let store = ctx.transcripts();

    let early = store.sweep_expired(Utc::now() + Duration::days(6)).await.unwrap();
    assert_eq!((early.removed, early.kept), (0, 1));
    assert!(std::path::Path::new(&transcript).exists());

    let late = store.sweep_expired(Utc::now() + Duration::days(8)).await.unwrap();
    assert_eq!((late.removed, late.kept), (1, 0));
    assert!(!std::path::Path::new(&transcript).exists());
}

#[tokio::test]
async fn test_sweep_ignores_unrelated_files() {
    let guild = standard_guild();
    let dir = tempfile::tempdir().unwrap();
    let ctx = service_context(guild, dir.path());

    std::fs::write(dir.path().join("notes.txt"), "keep me").unwrap();

    let report = ctx
        .transcripts()
        .sweep_expired(Utc::now() + Duration::days(30))
        .await
        .unwrap();

    assert_eq!(report.removed, 0);
    assert!(dir.path().join("notes.txt").exists());
}
