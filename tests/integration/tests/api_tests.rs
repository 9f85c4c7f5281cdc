//! HTTP surface tests
//!
//! Run with: cargo test -p integration-tests --test api_tests

use std::time::Duration;

use integration_tests::*;
use jail_core::{DomainError, GuildEvent, MemberJoinedEvent};
use reqwest::StatusCode;
use serde_json::{json, Value};

fn jail_path(guild: u64) -> String {
    format!("/api/v1/guilds/{guild}/jail")
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let server = TestServer::start(standard_guild()).await.unwrap();

    let health: Value = assert_json(server.get("/health").await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_eq!(health["status"], "healthy");

    let ready: Value = assert_json(server.get("/health/ready").await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_eq!(ready["status"], "ready");
    assert_eq!(ready["checks"]["allowed_guilds"], 1);
    assert_eq!(ready["checks"]["auth_enabled"], false);
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_missing_bearer_is_rejected() {
    let server = TestServer::start_with_secret(standard_guild(), Some("hunter2"))
        .await
        .unwrap();

    let body = json!({"actor_id": "5001"});
    let error: Value = assert_json(
        server.post("/api/v1/guilds/1000/jailcheck", &body).await.unwrap(),
        StatusCode::UNAUTHORIZED,
    )
    .await
    .unwrap();
    assert_eq!(error["error"]["code"], "MISSING_AUTH");
}

#[tokio::test]
async fn test_wrong_secret_is_rejected() {
    let server = TestServer::start_with_secret(standard_guild(), Some("hunter2"))
        .await
        .unwrap();

    let body = json!({"actor_id": "5001"});
    let error: Value = assert_json(
        server
            .post_auth("/api/v1/guilds/1000/jailcheck", "hunter3", &body)
            .await
            .unwrap(),
        StatusCode::UNAUTHORIZED,
    )
    .await
    .unwrap();
    assert_eq!(error["error"]["code"], "INVALID_SECRET");

    let ok = server
        .post_auth("/api/v1/guilds/1000/jailcheck", "hunter2", &body)
        .await
        .unwrap();
    assert_status(ok, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_needs_no_secret() {
    let server = TestServer::start_with_secret(standard_guild(), Some("hunter2"))
        .await
        .unwrap();

    assert_status(server.get("/health").await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
}

// ============================================================================
// Moderation endpoints
// ============================================================================

#[tokio::test]
async fn test_jail_endpoint() {
    let server = TestServer::start(standard_guild()).await.unwrap();

    let body = json!({
        "actor_id": "5001",
        "user_ids": ["5003"],
        "reason": "posting invite links",
        "channel_id": "3006"
    });
    let report: Value = assert_json(server.post(&jail_path(1000), &body).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();

    assert_eq!(report["guild_id"], "1000");
    assert_eq!(report["jailed"][0]["user_id"], "5003");
    assert_eq!(report["jailed"][0]["roles_removed"], json!(["2004"]));
    assert_eq!(server.guild.roles_of(REGULAR), vec![JAIL_ROLE]);
}

#[tokio::test]
async fn test_jail_finishes_after_caller_gives_up() {
    let server = TestServer::start(standard_guild()).await.unwrap();
    let spammer = server.guild.member(REGULAR).unwrap();
    server.guild.seed_message(GENERAL, &spammer, "limited time offer");
    server.guild.fail_purges(
        GENERAL,
        [DomainError::RateLimited {
            retry_after: Some(Duration::from_millis(500)),
        }],
    );

    let impatient = reqwest::Client::builder()
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();
    let body = json!({"actor_id": "5001", "user_ids": ["5003"], "reason": "spam"});
    let sent = impatient
        .post(format!("{}{}", server.base_url(), jail_path(1000)))
        .json(&body)
        .send()
        .await;
    assert!(sent.is_err(), "request should time out while the purge backs off");

    let guild = server.guild.clone();
    let finished = wait_until(Duration::from_secs(5), || {
        let guild = guild.clone();
        async move { !guild.sent_to(LOG_CHANNEL).is_empty() }
    })
    .await;
    assert!(finished, "jail was abandoned with the request");
    assert_eq!(server.guild.roles_of(REGULAR), vec![JAIL_ROLE]);
    assert!(server.guild.messages_in(GENERAL).is_empty());
}

#[tokio::test]
async fn test_unjail_endpoint() {
    let server = TestServer::start(standard_guild()).await.unwrap();
    server.guild.add_member(member(
        jail_core::Snowflake::new(7_700),
        "appealed",
        &[JAIL_ROLE],
    ));

    let body = json!({
        "actor_id": "5001",
        "user_ids": ["7700"],
        "reason": "appeal accepted"
    });
    let report: Value = assert_json(
        server.post("/api/v1/guilds/1000/unjail", &body).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();

    assert_eq!(report["released"][0]["user_id"], "7700");
    assert_eq!(
        server.guild.roles_of(jail_core::Snowflake::new(7_700)),
        vec![DEFAULT_ROLE]
    );
}

#[tokio::test]
async fn test_scan_profiles_endpoint() {
    let server = TestServer::start(standard_guild()).await.unwrap();
    server
        .guild
        .add_member(member(jail_core::Snowflake::new(7_800), "nft_drops", &[]));

    let body = json!({"actor_id": "5002", "channel_id": "3006"});
    let report: Value = assert_json(
        server.post("/api/v1/guilds/1000/scan-profiles", &body).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();

    assert_eq!(report["flagged"][0]["keywords"], json!(["NFT"]));
    assert_eq!(report["delivery"], "attachment");
    assert_eq!(report["delivered_to"], "3001");
}

#[tokio::test]
async fn test_text_command_endpoint() {
    let server = TestServer::start(standard_guild()).await.unwrap();

    let body = json!({
        "actor_id": "5001",
        "channel_id": "3006",
        "content": "!jail <@5003> reason: spam"
    });
    let response: Value = assert_json(
        server.post("/api/v1/guilds/1000/commands", &body).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();

    assert_eq!(response["command"], "jail");
    assert_eq!(response["reply"], "Jailed.");
    assert_eq!(response["report"]["jailed"][0]["user_id"], "5003");
    assert_eq!(server.guild.roles_of(REGULAR), vec![JAIL_ROLE]);
}

#[tokio::test]
async fn test_unknown_text_command() {
    let server = TestServer::start(standard_guild()).await.unwrap();

    let body = json!({"actor_id": "5001", "content": "!ban <@5003>"});
    let error: Value = assert_json(
        server.post("/api/v1/guilds/1000/commands", &body).await.unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await
    .unwrap();
    assert_eq!(error["error"]["code"], "VALIDATION_ERROR");
}

// ============================================================================
// Events
// ============================================================================

#[tokio::test]
async fn test_event_is_accepted_and_handled() {
    let server = TestServer::start(standard_guild()).await.unwrap();
    let newcomer = fresh_account(9, "newcomer", 1);
    server.guild.add_member(newcomer.clone());

    let event = GuildEvent::MemberJoined(MemberJoinedEvent::new(newcomer.clone()));
    let accepted: Value = assert_json(
        server.post("/api/v1/events", &event).await.unwrap(),
        StatusCode::ACCEPTED,
    )
    .await
    .unwrap();
    assert_eq!(accepted["event_type"], "MEMBER_JOINED");
    assert_eq!(accepted["guild_id"], "1000");

    let guild = server.guild.clone();
    let jailed = wait_until(Duration::from_secs(5), || {
        let guild = guild.clone();
        async move { guild.roles_of(newcomer.user_id) == vec![JAIL_ROLE] }
    })
    .await;
    assert!(jailed, "event was never handled");
}

#[tokio::test]
async fn test_malformed_event_is_rejected() {
    let server = TestServer::start(standard_guild()).await.unwrap();

    let error: Value = assert_json(
        server
            .post("/api/v1/events", &json!({"type": "MESSAGE_CREATED"}))
            .await
            .unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await
    .unwrap();
    assert_eq!(error["error"]["code"], "INVALID_BODY");
}

// ============================================================================
// Errors
// ============================================================================

#[tokio::test]
async fn test_empty_target_list_is_invalid() {
    let server = TestServer::start(standard_guild()).await.unwrap();

    let body = json!({"actor_id": "5001", "user_ids": [], "reason": "spam"});
    let error: Value = assert_json(
        server.post(&jail_path(1000), &body).await.unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await
    .unwrap();
    assert_eq!(error["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_guild_outside_allow_list() {
    let server = TestServer::start(standard_guild()).await.unwrap();

    let body = json!({"actor_id": "5001", "user_ids": ["5003"], "reason": "spam"});
    let error: Value = assert_json(
        server.post(&jail_path(1001), &body).await.unwrap(),
        StatusCode::FORBIDDEN,
    )
    .await
    .unwrap();
    assert_eq!(error["error"]["code"], "GUILD_NOT_ALLOWED");
}

#[tokio::test]
async fn test_non_moderator_is_forbidden() {
    let server = TestServer::start(standard_guild()).await.unwrap();

    let body = json!({"actor_id": "5003", "user_ids": ["5001"], "reason": "revenge"});
    let error: Value = assert_json(
        server.post(&jail_path(1000), &body).await.unwrap(),
        StatusCode::FORBIDDEN,
    )
    .await
    .unwrap();
    assert_eq!(error["error"]["code"], "MISSING_PERMISSIONS");
    assert_eq!(server.guild.roles_of(MODERATOR), vec![DEFAULT_ROLE, MOD_ROLE]);
}

#[tokio::test]
async fn test_bad_guild_id() {
    let server = TestServer::start(standard_guild()).await.unwrap();

    let body = json!({"actor_id": "5001"});
    let error: Value = assert_json(
        server
            .post("/api/v1/guilds/not-a-number/jailcheck", &body)
            .await
            .unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await
    .unwrap();
    assert_eq!(error["error"]["code"], "INVALID_PATH_PARAMETER");
}
