//! Moderation handlers
//!
//! One endpoint per moderator command plus the raw text command entry point.
//! Commands that change roles run on their own task: a dropped request or
//! a request timeout cannot stop them between two role changes.

use std::future::Future;

use axum::{
    extract::{Path, State},
    Json,
};
use jail_service::dto::{
    ActorRequest, CommandResponse, JailCheckReport, JailReport, JailRequest, ProfileScanReport,
    TextCommandRequest, UnjailReport, UnjailRequest,
};
use jail_service::services::{CommandService, JailCheckService, JailService, ProfileScanService, UnjailService};
use jail_service::{ServiceContext, ServiceError, ServiceResult};

use crate::extractors::{GuildIdPath, HostCaller, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Run `work` to completion on a separate task and wait for its result
async fn detached<T, F, Fut>(ctx: &ServiceContext, work: F) -> ApiResult<T>
where
    F: FnOnce(ServiceContext) -> Fut,
    Fut: Future<Output = ServiceResult<T>> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::spawn(work(ctx.clone()))
        .await
        .map_err(|e| ServiceError::internal(format!("command task failed: {e}")))?;
    Ok(result?)
}

/// Jail one or more members
///
/// POST /guilds/{guild_id}/jail
pub async fn jail(
    State(state): State<AppState>,
    _caller: HostCaller,
    Path(path): Path<GuildIdPath>,
    ValidatedJson(request): ValidatedJson<JailRequest>,
) -> ApiResult<Json<JailReport>> {
    let guild_id = path.guild_id()?;
    let report = detached(state.service_context(), move |ctx| async move {
        JailService::new(&ctx).jail(guild_id, request).await
    })
    .await?;
    Ok(Json(report))
}

/// Release one or more members
///
/// POST /guilds/{guild_id}/unjail
pub async fn unjail(
    State(state): State<AppState>,
    _caller: HostCaller,
    Path(path): Path<GuildIdPath>,
    ValidatedJson(request): ValidatedJson<UnjailRequest>,
) -> ApiResult<Json<UnjailReport>> {
    let guild_id = path.guild_id()?;
    let report = detached(state.service_context(), move |ctx| async move {
        UnjailService::new(&ctx).unjail(guild_id, request).await
    })
    .await?;
    Ok(Json(report))
}

/// Re-enforce the jail invariant on every jailed member
///
/// POST /guilds/{guild_id}/jailcheck
pub async fn jailcheck(
    State(state): State<AppState>,
    _caller: HostCaller,
    Path(path): Path<GuildIdPath>,
    ValidatedJson(request): ValidatedJson<ActorRequest>,
) -> ApiResult<Json<JailCheckReport>> {
    let guild_id = path.guild_id()?;
    let report = detached(state.service_context(), move |ctx| async move {
        JailCheckService::new(&ctx).jailcheck(guild_id, request).await
    })
    .await?;
    Ok(Json(report))
}

/// Scan member profiles for suspicious keywords
///
/// POST /guilds/{guild_id}/scan-profiles
pub async fn scan_profiles(
    State(state): State<AppState>,
    _caller: HostCaller,
    Path(path): Path<GuildIdPath>,
    ValidatedJson(request): ValidatedJson<ActorRequest>,
) -> ApiResult<Json<ProfileScanReport>> {
    let guild_id = path.guild_id()?;
    let report = ProfileScanService::new(state.service_context())
        .scan(guild_id, request)
        .await?;
    Ok(Json(report))
}

/// Run a raw chat command
///
/// POST /guilds/{guild_id}/commands
pub async fn run_command(
    State(state): State<AppState>,
    _caller: HostCaller,
    Path(path): Path<GuildIdPath>,
    ValidatedJson(request): ValidatedJson<TextCommandRequest>,
) -> ApiResult<Json<CommandResponse>> {
    let guild_id = path.guild_id()?;
    let response = detached(state.service_context(), move |ctx| async move {
        CommandService::new(&ctx).execute(guild_id, request).await
    })
    .await?;
    Ok(Json(response))
}
