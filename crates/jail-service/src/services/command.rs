//! Command service
//!
//! Runs a raw chat command by parsing it and handing it to the matching
//! moderation service.

use jail_core::Snowflake;
use tracing::{debug, instrument};

use crate::commands::{parse_command, Command};
use crate::dto::{ActorRequest, CommandOutcome, CommandResponse, JailRequest, TextCommandRequest, UnjailRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::jail::JailService;
use super::jailcheck::JailCheckService;
use super::profile_scan::ProfileScanService;
use super::unjail::UnjailService;

/// Command service
pub struct CommandService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommandService<'a> {
    /// Create a new CommandService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Parse and run a text command
    #[instrument(skip(self, request), fields(actor_id = %request.actor_id))]
    pub async fn execute(&self, guild_id: Snowflake, request: TextCommandRequest) -> ServiceResult<CommandResponse> {
        let command = parse_command(&request.content, &self.ctx.jail_config().command_prefix)
            .map_err(|e| ServiceError::validation(e.to_string()))?;
        debug!(guild_id = %guild_id, command = command.name(), "Text command parsed");

        let (actor_id, channel_id) = (request.actor_id, request.channel_id);
        let outcome = match command {
            Command::Jail { targets, reason } => CommandOutcome::Jail(
                JailService::new(self.ctx)
                    .jail(
                        guild_id,
                        JailRequest {
                            actor_id,
                            user_ids: targets,
                            reason,
                            channel_id,
                        },
                    )
                    .await?,
            ),
            Command::Unjail { targets, reason } => CommandOutcome::Unjail(
                UnjailService::new(self.ctx)
                    .unjail(
                        guild_id,
                        UnjailRequest {
                            actor_id,
                            user_ids: targets,
                            reason,
                            channel_id,
                        },
                    )
                    .await?,
            ),
            Command::JailCheck => CommandOutcome::Jailcheck(
                JailCheckService::new(self.ctx)
                    .jailcheck(guild_id, ActorRequest { actor_id, channel_id })
                    .await?,
            ),
            Command::ScanProfiles => CommandOutcome::ScanProfiles(
                ProfileScanService::new(self.ctx)
                    .scan(guild_id, ActorRequest { actor_id, channel_id })
                    .await?,
            ),
        };

        Ok(CommandResponse::from(outcome))
    }
}
