//! Purge service
//!
//! Removes a jailed member's recent messages from the monitored categories.
//! Every channel is handled independently and best-effort: a channel that
//! fails contributes only what was deleted before the failure and never
//! stops the others.

use std::collections::HashSet;

use futures::future::join_all;
use jail_core::{Channel, Message, Snowflake};
use tracing::{debug, error, instrument, warn};

use super::context::ServiceContext;
use super::retry::{back_off, should_retry};

/// Purge service
pub struct PurgeService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PurgeService<'a> {
    /// Create a new PurgeService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Text channels inside the purge categories, plus their active threads
    ///
    /// Listing failures are logged and shrink the result; they never fail.
    #[instrument(skip(self))]
    pub async fn purge_channels(&self, guild_id: Snowflake) -> Vec<Channel> {
        let categories = &self.ctx.jail_config().purge_category_ids;
        if categories.is_empty() {
            return Vec::new();
        }

        let channels = match self.ctx.client().list_channels(guild_id).await {
            Ok(channels) => channels,
            Err(e) => {
                warn!(guild_id = %guild_id, error = %e, "Failed to list channels for purge");
                return Vec::new();
            }
        };

        let mut targets: Vec<Channel> = channels
            .into_iter()
            .filter(|c| c.is_text() && c.parent_id.is_some_and(|p| categories.contains(&p)))
            .collect();
        let parents: HashSet<Snowflake> = targets.iter().map(|c| c.id).collect();

        match self.ctx.client().list_active_threads(guild_id).await {
            Ok(threads) => targets.extend(
                threads
                    .into_iter()
                    .filter(|t| t.parent_id.is_some_and(|p| parents.contains(&p))),
            ),
            Err(e) => warn!(guild_id = %guild_id, error = %e, "Failed to list active threads for purge"),
        }

        debug!(guild_id = %guild_id, channels = targets.len(), "Purge channels resolved");
        targets
    }

    /// Purge one channel, retrying only on rate limits
    ///
    /// Messages deleted by every attempt are kept, so a pass cut short by a
    /// rate limit or a permission error still reports what it removed.
    #[instrument(skip(self))]
    pub async fn purge_with_retry(&self, channel_id: Snowflake, author_id: Snowflake) -> Vec<Message> {
        let client = self.ctx.client();
        let policy = self.ctx.purge_config();

        let mut purged: Vec<Message> = Vec::new();
        let mut attempt = 0;
        let error = loop {
            let outcome = client.purge_authored_by(channel_id, author_id, policy.limit).await;
            purged.extend(outcome.deleted);
            match outcome.error {
                Some(err) if should_retry(policy, &err, attempt) => {
                    attempt += 1;
                    back_off(policy, "purge", &err, attempt).await;
                }
                other => break other,
            }
        };

        purged.sort_by_key(|m| m.id);
        purged.dedup_by_key(|m| m.id);

        match error {
            None => {}
            Some(e) if e.is_authorization() => {
                warn!(
                    channel_id = %channel_id,
                    member_id = %author_id,
                    kept = purged.len(),
                    "Missing permission to purge channel"
                );
            }
            Some(e) if e.is_not_found() => {
                debug!(channel_id = %channel_id, "Channel vanished before purge");
            }
            Some(e) if e.is_rate_limited() => {
                warn!(
                    channel_id = %channel_id,
                    member_id = %author_id,
                    kept = purged.len(),
                    "Purge still rate limited after retries"
                );
            }
            Some(e) => {
                error!(
                    channel_id = %channel_id,
                    member_id = %author_id,
                    error = %e,
                    kept = purged.len(),
                    "Purge failed"
                );
            }
        }
        purged
    }

    /// Purge a member across `channels` concurrently
    ///
    /// Returns every removed message in chronological order.
    #[instrument(skip(self, channels), fields(channels = channels.len()))]
    pub async fn purge_member(&self, member_id: Snowflake, channels: &[Channel]) -> Vec<Message> {
        let results = join_all(channels.iter().map(|c| self.purge_with_retry(c.id, member_id))).await;

        let mut messages: Vec<Message> = results.into_iter().flatten().collect();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        messages
    }
}
