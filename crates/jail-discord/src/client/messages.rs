//! Message endpoints: send, history, purge

use chrono::{Duration, Utc};
use jail_core::entities::{Message, OutgoingMessage};
use jail_core::error::DomainError;
use jail_core::traits::{ClientResult, PurgeOutcome};
use jail_core::value_objects::Snowflake;
use reqwest::multipart::{Form, Part};
use tracing::instrument;

use crate::http::error::{map_transport_error, UNKNOWN_MESSAGE};
use crate::models::{BulkDeleteModel, CreateMessageModel, MessageModel};

use super::HttpGuildClient;

/// Maximum page size of `GET /channels/{id}/messages`
const HISTORY_PAGE_SIZE: usize = 100;
/// Bulk delete accepts 2..=100 ids
const BULK_DELETE_MAX: usize = 100;
/// Bulk delete rejects messages older than two weeks; keep a margin
const BULK_DELETE_MAX_AGE_HOURS: i64 = 14 * 24 - 1;

impl HttpGuildClient {
    #[instrument(skip(self, message), fields(has_attachment = message.attachment.is_some()))]
    pub(super) async fn create_message(
        &self,
        channel_id: Snowflake,
        message: &OutgoingMessage,
    ) -> ClientResult<Message> {
        let path = format!("/channels/{channel_id}/messages");
        let payload = CreateMessageModel::from(message);
        let on_not_found = move |_| DomainError::ChannelNotFound(channel_id);

        let model: MessageModel = match &message.attachment {
            None => self.rest.post_json_for(&path, &payload, on_not_found).await?,
            Some(attachment) => {
                let json = serde_json::to_string(&payload)
                    .map_err(|e| DomainError::InternalError(e.to_string()))?;
                let payload_part = Part::text(json)
                    .mime_str("application/json")
                    .map_err(map_transport_error)?;
                let file_part = Part::bytes(attachment.data.clone())
                    .file_name(attachment.filename.clone())
                    .mime_str("text/plain")
                    .map_err(map_transport_error)?;
                let form = Form::new()
                    .part("payload_json", payload_part)
                    .part("files[0]", file_part);
                self.rest.post_multipart(&path, form, on_not_found).await?
            }
        };
        Ok(model.into())
    }

    /// Newest first, paging backwards with `before`
    #[instrument(skip(self))]
    pub(super) async fn get_history(&self, channel_id: Snowflake, limit: usize) -> ClientResult<Vec<Message>> {
        let mut messages: Vec<Message> = Vec::with_capacity(limit.min(1000));
        let mut before: Option<Snowflake> = None;

        while messages.len() < limit {
            let page_size = (limit - messages.len()).min(HISTORY_PAGE_SIZE);
            let mut query = vec![("limit", page_size.to_string())];
            if let Some(before) = before {
                query.push(("before", before.to_string()));
            }

            let page: Vec<MessageModel> = self
                .rest
                .get_query(&format!("/channels/{channel_id}/messages"), &query, |_| {
                    DomainError::ChannelNotFound(channel_id)
                })
                .await?;

            let exhausted = page.len() < page_size;
            before = page.last().map(|m| m.id);
            messages.extend(page.into_iter().map(Message::from));

            if exhausted || before.is_none() {
                break;
            }
        }

        Ok(messages)
    }

    async fn delete_one(&self, channel_id: Snowflake, message_id: Snowflake) -> ClientResult<bool> {
        let result = self
            .rest
            .delete(&format!("/channels/{channel_id}/messages/{message_id}"), None, move |code| {
                match code {
                    Some(UNKNOWN_MESSAGE) | None => DomainError::MessageNotFound(message_id),
                    Some(_) => DomainError::ChannelNotFound(channel_id),
                }
            })
            .await;

        match result {
            Ok(()) => Ok(true),
            // Already gone
            Err(DomainError::MessageNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Delete the author's messages among the `limit` newest ones
    ///
    /// Recent messages go through bulk delete, older ones one by one. An
    /// error stops the pass but keeps what was already deleted.
    #[instrument(skip(self))]
    pub(super) async fn purge_author(&self, channel_id: Snowflake, author_id: Snowflake, limit: usize) -> PurgeOutcome {
        let candidates: Vec<Message> = match self.get_history(channel_id, limit).await {
            Ok(history) => history.into_iter().filter(|m| m.author_id == author_id).collect(),
            Err(e) => return PurgeOutcome::failed(e),
        };

        if candidates.is_empty() {
            return PurgeOutcome::complete(candidates);
        }

        let cutoff = Utc::now() - Duration::hours(BULK_DELETE_MAX_AGE_HOURS);
        let (recent, old): (Vec<Message>, Vec<Message>) =
            candidates.into_iter().partition(|m| m.created_at > cutoff);

        let mut deleted = Vec::with_capacity(recent.len() + old.len());
        let result = self.delete_all(channel_id, recent, old, &mut deleted).await;

        deleted.sort_by_key(|m| m.id);
        tracing::debug!(
            channel_id = %channel_id,
            author_id = %author_id,
            count = deleted.len(),
            stopped_early = result.is_err(),
            "Purged messages"
        );
        match result {
            Ok(()) => PurgeOutcome::complete(deleted),
            Err(e) => PurgeOutcome::interrupted(deleted, e),
        }
    }

    /// Push every removed message onto `deleted` as soon as the API confirms it
    async fn delete_all(
        &self,
        channel_id: Snowflake,
        recent: Vec<Message>,
        old: Vec<Message>,
        deleted: &mut Vec<Message>,
    ) -> ClientResult<()> {
        for chunk in recent.chunks(BULK_DELETE_MAX) {
            if chunk.len() >= 2 {
                let body = BulkDeleteModel {
                    messages: chunk.iter().map(|m| m.id).collect(),
                };
                self.rest
                    .post_json(&format!("/channels/{channel_id}/messages/bulk-delete"), &body, |_| {
                        DomainError::ChannelNotFound(channel_id)
                    })
                    .await?;
                deleted.extend_from_slice(chunk);
            } else {
                for message in chunk {
                    if self.delete_one(channel_id, message.id).await? {
                        deleted.push(message.clone());
                    }
                }
            }
        }

        for message in old {
            if self.delete_one(channel_id, message.id).await? {
                deleted.push(message);
            }
        }
        Ok(())
    }
}
