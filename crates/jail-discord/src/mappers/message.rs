//! Message entity <- model mapper, outgoing message -> model

use jail_core::entities::{Message, OutgoingMessage};

use crate::models::{AllowedMentionsModel, AttachmentRefModel, CreateMessageModel, MessageModel};

impl From<MessageModel> for Message {
    fn from(model: MessageModel) -> Self {
        Message {
            id: model.id,
            channel_id: model.channel_id,
            guild_id: model.guild_id,
            author_id: model.author.id,
            author_name: model.author.username,
            content: model.content,
            created_at: model.timestamp,
        }
    }
}

impl From<&OutgoingMessage> for CreateMessageModel {
    fn from(message: &OutgoingMessage) -> Self {
        CreateMessageModel {
            content: message.content.clone(),
            attachments: message
                .attachment
                .iter()
                .map(|a| AttachmentRefModel {
                    id: 0,
                    filename: a.filename.clone(),
                })
                .collect(),
            allowed_mentions: AllowedMentionsModel::default(),
        }
    }
}
