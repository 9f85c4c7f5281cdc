//! Channel entity <- model mapper

use jail_core::entities::{Channel, ChannelType};

use crate::models::ChannelModel;

impl From<ChannelModel> for Channel {
    fn from(model: ChannelModel) -> Self {
        Channel {
            id: model.id,
            guild_id: model.guild_id,
            name: model.name,
            channel_type: ChannelType::from(model.kind),
            parent_id: model.parent_id,
        }
    }
}
