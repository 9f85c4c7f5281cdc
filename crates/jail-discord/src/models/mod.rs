//! Wire models - serde structs mirroring Discord REST payloads

mod channel;
mod error;
mod guild;
mod member;
mod message;
mod role;
mod user;

pub use channel::{ActiveThreadsModel, ChannelModel};
pub use error::{ApiErrorModel, RateLimitModel};
pub use guild::GuildModel;
pub use member::MemberModel;
pub use message::{
    AllowedMentionsModel, AttachmentRefModel, BulkDeleteModel, CreateMessageModel, MessageModel,
};
pub use role::RoleModel;
pub use user::{ProfileDetailsModel, ProfileUserModel, UserModel, UserProfileModel};
