//! UserProfile entity <- model mapper

use jail_core::entities::UserProfile;

use crate::models::UserProfileModel;

impl From<UserProfileModel> for UserProfile {
    fn from(model: UserProfileModel) -> Self {
        let details = model.user_profile.unwrap_or_default();
        UserProfile {
            user_id: model.user.id,
            bio: details.bio.or(model.user.bio).filter(|s| !s.is_empty()),
            pronouns: details.pronouns.filter(|s| !s.is_empty()),
        }
    }
}
