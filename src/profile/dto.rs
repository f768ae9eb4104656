use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dates;
use crate::store::Profile;

#[derive(Debug, Deserialize)]
pub struct CompleteProfileRequest {
    pub birth_date: String,
    pub initial_height: f64,
    pub initial_weight: f64,
}

/// A user always has a profile view; with no stored document it is the
/// incomplete shell.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user_id: Uuid,
    pub birth_date: Option<String>,
    pub initial_height: Option<f64>,
    pub initial_weight: Option<f64>,
    pub completed: bool,
}

impl ProfileResponse {
    pub fn shell(user_id: Uuid) -> Self {
        Self {
            user_id,
            birth_date: None,
            initial_height: None,
            initial_weight: None,
            completed: false,
        }
    }
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            user_id: profile.user_id,
            birth_date: Some(dates::format_date(profile.birth_date)),
            initial_height: Some(profile.initial_height),
            initial_weight: Some(profile.initial_weight),
            completed: profile.completed,
        }
    }
}
