use time::{OffsetDateTime, UtcOffset};
use tracing::info;
use uuid::Uuid;

use crate::dates;
use crate::error::ApiError;
use crate::profile::dto::CompleteProfileRequest;
use crate::store::{HealthStore, Profile};
use crate::validate;

/// Stored profile document, if completion ever happened. Absence means the
/// implicit incomplete shell; this is never a not-found condition.
pub async fn find_profile(
    store: &dyn HealthStore,
    user_id: Uuid,
) -> Result<Option<Profile>, ApiError> {
    Ok(store.get_profile(user_id).await?)
}

/// Validates and writes the completed profile. Fields are checked in the
/// order birth_date, height, weight and the first offending one is reported.
/// Calling this again after completion overwrites the stored values.
pub async fn complete_profile(
    store: &dyn HealthStore,
    user_id: Uuid,
    req: CompleteProfileRequest,
    now: OffsetDateTime,
    day_boundary: UtcOffset,
) -> Result<Profile, ApiError> {
    let birth_date = validate::date("birth_date", &req.birth_date)?;
    let today = dates::civil_date(now, day_boundary);
    if birth_date > today {
        return Err(ApiError::validation(
            "birth_date",
            "birth date cannot be in the future",
        ));
    }
    let initial_height = validate::height("initial_height", req.initial_height)?;
    let initial_weight = validate::weight("initial_weight", req.initial_weight)?;

    let profile = Profile {
        user_id,
        birth_date,
        initial_height,
        initial_weight,
        completed: true,
        updated_at: now,
    };
    store.put_profile(&profile).await?;

    info!(user_id = %user_id, "profile completed");
    Ok(profile)
}
