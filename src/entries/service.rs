use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::entries::dto::{ListQuery, SubmitEntryRequest};
use crate::error::ApiError;
use crate::store::{DailyEntry, EntryDraft, EntryFilter, HealthStore};
use crate::validate;

/// Validates and upserts the entry for (user, date). A resubmission for the
/// same date replaces the mutable fields and refreshes `updated_at`;
/// `created_at` stays from the first write. Profile completion is not
/// required here.
pub async fn submit_entry(
    store: &dyn HealthStore,
    user_id: Uuid,
    req: SubmitEntryRequest,
    now: OffsetDateTime,
) -> Result<DailyEntry, ApiError> {
    let date = validate::date("date", &req.date)?;
    let height = validate::height("height", req.height)?;
    let weight = validate::weight("weight", req.weight)?;
    let breakfast = validate::meal("breakfast", &req.breakfast)?;
    let lunch = validate::meal("lunch", &req.lunch)?;
    let dinner = validate::meal("dinner", &req.dinner)?;

    let draft = EntryDraft {
        user_id,
        date,
        height,
        weight,
        breakfast,
        lunch,
        dinner,
    };
    let entry = store.upsert_entry(&draft, now).await?;

    info!(user_id = %user_id, date = %req.date.trim(), "daily entry stored");
    Ok(entry)
}

/// Pure read over the user's entries with optional date range and requested
/// ordering; ties on height/weight break by date ascending.
pub async fn list_entries(
    store: &dyn HealthStore,
    user_id: Uuid,
    query: ListQuery,
) -> Result<Vec<DailyEntry>, ApiError> {
    let from = query
        .from
        .as_deref()
        .map(|raw| validate::date("from", raw))
        .transpose()?;
    let to = query
        .to
        .as_deref()
        .map(|raw| validate::date("to", raw))
        .transpose()?;

    let filter = EntryFilter {
        from,
        to,
        sort_by: query.sort_by,
        order: query.order,
    };
    Ok(store.list_entries(user_id, &filter).await?)
}
