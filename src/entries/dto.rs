use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::dates;
use crate::store::{DailyEntry, SortField, SortOrder};

#[derive(Debug, Deserialize)]
pub struct SubmitEntryRequest {
    pub date: String,
    pub height: f64,
    pub weight: f64,
    pub breakfast: String,
    pub lunch: String,
    pub dinner: String,
}

/// Query parameters for listing entries. Defaults to the full history,
/// most recent first.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(default)]
    pub sort_by: SortField,
    #[serde(default)]
    pub order: SortOrder,
}

#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub user_id: Uuid,
    pub date: String,
    pub height: f64,
    pub weight: f64,
    pub breakfast: String,
    pub lunch: String,
    pub dinner: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<DailyEntry> for EntryResponse {
    fn from(entry: DailyEntry) -> Self {
        Self {
            user_id: entry.user_id,
            date: dates::format_date(entry.date),
            height: entry.height,
            weight: entry.weight,
            breakfast: entry.breakfast,
            lunch: entry.lunch,
            dinner: entry.dinner,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EntryListResponse {
    pub data: Vec<EntryResponse>,
    pub total_count: usize,
}
