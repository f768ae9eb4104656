//! Storage abstraction over the backing document store.
//!
//! Two distinct write primitives are exposed on purpose: the unconditional
//! upsert used for profiles and daily entries, and the atomic create-if-absent
//! used by the suggestion gate as its single serialization point.

pub mod memory;
pub mod postgres;

use axum::async_trait;
use serde::Deserialize;
use sqlx::FromRow;
use thiserror::Error;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate key")]
    Duplicate,
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

/// Stored profile document. No row for a user means the implicit incomplete
/// shell; a row is only ever written by profile completion.
#[derive(Debug, Clone, FromRow)]
pub struct Profile {
    pub user_id: Uuid,
    pub birth_date: Date,
    pub initial_height: f64,
    pub initial_weight: f64,
    pub completed: bool,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub struct DailyEntry {
    pub user_id: Uuid,
    pub date: Date,
    pub height: f64,
    pub weight: f64,
    pub breakfast: String,
    pub lunch: String,
    pub dinner: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Validated entry fields, before the store assigns timestamps.
#[derive(Debug, Clone)]
pub struct EntryDraft {
    pub user_id: Uuid,
    pub date: Date,
    pub height: f64,
    pub weight: f64,
    pub breakfast: String,
    pub lunch: String,
    pub dinner: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct SuggestionRecord {
    pub user_id: Uuid,
    pub date: Date,
    pub suggestion: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Date,
    Height,
    Weight,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub from: Option<Date>,
    pub to: Option<Date>,
    pub sort_by: SortField,
    pub order: SortOrder,
}

/// Result of the conditional suggestion write. `AlreadyExists` carries the
/// record that won the race.
#[derive(Debug, Clone)]
pub enum CreateOutcome {
    Created(SuggestionRecord),
    AlreadyExists(SuggestionRecord),
}

#[async_trait]
pub trait HealthStore: Send + Sync {
    // users
    async fn create_user(&self, user: &User) -> Result<(), StoreError>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn delete_user(&self, id: Uuid) -> Result<(), StoreError>;

    // profiles
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError>;
    /// Unconditional upsert.
    async fn put_profile(&self, profile: &Profile) -> Result<(), StoreError>;
    async fn delete_profile(&self, user_id: Uuid) -> Result<(), StoreError>;

    // daily entries
    async fn get_entry(&self, user_id: Uuid, date: Date) -> Result<Option<DailyEntry>, StoreError>;
    /// Unconditional upsert: first write sets `created_at = updated_at = now`,
    /// later writes replace the mutable fields and refresh `updated_at` only.
    async fn upsert_entry(
        &self,
        draft: &EntryDraft,
        now: OffsetDateTime,
    ) -> Result<DailyEntry, StoreError>;
    async fn list_entries(
        &self,
        user_id: Uuid,
        filter: &EntryFilter,
    ) -> Result<Vec<DailyEntry>, StoreError>;
    /// Most-recent-first, capped at `limit`.
    async fn recent_entries(&self, user_id: Uuid, limit: i64)
        -> Result<Vec<DailyEntry>, StoreError>;
    async fn delete_entries(&self, user_id: Uuid) -> Result<u64, StoreError>;

    // suggestions
    async fn get_suggestion(
        &self,
        user_id: Uuid,
        date: Date,
    ) -> Result<Option<SuggestionRecord>, StoreError>;
    /// Atomic create-if-absent: exactly one concurrent writer per (user, date)
    /// observes `Created`; everyone else gets the settled record back.
    async fn create_suggestion_if_absent(
        &self,
        record: &SuggestionRecord,
    ) -> Result<CreateOutcome, StoreError>;
    async fn delete_suggestions(&self, user_id: Uuid) -> Result<u64, StoreError>;
}
