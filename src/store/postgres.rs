use axum::async_trait;
use sqlx::PgPool;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::{
    CreateOutcome, DailyEntry, EntryDraft, EntryFilter, HealthStore, Profile, SortField,
    SortOrder, StoreError, SuggestionRecord, User,
};

const PG_UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn map_insert_err(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(PG_UNIQUE_VIOLATION) => {
            StoreError::Duplicate
        }
        _ => StoreError::Db(e),
    }
}

fn order_clause(filter: &EntryFilter) -> &'static str {
    // Ties on height/weight break by date ascending; dates are unique per user.
    match (filter.sort_by, filter.order) {
        (SortField::Date, SortOrder::Asc) => "date ASC",
        (SortField::Date, SortOrder::Desc) => "date DESC",
        (SortField::Height, SortOrder::Asc) => "height ASC, date ASC",
        (SortField::Height, SortOrder::Desc) => "height DESC, date ASC",
        (SortField::Weight, SortOrder::Asc) => "weight ASC, date ASC",
        (SortField::Weight, SortOrder::Desc) => "weight DESC, date ASC",
    }
}

#[async_trait]
impl HealthStore for PgStore {
    async fn create_user(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_insert_err)?;
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT user_id, birth_date, initial_height, initial_weight, completed, updated_at
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    async fn put_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, birth_date, initial_height, initial_weight, completed, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id) DO UPDATE SET
                birth_date = EXCLUDED.birth_date,
                initial_height = EXCLUDED.initial_height,
                initial_weight = EXCLUDED.initial_weight,
                completed = EXCLUDED.completed,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(profile.user_id)
        .bind(profile.birth_date)
        .bind(profile.initial_height)
        .bind(profile.initial_weight)
        .bind(profile.completed)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_profile(&self, user_id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get_entry(&self, user_id: Uuid, date: Date) -> Result<Option<DailyEntry>, StoreError> {
        let entry = sqlx::query_as::<_, DailyEntry>(
            r#"
            SELECT user_id, date, height, weight, breakfast, lunch, dinner, created_at, updated_at
            FROM daily_entries
            WHERE user_id = $1 AND date = $2
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn upsert_entry(
        &self,
        draft: &EntryDraft,
        now: OffsetDateTime,
    ) -> Result<DailyEntry, StoreError> {
        let entry = sqlx::query_as::<_, DailyEntry>(
            r#"
            INSERT INTO daily_entries
                (user_id, date, height, weight, breakfast, lunch, dinner, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            ON CONFLICT (user_id, date) DO UPDATE SET
                height = EXCLUDED.height,
                weight = EXCLUDED.weight,
                breakfast = EXCLUDED.breakfast,
                lunch = EXCLUDED.lunch,
                dinner = EXCLUDED.dinner,
                updated_at = EXCLUDED.updated_at
            RETURNING user_id, date, height, weight, breakfast, lunch, dinner, created_at, updated_at
            "#,
        )
        .bind(draft.user_id)
        .bind(draft.date)
        .bind(draft.height)
        .bind(draft.weight)
        .bind(&draft.breakfast)
        .bind(&draft.lunch)
        .bind(&draft.dinner)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn list_entries(
        &self,
        user_id: Uuid,
        filter: &EntryFilter,
    ) -> Result<Vec<DailyEntry>, StoreError> {
        let sql = format!(
            r#"
            SELECT user_id, date, height, weight, breakfast, lunch, dinner, created_at, updated_at
            FROM daily_entries
            WHERE user_id = $1
              AND ($2::date IS NULL OR date >= $2)
              AND ($3::date IS NULL OR date <= $3)
            ORDER BY {}
            "#,
            order_clause(filter)
        );
        let rows = sqlx::query_as::<_, DailyEntry>(&sql)
            .bind(user_id)
            .bind(filter.from)
            .bind(filter.to)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn recent_entries(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<DailyEntry>, StoreError> {
        let rows = sqlx::query_as::<_, DailyEntry>(
            r#"
            SELECT user_id, date, height, weight, breakfast, lunch, dinner, created_at, updated_at
            FROM daily_entries
            WHERE user_id = $1
            ORDER BY date DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn delete_entries(&self, user_id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM daily_entries WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn get_suggestion(
        &self,
        user_id: Uuid,
        date: Date,
    ) -> Result<Option<SuggestionRecord>, StoreError> {
        let record = sqlx::query_as::<_, SuggestionRecord>(
            r#"
            SELECT user_id, date, suggestion, created_at
            FROM suggestions
            WHERE user_id = $1 AND date = $2
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn create_suggestion_if_absent(
        &self,
        record: &SuggestionRecord,
    ) -> Result<CreateOutcome, StoreError> {
        let inserted = sqlx::query_as::<_, SuggestionRecord>(
            r#"
            INSERT INTO suggestions (user_id, date, suggestion, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, date) DO NOTHING
            RETURNING user_id, date, suggestion, created_at
            "#,
        )
        .bind(record.user_id)
        .bind(record.date)
        .bind(&record.suggestion)
        .bind(record.created_at)
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some(rec) => Ok(CreateOutcome::Created(rec)),
            None => {
                // Lost the race; read back the record that won.
                let winner = self
                    .get_suggestion(record.user_id, record.date)
                    .await?
                    .ok_or(StoreError::Db(sqlx::Error::RowNotFound))?;
                Ok(CreateOutcome::AlreadyExists(winner))
            }
        }
    }

    async fn delete_suggestions(&self, user_id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM suggestions WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
