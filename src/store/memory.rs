//! In-process store used by `AppState::fake()` and the test suite. The mutex
//! is synchronous and never held across an await, so create-if-absent is
//! atomic the same way a single-document conditional write is.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use axum::async_trait;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::{
    CreateOutcome, DailyEntry, EntryDraft, EntryFilter, HealthStore, Profile, SortField,
    SortOrder, StoreError, SuggestionRecord, User,
};

#[derive(Default)]
pub struct MemStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    profiles: HashMap<Uuid, Profile>,
    entries: BTreeMap<(Uuid, Date), DailyEntry>,
    suggestions: HashMap<(Uuid, Date), SuggestionRecord>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("store mutex poisoned")
    }
}

#[async_trait]
impl HealthStore for MemStore {
    async fn create_user(&self, user: &User) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let taken = inner
            .users
            .values()
            .any(|u| u.email == user.email || u.username == user.username);
        if taken || inner.users.contains_key(&user.id) {
            return Err(StoreError::Duplicate);
        }
        inner.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.lock().users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), StoreError> {
        self.lock().users.remove(&id);
        Ok(())
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        Ok(self.lock().profiles.get(&user_id).cloned())
    }

    async fn put_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        self.lock().profiles.insert(profile.user_id, profile.clone());
        Ok(())
    }

    async fn delete_profile(&self, user_id: Uuid) -> Result<(), StoreError> {
        self.lock().profiles.remove(&user_id);
        Ok(())
    }

    async fn get_entry(&self, user_id: Uuid, date: Date) -> Result<Option<DailyEntry>, StoreError> {
        Ok(self.lock().entries.get(&(user_id, date)).cloned())
    }

    async fn upsert_entry(
        &self,
        draft: &EntryDraft,
        now: OffsetDateTime,
    ) -> Result<DailyEntry, StoreError> {
        let mut inner = self.lock();
        let entry = inner
            .entries
            .entry((draft.user_id, draft.date))
            .and_modify(|existing| {
                existing.height = draft.height;
                existing.weight = draft.weight;
                existing.breakfast = draft.breakfast.clone();
                existing.lunch = draft.lunch.clone();
                existing.dinner = draft.dinner.clone();
                existing.updated_at = now;
            })
            .or_insert_with(|| DailyEntry {
                user_id: draft.user_id,
                date: draft.date,
                height: draft.height,
                weight: draft.weight,
                breakfast: draft.breakfast.clone(),
                lunch: draft.lunch.clone(),
                dinner: draft.dinner.clone(),
                created_at: now,
                updated_at: now,
            });
        Ok(entry.clone())
    }

    async fn list_entries(
        &self,
        user_id: Uuid,
        filter: &EntryFilter,
    ) -> Result<Vec<DailyEntry>, StoreError> {
        let mut rows: Vec<DailyEntry> = self
            .lock()
            .entries
            .values()
            .filter(|e| {
                e.user_id == user_id
                    && filter.from.map_or(true, |from| e.date >= from)
                    && filter.to.map_or(true, |to| e.date <= to)
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            let ord = match filter.sort_by {
                SortField::Date => a.date.cmp(&b.date),
                SortField::Height => a.height.partial_cmp(&b.height).unwrap_or(Ordering::Equal),
                SortField::Weight => a.weight.partial_cmp(&b.weight).unwrap_or(Ordering::Equal),
            };
            let ord = match filter.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            };
            // Ties break by date ascending regardless of the requested order.
            ord.then(a.date.cmp(&b.date))
        });
        Ok(rows)
    }

    async fn recent_entries(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<DailyEntry>, StoreError> {
        let mut rows: Vec<DailyEntry> = self
            .lock()
            .entries
            .values()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn delete_entries(&self, user_id: Uuid) -> Result<u64, StoreError> {
        let mut inner = self.lock();
        let before = inner.entries.len();
        inner.entries.retain(|(uid, _), _| *uid != user_id);
        Ok((before - inner.entries.len()) as u64)
    }

    async fn get_suggestion(
        &self,
        user_id: Uuid,
        date: Date,
    ) -> Result<Option<SuggestionRecord>, StoreError> {
        Ok(self.lock().suggestions.get(&(user_id, date)).cloned())
    }

    async fn create_suggestion_if_absent(
        &self,
        record: &SuggestionRecord,
    ) -> Result<CreateOutcome, StoreError> {
        let mut inner = self.lock();
        match inner.suggestions.entry((record.user_id, record.date)) {
            std::collections::hash_map::Entry::Occupied(existing) => {
                Ok(CreateOutcome::AlreadyExists(existing.get().clone()))
            }
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(CreateOutcome::Created(record.clone()))
            }
        }
    }

    async fn delete_suggestions(&self, user_id: Uuid) -> Result<u64, StoreError> {
        let mut inner = self.lock();
        let before = inner.suggestions.len();
        inner.suggestions.retain(|(uid, _), _| *uid != user_id);
        Ok((before - inner.suggestions.len()) as u64)
    }
}
