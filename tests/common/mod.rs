#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::async_trait;
use time::macros::datetime;
use time::UtcOffset;
use tokio::sync::Barrier;
use uuid::Uuid;

use vitalog::config::SuggestionConfig;
use vitalog::entries::dto::SubmitEntryRequest;
use vitalog::error::ApiError;
use vitalog::profile::dto::CompleteProfileRequest;
use vitalog::profile::service as profile_service;
use vitalog::store::memory::MemStore;
use vitalog::suggestions::provider::{ProviderError, SuggestionProvider};

/// Provider scripted for tests: counts invocations, optionally fails, and
/// returns a distinct text per call so winners are identifiable.
pub struct ScriptedProvider {
    calls: AtomicUsize,
    fail: bool,
    barrier: Option<Arc<Barrier>>,
}

impl ScriptedProvider {
    pub fn succeeding() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: false,
            barrier: None,
        }
    }

    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
            barrier: None,
        }
    }

    /// All `participants` generation calls rendezvous before any returns,
    /// so every concurrent request runs its provider call before any write.
    pub fn rendezvous(participants: usize) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: false,
            barrier: Some(Arc::new(Barrier::new(participants))),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SuggestionProvider for ScriptedProvider {
    async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        if self.fail {
            Err(ProviderError::Request("scripted failure".into()))
        } else {
            Ok(format!("tip #{n}"))
        }
    }
}

/// Provider that stalls longer than any reasonable test timeout.
pub struct StalledProvider;

#[async_trait]
impl SuggestionProvider for StalledProvider {
    async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Err(ProviderError::Request("should have timed out".into()))
    }
}

pub fn suggestion_config() -> SuggestionConfig {
    SuggestionConfig {
        gemini_api_key: None,
        gemini_model: "gemini-2.0-flash".into(),
        provider_timeout: Duration::from_secs(5),
        day_boundary_offset: UtcOffset::UTC,
    }
}

pub async fn complete_profile_for(store: &MemStore, user_id: Uuid) {
    profile_service::complete_profile(
        store,
        user_id,
        CompleteProfileRequest {
            birth_date: "1990-06-15".into(),
            initial_height: 180.0,
            initial_weight: 75.0,
        },
        datetime!(2024-01-01 00:00 UTC),
        UtcOffset::UTC,
    )
    .await
    .expect("profile completion should succeed");
}

pub fn entry_request(date: &str, height: f64, weight: f64) -> SubmitEntryRequest {
    SubmitEntryRequest {
        date: date.into(),
        height,
        weight,
        breakfast: "oatmeal".into(),
        lunch: "salad".into(),
        dinner: "soup".into(),
    }
}

pub fn validation_field(err: ApiError) -> &'static str {
    match err {
        ApiError::Validation { field, .. } => field,
        other => panic!("expected validation error, got {other:?}"),
    }
}
