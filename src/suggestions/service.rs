//! The suggestion gate: at most one generated recommendation per user per
//! calendar day, converging under concurrent requests.

use time::{Date, OffsetDateTime};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::SuggestionConfig;
use crate::dates;
use crate::error::ApiError;
use crate::store::{CreateOutcome, DailyEntry, HealthStore, Profile, SuggestionRecord};
use crate::suggestions::provider::{ProviderError, SuggestionProvider};

/// How many recent daily entries go into the generation context.
pub const CONTEXT_ENTRIES: i64 = 7;

#[derive(Debug, Clone)]
pub struct SuggestionOutcome {
    pub suggestion: String,
    pub already_received: bool,
}

/// Requests today's suggestion for the user.
///
/// The store's create-if-absent write is the single serialization point: of
/// any number of concurrent requests for the same (user, day), exactly one
/// settles the record and every other request converges to the settled text.
/// A failed or timed-out provider call writes nothing, so the day's quota
/// stays available for a retry.
pub async fn request_suggestion(
    store: &dyn HealthStore,
    provider: &dyn SuggestionProvider,
    config: &SuggestionConfig,
    user_id: Uuid,
    now: OffsetDateTime,
) -> Result<SuggestionOutcome, ApiError> {
    let profile = store
        .get_profile(user_id)
        .await?
        .filter(|p| p.completed)
        .ok_or(ApiError::ProfileIncomplete)?;

    let date = dates::civil_date(now, config.day_boundary_offset);

    if let Some(existing) = store.get_suggestion(user_id, date).await? {
        debug!(user_id = %user_id, "suggestion already settled for today");
        return Ok(SuggestionOutcome {
            suggestion: existing.suggestion,
            already_received: true,
        });
    }

    let recent = store.recent_entries(user_id, CONTEXT_ENTRIES).await?;
    let prompt = build_prompt(&profile, &recent, date);

    let generated = match tokio::time::timeout(config.provider_timeout, provider.generate(&prompt))
        .await
    {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!(user_id = %user_id, error = %e, "suggestion generation failed");
            return Err(e.into());
        }
        Err(_) => {
            warn!(user_id = %user_id, "suggestion generation timed out");
            return Err(ProviderError::Timeout.into());
        }
    };

    let candidate = SuggestionRecord {
        user_id,
        date,
        suggestion: generated,
        created_at: now,
    };
    match store.create_suggestion_if_absent(&candidate).await? {
        CreateOutcome::Created(record) => {
            info!(user_id = %user_id, "suggestion generated");
            Ok(SuggestionOutcome {
                suggestion: record.suggestion,
                already_received: false,
            })
        }
        CreateOutcome::AlreadyExists(winner) => {
            // A concurrent request settled the day first; the text generated
            // here is discarded.
            debug!(user_id = %user_id, "lost suggestion race, returning settled text");
            Ok(SuggestionOutcome {
                suggestion: winner.suggestion,
                already_received: true,
            })
        }
    }
}

fn build_prompt(profile: &Profile, entries: &[DailyEntry], today: Date) -> String {
    let mut prompt = format!(
        "User profile:\n\
         - Age: {}\n\
         - Initial height: {} cm\n\
         - Initial weight: {} kg\n\n\
         Recent entries (most recent first):\n",
        dates::age_years(profile.birth_date, today),
        profile.initial_height,
        profile.initial_weight,
    );
    if entries.is_empty() {
        prompt.push_str("- none recorded yet\n");
    }
    for entry in entries {
        prompt.push_str(&format!(
            "- {}: height {} cm, weight {} kg, breakfast: {}, lunch: {}, dinner: {}\n",
            dates::format_date(entry.date),
            entry.height,
            entry.weight,
            entry.breakfast,
            entry.lunch,
            entry.dinner,
        ));
    }
    prompt.push_str(
        "\nBased on this health data, provide a personalized, encouraging health \
         suggestion for today. Keep it concise (2-3 sentences), actionable, and \
         positive. Focus on nutrition, exercise, or lifestyle tips.",
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn profile() -> Profile {
        Profile {
            user_id: Uuid::new_v4(),
            birth_date: date!(1990 - 06 - 15),
            initial_height: 180.0,
            initial_weight: 75.0,
            completed: true,
            updated_at: datetime!(2024-01-01 00:00 UTC),
        }
    }

    #[test]
    fn prompt_includes_profile_and_entries() {
        let entry = DailyEntry {
            user_id: Uuid::new_v4(),
            date: date!(2024 - 01 - 15),
            height: 180.5,
            weight: 74.2,
            breakfast: "oatmeal".into(),
            lunch: "salad".into(),
            dinner: "soup".into(),
            created_at: datetime!(2024-01-15 08:00 UTC),
            updated_at: datetime!(2024-01-15 08:00 UTC),
        };
        let prompt = build_prompt(&profile(), &[entry], date!(2024 - 01 - 16));
        assert!(prompt.contains("Age: 33"));
        assert!(prompt.contains("2024-01-15"));
        assert!(prompt.contains("breakfast: oatmeal"));
    }

    #[test]
    fn prompt_mentions_missing_entries() {
        let prompt = build_prompt(&profile(), &[], date!(2024 - 01 - 16));
        assert!(prompt.contains("none recorded yet"));
    }
}
