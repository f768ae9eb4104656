use std::time::Duration;

use anyhow::Context;
use time::UtcOffset;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct SuggestionConfig {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    /// Upper bound on a single provider call; a timed-out call fails the
    /// request without consuming the day's quota.
    pub provider_timeout: Duration,
    /// Fixed offset defining where the calendar day rolls over for daily
    /// entries and the suggestion quota.
    pub day_boundary_offset: UtcOffset,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub suggestion: SuggestionConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is required")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is required")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "vitalog".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "vitalog-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
            refresh_ttl_minutes: std::env::var("JWT_REFRESH_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 14),
        };

        let offset_hours = std::env::var("SUGGESTION_UTC_OFFSET_HOURS")
            .ok()
            .and_then(|v| v.parse::<i8>().ok())
            .unwrap_or(0);
        let suggestion = SuggestionConfig {
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash".into()),
            provider_timeout: Duration::from_secs(
                std::env::var("SUGGESTION_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(30),
            ),
            day_boundary_offset: UtcOffset::from_hms(offset_hours, 0, 0)
                .context("SUGGESTION_UTC_OFFSET_HOURS out of range")?,
        };

        Ok(Self {
            database_url,
            jwt,
            suggestion,
        })
    }
}
