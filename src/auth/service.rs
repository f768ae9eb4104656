use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::dto::RegisterRequest;
use crate::auth::password::{hash_password, verify_password};
use crate::error::ApiError;
use crate::store::{HealthStore, StoreError, User};
use crate::validate;

pub async fn register(
    store: &dyn HealthStore,
    req: RegisterRequest,
    now: OffsetDateTime,
) -> Result<User, ApiError> {
    let email = validate::email(&req.email)?;
    let username = validate::username(&req.username)?;
    validate::password(&req.password)?;

    if store.find_user_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(ApiError::Conflict("email already registered"));
    }
    if store.find_user_by_username(&username).await?.is_some() {
        warn!(username = %username, "username already taken");
        return Err(ApiError::Conflict("username already taken"));
    }

    let user = User {
        id: Uuid::new_v4(),
        username,
        email,
        password_hash: hash_password(&req.password).map_err(ApiError::Internal)?,
        created_at: now,
    };

    match store.create_user(&user).await {
        Ok(()) => {
            info!(user_id = %user.id, username = %user.username, "user registered");
            Ok(user)
        }
        // The exists-checks above raced with another registration.
        Err(StoreError::Duplicate) => Err(ApiError::Conflict("email or username already taken")),
        Err(e) => Err(e.into()),
    }
}

/// Resolves the login identifier by email when it contains `@`, by username
/// otherwise. Unknown user and bad password fail identically.
pub async fn login(
    store: &dyn HealthStore,
    login: &str,
    password: &str,
) -> Result<User, ApiError> {
    if login.trim().is_empty() || password.is_empty() {
        return Err(ApiError::validation("login", "login and password required"));
    }

    let user = if login.contains('@') {
        store
            .find_user_by_email(&login.trim().to_lowercase())
            .await?
    } else {
        store.find_user_by_username(login.trim()).await?
    };

    let Some(user) = user else {
        warn!(login = %login, "login for unknown user");
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash).map_err(ApiError::Internal)? {
        warn!(user_id = %user.id, "login with invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok(user)
}

/// Deletes the account and everything keyed to it after a password check.
pub async fn delete_account(
    store: &dyn HealthStore,
    user_id: Uuid,
    password: &str,
) -> Result<(), ApiError> {
    let user = store
        .find_user(user_id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    if !verify_password(password, &user.password_hash).map_err(ApiError::Internal)? {
        return Err(ApiError::InvalidCredentials);
    }

    let entries = store.delete_entries(user_id).await?;
    let suggestions = store.delete_suggestions(user_id).await?;
    store.delete_profile(user_id).await?;
    store.delete_user(user_id).await?;

    info!(user_id = %user_id, entries, suggestions, "account deleted");
    Ok(())
}
