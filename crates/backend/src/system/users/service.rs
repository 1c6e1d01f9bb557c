use chrono::Utc;
use contracts::system::auth::SignupRequest;
use contracts::system::users::{UpdateProfileDto, User};
use sea_orm::DatabaseConnection;

use super::repository;
use crate::shared::error::AppError;
use crate::system::auth::password;

/// Consecutive failed logins that lock an account
pub const MAX_LOGIN_ATTEMPTS: i32 = 5;
pub const LOCK_MINUTES: i64 = 15;

const MOBILE_DIGITS: usize = 11;

fn validate_mobile(mobile: &str) -> Result<(), AppError> {
    if mobile.len() != MOBILE_DIGITS || !mobile.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(format!(
            "Mobile number must be exactly {} digits",
            MOBILE_DIGITS
        )));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), AppError> {
    let valid = email
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
        .unwrap_or(false);
    if !valid {
        return Err(AppError::Validation("Invalid email format".into()));
    }
    Ok(())
}

/// Register a new account
pub async fn signup(db: &DatabaseConnection, request: SignupRequest) -> Result<User, AppError> {
    let full_name = request.full_name.trim().to_string();
    let email = request.email.trim().to_lowercase();
    let mobile = request.mobile.trim().to_string();

    if full_name.is_empty() {
        return Err(AppError::Validation("Full name is required".into()));
    }
    validate_email(&email)?;
    validate_mobile(&mobile)?;
    password::validate_password_strength(&request.password).map_err(AppError::Validation)?;

    if repository::get_by_email(db, &email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".into()));
    }
    if repository::get_by_mobile(db, &mobile).await?.is_some() {
        return Err(AppError::Conflict("Mobile number already registered".into()));
    }

    let password_hash = password::hash_password(&request.password)?;
    let now = Utc::now().to_rfc3339();

    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        full_name,
        email,
        mobile,
        login_attempts: 0,
        lock_until: None,
        created_at: now.clone(),
        updated_at: now,
        last_login_at: None,
    };

    repository::create_with_password(db, &user, &password_hash)
        .await
        .map_err(|e| AppError::from_write(e, "Email or mobile number already registered"))?;

    tracing::info!("Registered user {}", user.email);
    Ok(user)
}

/// Verify login credentials, counting failures and locking the account after too many
pub async fn verify_credentials(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let user = repository::get_by_email(db, email.trim())
        .await?
        .ok_or(AppError::Unauthorized)?;

    let now = Utc::now();
    if user.is_locked(now) {
        return Err(AppError::Locked);
    }

    let hash = repository::get_password_hash(db, &user.id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !password::verify_password(password, &hash)? {
        // A lock that has run out starts a fresh count
        let previous = if user.lock_until.is_some() { 0 } else { user.login_attempts };
        let attempts = previous + 1;

        if attempts >= MAX_LOGIN_ATTEMPTS {
            let until = (now + chrono::Duration::minutes(LOCK_MINUTES)).to_rfc3339();
            repository::set_login_failures(db, &user.id, 0, Some(until)).await?;
            tracing::warn!("Account {} locked after {} failed logins", user.email, attempts);
            return Err(AppError::Locked);
        }

        repository::set_login_failures(db, &user.id, attempts, None).await?;
        return Err(AppError::Unauthorized);
    }

    let now = now.to_rfc3339();
    repository::record_successful_login(db, &user.id, &now).await?;

    Ok(User {
        login_attempts: 0,
        lock_until: None,
        last_login_at: Some(now),
        ..user
    })
}

pub async fn get_by_id(db: &DatabaseConnection, id: &str) -> Result<User, AppError> {
    repository::get_by_id(db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

/// Change the display name and/or mobile number of the current user
pub async fn update_profile(
    db: &DatabaseConnection,
    user_id: &str,
    dto: UpdateProfileDto,
) -> Result<User, AppError> {
    let mut user = get_by_id(db, user_id).await?;

    if let Some(full_name) = dto.full_name.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        user.full_name = full_name.to_string();
    }
    if let Some(mobile) = dto.mobile.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        validate_mobile(mobile)?;
        if let Some(other) = repository::get_by_mobile(db, mobile).await? {
            if other.id != user.id {
                return Err(AppError::Conflict("Mobile number already registered".into()));
            }
        }
        user.mobile = mobile.to_string();
    }
    user.updated_at = Utc::now().to_rfc3339();

    repository::update_profile(db, &user)
        .await
        .map_err(|e| AppError::from_write(e, "Mobile number already registered"))?;

    Ok(user)
}
