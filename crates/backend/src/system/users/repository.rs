use anyhow::{Context, Result};
use contracts::system::users::User;
use sea_orm::{ConnectionTrait, DatabaseBackend, QueryResult, Statement};

const USER_COLUMNS: &str = "id, full_name, email, mobile, login_attempts, lock_until, \
     created_at, updated_at, last_login_at";

fn from_row(row: &QueryResult) -> Result<User> {
    Ok(User {
        id: row.try_get("", "id")?,
        full_name: row.try_get("", "full_name")?,
        email: row.try_get("", "email")?,
        mobile: row.try_get("", "mobile")?,
        login_attempts: row.try_get("", "login_attempts")?,
        lock_until: row.try_get("", "lock_until")?,
        created_at: row.try_get("", "created_at")?,
        updated_at: row.try_get("", "updated_at")?,
        last_login_at: row.try_get("", "last_login_at")?,
    })
}

/// Create user with password hash
pub async fn create_with_password<C: ConnectionTrait>(
    conn: &C,
    user: &User,
    password_hash: &str,
) -> Result<()> {
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO sys_users (id, full_name, email, mobile, password_hash, login_attempts, lock_until, created_at, updated_at, last_login_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        [
            user.id.clone().into(),
            user.full_name.clone().into(),
            user.email.clone().into(),
            user.mobile.clone().into(),
            password_hash.to_string().into(),
            user.login_attempts.into(),
            user.lock_until.clone().into(),
            user.created_at.clone().into(),
            user.updated_at.clone().into(),
            user.last_login_at.clone().into(),
        ],
    ))
    .await
    .context("Failed to insert user")?;

    Ok(())
}

/// Get user by ID
pub async fn get_by_id<C: ConnectionTrait>(conn: &C, id: &str) -> Result<Option<User>> {
    let result = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            &format!("SELECT {} FROM sys_users WHERE id = ?", USER_COLUMNS),
            [id.into()],
        ))
        .await?;

    result.as_ref().map(from_row).transpose()
}

/// Get user by e-mail (case-insensitive)
pub async fn get_by_email<C: ConnectionTrait>(conn: &C, email: &str) -> Result<Option<User>> {
    let result = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            &format!(
                "SELECT {} FROM sys_users WHERE lower(email) = lower(?)",
                USER_COLUMNS
            ),
            [email.into()],
        ))
        .await?;

    result.as_ref().map(from_row).transpose()
}

/// Get user by mobile number
pub async fn get_by_mobile<C: ConnectionTrait>(conn: &C, mobile: &str) -> Result<Option<User>> {
    let result = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            &format!("SELECT {} FROM sys_users WHERE mobile = ?", USER_COLUMNS),
            [mobile.into()],
        ))
        .await?;

    result.as_ref().map(from_row).transpose()
}

/// Get password hash for user
pub async fn get_password_hash<C: ConnectionTrait>(conn: &C, user_id: &str) -> Result<Option<String>> {
    let result = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT password_hash FROM sys_users WHERE id = ?",
            [user_id.into()],
        ))
        .await?;

    match result {
        Some(row) => Ok(Some(row.try_get("", "password_hash")?)),
        None => Ok(None),
    }
}

/// Update profile fields
pub async fn update_profile<C: ConnectionTrait>(conn: &C, user: &User) -> Result<()> {
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE sys_users SET full_name = ?, mobile = ?, updated_at = ? WHERE id = ?",
        [
            user.full_name.clone().into(),
            user.mobile.clone().into(),
            user.updated_at.clone().into(),
            user.id.clone().into(),
        ],
    ))
    .await
    .context("Failed to update user")?;

    Ok(())
}

/// Store the failed-login counter and optional lock expiry
pub async fn set_login_failures<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    attempts: i32,
    lock_until: Option<String>,
) -> Result<()> {
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE sys_users SET login_attempts = ?, lock_until = ? WHERE id = ?",
        [attempts.into(), lock_until.into(), user_id.into()],
    ))
    .await?;

    Ok(())
}

/// Reset the failure counter and record the login time
pub async fn record_successful_login<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    at: &str,
) -> Result<()> {
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE sys_users SET login_attempts = 0, lock_until = NULL, last_login_at = ? WHERE id = ?",
        [at.into(), user_id.into()],
    ))
    .await?;

    Ok(())
}
