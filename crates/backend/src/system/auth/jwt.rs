use anyhow::{Context, Result};
use chrono::Utc;
use contracts::system::auth::TokenClaims;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

const JWT_SECRET_KEY: &str = "jwt_secret";

/// Issue a session token for the user, valid for `lifetime_hours`
pub fn generate_session_token(
    secret: &str,
    user_id: &str,
    email: &str,
    lifetime_hours: i64,
) -> Result<String> {
    let now = Utc::now();
    let exp = (now + chrono::Duration::hours(lifetime_hours)).timestamp() as usize;
    let iat = now.timestamp() as usize;

    let claims = TokenClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp,
        iat,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to encode JWT token")?;

    Ok(token)
}

/// Validate a session token (signature and expiry) and extract its claims
pub fn validate_token(secret: &str, token: &str) -> Result<TokenClaims> {
    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .context("Failed to decode JWT token")?;

    Ok(token_data.claims)
}

/// Read the signing secret from `sys_settings`, generating and storing one on first run
pub async fn load_or_create_secret<C: ConnectionTrait>(conn: &C) -> Result<String> {
    if let Some(secret) = get_jwt_secret_from_db(conn).await? {
        return Ok(secret);
    }

    let secret = generate_jwt_secret();
    save_jwt_secret_to_db(conn, &secret).await?;
    tracing::info!("Generated new session signing secret");

    // Another process may have stored its secret first
    Ok(get_jwt_secret_from_db(conn).await?.unwrap_or(secret))
}

/// Generate a cryptographically secure JWT secret (256 bits)
fn generate_jwt_secret() -> String {
    use base64::{engine::general_purpose, Engine as _};
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..32).map(|_| rng.gen::<u8>()).collect();
    general_purpose::STANDARD.encode(&random_bytes)
}

async fn get_jwt_secret_from_db<C: ConnectionTrait>(conn: &C) -> Result<Option<String>> {
    let result = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT value FROM sys_settings WHERE key = ?",
            [JWT_SECRET_KEY.into()],
        ))
        .await?;

    match result {
        Some(row) => {
            let secret: String = row.try_get("", "value")?;
            Ok(Some(secret))
        }
        None => Ok(None),
    }
}

async fn save_jwt_secret_to_db<C: ConnectionTrait>(conn: &C, secret: &str) -> Result<()> {
    let now = Utc::now().to_rfc3339();

    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT OR IGNORE INTO sys_settings (key, value, updated_at) VALUES (?, ?, ?)",
        [JWT_SECRET_KEY.into(), secret.to_string().into(), now.into()],
    ))
    .await
    .context("Failed to store JWT secret")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::test_support::test_db;

    #[test]
    fn test_token_roundtrip_and_wrong_secret() {
        let token = generate_session_token("s3cret", "user-1", "a@b.pk", 1).unwrap();
        let claims = validate_token("s3cret", &token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "a@b.pk");

        assert!(validate_token("other", &token).is_err());
        assert!(validate_token("s3cret", "garbage").is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = generate_session_token("s3cret", "user-1", "a@b.pk", -2).unwrap();
        assert!(validate_token("s3cret", &token).is_err());
    }

    #[tokio::test]
    async fn test_secret_is_persisted() {
        let (_dir, db) = test_db().await;
        let first = load_or_create_secret(&db).await.unwrap();
        let second = load_or_create_secret(&db).await.unwrap();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }
}
