use serde::{Deserialize, Serialize};

use crate::system::auth::UserInfo;

/// Shop operator account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub mobile: String,
    /// Consecutive failed logins since the last success or lock
    pub login_attempts: i32,
    pub lock_until: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub last_login_at: Option<String>,
}

impl User {
    pub fn info(&self) -> UserInfo {
        UserInfo {
            id: self.id.clone(),
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            mobile: self.mobile.clone(),
        }
    }

    /// Whether the account is locked at `now` (RFC 3339 timestamps)
    pub fn is_locked(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.lock_until
            .as_deref()
            .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
            .map(|until| until.with_timezone(&chrono::Utc) > now)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileDto {
    pub full_name: Option<String>,
    pub mobile: Option<String>,
}
