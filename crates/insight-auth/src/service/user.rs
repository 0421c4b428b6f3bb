//! User service

use insight_common::InsightError;
use insight_persistence::AuthPersistence;

use crate::model::{AuthUser, INVALID_CREDENTIALS};

pub const BCRYPT_COST: u32 = 10;

/// Check a username/password pair against the stored bcrypt hash.
///
/// Unknown users, wrong passwords and blank input all fail with the same
/// `InsightError::Auth(INVALID_CREDENTIALS)`.
pub async fn authenticate<P>(
    persistence: &P,
    username: &str,
    password: &str,
) -> anyhow::Result<AuthUser>
where
    P: AuthPersistence + ?Sized,
{
    if username.trim().is_empty() || password.is_empty() {
        return Err(InsightError::Auth(INVALID_CREDENTIALS.to_string()).into());
    }

    let user = match persistence.user_find_by_username(username).await? {
        Some(u) => u,
        None => {
            tracing::info!(username = %username, "Login failed: unknown user");
            return Err(InsightError::Auth(INVALID_CREDENTIALS.to_string()).into());
        }
    };

    if !bcrypt::verify(password, &user.password_hash).unwrap_or(false) {
        tracing::info!(username = %username, "Login failed: wrong password");
        return Err(InsightError::Auth(INVALID_CREDENTIALS.to_string()).into());
    }

    AuthUser::try_from(user).map_err(|e| {
        tracing::warn!(username = %username, error = %e, "Stored role is not recognized");
        InsightError::Auth(INVALID_CREDENTIALS.to_string()).into()
    })
}

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    bcrypt::hash(password, BCRYPT_COST).map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))
}
