//! Session and reset-token domain models
//!
//! The token minted at sign-in is a client-only opaque string, not a real
//! credential. Nothing validates it beyond presence.

use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::user::{User, UserCategory};
use uuid::Uuid;

/// Snapshot of the signed-in user kept in the auth slice: the stored user
/// record minus the password.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub category: UserCategory,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            name: user.name.clone(),
            phone: user.phone.clone(),
            profile_image: user.profile_image.clone(),
            category: user.category,
        }
    }
}

/// The persisted auth slice
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    #[serde(default)]
    pub user: Option<SessionUser>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub is_authenticated: bool,
}

impl AuthState {
    /// A state only counts as authenticated when user, token and the flag
    /// all agree; anything else loads as the signed-out default.
    pub fn validated(self) -> Self {
        if self.is_authenticated && self.user.is_some() && self.token.is_some() {
            self
        } else {
            Self::default()
        }
    }
}

/// A pending password-reset token
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetToken {
    pub email: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ResetToken {
    /// Mint a reset token for an email, valid for one hour
    pub fn mint(email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            email: email.into(),
            token: format!("reset_{}_{}", now.timestamp_millis(), random_suffix()),
            expires_at: now + Duration::hours(1),
            created_at: now,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Mint an opaque session token: timestamp plus a random suffix
pub fn mint_session_token() -> String {
    format!(
        "token_{}_{}",
        Utc::now().timestamp_millis(),
        random_suffix()
    )
}

fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_format() {
        let token = mint_session_token();
        assert!(token.starts_with("token_"));
        let suffix = token.rsplit('_').next().unwrap();
        assert_eq!(suffix.len(), 9);
    }

    #[test]
    fn test_invalid_auth_state_resets() {
        let state = AuthState {
            user: None,
            token: Some("token_x".to_string()),
            is_authenticated: true,
        };
        let validated = state.validated();
        assert!(!validated.is_authenticated);
        assert!(validated.token.is_none());
    }

    #[test]
    fn test_reset_token_expiry() {
        let token = ResetToken::mint("ada@example.com");
        assert!(token.token.starts_with("reset_"));
        assert!(!token.is_expired(Utc::now()));
        assert!(token.is_expired(Utc::now() + Duration::hours(2)));
    }
}
