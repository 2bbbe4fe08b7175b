//! Auth service - simulated authentication flows
//!
//! Sign in/up/out, the fixed-OTP password reset, profile management and
//! account deletion. Everything here is a simulation: passwords are compared
//! in plaintext and the session token is an opaque string nothing validates.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::sanitize::sanitize_input;
use crate::domain::{
    mint_session_token, validate_password, AuthState, FieldError, ResetToken, SessionUser, User,
    UserCategory,
};
use crate::ports::store::keys;
use crate::ports::{StateStore, StateStoreExt};

use super::simulate_latency;

/// The literal one-time password accepted by the reset flow
pub const RESET_OTP: &str = "0000";

/// Sign-up form payload
#[derive(Debug, Clone)]
pub struct SignUpRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub category: UserCategory,
}

/// Partial profile update; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
    pub category: Option<UserCategory>,
}

/// Auth service for the simulated authentication flows
pub struct AuthService {
    store: Arc<dyn StateStore>,
    session: Arc<dyn StateStore>,
    latency: Duration,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn StateStore>,
        session: Arc<dyn StateStore>,
        latency: Duration,
    ) -> Self {
        Self {
            store,
            session,
            latency,
        }
    }

    // === Slice access ===

    /// All registered users
    pub fn users(&self) -> Result<Vec<User>> {
        Ok(self.store.load_slice(keys::USERS)?.unwrap_or_default())
    }

    fn save_users(&self, users: &[User]) -> Result<()> {
        self.store.save_slice(keys::USERS, &users)
    }

    /// Current auth slice, degraded to signed-out if inconsistent
    pub fn state(&self) -> Result<AuthState> {
        let state: AuthState = self.store.load_slice(keys::AUTH)?.unwrap_or_default();
        Ok(state.validated())
    }

    /// The signed-in user snapshot, if any
    pub fn current_user(&self) -> Result<Option<SessionUser>> {
        Ok(self.state()?.user)
    }

    /// The signed-in user snapshot, or an auth error
    pub fn require_user(&self) -> Result<SessionUser> {
        self.current_user()?
            .ok_or_else(|| Error::auth("Please sign in first"))
    }

    // === Sign-up / sign-in / sign-out ===

    /// Register a new account. Does not sign the user in.
    pub fn sign_up(&self, request: SignUpRequest) -> Result<User> {
        simulate_latency(self.latency);

        let user = User::new(
            sanitize_input(request.first_name.trim()),
            sanitize_input(request.last_name.trim()),
            request.email.trim().to_string(),
            request.password,
            request.category,
        );
        user.validate().map_err(field_errors_to_validation)?;

        let mut users = self.users()?;
        if users.iter().any(|u| u.email == user.email) {
            return Err(Error::auth(
                "An account with this email address already exists. Please sign in or use a different email address.",
            ));
        }

        users.push(user.clone());
        self.save_users(&users)?;
        Ok(user)
    }

    /// Sign in with email and password.
    ///
    /// An unknown email and a wrong password fail differently, and the
    /// distinction is deliberate: "account does not exist" versus
    /// "incorrect password".
    pub fn sign_in(&self, email: &str, password: &str, remember: bool) -> Result<AuthState> {
        simulate_latency(self.latency);

        let users = self.users()?;
        let user = users.iter().find(|u| u.email == email).ok_or_else(|| {
            Error::auth(
                "Account does not exist. Please check your email or sign up for a new account.",
            )
        })?;

        if user.password != password {
            return Err(Error::auth("Incorrect password. Please try again."));
        }

        let state = AuthState {
            user: Some(SessionUser::from(user)),
            token: Some(mint_session_token()),
            is_authenticated: true,
        };
        self.store.save_slice(keys::AUTH, &state)?;

        if remember {
            self.store.save_wrapped(keys::REMEMBERED_EMAIL, &email)?;
            self.store.save_wrapped(keys::REMEMBERED_PASSWORD, &password)?;
            self.store.save_wrapped(keys::REMEMBER_ME, &true)?;
        } else {
            self.store.clear(keys::REMEMBERED_EMAIL)?;
            self.store.clear(keys::REMEMBERED_PASSWORD)?;
            self.store.clear(keys::REMEMBER_ME)?;
        }

        Ok(state)
    }

    /// Sign out and drop the session-scoped chatbot greeting flag. The
    /// persistent last-read marker survives so old messages stay read on
    /// the next sign-in.
    pub fn sign_out(&self) -> Result<()> {
        if let Some(user) = self.current_user()? {
            self.session.clear(&keys::chatbot_shown(user.id))?;
        }
        self.store.clear(keys::AUTH)
    }

    /// Remembered credentials from a prior "remember me" sign-in
    pub fn remembered_credentials(&self) -> Result<Option<(String, String)>> {
        let remembered: bool = self
            .store
            .load_wrapped(keys::REMEMBER_ME)?
            .unwrap_or(false);
        if !remembered {
            return Ok(None);
        }
        let email: Option<String> = self.store.load_wrapped(keys::REMEMBERED_EMAIL)?;
        let password: Option<String> = self.store.load_wrapped(keys::REMEMBERED_PASSWORD)?;
        Ok(email.zip(password))
    }

    // === Password reset ===

    /// Start the reset flow: mint a one-hour token for a known email,
    /// replacing any older tokens for the same address.
    pub fn forgot_password(&self, email: &str) -> Result<ResetToken> {
        simulate_latency(self.latency);

        let users = self.users()?;
        if !users.iter().any(|u| u.email == email) {
            return Err(Error::auth("No account found with this email"));
        }

        let token = ResetToken::mint(email);
        let mut tokens: Vec<ResetToken> = self
            .store
            .load_slice(keys::RESET_TOKENS)?
            .unwrap_or_default();
        tokens.retain(|t| t.email != email);
        tokens.push(token.clone());
        self.store.save_slice(keys::RESET_TOKENS, &tokens)?;

        Ok(token)
    }

    /// Verify the one-time password. Exactly the literal "0000" passes.
    pub fn verify_otp(&self, input: &str) -> Result<()> {
        if input.trim() == RESET_OTP {
            Ok(())
        } else {
            Err(Error::validation(format!(
                "Invalid OTP. Please enter {}",
                RESET_OTP
            )))
        }
    }

    /// Complete the reset flow by overwriting the password. No session or
    /// token invalidation happens here.
    pub fn reset_password(&self, email: &str, new_password: &str) -> Result<()> {
        if let Some(e) = validate_password(new_password) {
            return Err(Error::validation(e.message));
        }

        let mut users = self.users()?;
        let user = users
            .iter_mut()
            .find(|u| u.email == email)
            .ok_or_else(|| Error::not_found("User not found"))?;
        user.password = new_password.to_string();
        user.updated_at = Utc::now();
        self.save_users(&users)
    }

    // === Profile ===

    /// Apply a partial profile update to the signed-in user and refresh the
    /// auth snapshot.
    pub fn update_profile(&self, update: ProfileUpdate) -> Result<SessionUser> {
        simulate_latency(self.latency);

        let mut state = self.state()?;
        let session_user = state
            .user
            .as_ref()
            .ok_or_else(|| Error::not_found("User not found"))?;
        let user_id = session_user.id;

        let mut users = self.users()?;
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| Error::not_found("User not found"))?;

        if let Some(first_name) = update.first_name {
            user.first_name = sanitize_input(first_name.trim());
        }
        if let Some(last_name) = update.last_name {
            user.last_name = sanitize_input(last_name.trim());
        }
        if let Some(phone) = update.phone {
            user.phone = Some(sanitize_input(phone.trim()));
        }
        if let Some(profile_image) = update.profile_image {
            user.profile_image = Some(profile_image);
        }
        if let Some(category) = update.category {
            user.category = category;
        }
        user.sync_name();
        user.updated_at = Utc::now();
        user.validate().map_err(field_errors_to_validation)?;

        let snapshot = SessionUser::from(&*user);
        self.save_users(&users)?;

        state.user = Some(snapshot.clone());
        self.store.save_slice(keys::AUTH, &state)?;
        Ok(snapshot)
    }

    /// Change the password after re-confirming the current one
    pub fn change_password(&self, current: &str, new: &str) -> Result<()> {
        simulate_latency(self.latency);

        let session_user = self
            .current_user()?
            .ok_or_else(|| Error::not_found("User not found"))?;

        let mut users = self.users()?;
        let user = users
            .iter_mut()
            .find(|u| u.id == session_user.id && u.email == session_user.email)
            .ok_or_else(|| Error::not_found("User not found"))?;

        if user.password != current {
            return Err(Error::auth("Current password is incorrect"));
        }
        if let Some(e) = validate_password(new) {
            return Err(Error::validation(e.message));
        }

        user.password = new.to_string();
        user.updated_at = Utc::now();
        self.save_users(&users)
    }

    /// Delete the signed-in user's account and sign out. No password
    /// reconfirmation is required.
    pub fn delete_account(&self) -> Result<()> {
        simulate_latency(self.latency);

        let session_user = self
            .current_user()?
            .ok_or_else(|| Error::not_found("User not found"))?;

        let mut users = self.users()?;
        if !users
            .iter()
            .any(|u| u.id == session_user.id && u.email == session_user.email)
        {
            return Err(Error::not_found("User not found"));
        }
        users.retain(|u| u.id != session_user.id);
        self.save_users(&users)?;

        self.session.save_wrapped(keys::ACCOUNT_DELETED, &true)?;
        self.sign_out()
    }

    /// Read and clear the account-deleted flag set by `delete_account`.
    /// The next sign-in surface consumes this exactly once.
    pub fn take_account_deleted_flag(&self) -> Result<bool> {
        let flag: bool = self
            .session
            .load_wrapped(keys::ACCOUNT_DELETED)?
            .unwrap_or(false);
        if flag {
            self.session.clear(keys::ACCOUNT_DELETED)?;
        }
        Ok(flag)
    }

    // === User directory ===

    /// Update any user record by id (directory maintenance surface)
    pub fn update_user(&self, user_id: Uuid, update: ProfileUpdate) -> Result<User> {
        let mut users = self.users()?;
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| Error::not_found("User not found"))?;

        if let Some(first_name) = update.first_name {
            user.first_name = sanitize_input(first_name.trim());
        }
        if let Some(last_name) = update.last_name {
            user.last_name = sanitize_input(last_name.trim());
        }
        if let Some(phone) = update.phone {
            user.phone = Some(sanitize_input(phone.trim()));
        }
        if let Some(category) = update.category {
            user.category = category;
        }
        user.sync_name();
        user.updated_at = Utc::now();

        let updated = user.clone();
        self.save_users(&users)?;
        Ok(updated)
    }

    /// Remove any user record by id
    pub fn delete_user(&self, user_id: Uuid) -> Result<()> {
        let mut users = self.users()?;
        let before = users.len();
        users.retain(|u| u.id != user_id);
        if users.len() == before {
            return Err(Error::not_found("User not found"));
        }
        self.save_users(&users)
    }
}

fn field_errors_to_validation(errors: Vec<FieldError>) -> Error {
    let joined = errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ");
    Error::Validation(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
            Duration::ZERO,
        )
    }

    fn sign_up_ada(service: &AuthService) -> User {
        service
            .sign_up(SignUpRequest {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                password: "Passw0rd!".to_string(),
                category: UserCategory::Student,
            })
            .unwrap()
    }

    #[test]
    fn test_sign_up_then_sign_in() {
        let service = service();
        sign_up_ada(&service);

        let state = service.sign_in("ada@example.com", "Passw0rd!", false).unwrap();
        assert!(state.is_authenticated);
        assert!(state.token.unwrap().starts_with("token_"));
        assert_eq!(state.user.unwrap().name, "Ada Lovelace");
    }

    #[test]
    fn test_sign_in_wrong_password_is_distinct_from_unknown_email() {
        let service = service();
        sign_up_ada(&service);

        let wrong_password = service
            .sign_in("ada@example.com", "Nope12345!", false)
            .unwrap_err();
        assert!(wrong_password.to_string().contains("Incorrect password"));

        let unknown = service
            .sign_in("ghost@example.com", "Passw0rd!", false)
            .unwrap_err();
        assert!(unknown.to_string().contains("Account does not exist"));
    }

    #[test]
    fn test_duplicate_sign_up_rejected() {
        let service = service();
        sign_up_ada(&service);

        let result = service.sign_up(SignUpRequest {
            first_name: "Other".to_string(),
            last_name: "Person".to_string(),
            email: "ada@example.com".to_string(),
            password: "Different1!".to_string(),
            category: UserCategory::Employed,
        });
        assert!(result.is_err());
        assert_eq!(service.users().unwrap().len(), 1);
    }

    #[test]
    fn test_sign_up_does_not_sign_in() {
        let service = service();
        sign_up_ada(&service);
        assert!(service.current_user().unwrap().is_none());
    }

    #[test]
    fn test_sign_out_clears_state() {
        let service = service();
        sign_up_ada(&service);
        service.sign_in("ada@example.com", "Passw0rd!", false).unwrap();
        service.sign_out().unwrap();
        assert!(!service.state().unwrap().is_authenticated);
    }

    #[test]
    fn test_remember_me_round_trip() {
        let service = service();
        sign_up_ada(&service);

        service.sign_in("ada@example.com", "Passw0rd!", true).unwrap();
        let remembered = service.remembered_credentials().unwrap().unwrap();
        assert_eq!(remembered.0, "ada@example.com");

        // Signing in without remember clears the stored credentials
        service.sign_in("ada@example.com", "Passw0rd!", false).unwrap();
        assert!(service.remembered_credentials().unwrap().is_none());
    }

    #[test]
    fn test_otp_accepts_only_the_fixed_code() {
        let service = service();
        assert!(service.verify_otp("0000").is_ok());
        assert!(service.verify_otp(" 0000 ").is_ok());
        assert!(service.verify_otp("1234").is_err());
        assert!(service.verify_otp("000O").is_err());
        assert!(service.verify_otp("").is_err());
    }

    #[test]
    fn test_forgot_password_flow() {
        let service = service();
        sign_up_ada(&service);

        assert!(service.forgot_password("ghost@example.com").is_err());

        let token = service.forgot_password("ada@example.com").unwrap();
        assert!(token.token.starts_with("reset_"));

        // A second request replaces the first token
        let token2 = service.forgot_password("ada@example.com").unwrap();
        let tokens: Vec<ResetToken> = service
            .store
            .load_slice(keys::RESET_TOKENS)
            .unwrap()
            .unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].token, token2.token);

        service.reset_password("ada@example.com", "NewPass1!").unwrap();
        assert!(service.sign_in("ada@example.com", "NewPass1!", false).is_ok());
    }

    #[test]
    fn test_change_password_requires_current() {
        let service = service();
        sign_up_ada(&service);
        service.sign_in("ada@example.com", "Passw0rd!", false).unwrap();

        let err = service.change_password("Wrong1234!", "NewPass1!").unwrap_err();
        assert!(err.to_string().contains("Current password is incorrect"));

        service.change_password("Passw0rd!", "NewPass1!").unwrap();
        service.sign_out().unwrap();
        assert!(service.sign_in("ada@example.com", "NewPass1!", false).is_ok());
    }

    #[test]
    fn test_update_profile_syncs_name_and_snapshot() {
        let service = service();
        sign_up_ada(&service);
        service.sign_in("ada@example.com", "Passw0rd!", false).unwrap();

        let snapshot = service
            .update_profile(ProfileUpdate {
                first_name: Some("Grace".to_string()),
                phone: Some("555-0199".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(snapshot.name, "Grace Lovelace");

        // Both the stored record and the auth snapshot reflect the change
        let users = service.users().unwrap();
        assert_eq!(users[0].name, "Grace Lovelace");
        assert_eq!(
            service.current_user().unwrap().unwrap().phone.as_deref(),
            Some("555-0199")
        );
    }

    #[test]
    fn test_delete_account_signs_out_and_sets_flag() {
        let service = service();
        sign_up_ada(&service);
        service.sign_in("ada@example.com", "Passw0rd!", false).unwrap();

        service.delete_account().unwrap();
        assert!(service.users().unwrap().is_empty());
        assert!(!service.state().unwrap().is_authenticated);

        // Flag reads true exactly once
        assert!(service.take_account_deleted_flag().unwrap());
        assert!(!service.take_account_deleted_flag().unwrap());
    }

    #[test]
    fn test_sanitizes_name_input() {
        let service = service();
        let user = service
            .sign_up(SignUpRequest {
                first_name: "Ada<b>".to_string(),
                last_name: "Love>lace".to_string(),
                email: "ada@example.com".to_string(),
                password: "Passw0rd!".to_string(),
                category: UserCategory::Student,
            })
            .unwrap();
        assert_eq!(user.first_name, "Adab");
        assert_eq!(user.last_name, "Lovelace");
    }
}
