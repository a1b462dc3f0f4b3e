//! User accounts and session tokens

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Map;

use crate::error::{H2Error, H2Result};
use crate::models::{new_id, Session, User, UserResponse};
use crate::security::{require_non_empty, validate_and_normalize_email};
use crate::store::Store;

pub const INVALID_TOKEN: &str = "Invalid or expired user token";
const INVALID_CREDENTIALS: &str = "Invalid email or password";
const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Profile edit; both fields are written on every update
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
    #[serde(skip)]
    pub expires_at: chrono::DateTime<Utc>,
}

#[derive(Clone)]
pub struct AuthService {
    store: Store,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(store: Store, session_ttl_days: i64) -> Self {
        Self {
            store,
            session_ttl: Duration::days(session_ttl_days),
        }
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    fn hash_password(&self, password: &str) -> H2Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| H2Error::Internal(format!("Failed to hash password: {}", e)))
    }

    fn verify_password(&self, password: &str, hash: &str) -> bool {
        PasswordHash::new(hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    async fn find_by_email(&self, email: &str) -> H2Result<Option<User>> {
        Ok(self.store.find_by::<User>("email", email).await?.into_iter().next())
    }

    /// Register a new user
    pub async fn register(&self, request: RegisterRequest) -> H2Result<UserResponse> {
        let email = validate_and_normalize_email(&request.email)?;
        if request.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(H2Error::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        if self.find_by_email(&email).await?.is_some() {
            return Err(H2Error::Validation("Email already registered".to_string()));
        }

        let display_name = request
            .display_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(ToString::to_string)
            .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());

        let user = User {
            id: new_id(),
            email,
            display_name,
            password_hash: self.hash_password(&request.password)?,
            profile_picture_url: None,
            created_at: Utc::now(),
            last_login_at: None,
        };
        self.store.insert(&user).await?;
        tracing::info!(user_id = %user.id, "User registered");
        Ok(user.into())
    }

    /// Check credentials and open a session
    pub async fn login(&self, request: LoginRequest) -> H2Result<LoginResponse> {
        let email =
            require_non_empty(Some(request.email.as_str()), INVALID_CREDENTIALS)?.to_lowercase();
        let mut user = self
            .find_by_email(&email)
            .await?
            .ok_or_else(|| H2Error::Auth(INVALID_CREDENTIALS.to_string()))?;
        if !self.verify_password(&request.password, &user.password_hash) {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(H2Error::Auth(INVALID_CREDENTIALS.to_string()));
        }

        let now = Utc::now();
        let session = Session {
            id: new_id(),
            user_id: user.id.clone(),
            created_at: now,
            expires_at: now + self.session_ttl,
        };
        self.store.insert(&session).await?;

        let mut fields = Map::new();
        fields.insert("lastLoginAt".to_string(), serde_json::to_value(now)?);
        if let Err(e) = self.store.set_fields::<User>(&user.id, fields).await {
            tracing::warn!("Failed to record last login: {}", e);
        }
        user.last_login_at = Some(now);

        Ok(LoginResponse {
            token: session.id,
            expires_at: session.expires_at,
            user: user.into(),
        })
    }

    /// Resolve a session token to its user id
    pub async fn verify_token(&self, token: &str) -> H2Result<String> {
        let session = self
            .store
            .get::<Session>(token.trim())
            .await?
            .ok_or_else(|| H2Error::Auth(INVALID_TOKEN.to_string()))?;
        if session.is_expired(Utc::now()) {
            if let Err(e) = self.store.delete::<Session>(&session.id).await {
                tracing::warn!("Failed to delete expired session: {}", e);
            }
            return Err(H2Error::Auth(INVALID_TOKEN.to_string()));
        }
        Ok(session.user_id)
    }

    pub async fn logout(&self, token: &str) -> H2Result<()> {
        self.store.delete::<Session>(token.trim()).await?;
        Ok(())
    }

    pub async fn get_user(&self, user_id: &str) -> H2Result<UserResponse> {
        Ok(self.store.require::<User>(user_id).await?.into())
    }

    /// Set the display name and picture; a blank picture URL clears it
    pub async fn update_profile(
        &self,
        user_id: &str,
        update: ProfileUpdate,
    ) -> H2Result<UserResponse> {
        let display_name =
            require_non_empty(update.display_name.as_deref(), "Display name cannot be empty.")?;
        let picture = update
            .profile_picture_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(ToString::to_string);

        let mut fields = Map::new();
        fields.insert("displayName".to_string(), display_name.into());
        fields.insert("profilePictureUrl".to_string(), serde_json::to_value(&picture)?);
        if !self.store.set_fields::<User>(user_id, fields).await? {
            return Err(H2Error::not_found("User"));
        }
        tracing::info!(user_id = %user_id, "Profile updated");
        self.get_user(user_id).await
    }
}
