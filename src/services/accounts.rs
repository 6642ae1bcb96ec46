//! Registration, login and logout

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;

use crate::{
    config::BootstrapConfig,
    error::{AppError, AppResult},
    models::{
        session::{Session, SessionData},
        user::{LoginRequest, NewUser, RegisterUser, User},
    },
    repository::Repository,
};

use super::sessions::SessionService;

const LOGIN_FAILED: &str = "Authentication failed";
const USERNAME_TAKEN: &str = "A user with that username already exists.";

// Verified against when the username is unknown so both failure paths cost
// one argon2 verification.
static DUMMY_HASH: Lazy<Option<String>> = Lazy::new(|| hash_password("dummy-password").ok());

#[derive(Clone)]
pub struct AccountsService {
    repository: Repository,
    sessions: SessionService,
}

impl AccountsService {
    pub fn new(repository: Repository, sessions: SessionService) -> Self {
        Self {
            repository,
            sessions,
        }
    }

    /// Create a regular (non-staff) user
    pub async fn register(&self, payload: RegisterUser) -> AppResult<User> {
        payload.check()?;

        if self.repository.users.username_exists(&payload.username).await? {
            return Err(AppError::invalid_field("username", USERNAME_TAKEN));
        }

        let user = self
            .repository
            .users
            .create(&NewUser {
                username: &payload.username,
                password_hash: hash_password(&payload.password)?,
                first_name: &payload.first_name,
                last_name: &payload.last_name,
                email: payload.email.as_deref().unwrap_or_default(),
                is_staff: false,
            })
            .await
            .map_err(username_conflict)?;

        tracing::info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Check credentials and open a session.
    ///
    /// Every failure yields the same error so callers cannot tell an unknown
    /// username from a wrong password. On success a session the caller
    /// already had is replaced.
    pub async fn login(
        &self,
        request: &LoginRequest,
        previous: Option<&Session>,
    ) -> AppResult<(User, String)> {
        if request.username.is_empty() || request.password.is_empty() {
            return Err(AppError::Authentication(LOGIN_FAILED.to_string()));
        }

        let user = match self
            .repository
            .users
            .get_by_username(&request.username)
            .await?
        {
            Some(user) => user,
            None => {
                if let Some(hash) = DUMMY_HASH.as_deref() {
                    let _ = verify_password(hash, &request.password);
                }
                tracing::warn!("Login failed");
                return Err(AppError::Authentication(LOGIN_FAILED.to_string()));
            }
        };

        if !verify_password(&user.password, &request.password)? || !user.is_active {
            tracing::warn!("Login failed");
            return Err(AppError::Authentication(LOGIN_FAILED.to_string()));
        }

        if let Some(previous) = previous {
            self.sessions.end(&previous.key).await?;
        }

        self.repository.users.touch_last_login(user.id).await?;
        let key = self.sessions.start(SessionData::for_user(&user)).await?;

        tracing::info!(user_id = user.id, "User logged in");
        Ok((user, key))
    }

    /// Destroy the caller's session
    pub async fn logout(&self, session: &Session) -> AppResult<()> {
        self.sessions.end(&session.key).await?;
        tracing::info!(user_id = session.user_id(), "User logged out");
        Ok(())
    }

    /// User behind a session
    pub async fn current_user(&self, session: &Session) -> AppResult<User> {
        self.repository.users.get_by_id(session.user_id()).await
    }

    /// Create the configured staff account unless the username is taken
    pub async fn ensure_admin(&self, bootstrap: &BootstrapConfig) -> AppResult<()> {
        let (Some(username), Some(password)) = (
            bootstrap.admin_username.as_deref(),
            bootstrap.admin_password.as_deref(),
        ) else {
            return Ok(());
        };

        if self.repository.users.username_exists(username).await? {
            tracing::debug!(username, "Bootstrap admin already present");
            return Ok(());
        }

        let user = self
            .repository
            .users
            .create(&NewUser {
                username,
                password_hash: hash_password(password)?,
                first_name: "",
                last_name: "",
                email: bootstrap.admin_email.as_deref().unwrap_or_default(),
                is_staff: true,
            })
            .await?;

        tracing::info!(user_id = user.id, username, "Bootstrap admin created");
        Ok(())
    }
}

/// A concurrent registration can pass the existence check and still lose
/// the race on the unique index
fn username_conflict(error: AppError) -> AppError {
    match error {
        AppError::Database(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            AppError::invalid_field("username", USERNAME_TAKEN)
        }
        other => other,
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC hash
pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
