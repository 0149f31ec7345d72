use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::auth::{hash_password, hash_token, new_token, verify_password};
use crate::config::AppConfig;
use crate::database::models::{Role, Session, User};
use crate::database::{new_id, ConflictKind, DatabaseError, Repository};
use crate::error::ApiError;
use crate::filter::Filter;
use crate::validation::{SignIn, SignUp};

/// The resolved `{user, session}` pair behind a cookie.
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub user: User,
    pub session: Session,
}

/// A freshly opened session. `token` goes into the cookie and nowhere else.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub user: User,
    pub token: String,
}

/// Email/password accounts and cookie sessions.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn Repository<User>>,
    sessions: Arc<dyn Repository<Session>>,
    config: Arc<AppConfig>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn Repository<User>>,
        sessions: Arc<dyn Repository<Session>>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            users,
            sessions,
            config,
        }
    }

    pub async fn sign_up(&self, input: SignUp) -> Result<SignedIn, ApiError> {
        if self.find_by_email(&input.email).await?.is_some() {
            return Err(ApiError::conflict(ConflictKind::Unique, "User already exists"));
        }

        let role = if self.config.is_admin_email(&input.email) {
            Role::Admin
        } else {
            Role::User
        };
        let password = input.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(ApiError::internal)?
            .map_err(ApiError::internal)?;

        let user = self
            .users
            .insert(User {
                id: new_id(),
                name: input.name,
                email: input.email,
                password_hash,
                role,
                created_at: Utc::now(),
            })
            .await?;
        info!(user_id = %user.id, role = %user.role, "User signed up");

        self.open_session(user).await
    }

    pub async fn sign_in(&self, input: SignIn) -> Result<SignedIn, ApiError> {
        let invalid = || ApiError::unauthorized("Invalid email or password");

        let user = self.find_by_email(&input.email).await?.ok_or_else(invalid)?;
        let password = input.password;
        let stored = user.password_hash.clone();
        let verified = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
            .await
            .map_err(ApiError::internal)?;
        if !verified {
            warn!(user_id = %user.id, "Rejected sign-in attempt");
            return Err(invalid());
        }

        self.open_session(user).await
    }

    /// Signing out without a live session is not an error.
    pub async fn sign_out(&self, token: Option<&str>) -> Result<(), ApiError> {
        let Some(token) = token else {
            return Ok(());
        };
        if let Some(session) = self.find_session(token).await? {
            self.forget_session(&session.id).await?;
            info!(user_id = %session.user_id, "User signed out");
        }
        Ok(())
    }

    /// Expired sessions are removed on sight and resolve to `None`.
    pub async fn resolve(&self, token: &str) -> Result<Option<SessionInfo>, ApiError> {
        let Some(session) = self.find_session(token).await? else {
            return Ok(None);
        };
        if session.is_expired(Utc::now()) {
            self.forget_session(&session.id).await?;
            return Ok(None);
        }
        let user = self.users.find_by_id(&session.user_id).await?;
        Ok(user.map(|user| SessionInfo { user, session }))
    }

    pub async fn set_role(&self, email: &str, role: Role) -> Result<User, ApiError> {
        let email = email.trim().to_lowercase();
        let mut user = self
            .find_by_email(&email)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("No user with email {}", email)))?;
        user.role = role;
        let user = self.users.update(user).await?;
        info!(user_id = %user.id, role = %user.role, "User role changed");
        Ok(user)
    }

    /// Delete every session past its expiry; returns how many went.
    pub async fn purge_expired(&self) -> Result<usize, ApiError> {
        let expired = self
            .sessions
            .find_many(Filter::new().lte_opt("expires_at", Some(Utc::now())))
            .await?;
        for session in &expired {
            self.forget_session(&session.id).await?;
        }
        info!(count = expired.len(), "Purged expired sessions");
        Ok(expired.len())
    }

    async fn open_session(&self, user: User) -> Result<SignedIn, ApiError> {
        let token = new_token();
        let now = Utc::now();
        self.sessions
            .insert(Session {
                id: new_id(),
                user_id: user.id.clone(),
                token_hash: hash_token(&token),
                expires_at: now + Duration::hours(self.config.security.session_ttl_hours),
                created_at: now,
            })
            .await?;
        Ok(SignedIn { user, token })
    }

    /// Another request or the purge command may have removed the row first.
    async fn forget_session(&self, id: &str) -> Result<(), ApiError> {
        match self.sessions.delete(id).await {
            Ok(()) | Err(DatabaseError::NotFound(_)) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let mut users = self.users.find_many(Filter::new().eq("email", email)).await?;
        Ok(users.pop())
    }

    async fn find_session(&self, token: &str) -> Result<Option<Session>, ApiError> {
        let filter = Filter::new().eq("token_hash", hash_token(token));
        let mut sessions = self.sessions.find_many(filter).await?;
        Ok(sessions.pop())
    }
}
