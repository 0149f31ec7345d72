pub mod password;
pub mod session;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::database::models::{Role, User};
use crate::error::ApiError;

pub use password::{hash_password, verify_password};
pub use session::{
    clear_cookie, hash_token, new_token, session_cookie, token_from_headers, SESSION_COOKIE,
};

/// Authenticated caller, resolved from the session cookie once per request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self::new(user.id.clone(), user.role)
    }
}

/// Handlers behind `require_session` take `Actor` as an argument; anywhere
/// else the missing extension turns into a 401.
#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Actor>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}
