use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::Entity;
use crate::filter::SqlParam;

/// A signed-in browser. Only the SHA-256 of the cookie token is stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub user_id: String,
    #[serde(skip_serializing, default)]
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

impl Entity for Session {
    const TABLE: &'static str = "sessions";
    const KIND: &'static str = "Session";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn columns(&self) -> Vec<(&'static str, SqlParam)> {
        vec![
            ("user_id", self.user_id.clone().into()),
            ("token_hash", self.token_hash.clone().into()),
            ("expires_at", self.expires_at.into()),
        ]
    }
}
