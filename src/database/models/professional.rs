use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::Entity;
use crate::filter::SqlParam;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Professional {
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Entity for Professional {
    const TABLE: &'static str = "professionals";
    const KIND: &'static str = "Professional";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn columns(&self) -> Vec<(&'static str, SqlParam)> {
        vec![
            ("name", self.name.clone().into()),
            ("specialty", self.specialty.clone().into()),
            ("active", self.active.into()),
        ]
    }
}
