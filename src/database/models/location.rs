use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::Entity;
use crate::filter::SqlParam;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    pub name: String,
    pub city: String,
    pub address: String,
    /// Eight digits, no separator
    pub zip_code: String,
    pub created_at: DateTime<Utc>,
}

impl Entity for Location {
    const TABLE: &'static str = "locations";
    const KIND: &'static str = "Location";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn columns(&self) -> Vec<(&'static str, SqlParam)> {
        vec![
            ("name", self.name.clone().into()),
            ("city", self.city.clone().into()),
            ("address", self.address.clone().into()),
            ("zip_code", self.zip_code.clone().into()),
        ]
    }
}
