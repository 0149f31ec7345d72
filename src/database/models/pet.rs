use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::Entity;
use crate::filter::SqlParam;

string_enum! {
    Species {
        Dog => "DOG",
        Cat => "CAT",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub species: Species,
    pub breed: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Entity for Pet {
    const TABLE: &'static str = "pets";
    const KIND: &'static str = "Pet";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn columns(&self) -> Vec<(&'static str, SqlParam)> {
        vec![
            ("owner_id", self.owner_id.clone().into()),
            ("name", self.name.clone().into()),
            ("species", self.species.into()),
            ("breed", self.breed.clone().into()),
            ("birth_date", self.birth_date.into()),
            ("photo_url", self.photo_url.clone().into()),
        ]
    }
}
