use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{postgres::PgRow, FromRow};

use crate::filter::SqlParam;

/// A row type stored in its own table, keyed by an opaque string id.
///
/// `columns` lists every persisted field except `id` and `created_at`, which
/// are assigned once at creation and never rewritten.
pub trait Entity:
    Clone + Send + Sync + Unpin + Serialize + for<'r> FromRow<'r, PgRow> + 'static
{
    const TABLE: &'static str;
    /// Human-readable name used in error messages ("Pet", "Location", ...)
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;
    fn columns(&self) -> Vec<(&'static str, SqlParam)>;

    /// Value of any column by name, including `id` and `created_at`.
    fn column(&self, name: &str) -> Option<SqlParam> {
        match name {
            "id" => Some(SqlParam::from(self.id())),
            "created_at" => Some(SqlParam::from(self.created_at())),
            _ => self
                .columns()
                .into_iter()
                .find(|(column, _)| *column == name)
                .map(|(_, value)| value),
        }
    }
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
