use sqlx::{self, postgres::PgArguments, Postgres};

use crate::filter::filter::validate_table_name;
use crate::filter::filter_where::validate_column;
use crate::filter::{FilterError, SqlParam, SqlResult};

/// SQL text for the single-row writes a repository performs.
pub struct QueryBuilder<'a> {
    table_name: &'a str,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(table_name: &'a str) -> Result<Self, FilterError> {
        validate_table_name(table_name)?;
        Ok(Self { table_name })
    }

    pub fn select_by_id(&self, id: &str) -> SqlResult {
        SqlResult {
            query: format!("SELECT * FROM \"{}\" WHERE \"id\" = $1", self.table_name),
            params: vec![SqlParam::from(id)],
        }
    }

    pub fn insert(&self, columns: Vec<(&'static str, SqlParam)>) -> Result<SqlResult, FilterError> {
        let mut names = Vec::with_capacity(columns.len());
        let mut placeholders = Vec::with_capacity(columns.len());
        let mut params = Vec::with_capacity(columns.len());
        for (index, (column, value)) in columns.into_iter().enumerate() {
            validate_column(column)?;
            names.push(format!("\"{}\"", column));
            placeholders.push(format!("${}", index + 1));
            params.push(value);
        }
        Ok(SqlResult {
            query: format!(
                "INSERT INTO \"{}\" ({}) VALUES ({}) RETURNING *",
                self.table_name,
                names.join(", "),
                placeholders.join(", ")
            ),
            params,
        })
    }

    /// `$1` is the id; the assignments follow in column order.
    pub fn update(
        &self,
        id: &str,
        columns: Vec<(&'static str, SqlParam)>,
    ) -> Result<SqlResult, FilterError> {
        let mut assignments = Vec::with_capacity(columns.len());
        let mut params = vec![SqlParam::from(id)];
        for (column, value) in columns {
            validate_column(column)?;
            params.push(value);
            assignments.push(format!("\"{}\" = ${}", column, params.len()));
        }
        Ok(SqlResult {
            query: format!(
                "UPDATE \"{}\" SET {} WHERE \"id\" = $1 RETURNING *",
                self.table_name,
                assignments.join(", ")
            ),
            params,
        })
    }

    pub fn delete(&self, id: &str) -> SqlResult {
        SqlResult {
            query: format!("DELETE FROM \"{}\" WHERE \"id\" = $1", self.table_name),
            params: vec![SqlParam::from(id)],
        }
    }
}

pub fn bind_param_query(
    q: sqlx::query::Query<'_, Postgres, PgArguments>,
    v: SqlParam,
) -> sqlx::query::Query<'_, Postgres, PgArguments> {
    match v {
        SqlParam::Text(s) => q.bind(s),
        SqlParam::Bool(b) => q.bind(b),
        SqlParam::Date(d) => q.bind(d),
        SqlParam::Timestamp(t) => q.bind(t),
    }
}

pub fn bind_param_query_as<O>(
    q: sqlx::query::QueryAs<'_, Postgres, O, PgArguments>,
    v: SqlParam,
) -> sqlx::query::QueryAs<'_, Postgres, O, PgArguments> {
    match v {
        SqlParam::Text(s) => q.bind(s),
        SqlParam::Bool(b) => q.bind(b),
        SqlParam::Date(d) => q.bind(d),
        SqlParam::Timestamp(t) => q.bind(t),
    }
}
