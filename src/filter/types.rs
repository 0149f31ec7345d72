use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};

/// A typed bind parameter. Nulls carry their column type so Postgres can
/// infer the parameter type on insert and update.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(Option<String>),
    Bool(Option<bool>),
    Date(Option<NaiveDate>),
    Timestamp(Option<DateTime<Utc>>),
}

impl SqlParam {
    pub fn is_null(&self) -> bool {
        match self {
            SqlParam::Text(v) => v.is_none(),
            SqlParam::Bool(v) => v.is_none(),
            SqlParam::Date(v) => v.is_none(),
            SqlParam::Timestamp(v) => v.is_none(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SqlParam::Text(Some(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Ordering between two non-null values of the same type.
    pub fn compare(&self, other: &SqlParam) -> Option<Ordering> {
        match (self, other) {
            (SqlParam::Text(Some(a)), SqlParam::Text(Some(b))) => Some(a.cmp(b)),
            (SqlParam::Bool(Some(a)), SqlParam::Bool(Some(b))) => Some(a.cmp(b)),
            (SqlParam::Date(Some(a)), SqlParam::Date(Some(b))) => Some(a.cmp(b)),
            (SqlParam::Timestamp(Some(a)), SqlParam::Timestamp(Some(b))) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<&str> for SqlParam {
    fn from(v: &str) -> Self {
        SqlParam::Text(Some(v.to_string()))
    }
}

impl From<String> for SqlParam {
    fn from(v: String) -> Self {
        SqlParam::Text(Some(v))
    }
}

impl From<Option<String>> for SqlParam {
    fn from(v: Option<String>) -> Self {
        SqlParam::Text(v)
    }
}

impl From<bool> for SqlParam {
    fn from(v: bool) -> Self {
        SqlParam::Bool(Some(v))
    }
}

impl From<NaiveDate> for SqlParam {
    fn from(v: NaiveDate) -> Self {
        SqlParam::Date(Some(v))
    }
}

impl From<Option<NaiveDate>> for SqlParam {
    fn from(v: Option<NaiveDate>) -> Self {
        SqlParam::Date(v)
    }
}

impl From<DateTime<Utc>> for SqlParam {
    fn from(v: DateTime<Utc>) -> Self {
        SqlParam::Timestamp(Some(v))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterOp {
    /// Exact match; a null operand means `IS NULL`
    Eq(SqlParam),
    /// Case-insensitive substring match on text columns
    Contains(String),
    In(Vec<SqlParam>),
    Gte(SqlParam),
    Lte(SqlParam),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterWhereInfo {
    pub column: &'static str,
    pub operator: FilterOp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOrderInfo {
    pub column: String,
    pub sort: SortDirection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}
