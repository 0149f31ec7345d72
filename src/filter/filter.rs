use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::{is_identifier, FilterWhere};
use super::types::{FilterOp, FilterOrderInfo, FilterWhereInfo, SqlParam, SqlResult};

/// Conditions and ordering for a single-table select.
///
/// Builder methods taking an `Option` skip the condition when it is `None`,
/// so optional query filters chain without branching.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    conditions: Vec<FilterWhereInfo>,
    order_spec: Option<String>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &'static str, value: impl Into<SqlParam>) -> Self {
        self.conditions.push(FilterWhereInfo {
            column,
            operator: FilterOp::Eq(value.into()),
        });
        self
    }

    pub fn eq_opt<V: Into<SqlParam>>(self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.eq(column, v),
            None => self,
        }
    }

    pub fn contains_opt(mut self, column: &'static str, needle: Option<&str>) -> Self {
        if let Some(needle) = needle.filter(|n| !n.is_empty()) {
            self.conditions.push(FilterWhereInfo {
                column,
                operator: FilterOp::Contains(needle.to_string()),
            });
        }
        self
    }

    pub fn any_of<V: Into<SqlParam>>(mut self, column: &'static str, values: Vec<V>) -> Self {
        self.conditions.push(FilterWhereInfo {
            column,
            operator: FilterOp::In(values.into_iter().map(Into::into).collect()),
        });
        self
    }

    pub fn gte_opt<V: Into<SqlParam>>(mut self, column: &'static str, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.conditions.push(FilterWhereInfo {
                column,
                operator: FilterOp::Gte(v.into()),
            });
        }
        self
    }

    pub fn lte_opt<V: Into<SqlParam>>(mut self, column: &'static str, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.conditions.push(FilterWhereInfo {
                column,
                operator: FilterOp::Lte(v.into()),
            });
        }
        self
    }

    pub fn order(mut self, spec: impl Into<String>) -> Self {
        self.order_spec = Some(spec.into());
        self
    }

    pub fn conditions(&self) -> &[FilterWhereInfo] {
        &self.conditions
    }

    pub fn order_info(&self) -> Result<Vec<FilterOrderInfo>, FilterError> {
        match &self.order_spec {
            Some(spec) => FilterOrder::parse(spec),
            None => Ok(vec![]),
        }
    }

    pub fn to_sql(&self, table_name: &str) -> Result<SqlResult, FilterError> {
        validate_table_name(table_name)?;
        let (where_clause, params) = FilterWhere::generate(&self.conditions, 0)?;
        let order_clause = FilterOrder::generate(&self.order_info()?);

        let query = [
            format!("SELECT * FROM \"{}\"", table_name),
            format!("WHERE {}", where_clause),
            order_clause,
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        Ok(SqlResult { query, params })
    }

    pub fn matches<F>(&self, lookup: F) -> bool
    where
        F: Fn(&str) -> Option<SqlParam>,
    {
        FilterWhere::matches(&self.conditions, lookup)
    }
}

pub fn validate_table_name(name: &str) -> Result<(), FilterError> {
    if name.is_empty() {
        return Err(FilterError::InvalidTableName("Table name cannot be empty".to_string()));
    }
    if !is_identifier(name) {
        return Err(FilterError::InvalidTableName(format!("Invalid table name format: {}", name)));
    }
    Ok(())
}
