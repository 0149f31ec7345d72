use std::cmp::Ordering;

use super::error::FilterError;
use super::types::{FilterOp, FilterWhereInfo, SqlParam};

pub struct FilterWhere {
    param_values: Vec<SqlParam>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    /// Render conditions as an AND-joined SQL predicate with `$n` placeholders.
    pub fn generate(
        conditions: &[FilterWhereInfo],
        starting_param_index: usize,
    ) -> Result<(String, Vec<SqlParam>), FilterError> {
        let mut filter_where = Self::new(starting_param_index);
        let mut sql_conditions = vec![];
        for condition in conditions {
            validate_column(condition.column)?;
            sql_conditions.push(filter_where.build_sql_condition(condition));
        }
        let where_clause = if sql_conditions.is_empty() {
            "1=1".to_string()
        } else {
            sql_conditions.join(" AND ")
        };
        Ok((where_clause, filter_where.param_values))
    }

    /// Evaluate conditions against a row, mirroring the SQL semantics.
    pub fn matches<F>(conditions: &[FilterWhereInfo], lookup: F) -> bool
    where
        F: Fn(&str) -> Option<SqlParam>,
    {
        conditions.iter().all(|condition| {
            let value = lookup(condition.column);
            Self::matches_condition(&condition.operator, value.as_ref())
        })
    }

    fn matches_condition(operator: &FilterOp, value: Option<&SqlParam>) -> bool {
        let Some(value) = value else { return false };
        match operator {
            FilterOp::Eq(expected) => {
                if expected.is_null() {
                    value.is_null()
                } else {
                    value == expected
                }
            }
            FilterOp::Contains(needle) => value
                .as_text()
                .map(|text| text.to_lowercase().contains(&needle.to_lowercase()))
                .unwrap_or(false),
            FilterOp::In(values) => !value.is_null() && values.contains(value),
            FilterOp::Gte(bound) => matches!(
                value.compare(bound),
                Some(Ordering::Greater) | Some(Ordering::Equal)
            ),
            FilterOp::Lte(bound) => matches!(
                value.compare(bound),
                Some(Ordering::Less) | Some(Ordering::Equal)
            ),
        }
    }

    fn build_sql_condition(&mut self, condition: &FilterWhereInfo) -> String {
        let quoted_column = format!("\"{}\"", condition.column);
        match &condition.operator {
            FilterOp::Eq(value) => {
                if value.is_null() {
                    format!("{} IS NULL", quoted_column)
                } else {
                    format!("{} = {}", quoted_column, self.param(value.clone()))
                }
            }
            FilterOp::Contains(needle) => {
                let pattern = format!("%{}%", escape_like(needle));
                format!("{} ILIKE {}", quoted_column, self.param(SqlParam::from(pattern)))
            }
            FilterOp::In(values) => {
                if values.is_empty() {
                    return "1=0".to_string();
                }
                let params: Vec<String> = values.iter().map(|v| self.param(v.clone())).collect();
                format!("{} IN ({})", quoted_column, params.join(", "))
            }
            FilterOp::Gte(value) => format!("{} >= {}", quoted_column, self.param(value.clone())),
            FilterOp::Lte(value) => format!("{} <= {}", quoted_column, self.param(value.clone())),
        }
    }

    fn param(&mut self, value: SqlParam) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}

/// Identifiers are interpolated into SQL, so only plain snake_case names pass.
pub fn validate_column(name: &str) -> Result<(), FilterError> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(FilterError::InvalidColumn(name.to_string()))
    }
}

pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

// ILIKE treats % and _ as wildcards; a user searching "t_rex" means it literally
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
