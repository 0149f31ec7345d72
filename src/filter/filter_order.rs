use std::cmp::Ordering;

use super::error::FilterError;
use super::filter_where::is_identifier;
use super::types::{FilterOrderInfo, SortDirection, SqlParam};

pub struct FilterOrder;

impl FilterOrder {
    /// Parse `"created_at desc, name asc"` style order specs.
    pub fn parse(spec: &str) -> Result<Vec<FilterOrderInfo>, FilterError> {
        // split on commas, then each token into column and direction
        let mut out = Vec::new();
        for part in spec.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                continue;
            }
            let mut it = trimmed.split_whitespace();
            let Some(column) = it.next() else { continue };
            if !is_identifier(column) {
                return Err(FilterError::InvalidColumn(column.to_string()));
            }
            let sort = match it.next() {
                None => SortDirection::Asc,
                Some(dir) if dir.eq_ignore_ascii_case("asc") => SortDirection::Asc,
                Some(dir) if dir.eq_ignore_ascii_case("desc") => SortDirection::Desc,
                Some(dir) => return Err(FilterError::InvalidOrder(dir.to_string())),
            };
            if it.next().is_some() {
                return Err(FilterError::InvalidOrder(trimmed.to_string()));
            }
            out.push(FilterOrderInfo {
                column: column.to_string(),
                sort,
            });
        }
        Ok(out)
    }

    pub fn generate(infos: &[FilterOrderInfo]) -> String {
        if infos.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = infos
            .iter()
            .map(|i| format!("\"{}\" {}", i.column, i.sort.to_sql()))
            .collect();
        format!("ORDER BY {}", parts.join(", "))
    }

    /// Compare two rows for an in-memory `ORDER BY`; nulls sort last.
    pub fn compare(
        infos: &[FilterOrderInfo],
        a: &dyn Fn(&str) -> Option<SqlParam>,
        b: &dyn Fn(&str) -> Option<SqlParam>,
    ) -> Ordering {
        for info in infos {
            let left = a(&info.column).filter(|v| !v.is_null());
            let right = b(&info.column).filter(|v| !v.is_null());
            let ordering = match (left, right) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(l), Some(r)) => {
                    let ord = l.compare(&r).unwrap_or(Ordering::Equal);
                    match info.sort {
                        SortDirection::Asc => ord,
                        SortDirection::Desc => ord.reverse(),
                    }
                }
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}
