use std::cmp::Ordering;

use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{
    Column, FieldValue, FilterOrderInfo, FilterWhereInfo, Filterable, SortDirection, SqlResult,
};

/// Equality filter with ordering and an optional row cap.
///
/// The same filter renders to parameterized SQL for Postgres and evaluates
/// directly against records for the in-memory store, so both backends agree
/// on what a query string means.
#[derive(Debug, Clone)]
pub struct Filter<C: Column> {
    table_name: &'static str,
    conditions: Vec<FilterWhereInfo<C>>,
    order: Vec<FilterOrderInfo<C>>,
    limit: Option<i64>,
}

impl<C: Column> Filter<C> {
    pub fn new(table_name: &'static str) -> Self {
        Self {
            table_name,
            conditions: vec![],
            order: vec![],
            limit: None,
        }
    }

    pub fn where_eq(mut self, column: C, value: impl Into<String>) -> Self {
        self.conditions.push(FilterWhereInfo { column, value: value.into() });
        self
    }

    /// Add an equality condition only when a non-empty value was supplied
    pub fn where_opt(self, column: C, value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => self.where_eq(column, v),
            _ => self,
        }
    }

    pub fn order(mut self, column: C, sort: SortDirection) -> Self {
        self.order.push(FilterOrderInfo { column, sort });
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit.max(0));
        self
    }

    pub fn has_conditions(&self) -> bool {
        !self.conditions.is_empty()
    }

    pub fn to_sql(&self) -> SqlResult {
        let (where_clause, params) = FilterWhere::generate(&self.conditions, 0);
        let order_clause = FilterOrder::generate(&self.order);
        let limit_clause = self.limit.map(|l| format!("LIMIT {}", l)).unwrap_or_default();

        let query = [
            format!("SELECT * FROM \"{}\"", self.table_name),
            if where_clause.is_empty() { String::new() } else { format!("WHERE {}", where_clause) },
            order_clause,
            limit_clause,
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        SqlResult { query, params }
    }

    pub fn matches<T: Filterable<C>>(&self, record: &T) -> bool {
        self.conditions
            .iter()
            .all(|c| record.field(c.column) == Some(FieldValue::Text(c.value.as_str())))
    }

    /// Evaluate the filter over records held in memory
    pub fn apply<'a, T, I>(&self, records: I) -> Vec<T>
    where
        T: Filterable<C> + Clone + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let mut out: Vec<T> = records.into_iter().filter(|r| self.matches(*r)).cloned().collect();

        // stable sort keeps insertion order for ties
        out.sort_by(|a, b| {
            for info in &self.order {
                let ord = a.field(info.column).cmp(&b.field(info.column));
                let ord = match info.sort {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });

        if let Some(limit) = self.limit {
            out.truncate(usize::try_from(limit).unwrap_or(0));
        }
        out
    }
}
