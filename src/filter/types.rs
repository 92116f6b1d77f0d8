use std::fmt::Debug;

/// A filterable column of a known table.
///
/// Implemented by per-table enums so that only whitelisted column names ever
/// reach generated SQL.
pub trait Column: Copy + Debug + PartialEq + Send + Sync {
    fn column(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq)]
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

/// Equality condition on a single column
#[derive(Debug, Clone, PartialEq)]
pub struct FilterWhereInfo<C: Column> {
    pub column: C,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOrderInfo<C: Column> {
    pub column: C,
    pub sort: SortDirection,
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<String>,
}

/// Value of a column as seen by the in-memory evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Timestamp(chrono::DateTime<chrono::Utc>),
}

/// Records that can be matched and ordered by a [`super::Filter`] without a database
pub trait Filterable<C: Column> {
    fn field(&self, column: C) -> Option<FieldValue<'_>>;
}
