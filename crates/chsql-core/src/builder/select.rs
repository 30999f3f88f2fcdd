//! SELECT statement clauses.

use crate::error::Result;
use crate::operator::OperatorRegistry;

use super::filter::FilterParams;

/// Limit applied when pagination is requested without one.
pub const DEFAULT_LIMIT: u64 = 100;

/// Offset applied when pagination is requested without one.
pub const DEFAULT_OFFSET: u64 = 0;

/// LIMIT/OFFSET settings.
///
/// Passing a `Pagination` always emits the clause; missing values fall back
/// to [`DEFAULT_LIMIT`] and [`DEFAULT_OFFSET`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    /// Maximum number of rows.
    pub limit: Option<u64>,
    /// Number of rows to skip.
    pub offset: Option<u64>,
}

impl Pagination {
    /// Creates pagination with both values defaulted.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            limit: None,
            offset: None,
        }
    }

    /// Sets the limit.
    #[must_use]
    pub const fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Sets the offset.
    #[must_use]
    pub const fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Returns the `LIMIT .. OFFSET ..` clause.
    #[must_use]
    pub fn to_sql(&self) -> String {
        format!(
            "LIMIT {} OFFSET {}",
            self.limit.unwrap_or(DEFAULT_LIMIT),
            self.offset.unwrap_or(DEFAULT_OFFSET)
        )
    }
}

/// Order direction for sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    /// Ascending order, the server default. Rendered without a keyword.
    Asc,
    /// Descending order (DESC)
    Desc,
}

/// An ordering specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Column to order by
    pub column: String,
    /// Order direction
    pub direction: OrderDirection,
}

impl OrderBy {
    /// Parses a Django-style order specification.
    ///
    /// Prefix with `-` for descending order. Returns `None` for entries with
    /// no column name.
    #[must_use]
    pub fn parse(spec: &str) -> Option<Self> {
        let (column, direction) = match spec.strip_prefix('-') {
            Some(column) => (column, OrderDirection::Desc),
            None => (spec, OrderDirection::Asc),
        };
        if column.is_empty() {
            return None;
        }
        Some(Self {
            column: String::from(column),
            direction,
        })
    }

    /// Returns the SQL representation.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self.direction {
            OrderDirection::Asc => self.column.clone(),
            OrderDirection::Desc => format!("{} DESC", self.column),
        }
    }
}

/// Renders `WHERE (..) and (..)`, or `None` for no filters.
///
/// Each value is mapped to its literal exactly once, right before its
/// condition is rendered.
pub(crate) fn where_clause(
    operators: &OperatorRegistry,
    params: &FilterParams,
) -> Result<Option<String>> {
    if params.is_empty() {
        return Ok(None);
    }

    let conditions = params
        .iter()
        .map(|(key, value)| operators.condition(key, &value.to_sql()))
        .collect::<Result<Vec<_>>>()?;

    Ok(Some(format!("WHERE {}", conditions.join(" and "))))
}

/// Renders `ORDER BY ..`, or `None` when no entry names a column.
pub(crate) fn order_by_clause(ordering: &[String]) -> Option<String> {
    let items: Vec<String> = ordering
        .iter()
        .filter_map(|spec| OrderBy::parse(spec))
        .map(|order| order.to_sql())
        .collect();

    if items.is_empty() {
        None
    } else {
        Some(format!("ORDER BY {}", items.join(", ")))
    }
}
