//! ClickHouse statement builder.
//!
//! A [`Statement`] collects the inputs of one SELECT or INSERT; a
//! [`SqlBuilder`] renders it to SQL text using its operator registry.
//!
//! # Example
//!
//! ```rust
//! use chsql_core::builder::{Pagination, SqlBuilder, Statement};
//!
//! let builder = SqlBuilder::default();
//! let sql = builder
//!     .build(
//!         &Statement::select(("db", "events"))
//!             .fields(&["id", "name"])
//!             .filter("kind", "click")
//!             .filter("ts__gte", 1_600_000_000)
//!             .paginate(Pagination::new().limit(10)),
//!     )
//!     .unwrap();
//!
//! assert_eq!(
//!     sql,
//!     "SELECT id, name FROM db.events WHERE (kind = 'click') and (ts >= 1600000000) \
//!      LIMIT 10 OFFSET 0"
//! );
//! ```
//!
//! Identifiers (database, table, field and ordering names) are copied into
//! the statement verbatim. They are never escaped or checked against a
//! schema, so they must come from trusted code and never from user input.
//! Only values are escaped.

mod filter;
mod insert;
mod select;

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::operator::OperatorRegistry;
use crate::value::{Row, ToValue};

pub use filter::FilterParams;
pub use select::{OrderBy, OrderDirection, Pagination, DEFAULT_LIMIT, DEFAULT_OFFSET};

/// Alias of the derived table in count queries.
pub const COUNT_ALIAS: &str = "c_t";

/// Database and table a statement reads from or writes to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Destination {
    /// Database name.
    pub database: String,
    /// Table name.
    pub table: String,
}

impl Destination {
    /// Creates a destination.
    #[must_use]
    pub fn new(database: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            table: table.into(),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.table)
    }
}

impl<D: Into<String>, T: Into<String>> From<(D, T)> for Destination {
    fn from((database, table): (D, T)) -> Self {
        Self::new(database, table)
    }
}

/// Which assembly routine a statement uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// SELECT statement.
    Select,
    /// INSERT statement.
    Insert,
}

/// The inputs of a single statement.
///
/// Select-only settings are ignored for inserts and rows are ignored for
/// selects. An empty filter set or field list is the same as none.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    action: Action,
    destination: Destination,
    rows: Vec<Row>,
    filter_params: FilterParams,
    pagination: Option<Pagination>,
    fields: Vec<String>,
    ordering: Vec<String>,
}

impl Statement {
    fn new(action: Action, destination: Destination) -> Self {
        Self {
            action,
            destination,
            rows: Vec::new(),
            filter_params: FilterParams::new(),
            pagination: None,
            fields: Vec::new(),
            ordering: Vec::new(),
        }
    }

    /// Starts a SELECT statement.
    #[must_use]
    pub fn select(destination: impl Into<Destination>) -> Self {
        Self::new(Action::Select, destination.into())
    }

    /// Starts an INSERT statement with the given rows.
    #[must_use]
    pub fn insert(destination: impl Into<Destination>, rows: impl IntoIterator<Item = Row>) -> Self {
        let mut statement = Self::new(Action::Insert, destination.into());
        statement.rows = rows.into_iter().collect();
        statement
    }

    /// Returns the action.
    #[must_use]
    pub const fn action(&self) -> Action {
        self.action
    }

    /// Returns the destination.
    #[must_use]
    pub const fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Adds a filter entry.
    #[must_use]
    pub fn filter<V: ToValue>(mut self, key: impl Into<String>, value: V) -> Self {
        self.filter_params.insert(key, value);
        self
    }

    /// Replaces the filter parameters.
    #[must_use]
    pub fn filters(mut self, params: FilterParams) -> Self {
        self.filter_params = params;
        self
    }

    /// Sets pagination, which always emits a LIMIT/OFFSET clause.
    #[must_use]
    pub const fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// Sets the projected (SELECT) or target (INSERT) columns.
    #[must_use]
    pub fn fields<S: AsRef<str>>(mut self, fields: &[S]) -> Self {
        self.fields = fields.iter().map(|f| String::from(f.as_ref())).collect();
        self
    }

    /// Sets the ordering. Prefix a field with `-` for descending order.
    #[must_use]
    pub fn order_by<S: AsRef<str>>(mut self, ordering: &[S]) -> Self {
        self.ordering = ordering.iter().map(|o| String::from(o.as_ref())).collect();
        self
    }

    /// Appends a row to an INSERT statement.
    #[must_use]
    pub fn row(mut self, row: Row) -> Self {
        self.rows.push(row);
        self
    }
}

/// Renders statements to SQL text.
///
/// The builder owns a shared, read-only operator registry and holds no other
/// state, so one instance can be cloned and used from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct SqlBuilder {
    operators: Arc<OperatorRegistry>,
}

impl SqlBuilder {
    /// Creates a builder using the given operator registry.
    #[must_use]
    pub const fn new(operators: Arc<OperatorRegistry>) -> Self {
        Self { operators }
    }

    /// Returns the operator registry.
    #[must_use]
    pub fn operators(&self) -> &OperatorRegistry {
        &self.operators
    }

    /// Renders a statement.
    pub fn build(&self, statement: &Statement) -> Result<String> {
        match statement.action {
            Action::Select => self.select_sql(statement),
            Action::Insert => insert::insert_sql(
                &statement.destination,
                &statement.rows,
                &statement.fields,
            ),
        }
    }

    fn select_sql(&self, statement: &Statement) -> Result<String> {
        let projection = if statement.fields.is_empty() {
            String::from("*")
        } else {
            statement.fields.join(", ")
        };

        let mut clauses = vec![format!(
            "SELECT {projection} FROM {}",
            statement.destination
        )];
        clauses.extend(select::where_clause(
            &self.operators,
            &statement.filter_params,
        )?);
        clauses.extend(statement.pagination.map(|p| p.to_sql()));
        clauses.extend(select::order_by_clause(&statement.ordering));

        Ok(clauses.join(" "))
    }

    /// Renders a query counting the rows of either a table or a raw query.
    ///
    /// Exactly one of `destination` and `query` must be given. Filter
    /// parameters only apply to a table.
    pub fn count(
        &self,
        destination: Option<&Destination>,
        filter_params: Option<&FilterParams>,
        query: Option<&str>,
    ) -> Result<String> {
        match (destination, query) {
            (Some(destination), None) => {
                let mut statement = Statement::select(destination.clone());
                if let Some(params) = filter_params {
                    statement = statement.filters(params.clone());
                }
                Ok(count_query(&self.build(&statement)?))
            }
            (None, Some(query)) => {
                if filter_params.is_some_and(|p| !p.is_empty()) {
                    return Err(Error::InvalidArguments(String::from(
                        "filter parameters cannot be applied to a raw query",
                    )));
                }
                Ok(count_query(query))
            }
            (None, None) => Err(Error::InvalidArguments(String::from(
                "either a table or a query is required",
            ))),
            (Some(_), Some(_)) => Err(Error::InvalidArguments(String::from(
                "a table and a query are mutually exclusive",
            ))),
        }
    }
}

/// Wraps a query so that it returns its row count.
#[must_use]
pub fn count_query(query: &str) -> String {
    format!("SELECT count() FROM ({query}) AS {COUNT_ALIAS}")
}
