//! The capability the client needs from a ClickHouse connection.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use futures::stream::BoxStream;

/// Runs finished SQL text against a server.
///
/// Transport, authentication and compression are the implementor's concern;
/// statements arrive fully rendered with all values inlined.
pub trait Executor: Send + Sync {
    /// A result row.
    type Row: Send;
    /// A single scalar, as returned by aggregate queries.
    type Scalar: Send;
    /// Transport or server error.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Runs a statement that returns no rows.
    fn execute(&self, sql: &str) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Runs a statement and returns all rows.
    fn fetch(&self, sql: &str) -> impl Future<Output = Result<Vec<Self::Row>, Self::Error>> + Send;

    /// Runs a statement and returns the first row, if any.
    fn fetchrow(
        &self,
        sql: &str,
    ) -> impl Future<Output = Result<Option<Self::Row>, Self::Error>> + Send;

    /// Runs a statement and returns the first column of the first row, if any.
    fn fetchval(
        &self,
        sql: &str,
    ) -> impl Future<Output = Result<Option<Self::Scalar>, Self::Error>> + Send;

    /// Streams rows without collecting the whole result.
    fn iterate<'a>(&'a self, sql: &'a str) -> BoxStream<'a, Result<Self::Row, Self::Error>>;
}

/// Executor operation selected by name for raw queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Command {
    /// All rows.
    #[default]
    Fetch,
    /// First column of the first row.
    FetchVal,
    /// No result.
    Execute,
    /// First row.
    FetchRow,
    /// Row stream.
    Iterate,
}

impl Command {
    /// All commands, in the order their names are listed in errors.
    pub const ALL: [Self; 5] = [
        Self::Fetch,
        Self::FetchVal,
        Self::Execute,
        Self::FetchRow,
        Self::Iterate,
    ];

    /// Returns the command name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::FetchVal => "fetchval",
            Self::Execute => "execute",
            Self::FetchRow => "fetchrow",
            Self::Iterate => "iterate",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = chsql_core::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|command| command.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|c| c.as_str()).collect();
                chsql_core::Error::InvalidArguments(format!(
                    "unknown command '{s}', expected one of: {}",
                    names.join(", ")
                ))
            })
    }
}
