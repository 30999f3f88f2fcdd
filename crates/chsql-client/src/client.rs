//! Client binding a database name to an executor.

use chsql_core::{Destination, FilterParams, Pagination, Row, SqlBuilder, Statement};
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::executor::{Command, Executor};

/// Stream of rows returned by [`Client::iterate`].
pub type RowStream<'a, R> = BoxStream<'a, Result<R>>;

/// Outcome of [`Client::raw`], one variant per [`Command`].
pub enum RawOutput<'a, E: Executor> {
    /// Result of [`Command::Execute`].
    Done,
    /// Result of [`Command::Fetch`].
    Rows(Vec<E::Row>),
    /// Result of [`Command::FetchRow`].
    Row(Option<E::Row>),
    /// Result of [`Command::FetchVal`].
    Value(Option<E::Scalar>),
    /// Result of [`Command::Iterate`].
    Stream(RowStream<'a, E::Row>),
}

/// High-level access to the tables of one database.
///
/// Every call renders its statement up front, so build errors are returned
/// before anything reaches the executor.
///
/// # Example
///
/// ```ignore
/// use chsql_client::Client;
/// use chsql_core::{row, FilterParams, Pagination};
///
/// let client = Client::new(executor, "analytics");
///
/// client.create("events", vec![row![1, "click"]]).await?;
///
/// let params = FilterParams::new().filter("kind", "click");
/// let rows = client
///     .get_list("events", Some(&params), Some(Pagination::new()), None, None)
///     .await?;
///
/// let total = client.count(Some("events"), Some(&params), None).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Client<E> {
    executor: E,
    database: String,
    builder: SqlBuilder,
}

impl<E: Executor> Client<E> {
    /// Creates a client with the default operators.
    pub fn new(executor: E, database: impl Into<String>) -> Self {
        Self {
            executor,
            database: database.into(),
            builder: SqlBuilder::default(),
        }
    }

    /// Creates a client for the database named in `config`.
    pub fn from_config(executor: E, config: &ClientConfig) -> Self {
        Self::new(executor, config.database.clone())
    }

    /// Replaces the statement builder, e.g. to use custom operators.
    #[must_use]
    pub fn with_builder(mut self, builder: SqlBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Returns the database name.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Returns the executor.
    pub const fn executor(&self) -> &E {
        &self.executor
    }

    /// Returns the statement builder.
    pub const fn builder(&self) -> &SqlBuilder {
        &self.builder
    }

    fn destination(&self, table: &str) -> Destination {
        Destination::new(self.database.as_str(), table)
    }

    fn select(
        &self,
        table: &str,
        filter_params: Option<&FilterParams>,
        pagination: Option<Pagination>,
        fields: Option<&[&str]>,
        ordering: Option<&[&str]>,
    ) -> Result<String> {
        let mut statement = Statement::select(self.destination(table));
        if let Some(params) = filter_params {
            statement = statement.filters(params.clone());
        }
        if let Some(pagination) = pagination {
            statement = statement.paginate(pagination);
        }
        if let Some(fields) = fields {
            statement = statement.fields(fields);
        }
        if let Some(ordering) = ordering {
            statement = statement.order_by(ordering);
        }
        Ok(self.builder.build(&statement)?)
    }

    /// Inserts rows into a table.
    pub async fn create(&self, table: &str, rows: Vec<Row>) -> Result<()> {
        self.create_with_fields(table, rows, &[]).await
    }

    /// Inserts rows into the given columns of a table.
    pub async fn create_with_fields(
        &self,
        table: &str,
        rows: Vec<Row>,
        fields: &[&str],
    ) -> Result<()> {
        let count = rows.len();
        let sql = self
            .builder
            .build(&Statement::insert(self.destination(table), rows).fields(fields))?;
        debug!(sql = %sql, "execute");
        self.executor.execute(&sql).await.map_err(executor_error)?;
        info!(table, database = %self.database, rows = count, "inserted rows");
        Ok(())
    }

    /// Fetches the rows of a table matching the filters.
    pub async fn get_list(
        &self,
        table: &str,
        filter_params: Option<&FilterParams>,
        pagination: Option<Pagination>,
        fields: Option<&[&str]>,
        ordering: Option<&[&str]>,
    ) -> Result<Vec<E::Row>> {
        let sql = self.select(table, filter_params, pagination, fields, ordering)?;
        debug!(sql = %sql, "fetch");
        self.executor.fetch(&sql).await.map_err(executor_error)
    }

    /// Fetches the first row of a table matching the filters.
    pub async fn get_object(
        &self,
        table: &str,
        filter_params: Option<&FilterParams>,
        fields: Option<&[&str]>,
    ) -> Result<Option<E::Row>> {
        let sql = self.select(table, filter_params, None, fields, None)?;
        debug!(sql = %sql, "fetchrow");
        self.executor.fetchrow(&sql).await.map_err(executor_error)
    }

    /// Counts the rows returned by a complete query.
    pub async fn get_count(&self, query: &str) -> Result<Option<E::Scalar>> {
        self.count(None, None, Some(query)).await
    }

    /// Counts the rows of a table (optionally filtered) or of a raw query.
    ///
    /// Exactly one of `table` and `query` must be given.
    pub async fn count(
        &self,
        table: Option<&str>,
        filter_params: Option<&FilterParams>,
        query: Option<&str>,
    ) -> Result<Option<E::Scalar>> {
        let destination = table.map(|t| self.destination(t));
        let sql = self
            .builder
            .count(destination.as_ref(), filter_params, query)?;
        debug!(sql = %sql, "fetchval");
        self.executor.fetchval(&sql).await.map_err(executor_error)
    }

    /// Streams the rows of a complete query.
    pub fn iterate<'a>(&'a self, query: &'a str) -> RowStream<'a, E::Row> {
        debug!(sql = %query, "iterate");
        self.executor
            .iterate(query)
            .map_err(executor_error)
            .boxed()
    }

    /// Runs a complete query with the chosen executor operation.
    pub async fn raw<'a>(&'a self, query: &'a str, command: Command) -> Result<RawOutput<'a, E>> {
        debug!(sql = %query, %command, "raw");
        let output = match command {
            Command::Fetch => RawOutput::Rows(
                self.executor.fetch(query).await.map_err(executor_error)?,
            ),
            Command::FetchVal => RawOutput::Value(
                self.executor.fetchval(query).await.map_err(executor_error)?,
            ),
            Command::Execute => {
                self.executor.execute(query).await.map_err(executor_error)?;
                RawOutput::Done
            }
            Command::FetchRow => RawOutput::Row(
                self.executor.fetchrow(query).await.map_err(executor_error)?,
            ),
            Command::Iterate => RawOutput::Stream(self.iterate(query)),
        };
        Ok(output)
    }
}

fn executor_error<Err>(error: Err) -> ClientError
where
    Err: std::error::Error + Send + Sync + 'static,
{
    warn!(error = %error, "executor failed");
    ClientError::executor(error)
}
