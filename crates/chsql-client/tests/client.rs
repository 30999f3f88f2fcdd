//! Client behavior against a recording executor.

use std::sync::Mutex;

use chsql_client::{Client, ClientConfig, ClientError, Command, Executor, RawOutput};
use chsql_core::{
    row, FilterParams, OperatorRegistry, Pagination, Row, SimpleOperator, SqlBuilder, Value,
};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};

#[derive(Debug, thiserror::Error)]
#[error("connection refused")]
struct MockError;

/// Records every statement and answers with fixed rows.
#[derive(Debug, Default)]
struct MockExecutor {
    statements: Mutex<Vec<String>>,
    rows: Vec<Row>,
    fail: bool,
}

impl MockExecutor {
    fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn record(&self, sql: &str) -> Result<(), MockError> {
        self.statements.lock().unwrap().push(String::from(sql));
        if self.fail {
            Err(MockError)
        } else {
            Ok(())
        }
    }

    fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }
}

impl Executor for MockExecutor {
    type Row = Row;
    type Scalar = u64;
    type Error = MockError;

    async fn execute(&self, sql: &str) -> Result<(), MockError> {
        self.record(sql)
    }

    async fn fetch(&self, sql: &str) -> Result<Vec<Row>, MockError> {
        self.record(sql)?;
        Ok(self.rows.clone())
    }

    async fn fetchrow(&self, sql: &str) -> Result<Option<Row>, MockError> {
        self.record(sql)?;
        Ok(self.rows.first().cloned())
    }

    async fn fetchval(&self, sql: &str) -> Result<Option<u64>, MockError> {
        self.record(sql)?;
        Ok(Some(self.rows.len() as u64))
    }

    fn iterate<'a>(&'a self, sql: &'a str) -> BoxStream<'a, Result<Row, MockError>> {
        match self.record(sql) {
            Ok(()) => stream::iter(self.rows.clone().into_iter().map(Ok)).boxed(),
            Err(e) => stream::once(async move { Err(e) }).boxed(),
        }
    }
}

fn client(executor: MockExecutor) -> Client<MockExecutor> {
    Client::new(executor, "test")
}

#[tokio::test]
async fn create_inserts_into_bound_database() {
    let client = client(MockExecutor::default());
    client
        .create("events", vec![row![1, "a"], row![2, "b"]])
        .await
        .unwrap();
    client
        .create_with_fields("events", vec![row![3, "c"]], &["id", "kind"])
        .await
        .unwrap();

    assert_eq!(
        client.executor().statements(),
        vec![
            "INSERT INTO test.events VALUES (1,'a'),(2,'b')",
            "INSERT INTO test.events (id, kind) VALUES (3,'c')",
        ]
    );
}

#[tokio::test]
async fn create_without_rows_sends_nothing() {
    let client = client(MockExecutor::default());
    let err = client.create("events", Vec::new()).await.unwrap_err();

    assert!(matches!(err, ClientError::Build(chsql_core::Error::EmptyInsert)));
    assert!(client.executor().statements().is_empty());
}

#[tokio::test]
async fn get_list_renders_select() {
    let client = client(MockExecutor::with_rows(vec![row![1], row![2]]));
    let params = FilterParams::new().filter("kind", "click").filter("id__gt", 0);

    let rows = client
        .get_list(
            "events",
            Some(&params),
            Some(Pagination::new().limit(10)),
            Some(&["id"][..]),
            Some(&["-id"][..]),
        )
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(
        client.executor().statements(),
        vec![
            "SELECT id FROM test.events WHERE (kind = 'click') and (id > 0) \
             LIMIT 10 OFFSET 0 ORDER BY id DESC"
        ]
    );
}

#[tokio::test]
async fn get_object_returns_first_row() {
    let client = client(MockExecutor::with_rows(vec![row![7], row![8]]));
    let params = FilterParams::new().filter("id", 7);

    let row = client
        .get_object("events", Some(&params), None)
        .await
        .unwrap();

    assert_eq!(row, Some(vec![Value::Int(7)]));
    assert_eq!(
        client.executor().statements(),
        vec!["SELECT * FROM test.events WHERE (id = 7)"]
    );
}

#[tokio::test]
async fn get_object_unknown_operator_sends_nothing() {
    let client = client(MockExecutor::default());
    let params = FilterParams::new().filter("id__in", 7);

    let err = client
        .get_object("events", Some(&params), None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ClientError::Build(chsql_core::Error::UnknownOperator(ref op)) if op == "in"
    ));
    assert!(client.executor().statements().is_empty());
}

#[tokio::test]
async fn custom_operators_through_builder() {
    let registry = OperatorRegistry::new().with("ne", SimpleOperator::new("!="));
    let client = client(MockExecutor::with_rows(vec![row![1]]))
        .with_builder(SqlBuilder::new(std::sync::Arc::new(registry)));
    let params = FilterParams::new().filter("kind__ne", "view").filter("id__lte", 9);

    client
        .get_list("events", Some(&params), None, None, None)
        .await
        .unwrap();
    client
        .count(Some("events"), Some(&params), None)
        .await
        .unwrap();

    assert_eq!(
        client.executor().statements(),
        vec![
            "SELECT * FROM test.events WHERE (kind != 'view') and (id <= 9)",
            "SELECT count() FROM (SELECT * FROM test.events WHERE (kind != 'view') and \
             (id <= 9)) AS c_t",
        ]
    );
    assert!(client.builder().operators().contains("ne"));
}

#[tokio::test]
async fn get_count_wraps_query() {
    let client = client(MockExecutor::with_rows(vec![row![1], row![2], row![3]]));
    let count = client.get_count("SELECT * FROM test.events").await.unwrap();

    assert_eq!(count, Some(3));
    assert_eq!(
        client.executor().statements(),
        vec!["SELECT count() FROM (SELECT * FROM test.events) AS c_t"]
    );
}

#[tokio::test]
async fn count_by_table() {
    let client = client(MockExecutor::default());
    let params = FilterParams::new().filter("kind", "click");
    client.count(Some("events"), Some(&params), None).await.unwrap();

    assert_eq!(
        client.executor().statements(),
        vec!["SELECT count() FROM (SELECT * FROM test.events WHERE (kind = 'click')) AS c_t"]
    );
}

#[tokio::test]
async fn count_requires_table_or_query() {
    let client = client(MockExecutor::default());
    let err = client.count(None, None, None).await.unwrap_err();

    assert!(matches!(
        err,
        ClientError::Build(chsql_core::Error::InvalidArguments(_))
    ));
}

#[tokio::test]
async fn raw_dispatches_on_command() {
    let client = client(MockExecutor::with_rows(vec![row![1], row![2]]));
    let query = "SELECT id FROM test.events";

    assert!(matches!(
        client.raw(query, Command::Fetch).await.unwrap(),
        RawOutput::Rows(rows) if rows.len() == 2
    ));
    assert!(matches!(
        client.raw(query, Command::FetchRow).await.unwrap(),
        RawOutput::Row(Some(_))
    ));
    assert!(matches!(
        client.raw(query, Command::FetchVal).await.unwrap(),
        RawOutput::Value(Some(2))
    ));
    assert!(matches!(
        client.raw(query, Command::Execute).await.unwrap(),
        RawOutput::Done
    ));

    let RawOutput::Stream(stream) = client.raw(query, "iterate".parse().unwrap()).await.unwrap()
    else {
        panic!("expected a stream");
    };
    let rows: Vec<Row> = stream.try_collect().await.unwrap();
    assert_eq!(rows, vec![row![1], row![2]]);

    assert_eq!(client.executor().statements().len(), 5);
}

#[tokio::test]
async fn executor_errors_are_wrapped() {
    let client = client(MockExecutor::failing());

    let err = client.get_list("events", None, None, None, None).await.unwrap_err();
    assert!(matches!(err, ClientError::Executor(_)));
    assert_eq!(err.to_string(), "executor error: connection refused");

    let mut stream = client.iterate("SELECT 1");
    assert!(matches!(
        stream.next().await,
        Some(Err(ClientError::Executor(_)))
    ));
}

#[test]
fn client_from_config() {
    let config = ClientConfig::new("http://clickhouse:8192", "debug", "debug", "test");
    let client = Client::from_config(MockExecutor::default(), &config);
    assert_eq!(client.database(), "test");
}

#[test]
fn builder_is_shareable_across_threads() {
    let client = std::sync::Arc::new(client(MockExecutor::default()));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let client = std::sync::Arc::clone(&client);
            std::thread::spawn(move || {
                let params = FilterParams::new().filter("id", i);
                client.builder().count(None, None, Some("SELECT 1")).unwrap();
                client
                    .builder()
                    .build(&chsql_core::Statement::select(("test", "t")).filters(params))
                    .unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(
            handle.join().unwrap(),
            format!("SELECT * FROM test.t WHERE (id = {i})")
        );
    }
}
