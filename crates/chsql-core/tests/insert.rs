//! INSERT statement assembly and row encoding.

mod common;
use common::*;

use chrono::NaiveDate;
use chsql_core::{row, Error, SqlBuilder, Statement, Value};

#[test]
#[allow(clippy::approx_constant)]
fn insert_nested_rows() {
    let rows = vec![
        row![1, (NaiveDate::from_ymd_opt(2018, 9, 7).unwrap(), None::<f64>)],
        row![2, (NaiveDate::from_ymd_opt(2018, 9, 8).unwrap(), 3.14)],
    ];
    assert_eq!(
        build(&Statement::insert(destination(), rows)),
        "INSERT INTO test_db.test_table VALUES (1,('2018-09-07',NULL)),(2,('2018-09-08',3.14))"
    );
}

#[test]
fn insert_single_row() {
    assert_eq!(
        build(&Statement::insert(("db", "t"), vec![row![1]])),
        "INSERT INTO db.t VALUES (1)"
    );
    assert_eq!(
        build(&Statement::insert(("db", "t"), vec![row![1]]).fields(&["id"])),
        "INSERT INTO db.t (id) VALUES (1)"
    );
}

#[test]
fn insert_rows_appended() {
    let statement = Statement::insert(("db", "t"), Vec::new())
        .row(row!["a", vec![1, 2]])
        .row(vec![Value::Text(String::from("it's")), Value::Array(vec![])]);
    assert_eq!(
        build(&statement),
        r"INSERT INTO db.t VALUES ('a',[1,2]),('it\'s',[])"
    );
}

#[test]
fn insert_empty_fails() {
    let result = SqlBuilder::default().build(&Statement::insert(("db", "t"), Vec::new()));
    assert_eq!(result, Err(Error::EmptyInsert));
}
