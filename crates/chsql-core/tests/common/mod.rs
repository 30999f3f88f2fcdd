//! Shared helpers for the statement builder tests.

#![allow(dead_code)]

use chsql_core::{Destination, SqlBuilder, Statement};

pub fn destination() -> Destination {
    Destination::new("test_db", "test_table")
}

pub fn build(statement: &Statement) -> String {
    SqlBuilder::default()
        .build(statement)
        .expect("statement should build")
}
