//! # chsql-core
//!
//! Builds ClickHouse `SELECT` and `INSERT` statements from filter maps,
//! projections, pagination and ordering, with every value rendered as an
//! escaped inline literal.
//!
//! This crate provides:
//! - [`Value`] and [`ToValue`] for mapping native values to literals
//! - [`OperatorRegistry`] resolving `field__mnemonic` filter keys
//! - [`SqlBuilder`] and [`Statement`] for assembling statements
//!
//! ## Building statements
//!
//! ```rust
//! use chsql_core::{row, Pagination, SqlBuilder, Statement};
//!
//! let builder = SqlBuilder::default();
//!
//! let select = Statement::select(("test_db", "test_table"))
//!     .filter("a", "x")
//!     .filter("c__lt", 1)
//!     .paginate(Pagination::new());
//! assert_eq!(
//!     builder.build(&select).unwrap(),
//!     "SELECT * FROM test_db.test_table WHERE (a = 'x') and (c < 1) LIMIT 100 OFFSET 0"
//! );
//!
//! let insert = Statement::insert(("test_db", "test_table"), vec![row![1, "a"]])
//!     .fields(&["id", "name"]);
//! assert_eq!(
//!     builder.build(&insert).unwrap(),
//!     "INSERT INTO test_db.test_table (id, name) VALUES (1,'a')"
//! );
//! ```
//!
//! ## SQL injection
//!
//! There is no parameter binding: values are escaped and inlined. Strings are
//! quoted with backslash escapes so no input can close the literal early.
//!
//! ```rust
//! use chsql_core::{SqlBuilder, Statement};
//!
//! let user_input = "'; DROP TABLE users; --";
//! let sql = SqlBuilder::default()
//!     .build(&Statement::select(("db", "users")).filter("name", user_input))
//!     .unwrap();
//!
//! assert_eq!(sql, r"SELECT * FROM db.users WHERE (name = '\'; DROP TABLE users; --')");
//! ```
//!
//! Identifiers are **not** escaped. Database, table, field and ordering names
//! are trusted input from the calling code.

pub mod builder;
mod error;
pub mod operator;
pub mod value;

pub use builder::{
    count_query, Action, Destination, FilterParams, OrderBy, OrderDirection, Pagination,
    SqlBuilder, Statement,
};
pub use error::{Error, Result};
pub use operator::{CompareOp, Operator, OperatorRegistry, SimpleOperator};
pub use value::{Row, ToValue, Value};
