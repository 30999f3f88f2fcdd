//! # chsql-client
//!
//! Async access to ClickHouse tables built on `chsql-core`.
//!
//! The network side is abstracted behind [`Executor`]: anything that can run
//! SQL text and return rows. [`Client`] binds an executor to a database name
//! and turns table names, filters, pagination and rows into statements:
//!
//! - [`Client::create`] inserts rows
//! - [`Client::get_list`] and [`Client::get_object`] select rows
//! - [`Client::get_count`] and [`Client::count`] count rows
//! - [`Client::raw`] runs a prepared query with a chosen [`Command`]

mod client;
mod config;
mod error;
mod executor;

pub use client::{Client, RawOutput, RowStream};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use executor::{Command, Executor};
