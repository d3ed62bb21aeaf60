//! Griddle is a schema-driven persistence engine for generic,
//! dynamically-keyed records. A [`Record`] is a map of column names to
//! values with change tracking and nested children; the engine renders it
//! into dialect-specific SQL through a swappable [`Generator`], executes
//! the SQL over a [`driver::Connection`], and reconstitutes records from
//! result rows.

mod db;
pub use db::Db;

mod hooks;
pub use hooks::{Hook, HookEvent, Hooks};

mod transaction;
pub use transaction::Transaction;

pub use griddle_core::{driver, schema, Error, Record, Result, Schema, Value};
pub use griddle_sql::{Generator, Postgres, Sqlite};
