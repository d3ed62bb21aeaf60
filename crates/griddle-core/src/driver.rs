use crate::{async_trait, Result, Value};

use std::fmt::Debug;

/// The raw, untyped value a driver reports for one result column, before
/// dialect type classification turns it into a [`Value`].
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl SqlValue {
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Per-column metadata the driver reports for a result set. The `db_type`
/// name is the seam across which all dialect type classification operates.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,

    /// The driver-reported database type name, case-sensitive
    pub db_type: String,

    pub nullable: bool,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, db_type: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            db_type: db_type.into(),
            nullable,
        }
    }
}

/// Outcome of a statement that does not return rows.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExecResponse {
    pub rows_affected: u64,

    /// The generated identity of the inserted row, for dialects that
    /// report it through the driver rather than a RETURNING clause
    pub last_insert_id: Option<i64>,
}

/// A fully materialized result set.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Rows {
    pub columns: Vec<ColumnInfo>,
    pub rows: Vec<Vec<SqlValue>>,
}

/// The connection abstraction the persistence engine runs against.
///
/// Implementations wrap a concrete database driver. The engine only ever
/// hands a connection rendered SQL text plus ordered bind arguments; wire
/// protocol, pooling, and statement caching are the implementation's
/// concern. Both methods take `&mut self` — a connection serves one
/// operation at a time, and dropping the returned future cancels the
/// operation as far as the driver allows.
#[async_trait]
pub trait Connection: Debug + Send {
    /// Execute a statement that returns no rows.
    async fn exec(&mut self, sql: &str, params: &[Value]) -> Result<ExecResponse>;

    /// Execute a query and materialize every result row, along with the
    /// driver-reported column metadata needed to decode them.
    async fn query(&mut self, sql: &str, params: &[Value]) -> Result<Rows>;
}
