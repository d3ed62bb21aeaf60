use crate::{decode, render, ScanTarget};

use griddle_core::{
    driver::{ColumnInfo, SqlValue},
    schema::{Column, Table},
    Record, Result, Value,
};

use indexmap::IndexMap;
use std::fmt::Debug;

/// How a dialect spells bind-parameter placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// `?`
    Question,

    /// `?1`, `?2`, ...
    QuestionNumbered,

    /// `$1`, `$2`, ...
    Dollar,

    /// `:name1`, `:name2`, ...
    Named,
}

impl Placeholder {
    /// Render the placeholder for the `n`th bound argument (1-based).
    pub fn render(self, n: usize) -> String {
        match self {
            Self::Question => "?".to_string(),
            Self::QuestionNumbered => format!("?{n}"),
            Self::Dollar => format!("${n}"),
            Self::Named => format!(":name{n}"),
        }
    }
}

/// The order in which a dialect's driver expects UPDATE bind arguments.
///
/// Most drivers take SET arguments followed by WHERE arguments; a few
/// expect the reverse. This is declared per dialect, not assumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOrder {
    SetThenWhere,
    WhereThenSet,
}

/// The channel through which a generated identity value is retrieved
/// after an INSERT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityStrategy {
    /// The driver reports the last inserted id on the execute response
    LastInsertId,

    /// The INSERT carries a RETURNING clause and yields a single row
    Returning,
}

/// One of the five database type categories a dialect classifies driver
/// type names into. The four non-LOB categories are mutually exclusive for
/// any given dialect's real type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass {
    String,
    Number,
    Float,
    Timestamp,
    Lob,
}

/// Transaction control operations rendered by the dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionOp {
    Begin,
    Commit,
    Rollback,
}

/// A rendered INSERT with its ordered bind arguments.
#[derive(Debug, PartialEq)]
pub struct BoundInsert {
    pub sql: String,

    /// Column names in rendered order, raw-SQL columns included
    pub columns: Vec<String>,

    /// Bind arguments in placeholder order; raw-SQL values are inlined
    /// into the statement and never appear here
    pub params: Vec<Value>,

    /// True when the statement yields a single identity row instead of a
    /// plain execute response
    pub returns_identity: bool,
}

/// A rendered UPDATE. SET and WHERE arguments are kept separate so the
/// engine can pass them in the dialect's declared [`BindOrder`].
#[derive(Debug, PartialEq)]
pub struct BoundUpdate {
    pub sql: String,
    pub set_params: Vec<Value>,
    pub where_params: Vec<Value>,
}

impl BoundUpdate {
    /// Flatten the bind arguments in the given order.
    pub fn params(&self, order: BindOrder) -> Vec<Value> {
        let (first, second) = match order {
            BindOrder::SetThenWhere => (&self.set_params, &self.where_params),
            BindOrder::WhereThenSet => (&self.where_params, &self.set_params),
        };
        first.iter().chain(second.iter()).cloned().collect()
    }
}

/// A rendered SELECT or DELETE with its bind arguments.
#[derive(Debug, PartialEq)]
pub struct BoundQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

/// The dialect capability table.
///
/// One implementation of this trait is one SQL dialect. The default
/// methods form the base dialect: ANSI-ish SQL, `?` placeholders,
/// driver-reported last-insert-id, no advisory locks. A dialect overrides
/// only the operations where its SQL differs, keeping the rest.
pub trait Generator: Debug + Send + Sync {
    /// Placeholder style for bind parameters
    fn placeholder(&self) -> Placeholder {
        Placeholder::Question
    }

    /// Order in which UPDATE bind arguments are passed to the driver
    fn update_bind_order(&self) -> BindOrder {
        BindOrder::SetThenWhere
    }

    /// How a generated identity is retrieved after INSERT
    fn identity_strategy(&self) -> IdentityStrategy {
        IdentityStrategy::LastInsertId
    }

    /// The clause appended to an identity column definition
    fn identity_clause(&self) -> &'static str {
        "PRIMARY KEY AUTOINCREMENT"
    }

    /// Map a column's declared type to the dialect's spelling. The base
    /// dialect emits the declared type unchanged.
    fn map_db_type(&self, column: &Column) -> String {
        column.db_type.clone()
    }

    fn is_string_type(&self, db_type: &str) -> bool {
        matches!(db_type, "TEXT" | "VARCHAR" | "CHAR" | "CHARACTER")
    }

    fn is_number_type(&self, db_type: &str) -> bool {
        matches!(db_type, "INTEGER" | "INT" | "BIGINT" | "SMALLINT")
    }

    fn is_float_type(&self, db_type: &str) -> bool {
        matches!(db_type, "REAL" | "FLOAT" | "DOUBLE" | "NUMERIC" | "DECIMAL")
    }

    fn is_timestamp_type(&self, db_type: &str) -> bool {
        matches!(db_type, "TIMESTAMP" | "DATETIME" | "DATE")
    }

    fn is_lob_type(&self, db_type: &str) -> bool {
        matches!(db_type, "BLOB" | "BYTEA" | "CLOB")
    }

    /// Classify a driver-reported type name into one category.
    ///
    /// There is no silent default: a name no category recognizes fails
    /// with an unrecognized-type error, which is fatal for row decoding.
    fn classify(&self, db_type: &str) -> Result<TypeClass> {
        if self.is_lob_type(db_type) {
            Ok(TypeClass::Lob)
        } else if self.is_timestamp_type(db_type) {
            Ok(TypeClass::Timestamp)
        } else if self.is_float_type(db_type) {
            Ok(TypeClass::Float)
        } else if self.is_number_type(db_type) {
            Ok(TypeClass::Number)
        } else if self.is_string_type(db_type) {
            Ok(TypeClass::String)
        } else {
            Err(griddle_core::Error::unknown_type(db_type))
        }
    }

    /// Render one column definition fragment:
    /// `name TYPE [IDENTITY-CLAUSE] [NOT NULL|NULL] [UNIQUE]`.
    ///
    /// Panics if the mapped type resolves to an empty string; that is a
    /// schema bug, not a runtime condition.
    fn create_column_sql(&self, column: &Column) -> String {
        render::create_column(self, column)
    }

    /// Render a full CREATE TABLE statement from table metadata.
    fn create_table_sql(&self, table: &Table) -> String {
        render::create_table(self, table)
    }

    /// Render a bound INSERT for the given flat column→value map.
    ///
    /// `identity` names the column whose generated value the caller wants
    /// back, for dialects that retrieve it via a RETURNING-style clause.
    fn insert_sql(
        &self,
        table: &Table,
        values: &IndexMap<String, Value>,
        identity: Option<&Column>,
    ) -> Result<BoundInsert> {
        let _ = identity;
        render::insert(self, table, values)
    }

    /// Render a bound UPDATE: SET list from the record's changed values
    /// (or every non-identity column when nothing is tracked), WHERE
    /// clause from the table's key columns.
    fn update_sql(&self, table: &Table, record: &Record) -> Result<BoundUpdate> {
        render::update(self, table, record)
    }

    /// Render a bound SELECT of the table's essential columns, filtered
    /// by equality on the query-by-example record's values.
    fn retrieve_sql(&self, table: &Table, filter: &Record) -> Result<BoundQuery> {
        render::retrieve(self, table, filter)
    }

    /// Render a bound DELETE using the same filter algorithm as retrieve.
    /// An empty filter renders no WHERE clause at all.
    fn delete_sql(&self, table: &Table, filter: &Record) -> Result<BoundQuery> {
        render::delete(self, table, filter)
    }

    /// Allocate typed scan destinations for the driver-reported result
    /// columns. Fails on the first unclassifiable column type.
    fn scan_targets(&self, columns: &[ColumnInfo]) -> Result<Vec<ScanTarget>> {
        decode::scan_targets(self, columns)
    }

    /// Decode one raw driver row into a record of typed values. SQL NULL
    /// maps to the explicit `Null` marker.
    fn decode_row(&self, kind: &str, columns: &[ColumnInfo], row: &[SqlValue]) -> Result<Record> {
        decode::decode_row(self, kind, columns, row)
    }

    /// Transaction control SQL.
    fn transaction_sql(&self, op: TransactionOp) -> &'static str {
        match op {
            TransactionOp::Begin => "BEGIN",
            TransactionOp::Commit => "COMMIT",
            TransactionOp::Rollback => "ROLLBACK",
        }
    }

    /// SQL acquiring the named advisory lock. Dialects without advisory
    /// locks fail loudly rather than silently doing nothing.
    fn lock_sql(&self, name: &str) -> Result<String> {
        let _ = name;
        Err(griddle_core::err!("dialect has no advisory lock support"))
    }

    /// SQL releasing the named advisory lock.
    fn release_lock_sql(&self, name: &str) -> Result<String> {
        let _ = name;
        Err(griddle_core::err!("dialect has no advisory lock support"))
    }
}
