use crate::{render, BoundInsert, Generator, IdentityStrategy, Placeholder};

use griddle_core::{
    schema::{Column, Table},
    Result, Value,
};

use indexmap::IndexMap;

/// PostgreSQL dialect.
///
/// Overrides the base table where PostgreSQL differs: `$n` placeholders,
/// identity retrieval through a `RETURNING` clause, lowercase
/// driver-reported type names, identity columns, storage type mapping,
/// and advisory locks.
#[derive(Debug, Default, Clone, Copy)]
pub struct Postgres;

impl Generator for Postgres {
    fn placeholder(&self) -> Placeholder {
        Placeholder::Dollar
    }

    fn identity_strategy(&self) -> IdentityStrategy {
        IdentityStrategy::Returning
    }

    fn identity_clause(&self) -> &'static str {
        "GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY"
    }

    fn map_db_type(&self, column: &Column) -> String {
        match column.db_type.as_str() {
            "DATETIME" | "TIMESTAMP" => "TIMESTAMPTZ".to_string(),
            "BLOB" => "BYTEA".to_string(),
            "INTEGER" if column.identity => "BIGINT".to_string(),
            other => other.to_string(),
        }
    }

    // The wire protocol reports lowercase type names

    fn is_string_type(&self, db_type: &str) -> bool {
        matches!(db_type, "text" | "varchar" | "bpchar" | "name" | "uuid")
    }

    fn is_number_type(&self, db_type: &str) -> bool {
        matches!(db_type, "int2" | "int4" | "int8" | "bigint" | "oid")
    }

    fn is_float_type(&self, db_type: &str) -> bool {
        matches!(db_type, "float4" | "float8" | "numeric")
    }

    fn is_timestamp_type(&self, db_type: &str) -> bool {
        matches!(db_type, "timestamp" | "timestamptz" | "date")
    }

    fn is_lob_type(&self, db_type: &str) -> bool {
        matches!(db_type, "bytea")
    }

    fn insert_sql(
        &self,
        table: &Table,
        values: &IndexMap<String, Value>,
        identity: Option<&Column>,
    ) -> Result<BoundInsert> {
        let mut bound = render::insert(self, table, values)?;

        if let Some(identity) = identity {
            bound.sql.push_str(" RETURNING ");
            bound.sql.push_str(&identity.name);
            bound.returns_identity = true;
        }

        Ok(bound)
    }

    fn lock_sql(&self, name: &str) -> Result<String> {
        Ok(format!("SELECT pg_advisory_lock(hashtext('{name}'))"))
    }

    fn release_lock_sql(&self, name: &str) -> Result<String> {
        Ok(format!("SELECT pg_advisory_unlock(hashtext('{name}'))"))
    }
}
