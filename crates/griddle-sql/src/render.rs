//! Fragment renderers backing the [`Generator`] default methods.
//!
//! Each function takes the generator so overridden capabilities (placeholder
//! style, type classification, identity clause) flow through even when the
//! dialect keeps the base rendering.

use crate::{BoundInsert, BoundQuery, BoundUpdate, Generator, TypeClass};

use griddle_core::{
    schema::{Column, Table},
    Error, Record, Result, Value,
};

use indexmap::IndexMap;

/// Render `name TYPE [IDENTITY-CLAUSE] [NOT NULL|NULL] [UNIQUE]`.
pub(crate) fn create_column<G: Generator + ?Sized>(gen: &G, column: &Column) -> String {
    let ty = gen.map_db_type(column);
    assert!(
        !ty.is_empty(),
        "column `{}` resolved to an empty database type",
        column.name
    );

    let mut sql = format!("{} {}", column.name, ty);

    if let Some(length) = column.length {
        if length > 0 {
            sql.push_str(&format!("({length})"));
        }
    }

    if column.identity {
        sql.push(' ');
        sql.push_str(gen.identity_clause());
        return sql;
    }

    sql.push_str(if column.nullable { " NULL" } else { " NOT NULL" });

    if column.unique {
        sql.push_str(" UNIQUE");
    }

    sql
}

pub(crate) fn create_table<G: Generator + ?Sized>(gen: &G, table: &Table) -> String {
    let defs: Vec<String> = table
        .columns
        .values()
        .map(|column| gen.create_column_sql(column))
        .collect();

    format!("CREATE TABLE {} ({})", table.sql_name(), defs.join(", "))
}

pub(crate) fn insert<G: Generator + ?Sized>(
    gen: &G,
    table: &Table,
    values: &IndexMap<String, Value>,
) -> Result<BoundInsert> {
    let mut columns = Vec::with_capacity(values.len());
    let mut exprs = Vec::with_capacity(values.len());
    let mut params = vec![];

    for (name, value) in values {
        table.column(name)?;
        columns.push(name.clone());

        match value {
            // Literal SQL expressions are inlined, never bound
            Value::RawSql(expr) => exprs.push(expr.clone()),
            value => {
                params.push(value.clone());
                exprs.push(gen.placeholder().render(params.len()));
            }
        }
    }

    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table.sql_name(),
        columns.join(", "),
        exprs.join(", ")
    );

    Ok(BoundInsert {
        sql,
        columns,
        params,
        returns_identity: false,
    })
}

pub(crate) fn update<G: Generator + ?Sized>(
    gen: &G,
    table: &Table,
    record: &Record,
) -> Result<BoundUpdate> {
    // Minimal update when changes are tracked, full update otherwise
    let set_columns: Vec<&str> = if record.changed().is_empty() {
        record.values().keys().map(String::as_str).collect()
    } else {
        record
            .changed()
            .keys()
            .filter(|name| record.contains(name))
            .map(String::as_str)
            .collect()
    };

    let mut assignments = vec![];
    let mut set_params = vec![];
    let mut n = 0;

    for name in set_columns {
        let column = table.column(name)?;

        // Identity columns are never part of a SET list
        if column.identity {
            continue;
        }

        let value = record
            .get(name)
            .expect("set column values come from the record itself");

        let is_timestamp = gen.classify(&column.db_type).ok() == Some(TypeClass::Timestamp);

        match value {
            Value::RawSql(expr) => assignments.push(format!("{name} = {expr}")),
            value if is_timestamp && value.is_null_or_zero_time() => {
                assignments.push(format!("{name} = NULL"));
            }
            value => {
                n += 1;
                set_params.push(value.clone());
                assignments.push(format!("{name} = {}", gen.placeholder().render(n)));
            }
        }
    }

    if assignments.is_empty() {
        return Err(Error::configuration(format!(
            "update of `{}` has nothing to set",
            record.kind()
        )));
    }

    let (where_sql, where_params) = key_clause(gen, table, record, n)?;

    let sql = format!(
        "UPDATE {} SET {} WHERE {}",
        table.sql_name(),
        assignments.join(", "),
        where_sql
    );

    Ok(BoundUpdate {
        sql,
        set_params,
        where_params,
    })
}

pub(crate) fn retrieve<G: Generator + ?Sized>(
    gen: &G,
    table: &Table,
    filter: &Record,
) -> Result<BoundQuery> {
    if table.essential_columns.is_empty() {
        return Err(Error::configuration(format!(
            "table `{}` has no essential columns; retrieval needs a projection",
            table.name
        )));
    }

    let mut sql = format!(
        "SELECT {} FROM {}",
        table.essential_columns.join(", "),
        table.sql_name()
    );

    let (clause, params) = filter_clause(gen, table, filter)?;
    if let Some(clause) = clause {
        sql.push_str(" WHERE ");
        sql.push_str(&clause);
    }

    Ok(BoundQuery { sql, params })
}

pub(crate) fn delete<G: Generator + ?Sized>(
    gen: &G,
    table: &Table,
    filter: &Record,
) -> Result<BoundQuery> {
    let mut sql = format!("DELETE FROM {}", table.sql_name());

    let (clause, params) = filter_clause(gen, table, filter)?;
    if let Some(clause) = clause {
        sql.push_str(" WHERE ");
        sql.push_str(&clause);
    }

    Ok(BoundQuery { sql, params })
}

/// Equality-AND clause over every value in a query-by-example record.
/// Returns `None` when the filter is empty.
fn filter_clause<G: Generator + ?Sized>(
    gen: &G,
    table: &Table,
    filter: &Record,
) -> Result<(Option<String>, Vec<Value>)> {
    if filter.values().is_empty() {
        return Ok((None, vec![]));
    }

    let mut terms = vec![];
    let mut params = vec![];

    for (name, value) in filter.values() {
        table.column(name)?;

        match value {
            Value::Null => terms.push(format!("{name} IS NULL")),
            Value::RawSql(expr) => terms.push(format!("{name} = {expr}")),
            value => {
                params.push(value.clone());
                terms.push(format!("{name} = {}", gen.placeholder().render(params.len())));
            }
        }
    }

    Ok((Some(terms.join(" AND ")), params))
}

/// Row-identifying clause for UPDATE: primary key first, then (for
/// multi-key tables) each foreign key in declared order. Every key value
/// must be present on the record.
fn key_clause<G: Generator + ?Sized>(
    gen: &G,
    table: &Table,
    record: &Record,
    placeholder_offset: usize,
) -> Result<(String, Vec<Value>)> {
    let mut terms = vec![];
    let mut params = vec![];

    for name in table.key_columns() {
        table.column(name)?;

        let Some(value) = record.get(name) else {
            return Err(Error::configuration(format!(
                "record of `{}` is missing key value `{name}`",
                record.kind()
            )));
        };

        params.push(value.clone());
        terms.push(format!(
            "{name} = {}",
            gen.placeholder().render(placeholder_offset + params.len())
        ));
    }

    Ok((terms.join(" AND "), params))
}
