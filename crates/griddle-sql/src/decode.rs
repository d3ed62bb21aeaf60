//! Dynamic decoding of driver result rows into typed records.

use crate::{Generator, TypeClass};

use chrono::{DateTime, NaiveDateTime, Utc};
use griddle_core::{
    driver::{ColumnInfo, SqlValue},
    Record, Result, Value,
};

/// A typed scan destination for one result column, chosen by classifying
/// the driver-reported type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanTarget {
    pub class: TypeClass,

    /// Nullable targets accept SQL NULL; it decodes to the `Null` marker
    pub nullable: bool,
}

pub(crate) fn scan_targets<G: Generator + ?Sized>(
    gen: &G,
    columns: &[ColumnInfo],
) -> Result<Vec<ScanTarget>> {
    columns
        .iter()
        .map(|column| {
            let class = gen.classify(&column.db_type)?;
            Ok(ScanTarget {
                class,
                nullable: column.nullable,
            })
        })
        .collect()
}

pub(crate) fn decode_row<G: Generator + ?Sized>(
    gen: &G,
    kind: &str,
    columns: &[ColumnInfo],
    row: &[SqlValue],
) -> Result<Record> {
    // Classification failure fails the whole row
    let targets = gen.scan_targets(columns)?;

    if row.len() != columns.len() {
        return Err(griddle_core::err!(
            "row of `{kind}` has {} cells for {} columns",
            row.len(),
            columns.len()
        ));
    }

    let mut record = Record::new(kind);

    for ((column, target), raw) in columns.iter().zip(&targets).zip(row) {
        let value = decode_value(column, *target, raw)?;
        record.set(&column.name, value);
    }

    Ok(record)
}

fn decode_value(column: &ColumnInfo, target: ScanTarget, raw: &SqlValue) -> Result<Value> {
    if raw.is_null() {
        return Ok(Value::Null);
    }

    match target.class {
        TypeClass::String => match raw {
            SqlValue::Text(s) => Ok(Value::String(s.clone())),
            SqlValue::Integer(i) => Ok(Value::String(i.to_string())),
            SqlValue::Real(f) => Ok(Value::String(f.to_string())),
            raw => decode_mismatch(column, raw),
        },
        TypeClass::Number => match raw {
            SqlValue::Integer(i) => Ok(Value::I64(*i)),
            SqlValue::Text(s) => s
                .parse()
                .map(Value::I64)
                .map_err(|_| decode_err(column, raw)),
            raw => decode_mismatch(column, raw),
        },
        TypeClass::Float => match raw {
            SqlValue::Real(f) => Ok(Value::F64(*f)),
            SqlValue::Integer(i) => Ok(Value::F64(*i as f64)),
            SqlValue::Text(s) => s
                .parse()
                .map(Value::F64)
                .map_err(|_| decode_err(column, raw)),
            raw => decode_mismatch(column, raw),
        },
        TypeClass::Timestamp => match raw {
            SqlValue::Text(s) => parse_timestamp(s)
                .map(Value::Timestamp)
                .ok_or_else(|| decode_err(column, raw)),
            SqlValue::Integer(i) => DateTime::<Utc>::from_timestamp(*i, 0)
                .map(Value::Timestamp)
                .ok_or_else(|| decode_err(column, raw)),
            raw => decode_mismatch(column, raw),
        },
        TypeClass::Lob => match raw {
            SqlValue::Blob(bytes) => Ok(Value::Bytes(bytes.clone())),
            SqlValue::Text(s) => Ok(Value::Bytes(s.clone().into_bytes())),
            raw => decode_mismatch(column, raw),
        },
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    // Space-separated form without an offset, as SQLite stores it
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

fn decode_mismatch(column: &ColumnInfo, raw: &SqlValue) -> Result<Value> {
    Err(decode_err(column, raw))
}

fn decode_err(column: &ColumnInfo, raw: &SqlValue) -> griddle_core::Error {
    griddle_core::err!(
        "column `{}` ({}) cannot decode driver value {raw:?}",
        column.name,
        column.db_type
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sqlite;
    use pretty_assertions::assert_eq;

    fn columns() -> Vec<ColumnInfo> {
        vec![
            ColumnInfo::new("PersonID", "INTEGER", false),
            ColumnInfo::new("Name", "TEXT", true),
        ]
    }

    #[test]
    fn decode_row_maps_null_to_marker() {
        let row = vec![SqlValue::Integer(1), SqlValue::Null];
        let record = Sqlite.decode_row("people", &columns(), &row).unwrap();

        assert_eq!(record.get("PersonID"), Some(&Value::I64(1)));
        assert_eq!(record.get("Name"), Some(&Value::Null));
    }

    #[test]
    fn unclassifiable_column_fails_the_row() {
        let columns = vec![ColumnInfo::new("Balance", "MONEY", false)];
        let row = vec![SqlValue::Integer(10)];

        let err = Sqlite.decode_row("accounts", &columns, &row).unwrap_err();
        assert!(err.is_unknown_type());
    }

    #[test]
    fn row_width_mismatch_fails_instead_of_truncating() {
        let row = vec![SqlValue::Integer(1)];
        let err = Sqlite.decode_row("people", &columns(), &row).unwrap_err();
        assert!(err.to_string().contains("1 cells for 2 columns"));

        let row = vec![SqlValue::Integer(1), SqlValue::Null, SqlValue::Integer(9)];
        let err = Sqlite.decode_row("people", &columns(), &row).unwrap_err();
        assert!(err.to_string().contains("3 cells for 2 columns"));
    }

    #[test]
    fn timestamp_decodes_both_sqlite_and_rfc3339_forms() {
        let columns = vec![ColumnInfo::new("CreatedAt", "DATETIME", true)];

        for text in ["2024-05-01 12:30:00", "2024-05-01T12:30:00Z"] {
            let row = vec![SqlValue::Text(text.to_string())];
            let record = Sqlite.decode_row("events", &columns, &row).unwrap();
            let Some(Value::Timestamp(ts)) = record.get("CreatedAt") else {
                panic!("expected timestamp");
            };
            assert_eq!(ts.to_rfc3339(), "2024-05-01T12:30:00+00:00");
        }
    }

    #[test]
    fn number_column_with_text_affinity_parses() {
        let columns = vec![ColumnInfo::new("Age", "INTEGER", false)];
        let row = vec![SqlValue::Text("41".into())];
        let record = Sqlite.decode_row("people", &columns, &row).unwrap();
        assert_eq!(record.get("Age"), Some(&Value::I64(41)));
    }
}
