use super::Column;
use crate::{Error, Result};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A database table and its relationships.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Logical table name; also the key in [`Schema`](crate::Schema)
    pub name: String,

    /// Physical name override; the logical name is used when unset
    #[serde(default)]
    pub physical_name: Option<String>,

    /// Name of the primary key column
    pub primary_key: String,

    /// True when identifying a row requires the entire composite key —
    /// primary key plus every declared foreign key — rather than the
    /// primary key alone
    #[serde(default)]
    pub multi_key: bool,

    /// Foreign key columns, in declared order
    #[serde(default)]
    pub foreign_keys: Vec<String>,

    /// Column definitions by name
    pub columns: IndexMap<String, Column>,

    /// The default SELECT projection; must be non-empty for retrieval
    #[serde(default)]
    pub essential_columns: Vec<String>,

    /// Logical names of parent tables
    #[serde(default)]
    pub parent_tables: Vec<String>,

    /// Logical names of child tables
    #[serde(default)]
    pub children: Vec<String>,

    /// True when the caller supplies the primary key value and the engine
    /// must not expect a database-generated identity
    #[serde(default)]
    pub caller_supplies_primary_key: bool,
}

impl Table {
    pub fn new(name: impl Into<String>, primary_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key: primary_key.into(),
            ..Self::default()
        }
    }

    /// The name used in rendered SQL.
    pub fn sql_name(&self) -> &str {
        self.physical_name.as_deref().unwrap_or(&self.name)
    }

    /// Look up a column definition.
    ///
    /// Referencing a column the table does not define is a schema-mismatch
    /// configuration error.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns.get(name).ok_or_else(|| {
            Error::configuration(format!(
                "table `{}` has no column `{name}`",
                self.name
            ))
        })
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn add_column(&mut self, column: Column) {
        self.columns.insert(column.name.clone(), column);
    }

    /// The identity column, if the table declares one.
    pub fn identity_column(&self) -> Option<&Column> {
        self.columns.values().find(|column| column.identity)
    }

    /// The key columns that identify one row, in fixed order: primary key
    /// first, then (for multi-key tables) each foreign key in declared
    /// order.
    pub fn key_columns(&self) -> Vec<&str> {
        let mut keys = vec![self.primary_key.as_str()];
        if self.multi_key {
            keys.extend(self.foreign_keys.iter().map(String::as_str));
        }
        keys
    }
}
