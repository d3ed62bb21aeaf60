mod column;
pub use column::Column;

mod table;
pub use table::Table;

use crate::{Error, Result};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The schema metadata model: every table the engine may operate on, keyed
/// by logical table name.
///
/// Built once at startup (programmatically or from its JSON form) and
/// treated as read-only afterwards; safe for concurrent read use.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Schema {
    pub tables: IndexMap<String, Table>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a table by logical name.
    ///
    /// An unknown table is a configuration error: the caller referenced a
    /// table the schema does not define.
    pub fn table(&self, name: &str) -> Result<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| Error::configuration(format!("unknown table `{name}`")))
    }

    /// Register a table under its logical name.
    pub fn add_table(&mut self, table: Table) {
        self.tables.insert(table.name.clone(), table);
    }

    /// Load a schema from its serialized JSON document form.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|err| Error::configuration(format!("invalid schema document: {err}")))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| Error::configuration(format!("schema not serializable: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Table {
        let mut table = Table::new("people", "PersonID");
        table.add_column(Column::identity("PersonID", "INTEGER"));
        table.add_column(Column::new("Name", "TEXT"));
        table.essential_columns = vec!["PersonID".into(), "Name".into()];
        table
    }

    #[test]
    fn unknown_table_is_a_configuration_error() {
        let schema = Schema::new();
        let err = schema.table("nope").unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("unknown table"));
    }

    #[test]
    fn json_round_trip() {
        let mut schema = Schema::new();
        schema.add_table(people());

        let json = schema.to_json().unwrap();
        let loaded = Schema::from_json(&json).unwrap();

        let table = loaded.table("people").unwrap();
        assert_eq!(table.primary_key, "PersonID");
        assert!(table.column("PersonID").unwrap().identity);
        assert_eq!(table.essential_columns, vec!["PersonID", "Name"]);
    }
}
