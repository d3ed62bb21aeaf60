use serde::{Deserialize, Serialize};

/// A single column definition.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// The name of the column in the database
    pub name: String,

    /// The database storage type, as the dialect spells it (e.g. `TEXT`,
    /// `VARCHAR`, `TIMESTAMPTZ`)
    pub db_type: String,

    /// Length suffix for sized types; rendered as `TYPE(n)` when set
    #[serde(default)]
    pub length: Option<u32>,

    /// Whether or not the column is nullable
    #[serde(default)]
    pub nullable: bool,

    /// True if the column's value is generated by the database on insert
    #[serde(default)]
    pub identity: bool,

    #[serde(default)]
    pub unique: bool,

    /// True if the column references another table's primary key
    #[serde(default)]
    pub foreign_key: bool,

    /// True if values for this column bind as numbers rather than strings
    #[serde(default)]
    pub numeric: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, db_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            db_type: db_type.into(),
            ..Self::default()
        }
    }

    /// An auto-generated numeric identity column.
    pub fn identity(name: impl Into<String>, db_type: impl Into<String>) -> Self {
        Self {
            identity: true,
            numeric: true,
            ..Self::new(name, db_type)
        }
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn numeric(mut self) -> Self {
        self.numeric = true;
        self
    }

    pub fn foreign_key(mut self) -> Self {
        self.foreign_key = true;
        self
    }
}
