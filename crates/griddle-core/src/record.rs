use crate::Value;

use indexmap::IndexMap;

/// The generic, dynamically-keyed persistence unit.
///
/// A record belongs to a logical table (`kind`), holds column values by
/// name, and tracks which values changed since the last reset so that
/// UPDATE statements can touch only the modified columns. `children` holds
/// nested records by relationship name for recursive saves.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Record {
    kind: String,

    values: IndexMap<String, Value>,

    /// Previous value of every key overwritten since the last reset. Keys
    /// that were absent before the write are recorded with a `Null`
    /// previous value.
    changed: IndexMap<String, Value>,

    /// Child records by relationship name
    pub children: IndexMap<String, Vec<Record>>,

    persisted: bool,
}

impl Record {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            values: IndexMap::new(),
            changed: IndexMap::new(),
            children: IndexMap::new(),
            persisted: false,
        }
    }

    /// The logical table name this record belongs to
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Set a column value.
    ///
    /// Setting a value identical to the current one is a no-op. Otherwise
    /// the previous value (or `Null` if the key was absent) is snapshotted
    /// into the changed set, and a persisted record becomes unpersisted
    /// again.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();

        let previous = match self.values.get(&name) {
            Some(current) if *current == value => return,
            Some(current) => current.clone(),
            None => Value::Null,
        };

        self.changed.entry(name.clone()).or_insert(previous);
        self.values.insert(name, value);
        self.persisted = false;
    }

    /// Set a column to a literal SQL expression.
    ///
    /// The expression is rendered verbatim into generated SQL and never
    /// bound as a parameter.
    pub fn set_raw(&mut self, name: impl Into<String>, expr: impl Into<String>) {
        self.set(name, Value::RawSql(expr.into()));
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Remove a column value, untracked.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.shift_remove(name)
    }

    pub fn values(&self) -> &IndexMap<String, Value> {
        &self.values
    }

    /// Columns modified since the last reset, with their previous values.
    pub fn changed(&self) -> &IndexMap<String, Value> {
        &self.changed
    }

    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    /// Attach a child record under the given relationship name.
    pub fn add_child(&mut self, relation: impl Into<String>, child: Record) {
        self.children.entry(relation.into()).or_default().push(child);
    }

    /// Clear change tracking and mark the record as persisted. Called by
    /// the persistence engine after a successful write or retrieve.
    pub fn reset_changed(&mut self) {
        self.changed.clear();
        self.persisted = true;
    }
}
