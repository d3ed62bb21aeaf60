use griddle_core::{Record, Result, Schema};

use std::collections::HashMap;

/// A lifecycle hook: given the schema and the record the surrounding
/// operation is about to touch (or just touched). A hook error aborts the
/// operation.
pub type Hook = Box<dyn Fn(&Schema, &mut Record) -> Result<()> + Send + Sync>;

/// The six lifecycle events hooks can attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookEvent {
    BeforeCreate,
    AfterCreate,
    BeforeUpdate,
    AfterUpdate,
    BeforeDelete,
    AfterDelete,
}

/// Registry of lifecycle hooks, keyed by event and physical table name.
#[derive(Default)]
pub struct Hooks {
    hooks: HashMap<(HookEvent, String), Hook>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook for the given event and physical table name. At
    /// most one hook per event and table; a second registration replaces
    /// the first.
    pub fn register(
        &mut self,
        event: HookEvent,
        table: impl Into<String>,
        hook: impl Fn(&Schema, &mut Record) -> Result<()> + Send + Sync + 'static,
    ) {
        self.hooks.insert((event, table.into()), Box::new(hook));
    }

    /// Run the hook for the event and table, if one is registered.
    pub fn fire(
        &self,
        event: HookEvent,
        table: &str,
        schema: &Schema,
        record: &mut Record,
    ) -> Result<()> {
        match self.hooks.get(&(event, table.to_string())) {
            Some(hook) => hook(schema, record),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("registered", &self.hooks.len())
            .finish()
    }
}
