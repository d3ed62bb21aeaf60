use crate::{Db, HookEvent};

use griddle_core::{err, Error, Record, Result, Value};
use griddle_sql::IdentityStrategy;

impl Db {
    /// Insert a record, retrieving and writing back the generated
    /// identity unless the table declares that the caller supplies it.
    ///
    /// Returns the number of rows affected; zero rows is the
    /// distinguishable no-result error, not success.
    pub async fn insert(&mut self, record: &mut Record) -> Result<u64> {
        self.flush_pending_rollback().await?;

        let schema = self.schema.clone();
        let table = schema.table(record.kind())?;

        self.hooks
            .fire(HookEvent::BeforeCreate, table.sql_name(), &schema, record)?;

        // Ask for the generated identity only when the table can produce
        // one and the caller has not supplied it
        let identity = if table.caller_supplies_primary_key {
            None
        } else {
            table
                .identity_column()
                .filter(|column| !record.contains(&column.name))
        };

        let bound = self
            .generator
            .insert_sql(table, record.values(), identity)?;

        let rows_affected = if bound.returns_identity {
            // RETURNING-style dialects yield the identity as a single row
            let rows = self
                .connection
                .query(&bound.sql, &bound.params)
                .await
                .map_err(|e| e.context(err!("insert into `{}` failed", table.name)))?;

            let Some(row) = rows.rows.first() else {
                return Err(Error::no_result("insert"));
            };

            if let (Some(identity), Some(cell)) = (identity, row.first()) {
                record.set(&identity.name, decode_identity(cell)?);
            }

            rows.rows.len() as u64
        } else {
            let response = self
                .connection
                .exec(&bound.sql, &bound.params)
                .await
                .map_err(|e| e.context(err!("insert into `{}` failed", table.name)))?;

            if response.rows_affected == 0 {
                return Err(Error::no_result("insert"));
            }

            if let Some(identity) = identity {
                match self.generator.identity_strategy() {
                    IdentityStrategy::LastInsertId => {
                        let id = response.last_insert_id.ok_or_else(|| {
                            err!("driver reported no insert id for `{}`", table.name)
                        })?;
                        record.set(&identity.name, id);
                    }
                    IdentityStrategy::Returning => {
                        // The dialect renders a returning insert, handled above
                    }
                }
            }

            response.rows_affected
        };

        self.hooks
            .fire(HookEvent::AfterCreate, table.sql_name(), &schema, record)?;

        record.reset_changed();
        Ok(rows_affected)
    }

    /// Update a record in place, touching only the changed columns when
    /// change tracking is populated.
    pub async fn update(&mut self, record: &mut Record) -> Result<u64> {
        self.flush_pending_rollback().await?;

        let schema = self.schema.clone();
        let table = schema.table(record.kind())?;

        self.hooks
            .fire(HookEvent::BeforeUpdate, table.sql_name(), &schema, record)?;

        let bound = self.generator.update_sql(table, record)?;
        let params = bound.params(self.generator.update_bind_order());

        let response = self
            .connection
            .exec(&bound.sql, &params)
            .await
            .map_err(|e| e.context(err!("update of `{}` failed", table.name)))?;

        if response.rows_affected == 0 {
            return Err(Error::no_result("update"));
        }

        self.hooks
            .fire(HookEvent::AfterUpdate, table.sql_name(), &schema, record)?;

        record.reset_changed();
        Ok(response.rows_affected)
    }

    /// Delete the rows matching the record's values, treated as a
    /// query-by-example filter. Zero matches is not an error.
    pub async fn delete(&mut self, record: &mut Record) -> Result<u64> {
        self.flush_pending_rollback().await?;

        let schema = self.schema.clone();
        let table = schema.table(record.kind())?;

        self.hooks
            .fire(HookEvent::BeforeDelete, table.sql_name(), &schema, record)?;

        let bound = self.generator.delete_sql(table, record)?;

        let response = self
            .connection
            .exec(&bound.sql, &bound.params)
            .await
            .map_err(|e| e.context(err!("delete from `{}` failed", table.name)))?;

        self.hooks
            .fire(HookEvent::AfterDelete, table.sql_name(), &schema, record)?;

        // This representation is no longer live; nothing left to diff
        record.reset_changed();
        Ok(response.rows_affected)
    }

    /// Insert or update, decided by whether the primary key column is
    /// present in the record's values.
    ///
    /// Saving an already-persisted, unmodified record is a no-op that
    /// reports zero rows affected.
    pub async fn save(&mut self, record: &mut Record) -> Result<u64> {
        if record.is_persisted() && record.changed().is_empty() {
            return Ok(0);
        }

        let schema = self.schema.clone();
        let primary_key = schema.table(record.kind())?.primary_key.clone();
        if record.contains(&primary_key) {
            self.update(record).await
        } else {
            self.insert(record).await
        }
    }

    /// Retrieve the first record matching the filter, or `None`.
    ///
    /// "No match" is a valid outcome, distinct from a failed query.
    pub async fn retrieve(
        &mut self,
        kind: &str,
        filter: &[(&str, Value)],
    ) -> Result<Option<Record>> {
        let records = self.retrieve_many(kind, filter).await?;
        Ok(records.into_iter().next())
    }

    /// Retrieve every record matching the filter.
    pub async fn retrieve_many(
        &mut self,
        kind: &str,
        filter: &[(&str, Value)],
    ) -> Result<Vec<Record>> {
        let mut example = Record::new(kind);
        for (name, value) in filter {
            example.set(*name, value.clone());
        }
        self.retrieve_with(&example).await
    }

    /// Retrieve by a prebuilt query-by-example record.
    pub(crate) async fn retrieve_with(&mut self, filter: &Record) -> Result<Vec<Record>> {
        self.flush_pending_rollback().await?;

        let schema = self.schema.clone();
        let table = schema.table(filter.kind())?;

        let bound = self.generator.retrieve_sql(table, filter)?;

        let rows = self
            .connection
            .query(&bound.sql, &bound.params)
            .await
            .map_err(|e| e.context(err!("retrieve from `{}` failed", table.name)))?;

        let mut records = Vec::with_capacity(rows.rows.len());
        for row in &rows.rows {
            let mut record = self
                .generator
                .decode_row(filter.kind(), &rows.columns, row)?;
            // Decoded records start persisted with no pending changes
            record.reset_changed();
            records.push(record);
        }

        Ok(records)
    }

    /// Retrieve by the record's values; insert it when nothing matches.
    ///
    /// On a match the record is replaced with the stored row and zero
    /// rows affected is reported.
    pub async fn find_or_create(&mut self, record: &mut Record) -> Result<u64> {
        let mut filter = Record::new(record.kind());
        for (name, value) in record.values() {
            filter.set(name, value.clone());
        }

        match self.retrieve_with(&filter).await?.into_iter().next() {
            Some(existing) => {
                *record = existing;
                Ok(0)
            }
            None => self.insert(record).await,
        }
    }

    /// Update the stored row identified by the record's key columns, or
    /// insert when no such row exists (or the keys are not yet set).
    pub async fn create_or_update(&mut self, record: &mut Record) -> Result<u64> {
        let schema = self.schema.clone();
        let table = schema.table(record.kind())?;

        let keyed = table
            .key_columns()
            .iter()
            .all(|name| record.contains(name));

        if keyed {
            let mut filter = Record::new(record.kind());
            for name in table.key_columns() {
                filter.set(name, record.get(name).cloned().unwrap_or_default());
            }

            if !self.retrieve_with(&filter).await?.is_empty() {
                return self.update(record).await;
            }
        }

        self.insert(record).await
    }
}

fn decode_identity(cell: &griddle_core::driver::SqlValue) -> Result<Value> {
    use griddle_core::driver::SqlValue;

    match cell {
        SqlValue::Integer(i) => Ok(Value::I64(*i)),
        SqlValue::Text(s) => Ok(Value::String(s.clone())),
        cell => Err(err!("cannot decode identity value {cell:?}")),
    }
}
