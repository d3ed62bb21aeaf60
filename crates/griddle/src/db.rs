mod crud;
mod graph;

use crate::{Hooks, Transaction};

use griddle_core::{driver::Connection, err, Error, Result, Schema};
use griddle_sql::{Generator, TransactionOp};

use std::sync::Arc;

/// A database handle: the schema metadata, the dialect capability table,
/// and one connection.
///
/// All operations run on the caller's task and take `&mut self`; the
/// handle holds no shared mutable state beyond the read-only schema and
/// generator, both of which are cheap to share across handles.
pub struct Db {
    pub(crate) schema: Arc<Schema>,
    pub(crate) generator: Arc<dyn Generator>,
    pub(crate) connection: Box<dyn Connection>,
    pub(crate) hooks: Hooks,

    /// Set when a dropped [`Transaction`] guard could not roll back
    /// immediately; the rollback is issued before the next operation.
    pub(crate) pending_rollback: bool,
}

impl Db {
    pub fn new(
        schema: Arc<Schema>,
        generator: Arc<dyn Generator>,
        connection: Box<dyn Connection>,
    ) -> Self {
        Self {
            schema,
            generator,
            connection,
            hooks: Hooks::new(),
            pending_rollback: false,
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn hooks_mut(&mut self) -> &mut Hooks {
        &mut self.hooks
    }

    /// Begin an explicit transaction scope for the operations that follow.
    ///
    /// If the guard is dropped without a commit, the transaction rolls
    /// back before the next operation on this handle.
    pub async fn begin(&mut self) -> Result<Transaction<'_>> {
        Transaction::begin(self).await
    }

    /// Create every table the schema declares.
    pub async fn create_tables(&mut self) -> Result<()> {
        self.flush_pending_rollback().await?;

        let schema = self.schema.clone();
        for table in schema.tables.values() {
            let sql = self.generator.create_table_sql(table);
            self.connection
                .exec(&sql, &[])
                .await
                .map_err(|e| e.context(err!("create table `{}` failed", table.name)))?;
        }
        Ok(())
    }

    /// Acquire the named advisory lock.
    ///
    /// Dialect-defined semantics: success means the statement affected a
    /// row, which some dialects use to signal lock acquisition. Dialects
    /// without advisory locks fail here rather than silently no-op.
    pub async fn get_lock(&mut self, name: &str) -> Result<()> {
        self.flush_pending_rollback().await?;

        let sql = self.generator.lock_sql(name)?;
        let response = self.connection.exec(&sql, &[]).await?;
        if response.rows_affected == 0 {
            return Err(Error::no_result("get lock"));
        }
        Ok(())
    }

    /// Release the named advisory lock.
    pub async fn release_lock(&mut self, name: &str) -> Result<()> {
        self.flush_pending_rollback().await?;

        let sql = self.generator.release_lock_sql(name)?;
        let response = self.connection.exec(&sql, &[]).await?;
        if response.rows_affected == 0 {
            return Err(Error::no_result("release lock"));
        }
        Ok(())
    }

    pub(crate) async fn exec_transaction(&mut self, op: TransactionOp) -> Result<()> {
        let sql = self.generator.transaction_sql(op);
        self.connection.exec(sql, &[]).await?;
        Ok(())
    }

    /// Issue a rollback deferred by a dropped [`Transaction`] guard.
    pub(crate) async fn flush_pending_rollback(&mut self) -> Result<()> {
        if self.pending_rollback {
            self.pending_rollback = false;
            self.exec_transaction(TransactionOp::Rollback).await?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db")
            .field("generator", &self.generator)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}
