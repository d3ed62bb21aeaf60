use crate::Db;

use griddle_core::Result;
use griddle_sql::TransactionOp;

use std::ops::{Deref, DerefMut};

/// An active database transaction around flat record operations.
///
/// Borrows `&mut Db` for its lifetime, preventing concurrent use of the
/// same handle while the transaction is open. Operations run through the
/// guard via `Deref`.
///
/// Dropping the guard without calling [`commit`](Self::commit) or
/// [`rollback`](Self::rollback) cannot make an asynchronous request;
/// instead the rollback is recorded and issued before the next operation
/// on the handle.
pub struct Transaction<'db> {
    db: &'db mut Db,

    /// Whether commit or rollback has been called
    finished: bool,
}

impl<'db> Transaction<'db> {
    pub(crate) async fn begin(db: &'db mut Db) -> Result<Transaction<'db>> {
        db.flush_pending_rollback().await?;
        db.exec_transaction(TransactionOp::Begin).await?;
        Ok(Transaction {
            db,
            finished: false,
        })
    }

    /// Commit the transaction.
    pub async fn commit(mut self) -> Result<()> {
        self.db.exec_transaction(TransactionOp::Commit).await?;
        self.finished = true;
        Ok(())
    }

    /// Roll back the transaction.
    pub async fn rollback(mut self) -> Result<()> {
        self.db.exec_transaction(TransactionOp::Rollback).await?;
        self.finished = true;
        Ok(())
    }
}

impl Deref for Transaction<'_> {
    type Target = Db;

    fn deref(&self) -> &Db {
        self.db
    }
}

impl DerefMut for Transaction<'_> {
    fn deref_mut(&mut self) -> &mut Db {
        self.db
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.db.pending_rollback = true;
        }
    }
}
