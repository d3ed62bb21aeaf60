use crate::Db;

use async_recursion::async_recursion;
use griddle_core::{err, Error, Record, Result};

impl Db {
    /// Save a root record and its nested children, depth-first, in one
    /// transaction.
    ///
    /// The root is saved before its children; the parent's primary key
    /// value (possibly just generated) is propagated into every child
    /// whose table declares that column before the child is saved. Any
    /// failure at any depth rolls the whole tree back. The transaction
    /// runs through a [`Transaction`](crate::Transaction) guard, so a
    /// panic or a dropped future mid-save leaves a deferred rollback
    /// behind instead of an open transaction.
    pub async fn save_graph(&mut self, record: &mut Record) -> Result<u64> {
        let mut tx = self.begin().await?;

        match tx.save_tree(record).await {
            Ok(rows) => {
                tx.commit().await?;
                Ok(rows)
            }
            Err(cause) => {
                // Roll back the entire tree; the original failure wins
                // over any rollback failure
                let _ = tx.rollback().await;
                Err(cause.context(err!("nested save rolled back")))
            }
        }
    }

    #[async_recursion]
    async fn save_tree(&mut self, record: &mut Record) -> Result<u64> {
        let mut rows = self.save(record).await?;

        let schema = self.schema.clone();
        let primary_key = schema.table(record.kind())?.primary_key.clone();
        let key_value = record.get(&primary_key).cloned();

        let relations: Vec<String> = record.children.keys().cloned().collect();
        for relation in relations {
            let child_table = schema.table(&relation)?;
            let propagate = child_table.has_column(&primary_key);

            let mut children = record.children.shift_remove(&relation).unwrap_or_default();
            for child in &mut children {
                if propagate {
                    if let Some(value) = &key_value {
                        child.set(&primary_key, value.clone());
                    }
                }
                rows += self.save_tree(child).await?;
            }
            record.children.insert(relation, children);
        }

        Ok(rows)
    }

    /// Fill the record's `children` map: for every declared child table,
    /// retrieve the rows keyed by this record's primary key value and
    /// attach them. One level only, not a full graph load.
    pub async fn fleshen_children(&mut self, record: &mut Record) -> Result<()> {
        let schema = self.schema.clone();
        let table = schema.table(record.kind())?;
        let primary_key = table.primary_key.clone();

        let Some(key_value) = record.get(&primary_key).cloned() else {
            return Err(Error::configuration(format!(
                "record of `{}` has no `{primary_key}` value to fleshen children by",
                record.kind()
            )));
        };

        for child_name in table.children.clone() {
            let child_table = schema.table(&child_name)?;
            if !child_table.has_column(&primary_key) {
                return Err(Error::configuration(format!(
                    "child table `{child_name}` does not carry key column `{primary_key}`"
                )));
            }

            let children = self
                .retrieve_many(&child_name, &[(primary_key.as_str(), key_value.clone())])
                .await?;
            record.children.insert(child_name, children);
        }

        Ok(())
    }

    /// Retrieve the parent rows this record points at: for every declared
    /// parent table, look up the row whose primary key matches this
    /// record's copy of that key column.
    pub async fn parents_via_child(&mut self, record: &Record) -> Result<Vec<Record>> {
        let schema = self.schema.clone();
        let table = schema.table(record.kind())?;

        let mut parents = vec![];

        for parent_name in &table.parent_tables {
            let parent_table = schema.table(parent_name)?;
            let parent_key = parent_table.primary_key.clone();

            let Some(key_value) = record.get(&parent_key).cloned() else {
                return Err(Error::configuration(format!(
                    "record of `{}` has no `{parent_key}` value to reach parent `{parent_name}`",
                    record.kind()
                )));
            };

            parents.extend(
                self.retrieve_many(parent_name, &[(parent_key.as_str(), key_value)])
                    .await?,
            );
        }

        Ok(parents)
    }
}
