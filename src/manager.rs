//! Generic entity manager
//!
//! A `Manager` is bound to one session and one entity type and offers the
//! same five operations for every entity: create, get_by_id, get_all,
//! update and delete. "Not found" is reported as `None` (or `false` for
//! delete), never as an error.

use std::marker::PhantomData;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection, OptionalExtension};
use crate::entity::{Entity, Fields};
use crate::storage::Session;
use crate::Result;

/// CRUD operations for entity type `E` over a borrowed session
pub struct Manager<'s, E: Entity> {
    session: &'s mut Session,
    _entity: PhantomData<E>,
}

impl<'s, E: Entity> Manager<'s, E> {
    pub fn new(session: &'s mut Session) -> Self {
        Self {
            session,
            _entity: PhantomData,
        }
    }

    /// Insert a new entity from the supplied fields and return it as stored.
    ///
    /// Omitted columns take their storage defaults; a missing NOT NULL
    /// column or a dangling foreign key fails with `Error::Storage`.
    pub fn create(&mut self, fields: &Fields) -> Result<E> {
        let (columns, values) = bind_fields::<E>(fields)?;

        let entity = self.session.unit_of_work(|tx| {
            let sql = if columns.is_empty() {
                format!("INSERT INTO {} DEFAULT VALUES", E::quoted_table())
            } else {
                let placeholders = (1..=columns.len())
                    .map(|i| format!("?{}", i))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "INSERT INTO {} ({}) VALUES ({})",
                    E::quoted_table(),
                    quote_columns(&columns),
                    placeholders
                )
            };
            tx.execute(&sql, params_from_iter(values.iter()))?;

            let id = tx.last_insert_rowid();
            fetch::<E>(tx, id)?.ok_or_else(|| rusqlite::Error::QueryReturnedNoRows.into())
        })?;

        tracing::debug!("Created {} {}", E::TABLE, entity.id());
        Ok(entity)
    }

    /// Fetch one entity by primary key
    pub fn get_by_id(&self, id: i64) -> Result<Option<E>> {
        fetch::<E>(self.session.connection(), id)
    }

    /// Fetch every entity of this type in insertion order
    pub fn get_all(&self) -> Result<Vec<E>> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY id",
            E::select_columns(),
            E::quoted_table()
        );
        let mut stmt = self.session.connection().prepare(&sql)?;
        let entities = stmt
            .query_map([], |row| E::from_row(row))?
            .collect::<rusqlite::Result<Vec<E>>>()?;
        Ok(entities)
    }

    /// Overwrite only the supplied fields of an existing entity.
    ///
    /// Returns `None` without writing anything if `id` does not exist.
    pub fn update(&mut self, id: i64, fields: &Fields) -> Result<Option<E>> {
        let (columns, mut values) = bind_fields::<E>(fields)?;

        let updated = self.session.unit_of_work(|tx| {
            if fetch::<E>(tx, id)?.is_none() {
                return Ok(None);
            }

            if !columns.is_empty() {
                let assignments = columns
                    .iter()
                    .enumerate()
                    .map(|(i, c)| format!("\"{}\" = ?{}", c, i + 1))
                    .collect::<Vec<_>>()
                    .join(", ");
                let sql = format!(
                    "UPDATE {} SET {} WHERE id = ?{}",
                    E::quoted_table(),
                    assignments,
                    columns.len() + 1
                );
                values.push(SqlValue::Integer(id));
                tx.execute(&sql, params_from_iter(values.iter()))?;
            }

            fetch::<E>(tx, id)
        })?;

        match &updated {
            Some(_) => tracing::debug!("Updated {} {} ({} fields)", E::TABLE, id, columns.len()),
            None => tracing::debug!("Update skipped, {} {} not found", E::TABLE, id),
        }
        Ok(updated)
    }

    /// Permanently remove an entity; `false` if it did not exist
    pub fn delete(&mut self, id: i64) -> Result<bool> {
        let removed = self.session.unit_of_work(|tx| {
            let sql = format!("DELETE FROM {} WHERE id = ?1", E::quoted_table());
            Ok(tx.execute(&sql, [id])? > 0)
        })?;

        tracing::debug!("Delete {} {}: {}", E::TABLE, id, if removed { "removed" } else { "not found" });
        Ok(removed)
    }
}

/// Look up one row by id on any connection or open transaction
fn fetch<E: Entity>(conn: &Connection, id: i64) -> Result<Option<E>> {
    let sql = format!(
        "SELECT {} FROM {} WHERE id = ?1",
        E::select_columns(),
        E::quoted_table()
    );
    conn.query_row(&sql, [id], |row| E::from_row(row))
        .optional()
        .map_err(Into::into)
}

/// Validate keys against the entity's field table and convert values.
///
/// Returns column names and their SQL values in matching order.
fn bind_fields<E: Entity>(fields: &Fields) -> Result<(Vec<&'static str>, Vec<SqlValue>)> {
    let mut columns = Vec::with_capacity(fields.len());
    let mut values = Vec::with_capacity(fields.len());
    for (key, value) in fields {
        let def = E::field(key)?;
        columns.push(def.name);
        values.push(def.to_sql(value)?);
    }
    Ok((columns, values))
}

fn quote_columns(columns: &[&str]) -> String {
    columns
        .iter()
        .map(|c| format!("\"{}\"", c))
        .collect::<Vec<_>>()
        .join(", ")
}
