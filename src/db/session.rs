// src/db/session.rs
//! One unit of work against a SQLite connection
//!
//! Every row is a `TEXT` column set plus an `INTEGER` rowid. The session owns
//! a listener and, through it, a registry; [`Session::end`] clears it.

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension};

use crate::core::{Changeset, Entity, TrackedIdentity};
use crate::error::{CoreError, Result};
use crate::lifecycle::FieldEncryptionListener;

/// A persistent entity the session knows how to map to a table
pub trait Record: Entity {
    const TABLE: &'static str;

    /// Stored columns besides `id`, in table order
    const COLUMNS: &'static [&'static str];

    fn row_id(&self) -> Option<i64>;

    fn assign_row_id(&mut self, id: i64);

    /// Current value of every column in [`Record::COLUMNS`]
    fn to_columns(&self) -> Changeset;

    /// Hydrate from stored values
    fn from_columns(id: i64, columns: &Changeset) -> Self;
}

pub struct Session<'c> {
    conn: &'c Connection,
    listener: FieldEncryptionListener,
}

impl<'c> Session<'c> {
    pub fn new(conn: &'c Connection, listener: FieldEncryptionListener) -> Self {
        Self { conn, listener }
    }

    pub fn listener(&self) -> &FieldEncryptionListener {
        &self.listener
    }

    pub fn create_table<R: Record>(&self) -> Result<()> {
        let columns: String = R::COLUMNS
            .iter()
            .map(|c| format!(", \"{c}\" TEXT"))
            .collect();
        self.conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS \"{}\" (id INTEGER PRIMARY KEY AUTOINCREMENT{columns});",
            R::TABLE
        ))?;
        Ok(())
    }

    /// pre-persist (forced) → INSERT → assign rowid → post-persist
    pub fn insert<R: Record>(&self, record: &mut R) -> Result<i64> {
        self.listener.pre_persist(record)?;

        let values = record.to_columns();
        let names: Vec<String> = values.iter().map(|(c, _)| format!("\"{c}\"")).collect();
        let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("?{i}")).collect();
        self.conn.execute(
            &format!(
                "INSERT INTO \"{}\" ({}) VALUES ({})",
                R::TABLE,
                names.join(", "),
                placeholders.join(", ")
            ),
            params_from_iter(values.iter().map(|(_, v)| v)),
        )?;

        let id = self.conn.last_insert_rowid();
        record.assign_row_id(id);
        tracing::debug!(table = R::TABLE, id, "inserted row");

        self.listener.post_persist(record)?;
        Ok(id)
    }

    /// pre-update (changeset of all columns) → UPDATE → post-update
    pub fn update<R: Record>(&self, record: &mut R) -> Result<()> {
        let id = record
            .row_id()
            .ok_or(CoreError::NotPersisted(R::TYPE_NAME))?;

        let mut changes = record.to_columns();
        self.listener.pre_update(record, Some(&mut changes))?;

        let assignments: Vec<String> = changes
            .iter()
            .enumerate()
            .map(|(i, (c, _))| format!("\"{c}\" = ?{}", i + 1))
            .collect();
        let params = changes
            .iter()
            .map(|(_, v)| v.map_or(Value::Null, |v| Value::Text(v.to_owned())))
            .chain(std::iter::once(Value::Integer(id)));
        let updated = self.conn.execute(
            &format!(
                "UPDATE \"{}\" SET {} WHERE id = ?{}",
                R::TABLE,
                assignments.join(", "),
                changes.len() + 1
            ),
            params_from_iter(params),
        )?;
        if updated == 0 {
            return Err(CoreError::NotPersisted(R::TYPE_NAME));
        }
        tracing::debug!(table = R::TABLE, id, "updated row");

        self.listener.post_update(record)?;
        Ok(())
    }

    /// SELECT → post-load. A freshly hydrated object always starts out as
    /// ciphertext, whatever an earlier copy of the same row went through.
    pub fn find<R: Record>(&self, id: i64) -> Result<Option<R>> {
        let columns: String = R::COLUMNS.iter().map(|c| format!(", \"{c}\"")).collect();
        let sql = format!("SELECT id{columns} FROM \"{}\" WHERE id = ?1", R::TABLE);

        let row = self
            .conn
            .query_row(&sql, [id], |row| {
                let mut values = Changeset::new();
                for (i, column) in R::COLUMNS.iter().enumerate() {
                    values.set(*column, row.get::<_, Option<String>>(i + 1)?);
                }
                Ok(values)
            })
            .optional()?;

        let Some(values) = row else {
            return Ok(None);
        };
        let mut record = R::from_columns(id, &values);
        if let Some(identity) = TrackedIdentity::of(&record) {
            self.listener.registry().forget(&identity);
        }
        self.listener.post_load(&mut record)?;
        Ok(Some(record))
    }

    /// Raw stored value of one column, bypassing every callback
    pub fn raw_column<R: Record>(&self, id: i64, column: &str) -> Result<Option<String>> {
        if !R::COLUMNS.iter().any(|c| *c == column) {
            return Err(CoreError::Sql(rusqlite::Error::InvalidColumnName(
                column.to_owned(),
            )));
        }
        let value = self
            .conn
            .query_row(
                &format!("SELECT \"{column}\" FROM \"{}\" WHERE id = ?1", R::TABLE),
                [id],
                |row| row.get::<_, Option<String>>(0),
            )
            .optional()?;
        Ok(value.flatten())
    }

    /// Close the unit of work
    pub fn end(self) {
        self.listener.registry().clear();
    }
}
