//! SQLite-backed record store

use crate::{check_payload, now_millis, StoreError};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use torx_domain::traits::RecordStore;
use torx_domain::{ProjectId, ProjectRecord, ProjectSummary, RecordUpdate};
use tracing::debug;

/// SQLite-based implementation of `RecordStore`
///
/// The schema is created idempotently when the store is opened.
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own
/// `SqliteStore` instance, or share one behind a mutex.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path`
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use torx_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("torx.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open a private in-memory database
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::new(":memory:")
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(include_str!("schema.sql"))?;
        Ok(())
    }

    /// Upsert records with an explicit timestamp
    ///
    /// All records are written in one transaction; a failure leaves the
    /// table unchanged.
    pub fn upsert_records_at(
        &mut self,
        records: &[RecordUpdate],
        updated_at: u64,
    ) -> Result<usize, StoreError> {
        for record in records {
            check_payload(record)?;
        }

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO batch_json (project_id, json, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(project_id) DO UPDATE SET
                 json = excluded.json, updated_at = excluded.updated_at",
            )?;
            for record in records {
                stmt.execute(params![
                    record.project_id.as_str(),
                    &record.payload,
                    updated_at as i64,
                ])?;
            }
        }
        tx.commit()?;

        debug!("Upserted {} record(s) at {}", records.len(), updated_at);
        Ok(records.len())
    }
}

impl RecordStore for SqliteStore {
    type Error = StoreError;

    fn list_projects(&self) -> Result<Vec<ProjectSummary>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT project_id, updated_at FROM batch_json
             ORDER BY updated_at DESC, project_id ASC",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok(ProjectSummary {
                    project_id: ProjectId::new(row.get::<_, String>(0)?),
                    updated_at: row.get::<_, i64>(1)? as u64,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    fn get_record(&self, id: &ProjectId) -> Result<Option<ProjectRecord>, Self::Error> {
        let record = self
            .conn
            .query_row(
                "SELECT project_id, json, updated_at FROM batch_json WHERE project_id = ?1",
                params![id.as_str()],
                |row| {
                    Ok(ProjectRecord {
                        project_id: ProjectId::new(row.get::<_, String>(0)?),
                        payload: row.get(1)?,
                        updated_at: row.get::<_, i64>(2)? as u64,
                    })
                },
            )
            .optional()?;

        Ok(record)
    }

    fn upsert_records(&mut self, records: &[RecordUpdate]) -> Result<usize, Self::Error> {
        self.upsert_records_at(records, now_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_is_idempotent() {
        let store = SqliteStore::in_memory().unwrap();
        store.initialize_schema().unwrap();
        assert!(store.list_projects().unwrap().is_empty());
    }

    #[test]
    fn test_rejects_non_object_payload() {
        let mut store = SqliteStore::in_memory().unwrap();
        let result = store.upsert_records(&[RecordUpdate::new(ProjectId::new("p"), "[1,2]")]);
        assert!(matches!(result, Err(StoreError::InvalidPayload { .. })));
        assert!(store.list_projects().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_payload_aborts_whole_batch() {
        let mut store = SqliteStore::in_memory().unwrap();
        let records = vec![
            RecordUpdate::new(ProjectId::new("good"), "{}"),
            RecordUpdate::new(ProjectId::new("bad"), "not json"),
        ];
        assert!(store.upsert_records(&records).is_err());
        assert!(store.get_record(&ProjectId::new("good")).unwrap().is_none());
    }
}
