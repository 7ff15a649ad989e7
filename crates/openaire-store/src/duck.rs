//! DuckDB storage for section settings.

use std::collections::BTreeMap;
use std::path::Path;

use arrow::array::{Array, Int64Array, LargeStringArray, StringArray};
use arrow::record_batch::RecordBatch;
use duckdb::{Connection, params};
use openaire_core::{Section, SectionKey, SectionRepository, settings};
use tracing::{debug, info};

use crate::StoreError;

/// DuckDB store for the `section_settings` table.
///
/// One row per (section, setting name). `context_id` is nullable, so rows are
/// matched with `IS NOT DISTINCT FROM` rather than a primary key.
///
/// Use [`open`](Self::open) for in-memory and [`open_persistent`](Self::open_persistent)
/// for file-backed storage that survives across process restarts. Both create
/// the table if it does not exist.
pub struct DuckStore {
    conn: Connection,
}

impl DuckStore {
    /// Open an in-memory DuckDB database.
    pub fn open() -> Result<Self, StoreError> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Open or create a persistent DuckDB database at the given path.
    pub fn open_persistent(path: &Path) -> Result<Self, StoreError> {
        let store = Self {
            conn: Connection::open(path)?,
        };
        store.ensure_schema()?;
        info!(path = %path.display(), "opened section store");
        Ok(store)
    }

    /// Open a persistent database that must already exist.
    ///
    /// Read-only callers use this so a mistyped path fails instead of leaving
    /// an empty database file behind.
    pub fn open_existing(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            return Err(StoreError::DatabaseNotFound(path.to_path_buf()));
        }
        Self::open_persistent(path)
    }

    fn ensure_schema(&self) -> Result<(), StoreError> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                section_id UBIGINT NOT NULL,
                context_id UBIGINT,
                setting_name VARCHAR NOT NULL,
                setting_value VARCHAR NOT NULL
            )",
            settings::TABLE
        );
        self.conn.execute_batch(&sql)?;
        Ok(())
    }

    /// Number of rows in the `section_settings` table.
    pub fn settings_count(&self) -> Result<usize, StoreError> {
        let sql = format!("SELECT count(*)::BIGINT AS cnt FROM {}", settings::TABLE);
        let batches = self.query_arrow(&sql)?;
        let batch = batches.first().ok_or(StoreError::NoResults)?;
        let col = batch
            .column(0)
            .as_any()
            .downcast_ref::<Int64Array>()
            .ok_or_else(|| StoreError::Other("count column not i64".into()))?;
        Ok(col.value(0) as usize)
    }

    /// Execute arbitrary SQL and return Arrow RecordBatches.
    pub fn query_arrow(&self, sql: &str) -> Result<Vec<RecordBatch>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let batches: Vec<RecordBatch> = stmt.query_arrow([])?.collect();
        Ok(batches)
    }
}

impl SectionRepository for DuckStore {
    type Error = StoreError;

    fn load(&self, key: SectionKey) -> Result<Section, StoreError> {
        let sql = format!(
            "SELECT setting_name, setting_value FROM {}
             WHERE section_id = ? AND context_id IS NOT DISTINCT FROM ?::UBIGINT
             ORDER BY setting_name",
            settings::TABLE
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let batches: Vec<RecordBatch> = stmt
            .query_arrow(params![key.section_id, key.context_id])?
            .collect();

        let mut data = BTreeMap::new();
        for batch in &batches {
            let names = batch
                .column_by_name("setting_name")
                .ok_or(StoreError::MissingColumn("setting_name"))?;
            let values = batch
                .column_by_name("setting_value")
                .ok_or(StoreError::MissingColumn("setting_value"))?;
            for row in 0..batch.num_rows() {
                if let Some(name) = get_string(names.as_ref(), row) {
                    let value = get_string(values.as_ref(), row).unwrap_or_default();
                    data.insert(name, value);
                }
            }
        }
        debug!(key = %key, settings = data.len(), "loaded section settings");
        Ok(Section::with_data(key, data))
    }

    /// Replaces each carried setting inside one transaction; settings the
    /// section does not carry are left alone.
    fn update(&mut self, section: &Section) -> Result<(), StoreError> {
        let key = section.key();
        let delete = format!(
            "DELETE FROM {} WHERE section_id = ? AND context_id IS NOT DISTINCT FROM ?::UBIGINT
             AND setting_name = ?",
            settings::TABLE
        );
        let insert = format!("INSERT INTO {} VALUES (?, ?, ?, ?)", settings::TABLE);

        let tx = self.conn.transaction()?;
        for (name, value) in section.settings() {
            tx.execute(&delete, params![key.section_id, key.context_id, name])?;
            tx.execute(&insert, params![key.section_id, key.context_id, name, value])?;
        }
        tx.commit()?;
        debug!(key = %key, "updated section settings");
        Ok(())
    }
}

/// Extract a string value from an Arrow array (handles Utf8 and LargeUtf8).
fn get_string(col: &dyn Array, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    col.as_any()
        .downcast_ref::<StringArray>()
        .map(|arr| arr.value(row).to_string())
        .or_else(|| {
            col.as_any()
                .downcast_ref::<LargeStringArray>()
                .map(|arr| arr.value(row).to_string())
        })
}
