// crates/index/src/bootstrap.rs
//! Index bootstrap: schema creation and one-shot legacy reindex.
//!
//! Every statement is `IF (NOT) EXISTS`-idempotent, so bootstrap can run on
//! every open. If the legacy `work_jobs_index` table is present its rows are
//! copied into the configured index and the legacy table is dropped.

use tracing::info;

use crate::{IndexResult, WorkIndex, LEGACY_INDEX_NAME};

impl WorkIndex {
    /// Create the index table and secondary indexes, then migrate any
    /// legacy table.
    pub(crate) async fn bootstrap(&self) -> IndexResult<()> {
        let table = self.index_name();

        sqlx::query(&format!(
            r#"CREATE TABLE IF NOT EXISTS {table} (
                id TEXT PRIMARY KEY,
                entity_type TEXT NOT NULL,
                work_id TEXT NOT NULL,
                work_type TEXT,
                work_entity TEXT,
                work_file TEXT,
                connector_id TEXT,
                job_status TEXT,
                messages TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )"#
        ))
        .execute(self.pool())
        .await?;

        for column in ["work_id", "work_entity", "work_file", "connector_id"] {
            sqlx::query(&format!(
                "CREATE INDEX IF NOT EXISTS idx_{table}_{column} ON {table}({column})"
            ))
            .execute(self.pool())
            .await?;
        }

        self.reindex_legacy_table().await?;
        Ok(())
    }

    /// Copy rows from the legacy index into the configured one and drop
    /// the legacy table. No-op when the legacy table is absent.
    async fn reindex_legacy_table(&self) -> IndexResult<()> {
        let table = self.index_name();
        if table == LEGACY_INDEX_NAME {
            return Ok(());
        }

        let legacy: Option<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(LEGACY_INDEX_NAME)
        .fetch_optional(self.pool())
        .await?;
        if legacy.is_none() {
            return Ok(());
        }

        let copied = sqlx::query(&format!(
            r#"INSERT OR REPLACE INTO {table}
               (id, entity_type, work_id, work_type, work_entity, work_file,
                connector_id, job_status, messages, created_at, updated_at)
               SELECT id, entity_type, work_id, work_type, work_entity, work_file,
                      connector_id, job_status, messages, created_at, updated_at
               FROM {LEGACY_INDEX_NAME}"#
        ))
        .execute(self.pool())
        .await?
        .rows_affected();

        sqlx::query(&format!("DROP TABLE {LEGACY_INDEX_NAME}"))
            .execute(self.pool())
            .await?;

        info!(
            rows = copied,
            "Reindexed legacy {} into {}", LEGACY_INDEX_NAME, table
        );
        Ok(())
    }
}
