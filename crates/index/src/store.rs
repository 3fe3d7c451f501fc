// crates/index/src/store.rs
//! Point lookup, upsert, field-scoped deletion and filtered listing.

use chrono::{DateTime, Utc};
use tracing::debug;
use worktrack_core::{EntityKind, IndexRecord, JobRecord, JobStatus, WorkRecord};

use crate::{IndexError, IndexResult, WorkIndex};

/// Keyword columns callers may filter or delete by. A closed enum keeps
/// caller input out of SQL identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    WorkId,
    WorkType,
    WorkEntity,
    WorkFile,
    ConnectorId,
    JobStatus,
}

impl FilterField {
    pub fn column(&self) -> &'static str {
        match self {
            FilterField::WorkId => "work_id",
            FilterField::WorkType => "work_type",
            FilterField::WorkEntity => "work_entity",
            FilterField::WorkFile => "work_file",
            FilterField::ConnectorId => "connector_id",
            FilterField::JobStatus => "job_status",
        }
    }
}

/// Ordering direction for `created_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderMode {
    Asc,
    Desc,
}

impl OrderMode {
    fn sql(&self) -> &'static str {
        match self {
            OrderMode::Asc => "ASC",
            OrderMode::Desc => "DESC",
        }
    }
}

/// Filtered, ordered, flat-paginated listing query.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    kind: Option<EntityKind>,
    filters: Vec<(FilterField, String)>,
    order_by_created_at: Option<OrderMode>,
    first: Option<i64>,
}

impl ListQuery {
    /// Query scoped to one record kind.
    pub fn of(kind: EntityKind) -> Self {
        Self {
            kind: Some(kind),
            ..Default::default()
        }
    }

    /// Add an equality filter on a keyword field.
    pub fn filter(mut self, field: FilterField, value: impl Into<String>) -> Self {
        self.filters.push((field, value.into()));
        self
    }

    /// Order results by `created_at`.
    pub fn order_by_created_at(mut self, mode: OrderMode) -> Self {
        self.order_by_created_at = Some(mode);
        self
    }

    /// Page size (flat pagination — no cursors).
    pub fn first(mut self, n: i64) -> Self {
        self.first = Some(n);
        self
    }
}

const COLUMNS: &str = "id, entity_type, work_id, work_type, work_entity, work_file, \
                       connector_id, job_status, messages, created_at, updated_at";

type Row = (
    String,         // id
    String,         // entity_type
    String,         // work_id
    Option<String>, // work_type
    Option<String>, // work_entity
    Option<String>, // work_file
    Option<String>, // connector_id
    Option<String>, // job_status
    Option<String>, // messages (JSON array)
    String,         // created_at
    String,         // updated_at
);

fn malformed(id: &str, message: impl Into<String>) -> IndexError {
    IndexError::Malformed {
        id: id.to_string(),
        message: message.into(),
    }
}

fn parse_ts(id: &str, field: &str, value: &str) -> IndexResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| malformed(id, format!("bad {field} timestamp {value:?}: {e}")))
}

fn decode_row(row: Row) -> IndexResult<IndexRecord> {
    let (id, entity_type, work_id, work_type, work_entity, work_file, connector_id, job_status, messages, created_at, updated_at) =
        row;
    let created_at = parse_ts(&id, "created_at", &created_at)?;
    let updated_at = parse_ts(&id, "updated_at", &updated_at)?;

    match EntityKind::parse_str(&entity_type) {
        Some(EntityKind::Work) => Ok(IndexRecord::Work(WorkRecord {
            work_type: work_type.ok_or_else(|| malformed(&id, "Work row missing work_type"))?,
            connector_id: connector_id
                .ok_or_else(|| malformed(&id, "Work row missing connector_id"))?,
            work_entity,
            work_file,
            created_at,
            updated_at,
            id,
        })),
        Some(EntityKind::Job) => {
            let status_str =
                job_status.ok_or_else(|| malformed(&id, "Job row missing job_status"))?;
            let job_status = JobStatus::parse_str(&status_str)
                .ok_or_else(|| malformed(&id, format!("unknown job_status {status_str:?}")))?;
            let messages: Vec<String> = match messages {
                Some(json) => serde_json::from_str(&json)?,
                None => Vec::new(),
            };
            Ok(IndexRecord::Job(JobRecord {
                work_id,
                job_status,
                messages,
                created_at,
                updated_at,
                id,
            }))
        }
        None => Err(malformed(&id, format!("unknown entity_type {entity_type:?}"))),
    }
}

impl WorkIndex {
    /// Point lookup by primary key. Absence is a normal outcome.
    pub async fn get(&self, id: &str) -> IndexResult<Option<IndexRecord>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM {} WHERE id = ?",
            self.index_name()
        );
        let row: Option<Row> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        row.map(decode_row).transpose()
    }

    /// Idempotent upsert of a full record. Callers stamp `updated_at`
    /// before writing; the row is replaced wholesale.
    pub async fn put(&self, record: &IndexRecord) -> IndexResult<()> {
        let sql = format!(
            r#"INSERT OR REPLACE INTO {}
               ({COLUMNS})
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
            self.index_name()
        );

        let query = match record {
            IndexRecord::Work(w) => sqlx::query(&sql)
                .bind(&w.id)
                .bind(EntityKind::Work.as_str())
                .bind(&w.id) // work_id mirrors the Work's own id
                .bind(&w.work_type)
                .bind(&w.work_entity)
                .bind(&w.work_file)
                .bind(&w.connector_id)
                .bind(None::<String>)
                .bind(None::<String>)
                .bind(w.created_at.to_rfc3339())
                .bind(w.updated_at.to_rfc3339()),
            IndexRecord::Job(j) => sqlx::query(&sql)
                .bind(&j.id)
                .bind(EntityKind::Job.as_str())
                .bind(&j.work_id)
                .bind(None::<String>)
                .bind(None::<String>)
                .bind(None::<String>)
                .bind(None::<String>)
                .bind(j.job_status.as_str())
                .bind(serde_json::to_string(&j.messages)?)
                .bind(j.created_at.to_rfc3339())
                .bind(j.updated_at.to_rfc3339()),
        };
        query.execute(self.pool()).await?;

        debug!(
            id = record.id(),
            kind = record.kind().as_str(),
            "Indexed record"
        );
        Ok(())
    }

    /// Delete every record whose field equals `value`. Returns the number
    /// of rows removed.
    pub async fn delete_by_field(&self, field: FilterField, value: &str) -> IndexResult<u64> {
        let sql = format!(
            "DELETE FROM {} WHERE {} = ?",
            self.index_name(),
            field.column()
        );
        let deleted = sqlx::query(&sql)
            .bind(value)
            .execute(self.pool())
            .await?
            .rows_affected();
        debug!(field = field.column(), value, deleted, "Deleted by field");
        Ok(deleted)
    }

    /// Filtered, ordered, flat-paginated listing.
    pub async fn list(&self, query: ListQuery) -> IndexResult<Vec<IndexRecord>> {
        let mut sql = format!("SELECT {COLUMNS} FROM {}", self.index_name());
        let mut clauses = Vec::new();
        let mut binds = Vec::new();

        if let Some(kind) = query.kind {
            clauses.push("entity_type = ?".to_string());
            binds.push(kind.as_str().to_string());
        }
        for (field, value) in &query.filters {
            clauses.push(format!("{} = ?", field.column()));
            binds.push(value.clone());
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        if let Some(mode) = query.order_by_created_at {
            // RFC 3339 UTC timestamps sort correctly as text.
            sql.push_str(&format!(" ORDER BY created_at {}, id {}", mode.sql(), mode.sql()));
        }
        if query.first.is_some() {
            sql.push_str(" LIMIT ?");
        }

        let mut q = sqlx::query_as::<_, Row>(&sql);
        for value in &binds {
            q = q.bind(value);
        }
        if let Some(first) = query.first {
            q = q.bind(first);
        }

        let rows = q.fetch_all(self.pool()).await?;
        rows.into_iter().map(decode_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use worktrack_core::time::now;

    fn work(id: &str, entity: Option<&str>, file: Option<&str>) -> IndexRecord {
        let ts = now();
        IndexRecord::Work(WorkRecord {
            id: id.to_string(),
            work_type: "EXPORT".to_string(),
            connector_id: "conn-1".to_string(),
            work_entity: entity.map(str::to_string),
            work_file: file.map(str::to_string),
            created_at: ts,
            updated_at: ts,
        })
    }

    fn job(id: &str, work_id: &str, status: JobStatus) -> IndexRecord {
        let ts = now();
        IndexRecord::Job(JobRecord {
            id: id.to_string(),
            work_id: work_id.to_string(),
            job_status: status,
            messages: vec!["Initiate work".to_string()],
            created_at: ts,
            updated_at: ts,
        })
    }

    #[tokio::test]
    async fn test_put_get_round_trip() {
        let index = WorkIndex::new_in_memory().await.unwrap();

        let record = work("w1", Some("entity-1"), None);
        index.put(&record).await.unwrap();

        let loaded = index.get("w1").await.unwrap().expect("record should exist");
        assert_eq!(loaded, record);
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let index = WorkIndex::new_in_memory().await.unwrap();
        assert!(index.get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_is_idempotent_upsert() {
        let index = WorkIndex::new_in_memory().await.unwrap();

        index.put(&job("j1", "w1", JobStatus::Wait)).await.unwrap();
        let mut updated = match index.get("j1").await.unwrap().unwrap() {
            IndexRecord::Job(j) => j,
            _ => panic!("expected a Job"),
        };
        updated.job_status = JobStatus::Complete;
        updated.messages = vec!["done".to_string()];
        index.put(&IndexRecord::Job(updated.clone())).await.unwrap();

        let loaded = index.get("j1").await.unwrap().unwrap();
        let loaded_job = loaded.as_job().unwrap();
        assert_eq!(loaded_job.job_status, JobStatus::Complete);
        assert_eq!(loaded_job.messages, vec!["done".to_string()]);

        let count: (i64,) = sqlx::query_as(&format!(
            "SELECT COUNT(*) FROM {} WHERE id = 'j1'",
            index.index_name()
        ))
        .fetch_one(index.pool())
        .await
        .unwrap();
        assert_eq!(count.0, 1, "upsert must not duplicate");
    }

    #[tokio::test]
    async fn test_delete_by_field_cascades_over_work_id() {
        let index = WorkIndex::new_in_memory().await.unwrap();

        index.put(&work("w1", None, None)).await.unwrap();
        index.put(&job("j1", "w1", JobStatus::Wait)).await.unwrap();
        index.put(&job("j2", "w1", JobStatus::Complete)).await.unwrap();
        index.put(&work("w2", None, None)).await.unwrap();

        let deleted = index.delete_by_field(FilterField::WorkId, "w1").await.unwrap();
        assert_eq!(deleted, 3, "Work row plus its two Jobs");

        assert!(index.get("w1").await.unwrap().is_none());
        assert!(index.get("j1").await.unwrap().is_none());
        assert!(index.get("j2").await.unwrap().is_none());
        assert!(index.get("w2").await.unwrap().is_some(), "other Work untouched");
    }

    #[tokio::test]
    async fn test_list_filters_by_kind_and_field() {
        let index = WorkIndex::new_in_memory().await.unwrap();

        index.put(&work("w1", Some("e1"), None)).await.unwrap();
        index.put(&work("w2", Some("e2"), None)).await.unwrap();
        index.put(&job("j1", "w1", JobStatus::Wait)).await.unwrap();

        let works = index
            .list(ListQuery::of(EntityKind::Work).filter(FilterField::WorkEntity, "e1"))
            .await
            .unwrap();
        assert_eq!(works.len(), 1);
        assert_eq!(works[0].id(), "w1");

        let jobs = index.list(ListQuery::of(EntityKind::Job)).await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id(), "j1");
    }

    #[tokio::test]
    async fn test_list_order_and_page_size() {
        let index = WorkIndex::new_in_memory().await.unwrap();

        // Distinct created_at values, inserted out of order.
        for (id, ts) in [("w2", "2026-02-02"), ("w1", "2026-02-01"), ("w3", "2026-02-03")] {
            let created = DateTime::parse_from_rfc3339(&format!("{ts}T00:00:00+00:00"))
                .unwrap()
                .with_timezone(&Utc);
            index
                .put(&IndexRecord::Work(WorkRecord {
                    id: id.to_string(),
                    work_type: "EXPORT".to_string(),
                    connector_id: "conn-1".to_string(),
                    work_entity: None,
                    work_file: None,
                    created_at: created,
                    updated_at: created,
                }))
                .await
                .unwrap();
        }

        let asc = index
            .list(ListQuery::of(EntityKind::Work).order_by_created_at(OrderMode::Asc))
            .await
            .unwrap();
        let ids: Vec<&str> = asc.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["w1", "w2", "w3"]);

        let latest_two = index
            .list(
                ListQuery::of(EntityKind::Work)
                    .order_by_created_at(OrderMode::Desc)
                    .first(2),
            )
            .await
            .unwrap();
        let ids: Vec<&str> = latest_two.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["w3", "w2"]);
    }

    #[tokio::test]
    async fn test_job_messages_round_trip() {
        let index = WorkIndex::new_in_memory().await.unwrap();

        let ts = now();
        let record = IndexRecord::Job(JobRecord {
            id: "j9".to_string(),
            work_id: "w9".to_string(),
            job_status: JobStatus::Progress,
            messages: vec!["step 1 done".to_string(), "starting step 2".to_string()],
            created_at: ts,
            updated_at: ts,
        });
        index.put(&record).await.unwrap();

        let loaded = index.get("j9").await.unwrap().unwrap();
        assert_eq!(loaded, record);
    }
}
