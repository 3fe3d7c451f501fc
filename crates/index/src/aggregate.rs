// crates/index/src/aggregate.rs
//! Grouped Job-status aggregation.
//!
//! Work status classification needs only the per-status counts, so this is
//! a single `GROUP BY` over the Job rows of one Work — never an
//! item-by-item fetch.

use worktrack_core::{EntityKind, JobStatus, StatusBucket};

use crate::{IndexError, IndexResult, WorkIndex};

impl WorkIndex {
    /// Count the Jobs of one Work, grouped by `job_status`.
    ///
    /// Buckets with zero Jobs are absent from the result; a Work with no
    /// Jobs yields an empty vec.
    pub async fn job_status_counts(&self, work_id: &str) -> IndexResult<Vec<StatusBucket>> {
        let sql = format!(
            r#"SELECT job_status, COUNT(*)
               FROM {}
               WHERE work_id = ? AND entity_type = ?
               GROUP BY job_status"#,
            self.index_name()
        );
        let rows: Vec<(String, i64)> = sqlx::query_as(&sql)
            .bind(work_id)
            .bind(EntityKind::Job.as_str())
            .fetch_all(self.pool())
            .await?;

        rows.into_iter()
            .map(|(status, count)| {
                let status = JobStatus::parse_str(&status).ok_or_else(|| IndexError::Malformed {
                    id: work_id.to_string(),
                    message: format!("unknown job_status {status:?} in aggregation"),
                })?;
                Ok(StatusBucket { status, count })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use worktrack_core::time::now;
    use worktrack_core::{IndexRecord, JobRecord};

    async fn put_job(index: &WorkIndex, id: &str, work_id: &str, status: JobStatus) {
        let ts = now();
        index
            .put(&IndexRecord::Job(JobRecord {
                id: id.to_string(),
                work_id: work_id.to_string(),
                job_status: status,
                messages: vec![],
                created_at: ts,
                updated_at: ts,
            }))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_counts_grouped_by_status() {
        let index = WorkIndex::new_in_memory().await.unwrap();

        put_job(&index, "j1", "w1", JobStatus::Wait).await;
        put_job(&index, "j2", "w1", JobStatus::Wait).await;
        put_job(&index, "j3", "w1", JobStatus::Complete).await;
        put_job(&index, "j4", "w2", JobStatus::Error).await; // other Work

        let mut buckets = index.job_status_counts("w1").await.unwrap();
        buckets.sort_by_key(|b| b.status.as_str());
        assert_eq!(
            buckets,
            vec![
                StatusBucket { status: JobStatus::Complete, count: 1 },
                StatusBucket { status: JobStatus::Wait, count: 2 },
            ]
        );
    }

    #[tokio::test]
    async fn test_no_jobs_yields_empty() {
        let index = WorkIndex::new_in_memory().await.unwrap();
        assert!(index.job_status_counts("w1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_work_rows_are_excluded() {
        let index = WorkIndex::new_in_memory().await.unwrap();

        // A Work row carries work_id == id; it must not show up as a Job.
        let ts = now();
        index
            .put(&IndexRecord::Work(worktrack_core::WorkRecord {
                id: "w1".to_string(),
                work_type: "EXPORT".to_string(),
                connector_id: "conn-1".to_string(),
                work_entity: None,
                work_file: None,
                created_at: ts,
                updated_at: ts,
            }))
            .await
            .unwrap();
        put_job(&index, "j1", "w1", JobStatus::Progress).await;

        let buckets = index.job_status_counts("w1").await.unwrap();
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].count, 1);
    }
}
