// crates/tracker/src/lifecycle.rs
//! Work and Job lifecycle: creation, status updates, cascading deletion.

use futures_util::future::try_join_all;
use tracing::{debug, info};
use uuid::Uuid;
use worktrack_core::time::now;
use worktrack_core::{Connector, IndexRecord, JobRecord, JobStatus, WorkRecord};
use worktrack_index::FilterField;

use crate::{TrackerError, TrackerResult, WorkTracker};

/// First message stamped on every freshly initiated Job.
pub const INITIATE_MESSAGE: &str = "Initiate work";

impl WorkTracker {
    /// Register a new Work for a connector operation.
    ///
    /// No Jobs exist yet at this point; they are initiated as the
    /// operation is decomposed into steps.
    pub async fn create_work(
        &self,
        connector: &Connector,
        entity_id: Option<&str>,
        file_id: Option<&str>,
    ) -> TrackerResult<WorkRecord> {
        let ts = now();
        let work = WorkRecord {
            id: Uuid::new_v4().to_string(),
            work_type: connector.connector_type.clone(),
            connector_id: connector.id.clone(),
            work_entity: entity_id.map(str::to_string),
            work_file: file_id.map(str::to_string),
            created_at: ts,
            updated_at: ts,
        };
        self.index().put(&IndexRecord::Work(work.clone())).await?;

        info!(
            work_id = %work.id,
            connector_id = %connector.id,
            work_type = %work.work_type,
            "Created work"
        );
        Ok(work)
    }

    /// Create a new Job for a Work, in `wait` status.
    pub async fn initiate_job(&self, work_id: &str) -> TrackerResult<JobRecord> {
        let ts = now();
        let job = JobRecord {
            id: Uuid::new_v4().to_string(),
            work_id: work_id.to_string(),
            job_status: JobStatus::Wait,
            messages: vec![INITIATE_MESSAGE.to_string()],
            created_at: ts,
            updated_at: ts,
        };
        self.index().put(&IndexRecord::Job(job.clone())).await?;

        debug!(job_id = %job.id, work_id, "Initiated job");
        Ok(job)
    }

    /// Replace a Job's status and messages.
    ///
    /// Read-then-write: the existing record is loaded, mutated in full and
    /// written back, so concurrent updates race under last-write-wins. A
    /// missing Job is an error — updates never create records.
    pub async fn update_job(
        &self,
        job_id: &str,
        status: JobStatus,
        messages: Vec<String>,
    ) -> TrackerResult<JobRecord> {
        let mut job = self
            .index()
            .get(job_id)
            .await?
            .and_then(IndexRecord::into_job)
            .ok_or_else(|| TrackerError::JobNotFound(job_id.to_string()))?;

        job.job_status = status;
        job.messages = messages;
        job.updated_at = now();
        self.index().put(&IndexRecord::Job(job.clone())).await?;

        debug!(job_id, status = %status, "Updated job");
        Ok(job)
    }

    /// Delete a Work and every Job attached to it.
    pub async fn delete_work(&self, work_id: &str) -> TrackerResult<u64> {
        let deleted = self
            .index()
            .delete_by_field(FilterField::WorkId, work_id)
            .await?;
        info!(work_id, deleted, "Deleted work");
        Ok(deleted)
    }

    /// Delete every Work referencing a file, cascading to their Jobs.
    ///
    /// Deletions are issued concurrently and all awaited; there is no
    /// rollback if a subset fails.
    pub async fn delete_work_for_file(&self, file_id: &str) -> TrackerResult<()> {
        let works = self.load_file_works(file_id).await?;
        try_join_all(works.iter().map(|w| self.delete_work(&w.id))).await?;
        Ok(())
    }
}
