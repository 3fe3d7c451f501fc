// crates/tracker/src/status.rs
//! Derived Work status.

use worktrack_core::WorkStatus;

use crate::{TrackerResult, WorkTracker};

impl WorkTracker {
    /// Compute the authoritative status of a Work from its Jobs' status
    /// distribution.
    ///
    /// Always re-derived from the index at call time, never cached; the
    /// result reflects whatever the index has settled to at that instant.
    pub async fn compute_work_status(&self, work_id: &str) -> TrackerResult<WorkStatus> {
        let buckets = self.index().job_status_counts(work_id).await?;
        Ok(WorkStatus::from_buckets(buckets))
    }
}
