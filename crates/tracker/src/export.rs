// crates/tracker/src/export.rs
//! "Currently uploading" view: in-progress export Works as file descriptors.

use futures_util::future::try_join_all;
use worktrack_core::{work_to_export_file, ExportFile, WorkState};

use crate::{TrackerResult, WorkTracker};

/// Upper bound on Works considered per entity for the progress-file view.
pub const EXPORT_WORKS_PAGE_SIZE: i64 = 200;

impl WorkTracker {
    /// Works of an entity that are still progressing, projected as
    /// in-progress upload files. Completed, errored and partial Works are
    /// filtered out — they are no longer "uploading".
    pub async fn load_export_works_as_progress_files(
        &self,
        entity_id: &str,
    ) -> TrackerResult<Vec<ExportFile>> {
        let works = self.work_for_entity(entity_id, EXPORT_WORKS_PAGE_SIZE).await?;

        let statuses =
            try_join_all(works.iter().map(|w| self.compute_work_status(&w.id))).await?;

        Ok(works
            .iter()
            .zip(statuses)
            .filter(|(_, status)| status.state == WorkState::Progress)
            .map(|(work, _)| work_to_export_file(work))
            .collect())
    }
}
