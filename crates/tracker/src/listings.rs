// crates/tracker/src/listings.rs
//! Flat listings consumed by the resolver layer.

use worktrack_core::{EntityKind, IndexRecord, JobRecord, WorkRecord};
use worktrack_index::{FilterField, ListQuery, OrderMode};

use crate::{TrackerResult, WorkTracker};

/// How many recent Works a connector listing returns.
const RECENT_WORKS_PER_CONNECTOR: i64 = 5;

impl WorkTracker {
    /// All Jobs of a Work, oldest first.
    pub async fn jobs_for_work(&self, work_id: &str) -> TrackerResult<Vec<JobRecord>> {
        let records = self
            .index()
            .list(
                ListQuery::of(EntityKind::Job)
                    .filter(FilterField::WorkId, work_id)
                    .order_by_created_at(OrderMode::Asc),
            )
            .await?;
        Ok(records.into_iter().filter_map(IndexRecord::into_job).collect())
    }

    /// Works referencing a domain entity, up to `first` items.
    pub async fn work_for_entity(
        &self,
        entity_id: &str,
        first: i64,
    ) -> TrackerResult<Vec<WorkRecord>> {
        let records = self
            .index()
            .list(
                ListQuery::of(EntityKind::Work)
                    .filter(FilterField::WorkEntity, entity_id)
                    .first(first),
            )
            .await?;
        Ok(records.into_iter().filter_map(IndexRecord::into_work).collect())
    }

    /// The most recent Works of a connector, newest first.
    pub async fn work_for_connector(&self, connector_id: &str) -> TrackerResult<Vec<WorkRecord>> {
        let records = self
            .index()
            .list(
                ListQuery::of(EntityKind::Work)
                    .filter(FilterField::ConnectorId, connector_id)
                    .order_by_created_at(OrderMode::Desc)
                    .first(RECENT_WORKS_PER_CONNECTOR),
            )
            .await?;
        Ok(records.into_iter().filter_map(IndexRecord::into_work).collect())
    }

    /// Works referencing a source file.
    pub async fn load_file_works(&self, file_id: &str) -> TrackerResult<Vec<WorkRecord>> {
        let records = self
            .index()
            .list(ListQuery::of(EntityKind::Work).filter(FilterField::WorkFile, file_id))
            .await?;
        Ok(records.into_iter().filter_map(IndexRecord::into_work).collect())
    }
}
