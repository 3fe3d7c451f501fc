// crates/core/src/record.rs
//! Typed Work and Job records as stored in the index.
//!
//! Both kinds live in one index, discriminated by [`EntityKind`]. A Work row
//! carries `work_id == id`, so deleting by `work_id` removes the Work and
//! every one of its Jobs in a single pass.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::status::JobStatus;

/// Discriminator for the two record kinds sharing the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Work,
    Job,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Work => "Work",
            EntityKind::Job => "Job",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "Work" => Some(EntityKind::Work),
            "Job" => Some(EntityKind::Job),
            _ => None,
        }
    }
}

/// One externally-initiated unit of asynchronous work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkRecord {
    pub id: String,
    /// Kind of operation, copied from the owning connector at creation.
    pub work_type: String,
    /// Weak reference to the owning connector (resolved by id only).
    pub connector_id: String,
    /// Optional reference to the domain entity this Work concerns.
    pub work_entity: Option<String>,
    /// Optional reference to a source file this Work concerns.
    pub work_file: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One executable step belonging to exactly one Work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: String,
    /// Owning Work backreference.
    pub work_id: String,
    pub job_status: JobStatus,
    /// Latest status messages, replaced wholesale on every update.
    pub messages: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A record of either kind, as read back from the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "entity_type")]
pub enum IndexRecord {
    Work(WorkRecord),
    Job(JobRecord),
}

impl IndexRecord {
    pub fn kind(&self) -> EntityKind {
        match self {
            IndexRecord::Work(_) => EntityKind::Work,
            IndexRecord::Job(_) => EntityKind::Job,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            IndexRecord::Work(w) => &w.id,
            IndexRecord::Job(j) => &j.id,
        }
    }

    /// The `work_id` column: a Work's own id, or a Job's owner id.
    pub fn work_id(&self) -> &str {
        match self {
            IndexRecord::Work(w) => &w.id,
            IndexRecord::Job(j) => &j.work_id,
        }
    }

    pub fn as_work(&self) -> Option<&WorkRecord> {
        match self {
            IndexRecord::Work(w) => Some(w),
            IndexRecord::Job(_) => None,
        }
    }

    pub fn as_job(&self) -> Option<&JobRecord> {
        match self {
            IndexRecord::Job(j) => Some(j),
            IndexRecord::Work(_) => None,
        }
    }

    pub fn into_work(self) -> Option<WorkRecord> {
        match self {
            IndexRecord::Work(w) => Some(w),
            IndexRecord::Job(_) => None,
        }
    }

    pub fn into_job(self) -> Option<JobRecord> {
        match self {
            IndexRecord::Job(j) => Some(j),
            IndexRecord::Work(_) => None,
        }
    }
}
