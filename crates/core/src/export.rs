// crates/core/src/export.rs
//! Projection of an in-progress Work into a UI-facing file descriptor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::WorkRecord;
use crate::time::since_now_in_minutes;

/// Fixed upload status reported for every projected file: by definition
/// only Works still in `progress` are projected.
pub const UPLOAD_STATUS_PROGRESS: &str = "progress";

/// Metadata block attached to a projected export file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFileMeta {
    pub category: String,
}

/// A Work shown as a file currently being produced.
///
/// The Work record carries no byte-size data, so `size` is always zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    pub id: String,
    pub name: Option<String>,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    pub last_modified_since_min: i64,
    pub upload_status: String,
    pub meta_data: ExportFileMeta,
}

/// Project a Work record into its export-file view.
pub fn work_to_export_file(work: &WorkRecord) -> ExportFile {
    ExportFile {
        id: work.id.clone(),
        name: work.work_file.clone(),
        size: 0,
        last_modified: work.updated_at,
        last_modified_since_min: since_now_in_minutes(&work.updated_at),
        upload_status: UPLOAD_STATUS_PROGRESS.to_string(),
        meta_data: ExportFileMeta {
            category: "export".to_string(),
        },
    }
}
