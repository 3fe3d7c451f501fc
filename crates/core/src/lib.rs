// crates/core/src/lib.rs
//! Domain types and pure logic for connector work tracking.
//!
//! Works are externally-initiated units of asynchronous work; each Work is
//! decomposed over time into Jobs that report their own status. The overall
//! Work status is never stored — it is re-derived from the Job status
//! distribution by [`status::classify`].

pub mod connector;
pub mod export;
pub mod record;
pub mod status;
pub mod time;

pub use connector::Connector;
pub use export::{work_to_export_file, ExportFile, ExportFileMeta, UPLOAD_STATUS_PROGRESS};
pub use record::{EntityKind, IndexRecord, JobRecord, WorkRecord};
pub use status::{classify, JobStatus, StatusBucket, WorkState, WorkStatus};
pub use time::{now, since_now_in_minutes};
