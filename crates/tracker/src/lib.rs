// crates/tracker/src/lib.rs
//! Work lifecycle management and status aggregation on top of the index.
//!
//! [`WorkTracker`] is the service handle: connectors create Work through it,
//! Jobs report progress through it, and the (external) resolver layer reads
//! listings and derived statuses from it. It owns no state beyond the index
//! handle and a [`ConnectorStore`] for resolving Work→Connector links.

mod connector_store;
mod export;
mod lifecycle;
mod listings;
mod status;

pub use connector_store::{ConnectorStore, ConnectorStoreError, MemoryConnectorStore};
pub use export::EXPORT_WORKS_PAGE_SIZE;
pub use lifecycle::INITIATE_MESSAGE;

use std::sync::Arc;
use thiserror::Error;
use worktrack_index::{IndexError, WorkIndex};

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("Connector store error: {0}")]
    ConnectorStore(#[from] ConnectorStoreError),

    #[error("Job not found: {0}")]
    JobNotFound(String),
}

pub type TrackerResult<T> = Result<T, TrackerError>;

/// Service handle for Work/Job tracking.
#[derive(Clone)]
pub struct WorkTracker {
    index: WorkIndex,
    connectors: Arc<dyn ConnectorStore>,
}

impl WorkTracker {
    pub fn new(index: WorkIndex, connectors: Arc<dyn ConnectorStore>) -> Self {
        Self { index, connectors }
    }

    /// The underlying Work/Job index.
    pub fn index(&self) -> &WorkIndex {
        &self.index
    }

    pub(crate) fn connectors(&self) -> &dyn ConnectorStore {
        self.connectors.as_ref()
    }
}
