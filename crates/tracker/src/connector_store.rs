// crates/tracker/src/connector_store.rs
//! Connector entity store seam and the Work→Connector link resolver.
//!
//! Connectors live in a separate entity store owned by the registration
//! subsystem; the tracker only resolves them by id through this trait.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;
use worktrack_core::Connector;

use crate::{TrackerResult, WorkTracker};

#[derive(Debug, Error)]
pub enum ConnectorStoreError {
    #[error("Connector store unavailable: {0}")]
    Unavailable(String),
}

/// Lookup-only view of the connector entity store.
#[async_trait]
pub trait ConnectorStore: Send + Sync {
    /// Resolve a connector by id. Absence is a normal outcome.
    async fn get(&self, id: &str) -> Result<Option<Connector>, ConnectorStoreError>;
}

/// In-memory connector store for tests and embedded setups.
#[derive(Debug, Default)]
pub struct MemoryConnectorStore {
    connectors: RwLock<HashMap<String, Connector>>,
}

impl MemoryConnectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, connector: Connector) {
        let mut guard = self
            .connectors
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.insert(connector.id.clone(), connector);
    }
}

#[async_trait]
impl ConnectorStore for MemoryConnectorStore {
    async fn get(&self, id: &str) -> Result<Option<Connector>, ConnectorStoreError> {
        let guard = self
            .connectors
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(guard.get(id).cloned())
    }
}

impl WorkTracker {
    /// Resolve the connector owning a Work.
    ///
    /// A missing Work is not an error: stale or already-deleted Work
    /// references resolve to `None`.
    pub async fn connector_for_work(&self, work_id: &str) -> TrackerResult<Option<Connector>> {
        let Some(record) = self.index().get(work_id).await? else {
            return Ok(None);
        };
        let Some(work) = record.as_work() else {
            return Ok(None);
        };
        Ok(self.connectors().get(&work.connector_id).await?)
    }
}
