// crates/core/src/connector.rs
//! Connector reference type.
//!
//! Connectors are the external producers of Work. Registration, ping and
//! capability negotiation live elsewhere; here a connector is only the
//! identity and type copied onto the Work it owns.

use serde::{Deserialize, Serialize};

/// The external producer/owner of Work items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connector {
    pub id: String,
    pub name: String,
    /// Operation kind this connector performs; stamped onto each Work
    /// as `work_type`.
    pub connector_type: String,
}

impl Connector {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        connector_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            connector_type: connector_type.into(),
        }
    }
}
