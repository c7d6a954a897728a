//! Snapshot Codec
//!
//! A snapshot is the flat JSON document the editor exports and imports:
//!
//! ```json
//! {
//!   "components": [
//!     { "id": "1712345678901", "type": "battery", "state": "on",
//!       "position": { "left": 40, "top": 60 }, "rotation": 0 }
//!   ],
//!   "connections": [
//!     { "from": "1712345678901", "fromTerminal": "positive",
//!       "to": "1712345678950", "toTerminal": "anode", "type": "thread" }
//!   ],
//!   "background": "felt",
//!   "pattern": "graph"
//! }
//! ```
//!
//! Import is all-or-nothing: [`deserialize`] builds a fresh graph and only
//! hands it back once every component and connection has been accepted.

pub mod codec;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::CanvasPattern;
use crate::circuit::{CircuitError, ComponentId, ComponentState, Position};

pub use codec::{deserialize, serialize};

/// Errors that can occur while decoding a snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Connection #{index} references undeclared component {component}")]
    DanglingReference { index: usize, component: ComponentId },

    #[error(transparent)]
    Circuit(#[from] CircuitError),
}

/// Presentation metadata carried through snapshots unchanged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSettings {
    /// Fabric swatch id, when one has been dropped on the canvas
    pub background: Option<String>,
    pub pattern: String,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            background: None,
            pattern: default_pattern(),
        }
    }
}

fn default_pattern() -> String {
    CanvasPattern::default().id().to_string()
}

fn default_connection_type() -> String {
    "thread".to_string()
}

/// The exported document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitSnapshot {
    pub components: Vec<SnapshotComponent>,

    pub connections: Vec<SnapshotConnection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,

    #[serde(default = "default_pattern")]
    pub pattern: String,

    /// When the document was written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotComponent {
    pub id: ComponentId,

    #[serde(rename = "type")]
    pub type_id: String,

    #[serde(default)]
    pub state: ComponentState,

    #[serde(default)]
    pub position: Position,

    #[serde(default)]
    pub rotation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotConnection {
    pub from: ComponentId,
    pub from_terminal: String,
    pub to: ComponentId,
    pub to_terminal: String,

    /// Older documents only ever had thread, so it is the default
    #[serde(rename = "type", default = "default_connection_type")]
    pub type_id: String,
}

impl CircuitSnapshot {
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn canvas(&self) -> CanvasSettings {
        CanvasSettings {
            background: self.background.clone(),
            pattern: self.pattern.clone(),
        }
    }
}
