//! Connection Type Registry
//!
//! Wire kinds a user can sew or stick between terminals. Resistance and
//! style are carried for display; propagation ignores them.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::circuit::CircuitError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    #[default]
    Thread,
    Tape,
}

/// Static definition of a connection kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConnectionTypeDef {
    pub kind: ConnectionKind,
    pub id: &'static str,
    pub name: &'static str,
    /// Ohms per 10 cm run
    pub resistance: f64,
    /// Stroke color used when drawing the wire
    pub color: &'static str,
    /// Drawn as a stitched (dashed) line
    pub dashed: bool,
}

static THREAD: ConnectionTypeDef = ConnectionTypeDef {
    kind: ConnectionKind::Thread,
    id: "thread",
    name: "Conductive Thread",
    resistance: 14.0,
    color: "#c0c0c0",
    dashed: true,
};

static TAPE: ConnectionTypeDef = ConnectionTypeDef {
    kind: ConnectionKind::Tape,
    id: "tape",
    name: "Copper Tape",
    resistance: 0.05,
    color: "#b87333",
    dashed: false,
};

/// Every registered connection type, in palette order.
pub static CONNECTION_TYPES: [&ConnectionTypeDef; 2] = [&THREAD, &TAPE];

impl ConnectionKind {
    pub fn definition(self) -> &'static ConnectionTypeDef {
        match self {
            ConnectionKind::Thread => &THREAD,
            ConnectionKind::Tape => &TAPE,
        }
    }

    pub fn lookup(type_id: &str) -> Result<&'static ConnectionTypeDef, CircuitError> {
        type_id.parse::<ConnectionKind>().map(ConnectionKind::definition)
    }

    pub fn id(self) -> &'static str {
        self.definition().id
    }
}

impl FromStr for ConnectionKind {
    type Err = CircuitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "thread" => Ok(ConnectionKind::Thread),
            "tape" => Ok(ConnectionKind::Tape),
            other => Err(CircuitError::UnknownConnectionType(other.to_string())),
        }
    }
}

impl std::fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}
