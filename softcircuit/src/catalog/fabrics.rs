//! Fabric swatches and canvas patterns.
//!
//! Purely presentational: the engine stores the chosen ids and hands them
//! back through snapshots untouched.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::circuit::CircuitError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Fabric {
    pub id: &'static str,
    pub name: &'static str,
    pub color: &'static str,
}

pub static FABRICS: [Fabric; 5] = [
    Fabric { id: "cotton", name: "Cotton", color: "#f5f5dc" },
    Fabric { id: "felt", name: "Felt", color: "#a0522d" },
    Fabric { id: "linen", name: "Linen", color: "#faf0e6" },
    Fabric { id: "silk", name: "Silk", color: "#b0c4de" },
    Fabric { id: "denim", name: "Denim", color: "#1560bd" },
];

impl Fabric {
    pub fn lookup(id: &str) -> Result<&'static Fabric, CircuitError> {
        FABRICS
            .iter()
            .find(|f| f.id == id)
            .ok_or_else(|| CircuitError::UnknownFabric(id.to_string()))
    }
}

/// Background grid drawn under the components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanvasPattern {
    #[default]
    Blank,
    Graph,
    Dotted,
}

impl CanvasPattern {
    pub const ALL: [CanvasPattern; 3] =
        [CanvasPattern::Blank, CanvasPattern::Graph, CanvasPattern::Dotted];

    pub fn id(self) -> &'static str {
        match self {
            CanvasPattern::Blank => "blank",
            CanvasPattern::Graph => "graph",
            CanvasPattern::Dotted => "dotted",
        }
    }
}

impl FromStr for CanvasPattern {
    type Err = CircuitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CanvasPattern::ALL
            .into_iter()
            .find(|p| p.id() == s)
            .ok_or_else(|| CircuitError::UnknownPattern(s.to_string()))
    }
}

impl std::fmt::Display for CanvasPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}
