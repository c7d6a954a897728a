//! Circuit Graph
//!
//! The in-memory model of a fabric circuit:
//! - [`schema`]: ids, component and connection instances
//! - [`graph`]: the mutable store (components are nodes, connections are edges)
//! - [`propagation`]: the full-rebuild pass that lights LEDs and energizes wires

pub mod graph;
pub mod propagation;
pub mod schema;

use thiserror::Error;

use crate::catalog::{ComponentKind, TerminalRole};

pub use graph::{CircuitGraph, CircuitStats};
pub use propagation::{PropagationEngine, PropagationReport};
pub use schema::*;

/// Errors raised by the registries and the graph store.
///
/// Every failing operation leaves the graph exactly as it was.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CircuitError {
    #[error("Unknown component type: {0}")]
    UnknownType(String),

    #[error("Unknown connection type: {0}")]
    UnknownConnectionType(String),

    #[error("Unknown component: {0}")]
    UnknownComponent(ComponentId),

    #[error("Component {component} ({kind}) has no terminal named '{terminal}'")]
    UnknownTerminal {
        component: ComponentId,
        kind: ComponentKind,
        terminal: String,
    },

    #[error("Component id already in use: {0}")]
    DuplicateComponent(ComponentId),

    #[error("Cannot connect component {0} to itself")]
    SelfConnection(ComponentId),

    #[error("Incompatible terminals: {from} ({from_role}) cannot connect to {to} ({to_role})")]
    IncompatibleTerminals {
        from: TerminalRef,
        from_role: TerminalRole,
        to: TerminalRef,
        to_role: TerminalRole,
    },

    #[error("Connection already exists: {0}")]
    DuplicateConnection(ConnectionId),

    #[error("Rotation must be a finite number of degrees, got {0}")]
    InvalidRotation(f64),

    #[error("Component {id} ({kind}) cannot be toggled")]
    NotToggleable { id: ComponentId, kind: ComponentKind },

    #[error("Unknown fabric: {0}")]
    UnknownFabric(String),

    #[error("Unknown canvas pattern: {0}")]
    UnknownPattern(String),
}
