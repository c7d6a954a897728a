//! SoftCircuit - circuit engine for e-textile (fabric) circuit editors
//!
//! Users place batteries, LEDs, buttons and resistors on a piece of fabric,
//! sew them together with conductive thread or copper tape, flip switches,
//! and watch LEDs light when current can reach them. This crate is the part
//! of such an editor that is not drawing: the component catalogs, the
//! circuit graph, current propagation and JSON snapshots.
//!
//! # Quick Start
//!
//! ```
//! use softcircuit::prelude::*;
//!
//! let mut sim = CircuitSimulator::default();
//! let battery = sim.place_component("battery", Position::new(40.0, 60.0)).unwrap();
//! let led = sim.place_component("led", Position::new(160.0, 60.0)).unwrap();
//!
//! sim.connect(
//!     &TerminalRef::new(battery.id.clone(), "positive"),
//!     &TerminalRef::new(led.id.clone(), "anode"),
//!     Some("thread"),
//! ).unwrap();
//! sim.toggle(&battery.id).unwrap();
//!
//! assert!(sim.last_report().is_lit(&led.id));
//! ```
//!
//! # Features
//!
//! - **Catalogs**: component types with terminal roles and conduction rules,
//!   wire types, fabric swatches and canvas patterns
//! - **Graph store**: validated connections, cascading deletes, ordered iteration
//! - **Propagation**: idempotent, cycle-safe trace from every live battery
//! - **Snapshots**: all-or-nothing JSON import/export
//! - **Editor session**: wiring-tool and click state for UI shells

pub mod catalog;
pub mod circuit;
pub mod core;
pub mod editor;
pub mod snapshot;

// Re-export main types
pub use catalog::{
    CanvasPattern, ComponentKind, ComponentTypeDef, ConnectionKind, ConnectionTypeDef, Fabric,
    TerminalRole,
};
pub use circuit::{
    CircuitError, CircuitGraph, CircuitStats, ComponentId, ComponentInstance, ComponentState,
    ConnectionId, ConnectionInstance, Position, PropagationReport, TerminalRef,
};
pub use self::core::{CircuitSimulator, SimulatorOptions, SoftCircuitError};
pub use editor::{ClickOutcome, DropOutcome, EditorSession};
pub use snapshot::{CanvasSettings, CircuitSnapshot, SnapshotError};

/// Load a snapshot file into a fresh simulator (convenience wrapper).
pub fn load_snapshot(
    path: &std::path::Path,
    options: SimulatorOptions,
) -> Result<CircuitSimulator, SoftCircuitError> {
    let mut simulator = CircuitSimulator::new(options);
    simulator.load(path)?;
    Ok(simulator)
}

/// Write a simulator's circuit to a snapshot file (convenience wrapper).
pub fn save_snapshot(
    simulator: &CircuitSimulator,
    path: &std::path::Path,
) -> Result<(), SoftCircuitError> {
    simulator.save(path)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        CircuitError, CircuitSimulator, CircuitSnapshot, ComponentId, ComponentKind,
        ComponentState, ConnectionKind, EditorSession, Position, PropagationReport,
        SimulatorOptions, SnapshotError, SoftCircuitError, TerminalRef,
    };
}
