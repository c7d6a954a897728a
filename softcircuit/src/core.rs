//! Simulator facade shared by the editor shell and the CLI.
//! Owns the circuit graph and re-runs propagation after every change.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::catalog::{ComponentKind, ConnectionKind};
use crate::circuit::{
    CircuitError, CircuitGraph, CircuitStats, ComponentId, ComponentInstance, ComponentState,
    ConnectionId, ConnectionInstance, Position, PropagationReport, TerminalRef,
};
use crate::snapshot::{self, CanvasSettings, CircuitSnapshot, SnapshotError};

#[derive(Debug, thiserror::Error)]
pub enum SoftCircuitError {
    #[error(transparent)]
    Circuit(#[from] CircuitError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Simulator behaviour switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorOptions {
    /// Re-run propagation after every state-changing call
    pub auto_propagate: bool,
    /// Toggling a component that has no on/off state is an error rather than a no-op
    pub strict_toggle: bool,
    /// Wire kind used when a caller does not name one
    pub default_connection: ConnectionKind,
}

impl Default for SimulatorOptions {
    fn default() -> Self {
        Self {
            auto_propagate: true,
            strict_toggle: true,
            default_connection: ConnectionKind::Thread,
        }
    }
}

/// The engine as seen by a UI shell.
///
/// Every mutation runs to completion and, with `auto_propagate`, leaves LED
/// states and energized flags up to date before returning.
#[derive(Debug, Clone, Default)]
pub struct CircuitSimulator {
    graph: CircuitGraph,
    canvas: CanvasSettings,
    options: SimulatorOptions,
    last_report: PropagationReport,
}

impl CircuitSimulator {
    pub fn new(options: SimulatorOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn graph(&self) -> &CircuitGraph {
        &self.graph
    }

    pub fn options(&self) -> &SimulatorOptions {
        &self.options
    }

    pub fn canvas(&self) -> &CanvasSettings {
        &self.canvas
    }

    /// Result of the most recent propagation pass
    pub fn last_report(&self) -> &PropagationReport {
        &self.last_report
    }

    pub fn stats(&self) -> CircuitStats {
        self.graph.stats()
    }

    fn after_change(&mut self) {
        if self.options.auto_propagate {
            self.last_report = self.graph.propagate();
        }
    }

    /// Run a propagation pass now, regardless of `auto_propagate`.
    pub fn propagate(&mut self) -> &PropagationReport {
        self.last_report = self.graph.propagate();
        &self.last_report
    }

    /// Place a component by type id (`"battery"`, `"led"`, ...).
    pub fn place_component(
        &mut self,
        type_id: &str,
        position: Position,
    ) -> Result<ComponentInstance, CircuitError> {
        let kind: ComponentKind = type_id.parse()?;
        let placed = self.graph.add_component(kind, position).clone();
        self.after_change();
        Ok(placed)
    }

    /// Remove a component and its connections. Unknown ids are ignored.
    pub fn remove_component(&mut self, id: &ComponentId) -> Option<ComponentInstance> {
        let removed = self.graph.remove_component(id);
        if removed.is_some() {
            self.after_change();
        }
        removed
    }

    /// Flip a battery or button.
    ///
    /// With `strict_toggle` off, toggling any other kind returns its current
    /// state unchanged.
    pub fn toggle(&mut self, id: &ComponentId) -> Result<ComponentState, CircuitError> {
        match self.graph.toggle_state(id) {
            Ok(state) => {
                self.after_change();
                Ok(state)
            }
            Err(CircuitError::NotToggleable { .. }) if !self.options.strict_toggle => self
                .graph
                .component(id)
                .map(|c| c.state)
                .ok_or_else(|| CircuitError::UnknownComponent(id.clone())),
            Err(e) => Err(e),
        }
    }

    pub fn move_component(&mut self, id: &ComponentId, position: Position) -> Result<(), CircuitError> {
        self.graph.move_component(id, position)?;
        self.after_change();
        Ok(())
    }

    pub fn rotate_component(&mut self, id: &ComponentId, degrees: f64) -> Result<f64, CircuitError> {
        let rotation = self.graph.rotate_component(id, degrees)?;
        self.after_change();
        Ok(rotation)
    }

    /// Connect two terminals with the named wire kind, or the configured default.
    pub fn connect(
        &mut self,
        from: &TerminalRef,
        to: &TerminalRef,
        type_id: Option<&str>,
    ) -> Result<ConnectionInstance, CircuitError> {
        let kind = match type_id {
            Some(id) => id.parse()?,
            None => self.options.default_connection,
        };
        let connection = self
            .graph
            .add_connection(&from.component, &from.terminal, &to.component, &to.terminal, kind)?
            .clone();
        self.after_change();
        Ok(connection)
    }

    /// Delete a connection. Unknown ids are ignored.
    pub fn disconnect(&mut self, id: &ConnectionId) -> Option<ConnectionInstance> {
        let removed = self.graph.remove_connection(id);
        if removed.is_some() {
            self.after_change();
        }
        removed
    }

    pub fn set_background(&mut self, fabric_id: Option<String>) {
        self.canvas.background = fabric_id;
    }

    pub fn set_pattern(&mut self, pattern_id: impl Into<String>) {
        self.canvas.pattern = pattern_id.into();
    }

    /// Snapshot the current circuit.
    pub fn export(&self) -> CircuitSnapshot {
        snapshot::serialize(&self.graph, &self.canvas)
    }

    /// Replace the circuit with the contents of `snapshot`.
    ///
    /// The live graph is only swapped once the whole document decoded; on
    /// error the simulator is unchanged.
    pub fn import(&mut self, snapshot: &CircuitSnapshot) -> Result<&PropagationReport, SnapshotError> {
        let graph = snapshot::deserialize(snapshot).map_err(|e| {
            tracing::warn!("Rejected snapshot import: {}", e);
            e
        })?;

        self.graph = graph;
        self.canvas = snapshot.canvas();
        self.last_report = PropagationReport::default();
        self.after_change();
        Ok(&self.last_report)
    }

    pub fn import_json(&mut self, json: &str) -> Result<&PropagationReport, SnapshotError> {
        let snapshot = CircuitSnapshot::from_json(json)?;
        self.import(&snapshot)
    }

    pub fn export_json(&self) -> Result<String, SnapshotError> {
        self.export().to_json()
    }

    /// Import a snapshot file.
    pub fn load(&mut self, path: &Path) -> Result<&PropagationReport, SoftCircuitError> {
        let json = std::fs::read_to_string(path)?;
        tracing::debug!("Loading snapshot from {}", path.display());
        Ok(self.import_json(&json)?)
    }

    /// Write the current circuit to a snapshot file.
    pub fn save(&self, path: &Path) -> Result<(), SoftCircuitError> {
        let json = self.export_json()?;
        std::fs::write(path, json)?;
        tracing::debug!("Saved snapshot to {}", path.display());
        Ok(())
    }
}
